//! Tests for the animal registration and query services.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::{MockAnimalRepository, MockPhotoStore, PhotoUpload};
use crate::domain::{BirthWeight, ErrorCode, Race, parse_birthdate};

fn tag(value: &str) -> Siniiga {
    Siniiga::new(value).expect("valid tag")
}

#[fixture]
fn draft() -> AnimalDraft {
    AnimalDraft {
        siniiga: tag("MX-100"),
        race: Race::new("Brahman").expect("valid race"),
        birthdate: parse_birthdate("2023-11-20").expect("valid date"),
        birth_weight: BirthWeight::new(32.0).expect("valid weight"),
        father: None,
        mother: None,
    }
}

fn photo() -> PhotoUpload {
    PhotoUpload {
        extension: Some("jpg".to_owned()),
        bytes: vec![0xFF, 0xD8, 0xFF],
    }
}

fn command_service(
    repo: MockAnimalRepository,
    photos: MockPhotoStore,
) -> AnimalCommandService<MockAnimalRepository, MockPhotoStore> {
    AnimalCommandService::new(Arc::new(repo), Arc::new(photos))
}

#[rstest]
#[tokio::test]
async fn register_without_parents_skips_lookup(draft: AnimalDraft) {
    let mut repo = MockAnimalRepository::new();
    repo.expect_find_existing().times(0);
    repo.expect_insert().times(1).return_once(|_| Ok(()));
    let mut photos = MockPhotoStore::new();
    photos.expect_save().times(0);

    let animal = command_service(repo, photos)
        .register(RegisterAnimalRequest { draft, photo: None })
        .await
        .expect("registration succeeds");

    assert_eq!(animal.siniiga().as_ref(), "MX-100");
    assert!(animal.photo_path().is_none());
}

#[rstest]
#[tokio::test]
async fn register_rejects_same_parent_before_touching_store(mut draft: AnimalDraft) {
    draft.father = Some(tag("P-1"));
    draft.mother = Some(tag("P-1"));
    let mut repo = MockAnimalRepository::new();
    repo.expect_find_existing().times(0);
    repo.expect_insert().times(0);
    let mut photos = MockPhotoStore::new();
    photos.expect_save().times(0);

    let error = command_service(repo, photos)
        .register(RegisterAnimalRequest {
            draft,
            photo: Some(photo()),
        })
        .await
        .expect_err("same parent rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details(),
        Some(&json!({ "field": "mother", "code": "same_parent" }))
    );
}

#[rstest]
#[tokio::test]
async fn register_reports_every_missing_parent(mut draft: AnimalDraft) {
    draft.father = Some(tag("F-1"));
    draft.mother = Some(tag("M-1"));
    let mut repo = MockAnimalRepository::new();
    repo.expect_find_existing()
        .withf(|ids| ids.len() == 2)
        .times(1)
        .return_once(|_| Ok(Vec::new()));
    repo.expect_insert().times(0);
    let mut photos = MockPhotoStore::new();
    photos.expect_save().times(0);

    let error = command_service(repo, photos)
        .register(RegisterAnimalRequest { draft, photo: None })
        .await
        .expect_err("missing parents rejected");

    assert_eq!(error.code(), ErrorCode::UnknownReference);
    assert!(error.message().contains("father and mother"));
    assert_eq!(
        error.details(),
        Some(&json!({ "missing": ["father", "mother"] }))
    );
}

#[rstest]
#[tokio::test]
async fn register_names_only_the_missing_role(mut draft: AnimalDraft) {
    draft.father = Some(tag("F-1"));
    draft.mother = Some(tag("M-1"));
    let mut repo = MockAnimalRepository::new();
    repo.expect_find_existing()
        .times(1)
        .return_once(|_| Ok(vec![tag("F-1")]));
    repo.expect_insert().times(0);

    let error = command_service(repo, MockPhotoStore::new())
        .register(RegisterAnimalRequest { draft, photo: None })
        .await
        .expect_err("missing mother rejected");

    assert_eq!(error.details(), Some(&json!({ "missing": ["mother"] })));
}

#[rstest]
#[tokio::test]
async fn register_stores_photo_and_records_its_path(mut draft: AnimalDraft) {
    draft.mother = Some(tag("M-1"));
    let mut repo = MockAnimalRepository::new();
    repo.expect_find_existing()
        .times(1)
        .return_once(|_| Ok(vec![tag("M-1")]));
    repo.expect_insert()
        .withf(|animal| animal.photo_path() == Some("images/1-a.jpg"))
        .times(1)
        .return_once(|_| Ok(()));
    let mut photos = MockPhotoStore::new();
    photos
        .expect_save()
        .times(1)
        .return_once(|_| Ok("images/1-a.jpg".to_owned()));
    photos.expect_remove().times(0);

    let animal = command_service(repo, photos)
        .register(RegisterAnimalRequest {
            draft,
            photo: Some(photo()),
        })
        .await
        .expect("registration succeeds");

    assert_eq!(animal.mother().map(AsRef::as_ref), Some("M-1"));
}

#[rstest]
#[tokio::test]
async fn duplicate_insert_removes_stored_photo(draft: AnimalDraft) {
    let mut repo = MockAnimalRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(AnimalRepositoryError::duplicate("MX-100")));
    let mut photos = MockPhotoStore::new();
    photos
        .expect_save()
        .times(1)
        .return_once(|_| Ok("images/1-a.jpg".to_owned()));
    photos
        .expect_remove()
        .with(eq("images/1-a.jpg"))
        .times(1)
        .return_once(|_| Ok(()));

    let error = command_service(repo, photos)
        .register(RegisterAnimalRequest {
            draft,
            photo: Some(photo()),
        })
        .await
        .expect_err("duplicate rejected");

    assert_eq!(error.code(), ErrorCode::DuplicateKey);
}

#[rstest]
#[tokio::test]
async fn failed_cleanup_still_reports_insert_error(draft: AnimalDraft) {
    let mut repo = MockAnimalRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(AnimalRepositoryError::query("disk full")));
    let mut photos = MockPhotoStore::new();
    photos
        .expect_save()
        .return_once(|_| Ok("images/1-a.jpg".to_owned()));
    photos
        .expect_remove()
        .times(1)
        .return_once(|_| Err(PhotoStoreError::io("permission denied")));

    let error = command_service(repo, photos)
        .register(RegisterAnimalRequest {
            draft,
            photo: Some(photo()),
        })
        .await
        .expect_err("storage failure surfaces");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn parent_deleted_mid_flight_maps_to_unknown_reference(mut draft: AnimalDraft) {
    draft.father = Some(tag("F-1"));
    let mut repo = MockAnimalRepository::new();
    repo.expect_find_existing()
        .return_once(|_| Ok(vec![tag("F-1")]));
    repo.expect_insert()
        .return_once(|_| Err(AnimalRepositoryError::unknown_parent("animals_father_fkey")));

    let error = command_service(repo, MockPhotoStore::new())
        .register(RegisterAnimalRequest { draft, photo: None })
        .await
        .expect_err("fk violation rejected");

    assert_eq!(error.code(), ErrorCode::UnknownReference);
}

#[rstest]
#[tokio::test]
async fn photo_failure_aborts_before_insert(draft: AnimalDraft) {
    let mut repo = MockAnimalRepository::new();
    repo.expect_insert().times(0);
    let mut photos = MockPhotoStore::new();
    photos
        .expect_save()
        .return_once(|_| Err(PhotoStoreError::io("read-only filesystem")));

    let error = command_service(repo, photos)
        .register(RegisterAnimalRequest {
            draft,
            photo: Some(photo()),
        })
        .await
        .expect_err("photo failure surfaces");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[case(true, None)]
#[case(false, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn delete_maps_row_count(#[case] matched: bool, #[case] expected: Option<ErrorCode>) {
    let mut repo = MockAnimalRepository::new();
    repo.expect_delete()
        .withf(|id| id.as_ref() == "MX-100")
        .times(1)
        .return_once(move |_| Ok(matched));

    let result = command_service(repo, MockPhotoStore::new())
        .delete("MX-100")
        .await;

    assert_eq!(result.err().map(|error| error.code()), expected);
}

#[rstest]
#[tokio::test]
async fn delete_of_malformed_tag_is_not_found() {
    let mut repo = MockAnimalRepository::new();
    repo.expect_delete().times(0);

    let error = command_service(repo, MockPhotoStore::new())
        .delete("not a tag")
        .await
        .expect_err("malformed tag");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn detail_missing_animal_is_not_found() {
    let mut repo = MockAnimalRepository::new();
    repo.expect_find_detail().times(1).return_once(|_| Ok(None));

    let error = AnimalQueryService::new(Arc::new(repo))
        .detail("MX-404")
        .await
        .expect_err("missing animal");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn search_passes_fragment_through() {
    let mut repo = MockAnimalRepository::new();
    repo.expect_search()
        .with(eq("12_3"))
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let found = AnimalQueryService::new(Arc::new(repo))
        .search("12_3")
        .await
        .expect("search succeeds");

    assert!(found.is_empty());
}

#[rstest]
#[tokio::test]
async fn list_connection_failure_is_internal() {
    let mut repo = MockAnimalRepository::new();
    repo.expect_list()
        .return_once(|| Err(AnimalRepositoryError::connection("refused")));

    let error = AnimalQueryService::new(Arc::new(repo))
        .list()
        .await
        .expect_err("connection failure");

    assert_eq!(error.code(), ErrorCode::InternalError);
}
