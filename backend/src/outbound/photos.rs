//! Photo store backed by a capability-scoped directory.
//!
//! Files are written under generated names (`<unix-millis>-<uuid>[.<ext>]`)
//! so concurrent uploads never collide and client file names never reach
//! the filesystem. All access goes through a `cap_std` [`Dir`], so a name
//! can never resolve outside the photo directory.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::{PHOTO_PATH_PREFIX, PhotoStore, PhotoStoreError, PhotoUpload};

const MAX_EXTENSION_LEN: usize = 8;

/// [`PhotoStore`] writing into one directory.
#[derive(Clone)]
pub struct DirPhotoStore {
    dir: Arc<Dir>,
    clock: Arc<dyn Clock>,
}

impl DirPhotoStore {
    /// Open (creating if needed) the photo directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PhotoStoreError::Io`] when the directory cannot be created
    /// or opened.
    pub fn open(path: &Path, clock: Arc<dyn Clock>) -> Result<Self, PhotoStoreError> {
        Dir::create_ambient_dir_all(path, ambient_authority()).map_err(io_error)?;
        let dir = Dir::open_ambient_dir(path, ambient_authority()).map_err(io_error)?;
        Ok(Self {
            dir: Arc::new(dir),
            clock,
        })
    }

    fn generate_name(&self, extension: Option<&str>) -> String {
        let millis = self.clock.utc().timestamp_millis();
        let stem = format!("{millis}-{}", Uuid::new_v4());
        match sanitise_extension(extension) {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem,
        }
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, PhotoStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> Result<T, PhotoStoreError> + Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || op(&dir))
            .await
            .map_err(|err| PhotoStoreError::io(err.to_string()))?
    }
}

fn io_error(error: io::Error) -> PhotoStoreError {
    PhotoStoreError::io(error.to_string())
}

/// Lower-case the extension and drop it unless it is short and alphanumeric.
fn sanitise_extension(extension: Option<&str>) -> Option<String> {
    let ext = extension?.trim().trim_start_matches('.');
    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.chars().all(|ch| ch.is_ascii_alphanumeric());
    valid.then(|| ext.to_ascii_lowercase())
}

/// Accept only bare file names made of `[A-Za-z0-9._-]` not starting with `.`.
fn validate_name(name: &str) -> Result<&str, PhotoStoreError> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_'));
    if valid {
        Ok(name)
    } else {
        Err(PhotoStoreError::invalid_name(name))
    }
}

#[async_trait]
impl PhotoStore for DirPhotoStore {
    async fn save(&self, photo: &PhotoUpload) -> Result<String, PhotoStoreError> {
        let name = self.generate_name(photo.extension.as_deref());
        let bytes = photo.bytes.clone();
        let file_name = name.clone();
        self.blocking(move |dir| dir.write(&file_name, bytes).map_err(io_error))
            .await?;
        Ok(format!("{PHOTO_PATH_PREFIX}{name}"))
    }

    async fn remove(&self, path: &str) -> Result<(), PhotoStoreError> {
        let name = path
            .strip_prefix(PHOTO_PATH_PREFIX)
            .ok_or_else(|| PhotoStoreError::invalid_name(path))?;
        let name = validate_name(name)?.to_owned();
        self.blocking(move |dir| match dir.remove_file(&name) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                Err(PhotoStoreError::not_found(name))
            }
            Err(error) => Err(io_error(error)),
        })
        .await
    }

    async fn load(&self, name: &str) -> Result<Vec<u8>, PhotoStoreError> {
        let name = validate_name(name)?.to_owned();
        self.blocking(move |dir| match dir.read(&name) {
            Ok(bytes) => Ok(bytes),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                Err(PhotoStoreError::not_found(name))
            }
            Err(error) => Err(io_error(error)),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use crate::test_support::MutableClock;

    struct Harness {
        _root: TempDir,
        store: DirPhotoStore,
    }

    #[fixture]
    fn harness() -> Harness {
        let root = TempDir::new().expect("temp dir");
        let clock = Utc
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .single()
            .expect("valid timestamp");
        let store = DirPhotoStore::open(
            &root.path().join("images"),
            Arc::new(MutableClock::new(clock)),
        )
        .expect("open store");
        Harness { _root: root, store }
    }

    fn upload(extension: Option<&str>) -> PhotoUpload {
        PhotoUpload {
            extension: extension.map(str::to_owned),
            bytes: b"\x89PNG fake".to_vec(),
        }
    }

    #[rstest]
    #[case(Some("jpg"), Some("jpg"))]
    #[case(Some(".PNG"), Some("png"))]
    #[case(Some("tar.gz"), None)]
    #[case(Some("toolongext"), None)]
    #[case(Some(""), None)]
    #[case(None, None)]
    fn extensions_are_sanitised(#[case] input: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(sanitise_extension(input).as_deref(), expected);
    }

    #[rstest]
    #[case("../secret")]
    #[case("a/b.jpg")]
    #[case(".hidden")]
    #[case("")]
    #[case("a b.jpg")]
    fn unsafe_names_are_rejected(#[case] name: &str) {
        assert_eq!(validate_name(name), Err(PhotoStoreError::invalid_name(name)));
    }

    #[rstest]
    #[tokio::test]
    async fn saved_photos_can_be_loaded_and_removed(harness: Harness) {
        let path = harness.store.save(&upload(Some("JPG"))).await.expect("save");

        let name = path.strip_prefix("images/").expect("relative path");
        assert!(name.starts_with("1704164645000-"));
        assert!(name.ends_with(".jpg"));

        let bytes = harness.store.load(name).await.expect("load");
        assert_eq!(bytes, b"\x89PNG fake");

        harness.store.remove(&path).await.expect("remove");
        assert_eq!(
            harness.store.load(name).await,
            Err(PhotoStoreError::not_found(name))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn names_are_unique_within_a_millisecond(harness: Harness) {
        let first = harness.store.save(&upload(None)).await.expect("save");
        let second = harness.store.save(&upload(None)).await.expect("save");
        assert_ne!(first, second);
    }

    #[rstest]
    #[tokio::test]
    async fn remove_requires_the_images_prefix(harness: Harness) {
        assert_eq!(
            harness.store.remove("other/photo.jpg").await,
            Err(PhotoStoreError::invalid_name("other/photo.jpg"))
        );
    }
}
