//! Shared harness for the end-to-end HTTP suites.
//!
//! Builds the full handler stack over one in-memory record store and a
//! temporary photo directory, with real Argon2 hashing.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::BoxBody;
use actix_web::cookie::Key;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use mockable::{Clock, DefaultClock};
use tempfile::TempDir;

use herdbook::Trace;
use herdbook::domain::{
    AccountCommandService, AnimalCommandService, AnimalQueryService, VaccineCommandService,
    VaccineQueryService,
};
use herdbook::inbound::http::rate_limit::LoginThrottle;
use herdbook::inbound::http::state::{HttpState, HttpStatePorts};
use herdbook::inbound::http::{configure, json_config};
use herdbook::outbound::memory::InMemoryRecordStore;
use herdbook::outbound::password::Argon2PasswordHasher;
use herdbook::outbound::photos::DirPhotoStore;
use herdbook::test_support::temp_photo_dir;

const BOUNDARY: &str = "herdbook-e2e-boundary";

/// Handler state plus the directory it stores photos in.
pub struct Harness {
    pub state: web::Data<HttpState>,
    pub photo_dir: TempDir,
}

/// Fresh in-memory backend allowing `max_login_attempts` per 15 minutes.
pub fn harness(max_login_attempts: u32) -> Harness {
    let photo_dir = temp_photo_dir();
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let photos = match DirPhotoStore::open(photo_dir.path(), Arc::clone(&clock)) {
        Ok(store) => Arc::new(store),
        Err(error) => panic!("open photo store: {error}"),
    };
    let store = Arc::new(InMemoryRecordStore::new());
    let ports = HttpStatePorts {
        animals: Arc::new(AnimalCommandService::new(
            Arc::clone(&store),
            Arc::clone(&photos),
        )),
        animals_query: Arc::new(AnimalQueryService::new(Arc::clone(&store))),
        vaccines: Arc::new(VaccineCommandService::new(Arc::clone(&store))),
        vaccines_query: Arc::new(VaccineQueryService::new(Arc::clone(&store))),
        accounts: Arc::new(AccountCommandService::new(
            store,
            Arc::new(Argon2PasswordHasher::new()),
        )),
        photos,
    };
    let throttle = LoginThrottle::new(max_login_attempts, 900, clock);
    Harness {
        state: web::Data::new(HttpState::new(ports, Arc::new(throttle))),
        photo_dir,
    }
}

/// Initialise the routed application over `state`.
pub async fn init_app(
    state: web::Data<HttpState>,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(state)
            .app_data(json_config())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                    .cookie_name("session".to_owned())
                    .cookie_secure(false)
                    .build(),
            )
            .wrap(Trace)
            .configure(configure),
    )
    .await
}

/// `POST /add-animal` request carrying `fields` and an optional photo.
pub fn add_animal_request(fields: &[(&str, &str)], photo: Option<(&str, &[u8])>) -> Request {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = photo {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"{file_name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    test::TestRequest::post()
        .uri("/add-animal")
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
        .to_request()
}

/// Form fields for a valid animal with no recorded parents.
pub fn animal_fields(siniiga: &str) -> Vec<(&str, &str)> {
    vec![
        ("siniiga", siniiga),
        ("race", "Brahman"),
        ("birthdate", "2023-11-20"),
        ("birth_weight", "32.5"),
    ]
}
