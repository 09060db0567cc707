//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::web;
use mockable::DefaultClock;

use crate::domain::ports::{
    MockAccountCommand, MockAnimalCommand, MockAnimalQuery, MockPhotoStore, MockVaccineCommand,
    MockVaccineQuery,
};

use super::rate_limit::LoginThrottle;
use super::state::{HttpState, HttpStatePorts};

/// Boundary used by [`multipart_body`].
pub const MULTIPART_BOUNDARY: &str = "herdbook-test-boundary";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by a response.
///
/// # Panics
///
/// Panics when the response did not set the cookie.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Ports backed by mocks with no expectations; any call fails the test.
pub fn unused_ports() -> HttpStatePorts {
    HttpStatePorts {
        animals: Arc::new(MockAnimalCommand::new()),
        animals_query: Arc::new(MockAnimalQuery::new()),
        vaccines: Arc::new(MockVaccineCommand::new()),
        vaccines_query: Arc::new(MockVaccineQuery::new()),
        accounts: Arc::new(MockAccountCommand::new()),
        photos: Arc::new(MockPhotoStore::new()),
    }
}

/// Wrap ports in handler state with a throttle allowing `max_attempts`
/// logins per 15 minutes.
pub fn http_state_with_throttle(ports: HttpStatePorts, max_attempts: u32) -> web::Data<HttpState> {
    let throttle = LoginThrottle::new(max_attempts, 900, Arc::new(DefaultClock));
    web::Data::new(HttpState::new(ports, Arc::new(throttle)))
}

/// Wrap ports in handler state with the default login throttle.
pub fn http_state(ports: HttpStatePorts) -> web::Data<HttpState> {
    http_state_with_throttle(ports, 5)
}

/// Encode text fields and an optional `(file name, bytes)` photo as a
/// `multipart/form-data` body. Returns the content type and the body.
pub fn multipart_body(fields: &[(&str, &str)], photo: Option<(&str, &[u8])>) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = photo {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    (
        format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        body,
    )
}
