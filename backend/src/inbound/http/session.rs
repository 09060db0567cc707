//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so handlers only persist, read, or purge
//! the signed-in username.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, Username};

pub(crate) const USERNAME_KEY: &str = "username";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the signed-in username, rotating the session id.
    pub fn persist_username(&self, username: &Username) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USERNAME_KEY, username.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Signed-in username, if any. Tampered values read as signed out.
    pub fn username(&self) -> Result<Option<Username>, Error> {
        let raw = self
            .0
            .get::<String>(USERNAME_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|value| match Username::new(value) {
            Ok(username) => Some(username),
            Err(error) => {
                tracing::warn!("invalid username in session cookie: {error}");
                None
            }
        }))
    }

    /// Require a signed-in user or return `401 Unauthorized`.
    pub fn require_username(&self) -> Result<Username, Error> {
        self.username()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop every session value and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
