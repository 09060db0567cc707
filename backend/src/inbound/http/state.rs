//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and depend only on
//! domain ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AnimalCommand, AnimalQuery, PhotoStore, VaccineCommand, VaccineQuery,
};

use super::rate_limit::LoginThrottle;

/// Parameter object bundling the port implementations.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub animals: Arc<dyn AnimalCommand>,
    pub animals_query: Arc<dyn AnimalQuery>,
    pub vaccines: Arc<dyn VaccineCommand>,
    pub vaccines_query: Arc<dyn VaccineQuery>,
    pub accounts: Arc<dyn AccountCommand>,
    pub photos: Arc<dyn PhotoStore>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub animals: Arc<dyn AnimalCommand>,
    pub animals_query: Arc<dyn AnimalQuery>,
    pub vaccines: Arc<dyn VaccineCommand>,
    pub vaccines_query: Arc<dyn VaccineQuery>,
    pub accounts: Arc<dyn AccountCommand>,
    pub photos: Arc<dyn PhotoStore>,
    pub login_throttle: Arc<LoginThrottle>,
}

impl HttpState {
    /// Construct state from the ports bundle and the login throttle.
    pub fn new(ports: HttpStatePorts, login_throttle: Arc<LoginThrottle>) -> Self {
        let HttpStatePorts {
            animals,
            animals_query,
            vaccines,
            vaccines_query,
            accounts,
            photos,
        } = ports;
        Self {
            animals,
            animals_query,
            vaccines,
            vaccines_query,
            accounts,
            photos,
            login_throttle,
        }
    }
}
