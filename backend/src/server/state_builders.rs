//! Builders wiring repositories, services, and adapters into HTTP state.

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use herdbook::domain::ports::{AnimalRepository, UserRepository, VaccineRepository};
use herdbook::domain::{
    AccountCommandService, AnimalCommandService, AnimalQueryService, VaccineCommandService,
    VaccineQueryService,
};
use herdbook::inbound::http::rate_limit::LoginThrottle;
use herdbook::inbound::http::state::{HttpState, HttpStatePorts};
use herdbook::outbound::memory::InMemoryRecordStore;
use herdbook::outbound::password::Argon2PasswordHasher;
use herdbook::outbound::persistence::{
    DieselAnimalRepository, DieselUserRepository, DieselVaccineRepository,
};
use herdbook::outbound::photos::DirPhotoStore;

use super::ServerConfig;

/// Repositories backing one HTTP state.
struct Repositories<A, V, U> {
    animals: Arc<A>,
    vaccines: Arc<V>,
    users: Arc<U>,
}

fn build_ports<A, V, U>(repos: Repositories<A, V, U>, photos: Arc<DirPhotoStore>) -> HttpStatePorts
where
    A: AnimalRepository + 'static,
    V: VaccineRepository + 'static,
    U: UserRepository + 'static,
{
    let Repositories {
        animals,
        vaccines,
        users,
    } = repos;
    let hasher = Arc::new(Argon2PasswordHasher::default());
    HttpStatePorts {
        animals: Arc::new(AnimalCommandService::new(
            Arc::clone(&animals),
            Arc::clone(&photos),
        )),
        animals_query: Arc::new(AnimalQueryService::new(animals)),
        vaccines: Arc::new(VaccineCommandService::new(Arc::clone(&vaccines))),
        vaccines_query: Arc::new(VaccineQueryService::new(vaccines)),
        accounts: Arc::new(AccountCommandService::new(users, hasher)),
        photos,
    }
}

/// Build handler state from configuration.
///
/// Uses the Diesel repositories when a pool is configured; otherwise one
/// in-memory store backs every repository port.
///
/// # Errors
/// Returns [`io::Error`] when the photo directory cannot be opened.
pub(crate) fn build_http_state(config: &ServerConfig) -> io::Result<web::Data<HttpState>> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let photos = DirPhotoStore::open(&config.photo_dir, Arc::clone(&clock)).map_err(|err| {
        io::Error::other(format!(
            "failed to open photo directory {}: {err}",
            config.photo_dir.display()
        ))
    })?;
    let photos = Arc::new(photos);

    let ports = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL record store");
            build_ports(
                Repositories {
                    animals: Arc::new(DieselAnimalRepository::new(pool.clone())),
                    vaccines: Arc::new(DieselVaccineRepository::new(pool.clone())),
                    users: Arc::new(DieselUserRepository::new(pool.clone())),
                },
                photos,
            )
        }
        None => {
            warn!("no database configured; records are kept in memory");
            let store = Arc::new(InMemoryRecordStore::new());
            build_ports(
                Repositories {
                    animals: Arc::clone(&store),
                    vaccines: Arc::clone(&store),
                    users: store,
                },
                photos,
            )
        }
    };

    let throttle = LoginThrottle::new(
        config.login_max_attempts,
        config.login_window_secs,
        clock,
    );
    Ok(web::Data::new(HttpState::new(ports, Arc::new(throttle))))
}
