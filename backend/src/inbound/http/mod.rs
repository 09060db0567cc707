//! HTTP inbound adapter exposing the herd book REST endpoints.

use actix_web::web;

use crate::domain::Error;

pub mod animals;
pub mod error;
pub mod health;
pub mod photos;
pub mod rate_limit;
pub mod responses;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;
pub mod vaccines;

pub use error::ApiResult;

/// JSON extractor configuration reporting malformed bodies with the domain
/// error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid JSON body: {err}")).into()
    })
}

/// Register every herd book endpoint on a service config.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(animals::add_animal)
        .service(animals::list_animals)
        .service(animals::search_animals)
        .service(animals::animal_details)
        .service(animals::delete_animal)
        .service(vaccines::add_vaccine)
        .service(vaccines::update_vaccine)
        .service(vaccines::add_applied_vaccine)
        .service(vaccines::list_vaccines)
        .service(users::register)
        .service(users::login)
        .service(users::logout)
        .service(users::current_session)
        .service(photos::get_photo);
}
