//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with the domain wrapper schemas ([`ErrorSchema`], [`ErrorCodeSchema`]) and
//! the session cookie security scheme. The document backs Swagger UI in debug
//! builds and `cargo run --bin openapi-dump`.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Herd book API",
        description = "Animal registry, parentage, and vaccination records."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::animals::add_animal,
        crate::inbound::http::animals::list_animals,
        crate::inbound::http::animals::search_animals,
        crate::inbound::http::animals::animal_details,
        crate::inbound::http::animals::delete_animal,
        crate::inbound::http::vaccines::add_vaccine,
        crate::inbound::http::vaccines::update_vaccine,
        crate::inbound::http::vaccines::add_applied_vaccine,
        crate::inbound::http::vaccines::list_vaccines,
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_session,
        crate::inbound::http::photos::get_photo,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "animals", description = "Animal registration, search, and removal"),
        (name = "vaccines", description = "Vaccine catalogue and applications"),
        (name = "users", description = "Accounts and sessions"),
        (name = "photos", description = "Stored animal photos"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[test]
    fn every_record_endpoint_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/add-animal",
            "/animals",
            "/search-animal",
            "/api/animal-details/{id}",
            "/api/delete-animal/{id}",
            "/add-vaccine",
            "/update-vaccine",
            "/add-applied-vaccine",
            "/vaccines",
            "/register",
            "/login",
            "/logout",
            "/session",
            "/images/{name}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
