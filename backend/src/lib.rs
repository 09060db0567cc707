//! Herd book backend library.
//!
//! Livestock records behind a hexagonal layout: [`domain`] holds the rules
//! and ports, [`inbound::http`] exposes them over actix-web, and [`outbound`]
//! provides PostgreSQL, in-memory, photo directory, and password adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
