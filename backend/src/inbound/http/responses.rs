//! Response bodies shared across handlers.

use serde::Serialize;
use utoipa::ToSchema;

/// Acknowledgement returned by mutating endpoints.
///
/// Example JSON: `{"success":true,"message":"vaccine added"}`
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MutationResponse {
    pub success: bool,
    #[schema(example = "vaccine added")]
    pub message: String,
}

impl MutationResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
