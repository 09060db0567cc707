//! Photo serving.
//!
//! ```text
//! GET /images/1704164645000-4b1f9c1e-5d2a-4e8b-9f0a-1c2d3e4f5a6b.jpg
//! ```

use std::path::Path;

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};

use crate::domain::Error;
use crate::domain::ports::PhotoStoreError;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

fn content_type_for(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

fn map_photo_error(error: PhotoStoreError) -> Error {
    match error {
        PhotoStoreError::InvalidName { name } => {
            Error::invalid_request(format!("invalid photo name: {name}"))
        }
        PhotoStoreError::NotFound { name } => Error::not_found(format!("photo {name} not found")),
        PhotoStoreError::Io { message } => Error::internal(format!("photo storage failed: {message}")),
    }
}

/// Serve a stored animal photo.
#[utoipa::path(
    get,
    path = "/images/{name}",
    params(("name" = String, Path, description = "Stored photo file name")),
    responses(
        (status = 200, description = "Photo bytes", content_type = "application/octet-stream"),
        (status = 400, description = "Name is not a plain file name", body = ErrorSchema),
        (status = 404, description = "No such photo", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["photos"],
    operation_id = "getPhoto",
    security([])
)]
#[get("/images/{name}")]
pub async fn get_photo(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let name = path.into_inner();
    let bytes = state.photos.load(&name).await.map_err(map_photo_error)?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type_for(&name)))
        .insert_header((header::CACHE_CONTROL, "public, max-age=86400"))
        .body(bytes))
}
