//! Account API handlers.
//!
//! ```text
//! POST /register {"username":"rancher","password":"secret1"}
//! POST /login {"username":"rancher","password":"secret1"}
//! POST /logout
//! GET /session
//! ```

use actix_web::{HttpRequest, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Credentials;
use crate::inbound::http::ApiResult;
use crate::inbound::http::responses::MutationResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::credentials_error;

/// Request body for `POST /register` and `POST /login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CredentialsRequest {
    #[serde(default)]
    #[schema(example = "rancher")]
    pub username: String,
    #[serde(default)]
    #[schema(example = "secret1")]
    pub password: String,
}

impl TryFrom<CredentialsRequest> for Credentials {
    type Error = crate::domain::Error;

    fn try_from(value: CredentialsRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
            .map_err(|err| credentials_error(&err))
    }
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/register",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Account created", body = MutationResponse),
        (status = 400, description = "Invalid credentials shape or username taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<MutationResponse>> {
    let credentials = Credentials::try_from(payload.into_inner())?;
    let username = state.accounts.register(credentials).await?;
    Ok(web::Json(MutationResponse::ok(format!(
        "user {username} registered"
    ))))
}

/// Response body for a successful login.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
}

fn client_key(request: &HttpRequest) -> String {
    request
        .peer_addr()
        .map_or_else(|| "unknown".to_owned(), |addr| addr.ip().to_string())
}

/// Authenticate and establish a session.
///
/// Attempts are throttled per client address before credentials are checked.
#[utoipa::path(
    post,
    path = "/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse, headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 429, description = "Too many login attempts", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    request: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    state.login_throttle.check(&client_key(&request))?;
    let credentials = Credentials::try_from(payload.into_inner())?;
    let username = state.accounts.login(credentials).await?;
    session.persist_username(&username)?;
    tracing::info!(%username, "login succeeded");
    Ok(web::Json(LoginResponse { success: true }))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 200, description = "Session cleared", body = MutationResponse)
    ),
    tags = ["users"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> web::Json<MutationResponse> {
    session.purge();
    web::Json(MutationResponse::ok("logged out"))
}

/// Response body for `GET /session`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    #[schema(example = "rancher")]
    pub username: String,
}

/// Report the signed-in user.
#[utoipa::path(
    get,
    path = "/session",
    responses(
        (status = 200, description = "Signed-in user", body = SessionResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentSession"
)]
#[get("/session")]
pub async fn current_session(session: SessionContext) -> ApiResult<web::Json<SessionResponse>> {
    let username = session.require_username()?;
    Ok(web::Json(SessionResponse {
        username: username.to_string(),
    }))
}
