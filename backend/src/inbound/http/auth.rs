//! Account handlers: signup, login, logout and the current session.
//!
//! ```text
//! POST /api/v1/auth/signup {"email":"ada@example.com","username":"ada_l","password":"..."}
//! POST /api/v1/auth/login  {"identifier":"ada_l","password":"..."}
//! POST /api/v1/auth/logout
//! GET  /api/v1/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Error, LoginCredentials, SignupRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{Ack, UserEnvelope};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Signup request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupBody {
    /// Contact address; must be unique.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Public handle; 3-30 letters, digits or underscores.
    #[schema(example = "ada_l")]
    pub username: String,
    /// 8-72 bytes.
    pub password: String,
}

/// Login request body. `email` is accepted as an alias of `identifier`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    /// Email address or username.
    #[serde(alias = "email")]
    #[schema(example = "ada_l")]
    pub identifier: String,
    /// Account password.
    pub password: String,
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupBody,
    responses(
        (status = 201, description = "Account created", body = UserEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email or username taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = SignupRequest::try_from_parts(&body.email, &body.username, &body.password)?;
    let user = state.accounts.signup(request).await?;
    Ok(HttpResponse::Created().json(UserEnvelope { user: Some(user) }))
}

/// Check credentials and set the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Login success", body = UserEnvelope,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&body.identifier, &body.password)?;
    let outcome = state.accounts.login(credentials).await?;
    Ok(HttpResponse::Ok()
        .cookie(state.cookies.issue(&outcome.token))
        .json(UserEnvelope {
            user: Some(outcome.user),
        }))
}

/// Expire the session cookie.
///
/// Tokens are stateless, so this only asks the browser to forget it.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 200, description = "Cookie cleared", body = Ack)),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    if let Some(user) = session.user() {
        info!(user_id = %user.id(), "logout");
    }
    HttpResponse::Ok()
        .cookie(state.cookies.expired())
        .json(Ack::OK)
}

/// The caller's account, or `null` when anonymous.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current session", body = UserEnvelope),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn current_user(session: SessionContext) -> web::Json<UserEnvelope> {
    web::Json(UserEnvelope {
        user: session.into_user(),
    })
}

#[cfg(test)]
mod tests;
