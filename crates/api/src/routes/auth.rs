//! Authentication routes for register, login and the current user.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use pokerledger_core::auth::{hash_password, verify_password};
use pokerledger_db::{UserRepository, entities::users};
use pokerledger_shared::{AppError, LoginRequest, RegisterRequest, TokenResponse, UserInfo};
use tracing::info;
use validator::Validate;

use crate::{ApiError, AppState, middleware::auth::AuthUser};

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Auth routes that require a valid token.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

fn user_info(user: users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        email: user.email,
        username: user.username,
        is_active: user.is_active,
    }
}

/// POST /auth/register - Create a new account.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let password_hash = hash_password(&payload.password)?;
    let user = UserRepository::new((*state.db).clone())
        .create(&payload.email, &payload.username, &password_hash)
        .await?;

    info!(user_id = %user.id, username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(user_info(user))))
}

/// POST /auth/login - Exchange username (or email) and password for a token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let Some(user) = UserRepository::new((*state.db).clone())
        .find_by_login(&payload.username)
        .await?
    else {
        info!(login = %payload.username, "Login attempt for unknown user");
        return Err(ApiError::invalid_credentials());
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(ApiError::invalid_credentials());
    }

    if !user.is_active {
        return Err(AppError::Unauthorized("Inactive user".to_string()).into());
    }

    let access_token = state
        .jwt_service
        .generate_access_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    info!(user_id = %user.id, "User logged in");
    Ok(Json(TokenResponse::bearer(
        access_token,
        state.jwt_service.access_token_expires_in(),
    )))
}

/// GET /auth/me - Current user.
async fn me(State(state): State<AppState>, auth: AuthUser) -> Result<impl IntoResponse, ApiError> {
    let user = UserRepository::new((*state.db).clone())
        .find_by_id(auth.user_id())
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

    Ok(Json(user_info(user)))
}
