//! Handlers for token validation, login, and registration.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::auth::{AuthResponse, ValidateTokenRequest};
use crate::api::dto::user::{RegisterUserRequest, UserResponse};
use crate::domain::entities::Principal;
use crate::error::AppError;
use crate::state::AppState;

/// Verifies a token and makes sure its holder is registered.
///
/// # Endpoint
///
/// `POST /api/v1/auth/validate-token` (no auth middleware)
///
/// # Request Body
///
/// ```json
/// {
///   "token": "<firebase id token>",
///   "user": { "id": "<uid>", "name": "Ada", "email": "ada@example.com", "photo_url": "" }
/// }
/// ```
///
/// # Errors
///
/// - `400` if the body is invalid
/// - `401` "Invalid token" if verification fails
/// - `401` "Token UID does not match user ID" if `user.id` is not the token's uid
pub async fn validate_token_handler(
    State(state): State<AppState>,
    payload: Result<Json<ValidateTokenRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let principal = state
        .auth_service
        .authenticate_as(&payload.token, &payload.user.id)
        .await?;

    let (user, created) = state.user_service.get_or_create(payload.user.into()).await?;

    if created {
        tracing::info!(uid = %principal.uid, "User registered on token validation");
    }

    Ok(Json(AuthResponse::from(&user)))
}

/// Returns the registered user for the authenticated principal.
///
/// # Endpoint
///
/// `POST /api/v1/auth/login`
///
/// # Errors
///
/// - `404` "User not found. Please register first." if the uid is unknown
pub async fn login_handler(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .user_service
        .get_user(&principal.uid)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => {
                tracing::warn!(uid = %principal.uid, "Login for unregistered user");
                AppError::not_found("User not found. Please register first.")
            }
            other => other,
        })?;

    tracing::info!(uid = %user.id, "User login successful");
    Ok(Json(user.into()))
}

/// Registers the authenticated principal.
///
/// # Endpoint
///
/// `POST /api/v1/auth/register`
///
/// # Errors
///
/// - `400` if the body is invalid
/// - `409` "User already exists"
pub async fn register_handler(
    State(state): State<AppState>,
    principal: Principal,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let user = state
        .user_service
        .store_user(payload.into_new_user(&principal.uid))
        .await?;

    Ok(Json(user.into()))
}

/// Returns the principal's user, registering it first when unknown.
///
/// # Endpoint
///
/// `POST /api/v1/auth/login-or-register`
pub async fn login_or_register_handler(
    State(state): State<AppState>,
    principal: Principal,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let (user, created) = state
        .user_service
        .get_or_create(payload.into_new_user(&principal.uid))
        .await?;

    tracing::info!(uid = %user.id, created, "Login with auto-registration");
    Ok(Json(user.into()))
}
