//! Bearer token authentication middleware.
//!
//! Three per-route layers share one credential parser:
//!
//! - [`require_auth`] rejects the request unless a valid credential is present
//! - [`optional_auth`] attaches a principal when it can and never rejects
//! - [`require_admin`] runs after [`require_auth`] and checks the `admin` claim
//!
//! The verified [`Principal`] is stored in the request extensions and read by
//! handlers through the `Principal` / `Option<Principal>` extractors.

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;

use crate::{domain::entities::Principal, error::AppError, state::AppState};

/// Extracts the credential from `Authorization: Bearer <token>`.
///
/// The value must be exactly two space-separated parts with the literal,
/// case-sensitive scheme `Bearer`.
///
/// # Errors
///
/// Returns [`AppError::Unauthenticated`] with:
/// - "Authorization header is required" if the header is missing or empty
/// - "Authorization header format must be Bearer <token>" otherwise
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            record_failure("missing_header");
            AppError::unauthenticated("Authorization header is required")
        })?;

    let malformed = || {
        record_failure("malformed_header");
        AppError::unauthenticated("Authorization header format must be Bearer <token>")
    };

    let value = value.to_str().map_err(|_| malformed())?;

    match value.split(' ').collect::<Vec<_>>().as_slice() {
        ["Bearer", token] => Ok(*token),
        _ => Err(malformed()),
    }
}

/// Requires a valid bearer credential.
///
/// # Authentication Flow
///
/// 1. Parse the `Authorization` header
/// 2. Verify the credential (one verifier call, no retry)
/// 3. Attach the [`Principal`] to the request extensions
/// 4. Continue to the next middleware/handler
///
/// # Errors
///
/// Returns `401 Unauthorized` with `WWW-Authenticate: Bearer` if the header is
/// missing, malformed, or the credential fails verification.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/user/profile", get(get_profile_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));
/// ```
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = {
        let token = bearer_token(req.headers())?;
        state.auth_service.authenticate(token).await?
    };

    tracing::debug!(uid = %principal.uid, "Request authenticated");
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Attaches a principal when a valid credential is present.
///
/// Missing, malformed, or rejected credentials let the request through
/// anonymously.
pub async fn optional_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if req.headers().contains_key(header::AUTHORIZATION) {
        let verified = match bearer_token(req.headers()) {
            Ok(token) => state.auth_service.authenticate(token).await.ok(),
            Err(_) => None,
        };

        if let Some(principal) = verified {
            tracing::debug!(uid = %principal.uid, "Request optionally authenticated");
            req.extensions_mut().insert(principal);
        }
    }

    next.run(req).await
}

/// Requires the already-verified principal to carry `admin: true`.
///
/// Must be layered inside [`require_auth`]; the credential is not verified a
/// second time.
///
/// # Errors
///
/// - `401` "Authentication required" if no principal is attached
/// - `403` "Admin access required" if the `admin` claim is absent or not `true`
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let principal = req
        .extensions()
        .get::<Principal>()
        .ok_or_else(|| AppError::unauthenticated("Authentication required"))?;

    if !principal.is_admin() {
        tracing::warn!(uid = %principal.uid, "Admin access denied");
        record_failure("not_admin");
        return Err(AppError::forbidden("Admin access required"));
    }

    Ok(next.run(req).await)
}

fn record_failure(reason: &'static str) {
    metrics::counter!("auth_failures_total", "reason" => reason).increment(1);
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(|| AppError::unauthenticated("User ID not found in context"))
    }
}

impl<S> OptionalFromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Principal>().cloned())
    }
}
