//! API route configuration.
//!
//! Every group is mounted under `/api/v1` by [`crate::routes::app_router`].
//! Authentication is applied per group with `route_layer`, so unmatched paths
//! still produce 404 rather than 401.

use crate::api::handlers::{
    bookmarks_handler, create_blog_handler, create_comment_handler, get_blog_handler,
    get_profile_handler, list_blogs_handler, list_comments_handler, list_users_handler,
    login_handler, login_or_register_handler, register_handler, toggle_bookmark_handler,
    toggle_like_handler, update_profile_handler, validate_token_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Routes reachable without a credential.
///
/// # Endpoints
///
/// - `POST /auth/validate-token`   - Verify a token and register its holder
/// - `GET  /blogs`                 - List blogs (optional auth)
/// - `GET  /blogs/{id}`            - Get a blog (optional auth)
/// - `GET  /blogs/{id}/comments`   - List comments (optional auth)
pub fn public_routes(state: AppState) -> Router<AppState> {
    let optional = Router::new()
        .route("/blogs", get(list_blogs_handler))
        .route("/blogs/{id}", get(get_blog_handler))
        .route("/blogs/{id}/comments", get(list_comments_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::optional_auth));

    Router::new()
        .route("/auth/validate-token", post(validate_token_handler))
        .merge(optional)
}

/// Routes requiring a verified bearer credential.
///
/// # Endpoints
///
/// - `POST /auth/login`               - Return the registered user
/// - `POST /auth/register`            - Register the caller
/// - `POST /auth/login-or-register`   - Return or register the caller
/// - `GET  /user/profile`             - Profile with relation counts
/// - `PUT  /user/profile`             - Change display name
/// - `GET  /user/bookmarks`           - Bookmarked blog ids
/// - `POST /blogs`                    - Create a blog (placeholder)
/// - `POST /blogs/{id}/like`          - Toggle like
/// - `POST /blogs/{id}/bookmark`      - Toggle bookmark
/// - `POST /comments`                 - Create a comment (placeholder)
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login_handler))
        .route("/auth/register", post(register_handler))
        .route("/auth/login-or-register", post(login_or_register_handler))
        .route(
            "/user/profile",
            get(get_profile_handler).put(update_profile_handler),
        )
        .route("/user/bookmarks", get(bookmarks_handler))
        .route("/blogs", post(create_blog_handler))
        .route("/blogs/{id}/like", post(toggle_like_handler))
        .route("/blogs/{id}/bookmark", post(toggle_bookmark_handler))
        .route("/comments", post(create_comment_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::require_auth))
}

/// Routes requiring a verified credential with `admin: true`.
///
/// # Endpoints
///
/// - `GET /admin/users` - Paginated user listing
pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users_handler))
        .route_layer(middleware::from_fn(auth::require_admin))
        .route_layer(middleware::from_fn_with_state(state, auth::require_auth))
}
