//! Handlers for the authenticated user's profile, likes, and bookmarks.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::user::{
    BookmarkToggledResponse, BookmarksResponse, LikeToggledResponse, ProfileResponse,
    UpdateProfileRequest, UpdatedProfileResponse,
};
use crate::domain::entities::Principal;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/v1/user/profile`
pub async fn get_profile_handler(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = state.user_service.get_user(&principal.uid).await?;
    Ok(Json(user.into()))
}

/// Changes the display name.
///
/// # Endpoint
///
/// `PUT /api/v1/user/profile`
///
/// # Request Body
///
/// ```json
/// { "name": "Grace" }
/// ```
///
/// # Errors
///
/// - `400` if the name is empty or longer than 100 characters
/// - `404` if the user is not registered
pub async fn update_profile_handler(
    State(state): State<AppState>,
    principal: Principal,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<UpdatedProfileResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let user = state
        .user_service
        .update_profile(&principal.uid, &payload.name)
        .await?;

    Ok(Json(user.into()))
}

/// `GET /api/v1/user/bookmarks`
pub async fn bookmarks_handler(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<BookmarksResponse>, AppError> {
    let user = state.user_service.get_user(&principal.uid).await?;

    Ok(Json(BookmarksResponse {
        user: user.email,
        bookmarks: user.bookmarks,
    }))
}

/// Likes the blog, or removes the like if already present.
///
/// # Endpoint
///
/// `POST /api/v1/blogs/{id}/like`
///
/// # Errors
///
/// - `400` "Invalid blog ID format"
/// - `404` "User not found"
pub async fn toggle_like_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(blog_id): Path<String>,
) -> Result<Json<LikeToggledResponse>, AppError> {
    let liked = state
        .user_service
        .toggle_like(&principal.uid, &blog_id)
        .await?;

    Ok(Json(LikeToggledResponse {
        message: format!("Blog {} like toggled by user {}", blog_id, principal.uid),
        liked,
    }))
}

/// Bookmarks the blog, or removes the bookmark if already present.
///
/// # Endpoint
///
/// `POST /api/v1/blogs/{id}/bookmark`
pub async fn toggle_bookmark_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(blog_id): Path<String>,
) -> Result<Json<BookmarkToggledResponse>, AppError> {
    let bookmarked = state
        .user_service
        .toggle_bookmark(&principal.uid, &blog_id)
        .await?;

    Ok(Json(BookmarkToggledResponse {
        message: format!("Blog {} bookmark toggled by user {}", blog_id, principal.uid),
        bookmarked,
    }))
}
