//! Placeholder blog and comment endpoints.
//!
//! Blogs and comments are not stored by this service; these routes only
//! exercise the public/optional/required authentication paths.

use axum::{Json, extract::Path};

use crate::api::dto::blog::{MessageResponse, ViewerMessageResponse};
use crate::domain::entities::Principal;

fn viewer(principal: Option<Principal>) -> Option<String> {
    principal.map(|p| p.uid)
}

/// `GET /api/v1/blogs`
pub async fn list_blogs_handler(principal: Option<Principal>) -> Json<ViewerMessageResponse> {
    Json(ViewerMessageResponse {
        message: "List of blogs".to_string(),
        viewer: viewer(principal),
    })
}

/// `GET /api/v1/blogs/{id}`
pub async fn get_blog_handler(
    principal: Option<Principal>,
    Path(id): Path<String>,
) -> Json<ViewerMessageResponse> {
    Json(ViewerMessageResponse {
        message: format!("Blog with ID: {}", id),
        viewer: viewer(principal),
    })
}

/// `GET /api/v1/blogs/{id}/comments`
pub async fn list_comments_handler(
    principal: Option<Principal>,
    Path(id): Path<String>,
) -> Json<ViewerMessageResponse> {
    Json(ViewerMessageResponse {
        message: format!("Comments for blog ID: {}", id),
        viewer: viewer(principal),
    })
}

/// `POST /api/v1/blogs`
pub async fn create_blog_handler(principal: Principal) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: format!("Created blog by user: {}", principal.uid),
    })
}

/// `POST /api/v1/comments`
pub async fn create_comment_handler(principal: Principal) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: format!("Comment created by user: {}", principal.uid),
    })
}
