//! Administrative endpoints.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::api::dto::pagination::{Page, PaginationParams};
use crate::api::dto::user::AdminUserItem;
use crate::domain::entities::Principal;
use crate::error::AppError;
use crate::state::AppState;

/// Lists registered users.
///
/// # Endpoint
///
/// `GET /api/v1/admin/users?page=1&page_size=25`
///
/// Requires `admin: true` on the caller's token.
///
/// # Errors
///
/// - `400` if `page` is 0 or `page_size` is outside 1..=100
pub async fn list_users_handler(
    State(state): State<AppState>,
    principal: Principal,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<Page<AdminUserItem>>, AppError> {
    let Query(params) = params?;
    let (offset, limit) = params
        .validate_and_get_offset_limit()
        .map_err(AppError::bad_request)?;

    let (users, total) = state.user_service.list_users(offset, limit).await?;

    tracing::info!(admin = %principal.uid, page = params.page(), total, "Admin user listing");

    Ok(Json(Page {
        items: users.into_iter().map(AdminUserItem::from).collect(),
        page: params.page(),
        page_size: params.page_size(),
        total,
    }))
}
