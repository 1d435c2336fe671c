//! DTOs for user profile, registration, and relation endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{NewUser, User};

/// Request body for `POST /api/v1/auth/register` and
/// `POST /api/v1/auth/login-or-register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    pub photo_url: String,
}

impl RegisterUserRequest {
    /// Builds the new user record for the verified uid.
    pub fn into_new_user(self, uid: &str) -> NewUser {
        NewUser {
            id: uid.to_string(),
            name: self.name,
            email: self.email,
            photo_url: self.photo_url,
        }
    }
}

/// Request body for `PUT /api/v1/user/profile`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
}

/// Full user record returned by login and registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            photo_url: user.photo_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Response for `GET /api/v1/user/profile`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
    pub bookmarks_count: usize,
    pub likes_count: usize,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            bookmarks_count: user.bookmarks.len(),
            likes_count: user.likes.len(),
            id: user.id,
            name: user.name,
            email: user.email,
            photo_url: user.photo_url,
            created_at: user.created_at,
        }
    }
}

/// Response for `PUT /api/v1/user/profile`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatedProfileResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub photo_url: String,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UpdatedProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            photo_url: user.photo_url,
            updated_at: user.updated_at,
        }
    }
}

/// Response for `GET /api/v1/user/bookmarks`.
#[derive(Debug, Serialize, Deserialize)]
pub struct BookmarksResponse {
    /// The user's email.
    pub user: String,
    pub bookmarks: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeToggledResponse {
    pub message: String,
    pub liked: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookmarkToggledResponse {
    pub message: String,
    pub bookmarked: bool,
}

/// Row of the admin user listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminUserItem {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub bookmarks_count: usize,
    pub likes_count: usize,
}

impl From<User> for AdminUserItem {
    fn from(user: User) -> Self {
        Self {
            bookmarks_count: user.bookmarks.len(),
            likes_count: user.likes.len(),
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}
