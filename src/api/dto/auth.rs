//! DTOs for the authentication endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{NewUser, User};

/// Request body for `POST /api/v1/auth/validate-token`.
#[derive(Debug, Deserialize, Validate)]
pub struct ValidateTokenRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[validate(nested)]
    pub user: TokenUser,
}

/// Profile the client claims for the token holder.
#[derive(Debug, Deserialize, Validate)]
pub struct TokenUser {
    #[validate(length(min = 1, message = "User ID is required"))]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub photo_url: String,
}

impl From<TokenUser> for NewUser {
    fn from(user: TokenUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            photo_url: user.photo_url,
        }
    }
}

/// Minimal identity returned after token validation.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub uid: String,
    pub email: String,
    pub name: String,
}

impl From<&User> for AuthResponse {
    fn from(user: &User) -> Self {
        Self {
            uid: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}
