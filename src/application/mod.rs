//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, the profile cache, and credential
//! verification, and give HTTP handlers a narrow API to call.
//!
//! # Available Services
//!
//! - [`services::user_service::UserService`] - Registration, profiles, likes and bookmarks
//! - [`services::auth_service::AuthService`] - Bearer token verification

pub mod services;
