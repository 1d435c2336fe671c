//! Shared application state injected into handlers and middleware.

use std::sync::Arc;

use crate::application::services::{AuthService, UserService};
use crate::domain::identity::TokenVerifier;
use crate::domain::rate_limiter::RateLimiter;
use crate::domain::repositories::UserRepository;
use crate::utils::ClientIpSource;

/// Cloned into every request; all members are cheap `Arc` handles.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<dyn UserRepository>>,
    pub auth_service: Arc<AuthService<dyn TokenVerifier>>,
    pub rate_limiter: Arc<RateLimiter>,
    pub client_ip: ClientIpSource,
}

impl AppState {
    pub fn new(
        user_service: Arc<UserService<dyn UserRepository>>,
        auth_service: Arc<AuthService<dyn TokenVerifier>>,
        rate_limiter: Arc<RateLimiter>,
        client_ip: ClientIpSource,
    ) -> Self {
        Self {
            user_service,
            auth_service,
            rate_limiter,
            client_ip,
        }
    }
}
