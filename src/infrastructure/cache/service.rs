//! Cache service trait and error types.

use async_trait::async_trait;

use crate::domain::entities::User;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for caching user profiles.
///
/// Implementations must be thread-safe and handle errors gracefully without
/// disrupting the application (cache failures should degrade to database lookups).
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves a cached user profile.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(user))` on cache hit
    /// - `Ok(None)` on cache miss or error (fail-open behavior)
    async fn get_user(&self, user_id: &str) -> CacheResult<Option<User>>;

    /// Stores a user profile with optional TTL.
    ///
    /// `ttl_seconds` falls back to the implementation default when `None`.
    async fn set_user(&self, user: &User, ttl_seconds: Option<u64>) -> CacheResult<()>;

    /// Removes a cached profile.
    ///
    /// Called after any mutation of the user or their likes and bookmarks.
    async fn invalidate(&self, user_id: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
