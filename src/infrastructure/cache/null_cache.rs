//! No-op cache implementation for testing or disabled caching.

use super::service::{CacheResult, CacheService};
use crate::domain::entities::User;
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Used when Redis is not configured or unreachable at startup. Every lookup
/// is a miss, so reads always go to the database.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_user(&self, _user_id: &str) -> CacheResult<Option<User>> {
        Ok(None)
    }

    async fn set_user(&self, _user: &User, _ttl: Option<u64>) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _user_id: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
