//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::entities::User;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

/// Redis cache for user profiles.
///
/// Profiles are stored as JSON under `user:<id>`. Uses `ConnectionManager`
/// for connection reuse. All operations are fail-open: errors are logged but
/// don't propagate to callers.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and configures the default TTL.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            key_prefix: "user:".to_string(),
        })
    }

    fn build_key(&self, user_id: &str) -> String {
        format!("{}{}", self.key_prefix, user_id)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_user(&self, user_id: &str) -> CacheResult<Option<User>> {
        let key = self.build_key(user_id);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    debug!(user_id, "Cache HIT");
                    Ok(Some(user))
                }
                Err(e) => {
                    warn!(user_id, error = %e, "Discarding undecodable cached profile");
                    Ok(None)
                }
            },
            Ok(None) => {
                debug!(user_id, "Cache MISS");
                Ok(None)
            }
            Err(e) => {
                error!(user_id, error = %e, "Redis GET error");
                Ok(None)
            }
        }
    }

    async fn set_user(&self, user: &User, ttl: Option<u64>) -> CacheResult<()> {
        let key = self.build_key(&user.id);
        let ttl_seconds = ttl.unwrap_or(self.default_ttl);

        let payload = serde_json::to_string(user)
            .map_err(|e| CacheError::OperationError(format!("Failed to encode profile: {}", e)))?;

        let mut conn = self.client.clone();
        match conn.set_ex::<_, _, ()>(&key, payload, ttl_seconds).await {
            Ok(_) => {
                debug!(user_id = %user.id, ttl_seconds, "Cache SET");
                Ok(())
            }
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Redis SET error");
                Ok(())
            }
        }
    }

    async fn invalidate(&self, user_id: &str) -> CacheResult<()> {
        let key = self.build_key(user_id);
        let mut conn = self.client.clone();

        match conn.del::<_, i32>(&key).await {
            Ok(deleted) => {
                if deleted > 0 {
                    debug!(user_id, "Cache INVALIDATE");
                }
                Ok(())
            }
            Err(e) => {
                warn!(user_id, error = %e, "Redis DEL error");
                Ok(())
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
