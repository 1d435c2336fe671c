#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use blog_api::application::services::{AuthService, UserService};
use blog_api::domain::entities::{BlogId, NewUser, Principal, Relation, User};
use blog_api::domain::identity::{TokenVerifier, VerifyError};
use blog_api::domain::rate_limiter::RateLimiter;
use blog_api::domain::repositories::UserRepository;
use blog_api::error::AppError;
use blog_api::infrastructure::cache::NullCache;
use blog_api::routes::app_router;
use blog_api::state::AppState;
use blog_api::utils::ClientIpSource;
use chrono::Utc;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const USER_TOKEN: &str = "good-token";
pub const ADMIN_TOKEN: &str = "admin-token";
pub const OTHER_TOKEN: &str = "other-token";

pub const BLOG_ID: &str = "65f1c0ffee0000000000aaaa";

/// Accepts a fixed set of credentials.
///
/// - `good-token`  → uid `u1` with `admin: false`
/// - `admin-token` → uid `admin1` with `admin: true`
/// - `other-token` → uid `u2` with no `admin` claim
pub struct FakeVerifier;

#[async_trait]
impl TokenVerifier for FakeVerifier {
    async fn verify(&self, credential: &str) -> Result<Principal, VerifyError> {
        match credential {
            USER_TOKEN => Ok(principal(
                "u1",
                json!({ "email": "ada@example.com", "admin": false }),
            )),
            ADMIN_TOKEN => Ok(principal("admin1", json!({ "admin": true }))),
            OTHER_TOKEN => Ok(principal("u2", json!({}))),
            "" => Err(VerifyError::Empty),
            _ => Err(VerifyError::Rejected("unknown test credential".to_string())),
        }
    }
}

fn principal(uid: &str, extra: Value) -> Principal {
    let mut claims = match extra {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    claims.insert("sub".to_string(), Value::String(uid.to_string()));
    Principal::new(uid, claims)
}

/// Keeps users in a map; relation toggles run under one lock.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().insert(user.id.clone(), user);
    }

    pub fn get(&self, id: &str) -> Option<User> {
        self.users.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.get(id))
    }

    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&new_user.id) {
            return Err(AppError::conflict("Resource already exists"));
        }

        let now = Utc::now();
        let user = User {
            id: new_user.id,
            name: new_user.name,
            email: new_user.email,
            photo_url: new_user.photo_url,
            created_at: now,
            updated_at: now,
            bookmarks: Vec::new(),
            likes: Vec::new(),
        };
        users.insert(user.id.clone(), user.clone());

        Ok(user)
    }

    async fn update_name(&self, id: &str, name: &str) -> Result<Option<User>, AppError> {
        let mut users = self.users.lock().unwrap();
        Ok(users.get_mut(id).map(|user| {
            user.name = name.to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn toggle_relation(
        &self,
        user_id: &str,
        blog_id: &BlogId,
        relation: Relation,
    ) -> Result<bool, AppError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let list = match relation {
            Relation::Like => &mut user.likes,
            Relation::Bookmark => &mut user.bookmarks,
        };

        let present = if let Some(pos) = list.iter().position(|b| b == blog_id.as_str()) {
            list.remove(pos);
            false
        } else {
            list.push(blog_id.to_string());
            true
        };
        user.updated_at = Utc::now();

        Ok(present)
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        Ok(users
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.users.lock().unwrap().len() as i64)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.users.lock().unwrap().remove(id).is_some())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

pub fn sample_user(id: &str) -> User {
    let now = Utc::now();
    User {
        id: id.to_string(),
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        photo_url: String::new(),
        created_at: now,
        updated_at: now,
        bookmarks: Vec::new(),
        likes: Vec::new(),
    }
}

pub fn build_state(
    repository: Arc<InMemoryUserRepository>,
    limit: u32,
    window: Duration,
    client_ip: ClientIpSource,
) -> AppState {
    let repository: Arc<dyn UserRepository> = repository;
    let verifier: Arc<dyn TokenVerifier> = Arc::new(FakeVerifier);

    AppState::new(
        Arc::new(UserService::new(repository, Arc::new(NullCache::new()))),
        Arc::new(AuthService::new(verifier)),
        Arc::new(RateLimiter::new(limit, window).unwrap()),
        client_ip,
    )
}

/// State with a limit high enough that no test hits it.
pub fn test_state(repository: Arc<InMemoryUserRepository>) -> AppState {
    build_state(
        repository,
        10_000,
        Duration::from_secs(60),
        ClientIpSource::PeerAddr,
    )
}

pub fn build_app(state: AppState) -> Router {
    app_router(state, &["*".to_string()])
}
