//! User profile and blog relation service.

use std::sync::Arc;

use crate::domain::entities::{BlogId, NewUser, Relation, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Service for user registration, profile reads/updates, and like/bookmark
/// toggles.
///
/// Reads go through the profile cache; every mutation invalidates the cached
/// profile so the next read observes it.
pub struct UserService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    /// Creates a new user service.
    pub fn new(repository: Arc<R>, cache: Arc<dyn CacheService>) -> Self {
        Self { repository, cache }
    }

    /// Returns a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user is not registered.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_user(&self, id: &str) -> Result<User, AppError> {
        match self.cache.get_user(id).await {
            Ok(Some(user)) => return Ok(user),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, user_id = id, "Profile cache read failed"),
        }

        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if let Err(e) = self.cache.set_user(&user, None).await {
            tracing::warn!(error = %e, user_id = id, "Profile cache write failed");
        }

        Ok(user)
    }

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a user with the same id exists.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn store_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let user_id = new_user.id.clone();

        let user = self
            .repository
            .create(new_user)
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => AppError::conflict("User already exists"),
                other => other,
            })?;

        tracing::info!(user_id = %user_id, "User registered");
        Ok(user)
    }

    /// Returns the existing user or registers a new one.
    ///
    /// The boolean is `true` when the user was created by this call.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_or_create(&self, new_user: NewUser) -> Result<(User, bool), AppError> {
        if let Some(existing) = self.repository.find_by_id(&new_user.id).await? {
            return Ok((existing, false));
        }

        let user_id = new_user.id.clone();
        match self.store_user(new_user).await {
            Ok(user) => Ok((user, true)),
            // Lost a registration race; the other request's row wins.
            Err(AppError::Conflict(_)) => {
                let user = self
                    .repository
                    .find_by_id(&user_id)
                    .await?
                    .ok_or_else(|| AppError::internal("User vanished after conflict"))?;
                Ok((user, false))
            }
            Err(e) => Err(e),
        }
    }

    /// Changes the user's display name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user is not registered.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn update_profile(&self, id: &str, name: &str) -> Result<User, AppError> {
        let user = self
            .repository
            .update_name(id, name)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        self.invalidate(id).await;
        Ok(user)
    }

    /// Likes or unlikes a blog. Returns `true` if the blog is liked afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user is not registered.
    /// Returns [`AppError::Validation`] if `blog_id` is not a valid blog id.
    pub async fn toggle_like(&self, user_id: &str, blog_id: &str) -> Result<bool, AppError> {
        self.toggle(user_id, blog_id, Relation::Like).await
    }

    /// Bookmarks or un-bookmarks a blog. Returns `true` if the blog is
    /// bookmarked afterwards.
    ///
    /// # Errors
    ///
    /// See [`Self::toggle_like`].
    pub async fn toggle_bookmark(&self, user_id: &str, blog_id: &str) -> Result<bool, AppError> {
        self.toggle(user_id, blog_id, Relation::Bookmark).await
    }

    /// Lists registered users with the total count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_users(&self, offset: i64, limit: i64) -> Result<(Vec<User>, i64), AppError> {
        let users = self.repository.list(offset, limit).await?;
        let total = self.repository.count().await?;
        Ok((users, total))
    }

    /// Deletes a user. Returns `true` if a user was removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn delete_user(&self, id: &str) -> Result<bool, AppError> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            self.invalidate(id).await;
            tracing::info!(user_id = id, "User deleted");
        }
        Ok(deleted)
    }

    /// Checks that the user store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store does not answer.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    /// Checks that the profile cache is reachable.
    pub async fn check_cache(&self) -> bool {
        self.cache.health_check().await
    }

    async fn toggle(&self, user_id: &str, blog_id: &str, relation: Relation) -> Result<bool, AppError> {
        self.get_user(user_id).await?;
        let blog_id = BlogId::parse(blog_id)?;

        let active = self
            .repository
            .toggle_relation(user_id, &blog_id, relation)
            .await?;

        self.invalidate(user_id).await;

        tracing::debug!(
            user_id,
            blog_id = %blog_id,
            relation = relation.as_str(),
            active,
            "Relation toggled"
        );

        Ok(active)
    }

    async fn invalidate(&self, user_id: &str) {
        if let Err(e) = self.cache.invalidate(user_id).await {
            tracing::warn!(error = %e, user_id, "Failed to invalidate profile cache");
        }
    }
}
