//! Repository trait for user data access.

use crate::domain::entities::{BlogId, NewUser, Relation, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for users and their blog relations.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_user.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by id, with likes and bookmarks loaded.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;

    /// Inserts a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a user with the same id already exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Changes the display name and bumps `updated_at`.
    ///
    /// Returns `Ok(None)` if the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update_name(&self, id: &str, name: &str) -> Result<Option<User>, AppError>;

    /// Flips a like or bookmark between a user and a blog.
    ///
    /// Runs as a single transaction: removes the relation if present,
    /// otherwise adds it.
    ///
    /// # Returns
    ///
    /// `true` if the relation exists after the call, `false` if it was removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist, or
    /// [`AppError::Internal`] on database errors.
    async fn toggle_relation(
        &self,
        user_id: &str,
        blog_id: &BlogId,
        relation: Relation,
    ) -> Result<bool, AppError>;

    /// Lists users ordered by creation time, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>, AppError>;

    /// Counts all users.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;

    /// Deletes a user together with their relations.
    ///
    /// Returns `Ok(true)` if a user was removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    /// Checks that the backing store answers queries.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store is unreachable.
    async fn ping(&self) -> Result<(), AppError>;
}
