//! PostgreSQL implementation of user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{BlogId, NewUser, Relation, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// Columns selected for a full user row, relations aggregated in creation order.
const USER_COLUMNS: &str = r#"
    u.id, u.name, u.email, u.photo_url, u.created_at, u.updated_at,
    ARRAY(
        SELECT b.blog_id FROM user_bookmarks b
        WHERE b.user_id = u.id
        ORDER BY b.created_at, b.blog_id
    ) AS bookmarks,
    ARRAY(
        SELECT l.blog_id FROM user_likes l
        WHERE l.user_id = u.id
        ORDER BY l.created_at, l.blog_id
    ) AS likes
"#;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    photo_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    bookmarks: Vec<String>,
    likes: Vec<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            photo_url: row.photo_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
            bookmarks: row.bookmarks,
            likes: row.likes,
        }
    }
}

fn relation_table(relation: Relation) -> &'static str {
    match relation {
        Relation::Like => "user_likes",
        Relation::Bookmark => "user_bookmarks",
    }
}

/// PostgreSQL repository for users, likes and bookmarks.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = $1");

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, name, email, photo_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, photo_url, created_at, updated_at,
                      ARRAY[]::TEXT[] AS bookmarks,
                      ARRAY[]::TEXT[] AS likes
            "#,
        )
        .bind(&new_user.id)
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.photo_url)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn update_name(&self, id: &str, name: &str) -> Result<Option<User>, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(name)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    async fn toggle_relation(
        &self,
        user_id: &str,
        blog_id: &BlogId,
        relation: Relation,
    ) -> Result<bool, AppError> {
        let table = relation_table(relation);
        let mut tx = self.pool.begin().await?;

        // Row lock on the owner serializes concurrent toggles for one user.
        let locked = sqlx::query("SELECT 1 FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(AppError::not_found("User not found"));
        }

        let delete_sql = format!("DELETE FROM {table} WHERE user_id = $1 AND blog_id = $2");
        let removed = sqlx::query(&delete_sql)
            .bind(user_id)
            .bind(blog_id.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        if !removed {
            let insert_sql = format!(
                "INSERT INTO {table} (user_id, blog_id) VALUES ($1, $2) ON CONFLICT DO NOTHING"
            );
            sqlx::query(&insert_sql)
                .bind(user_id)
                .bind(blog_id.as_str())
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("UPDATE users SET updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(!removed)
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>, AppError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users u ORDER BY u.created_at DESC, u.id LIMIT $1 OFFSET $2"
        );

        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(total)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
