//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `FromRow`.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - Users with their likes and bookmarks

pub mod pg_user_repository;

pub use pg_user_repository::PgUserRepository;
