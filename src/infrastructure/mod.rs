//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence, caching, and identity.
//!
//! # Modules
//!
//! - [`cache`] - Profile cache (Redis and no-op implementations)
//! - [`identity`] - Firebase ID token verification
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod identity;
pub mod persistence;
