//! HTTP middleware for request processing and protection.
//!
//! Provides panic recovery, CORS, rate limiting, authentication, and
//! observability middleware.

pub mod auth;
pub mod cors;
pub mod rate_limit;
pub mod recovery;
pub mod tracing;
