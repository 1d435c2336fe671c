//! Domain layer containing business entities, capability traits, and the
//! request admission logic.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`identity`] - Credential verification capability
//! - [`rate_limiter`] - Fixed-window per-client admission control
//! - [`rate_limit_sweeper`] - Cancellable background eviction of idle clients
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Traits define contracts implemented by the infrastructure layer.

pub mod entities;
pub mod identity;
pub mod rate_limit_sweeper;
pub mod rate_limiter;
pub mod repositories;
