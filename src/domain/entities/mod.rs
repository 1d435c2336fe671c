//! Core domain entities.
//!
//! - [`User`] - A registered user with their liked and bookmarked blogs
//! - [`BlogId`] - Validated blog post identifier
//! - [`Principal`] - The verified identity of the current caller

pub mod blog_id;
pub mod principal;
pub mod user;

pub use blog_id::BlogId;
pub use principal::Principal;
pub use user::{NewUser, Relation, User};
