//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod admin;
pub mod auth;
pub mod blogs;
pub mod health;
pub mod users;

pub use admin::list_users_handler;
pub use auth::{
    login_handler, login_or_register_handler, register_handler, validate_token_handler,
};
pub use blogs::{
    create_blog_handler, create_comment_handler, get_blog_handler, list_blogs_handler,
    list_comments_handler,
};
pub use health::health_handler;
pub use users::{
    bookmarks_handler, get_profile_handler, toggle_bookmark_handler, toggle_like_handler,
    update_profile_handler,
};
