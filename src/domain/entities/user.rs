//! User entity representing a registered blog reader/author.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user.
///
/// The `id` is the identity provider's UID, so a verified principal maps
/// directly onto a stored user without a lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Blog ids bookmarked by this user, oldest first.
    pub bookmarks: Vec<String>,
    /// Blog ids liked by this user, oldest first.
    pub likes: Vec<String>,
}

impl User {
    /// Returns true if the user has bookmarked the given blog.
    pub fn has_bookmarked(&self, blog_id: &str) -> bool {
        self.bookmarks.iter().any(|b| b == blog_id)
    }

    /// Returns true if the user has liked the given blog.
    pub fn has_liked(&self, blog_id: &str) -> bool {
        self.likes.iter().any(|l| l == blog_id)
    }
}

/// Input data for registering a user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub photo_url: String,
}

/// Kind of user → blog relation that can be toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Like,
    Bookmark,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Like => "like",
            Relation::Bookmark => "bookmark",
        }
    }
}
