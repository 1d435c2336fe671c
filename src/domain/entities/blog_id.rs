//! Blog post identifier.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::error::AppError;

/// Blog ids are 12-byte object ids rendered as 24 hex characters.
static BLOG_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").expect("valid blog id regex"));

/// Validated blog post identifier, stored in lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlogId(String);

impl BlogId {
    /// Parses a blog id from a path segment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the value is not 24 hex characters.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        if !BLOG_ID_REGEX.is_match(raw) {
            return Err(AppError::bad_request("Invalid blog ID format"));
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
