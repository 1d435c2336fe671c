//! Pagination query parameters and paged responses.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

const DEFAULT_PAGE_SIZE: u32 = 25;
const MAX_PAGE_SIZE: u32 = 100;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Validates pagination parameters and converts to database offset/limit.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `page_size`: 25
    ///
    /// # Validation
    ///
    /// - Page must be > 0
    /// - Page size must be between 1 and 100
    ///
    /// # Returns
    ///
    /// `(offset, limit)` tuple for SQL queries.
    pub fn validate_and_get_offset_limit(&self) -> Result<(i64, i64), String> {
        let page = self.page();
        let page_size = self.page_size();

        if page == 0 {
            return Err("Page must be greater than 0".to_string());
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(format!("Page size must be between 1 and {MAX_PAGE_SIZE}"));
        }

        let offset = (i64::from(page) - 1) * i64::from(page_size);
        let limit = i64::from(page_size);

        Ok((offset, limit))
    }
}

/// One page of results with the total item count.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
}
