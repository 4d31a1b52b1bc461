// src/api/types.rs
//! Type definitions shared by the API module.

use serde::Deserialize;

/// Generic paginated response from the Notion API.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct PaginatedResponse<T> {
    #[serde(default)]
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// Converts every result, keeping the pagination fields.
    pub fn try_map<U, E, F>(self, f: F) -> Result<PaginatedResponse<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        Ok(PaginatedResponse {
            results: self.results.into_iter().map(f).collect::<Result<_, _>>()?,
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        })
    }
}

/// Why a pagination loop stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum PaginationStop {
    /// The server reported no further pages.
    Exhausted,
    /// The item cap was reached while more pages were available.
    CapReached,
    /// A page request failed; items gathered so far are kept.
    Interrupted { cause: String },
}

/// Result of a pagination loop.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub pages_fetched: u32,
    pub stop: PaginationStop,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::responses::{PageResponse, UserResponse};

    #[test]
    fn page_without_results_key_is_empty() {
        let page: PaginatedResponse<PageResponse> =
            serde_json::from_str(r#"{"object": "list", "has_more": false}"#).unwrap();

        assert!(page.results.is_empty());
        assert!(page.next_cursor.is_none());
        assert!(!page.has_more);
    }

    #[test]
    fn users_page_keeps_cursor() {
        let page: PaginatedResponse<UserResponse> = serde_json::from_str(
            r#"{"results": [], "next_cursor": "abc", "has_more": true}"#,
        )
        .unwrap();

        assert_eq!(page.next_cursor.as_deref(), Some("abc"));
        assert!(page.has_more);
    }
}
