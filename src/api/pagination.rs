// src/api/pagination.rs
//! Cursor pagination that degrades instead of failing.

use super::types::{PaginatedResponse, PaginationResult, PaginationStop};
use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::AppError;

/// Follows continuation cursors until the server runs out of pages, the
/// item cap is reached, or a request fails.
///
/// A failed page ends the loop with [`PaginationStop::Interrupted`]; items
/// from earlier pages are returned. With a cap, at most `max_items` items are
/// returned and no page is requested once the cap is met.
pub async fn collect_pages<T, F, Fut>(
    mut fetch_fn: F,
    max_items: Option<usize>,
) -> PaginationResult<T>
where
    F: FnMut(u32, Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages_fetched = 0u32;

    let stop = loop {
        if max_items.is_some_and(|max| items.len() >= max) {
            break PaginationStop::CapReached;
        }

        let response = match fetch_fn(NOTION_API_PAGE_SIZE as u32, cursor.take()).await {
            Ok(response) => response,
            Err(e) => {
                log::debug!("Pagination stopped after {} page(s): {}", pages_fetched, e);
                break PaginationStop::Interrupted {
                    cause: e.to_string(),
                };
            }
        };

        pages_fetched += 1;
        items.extend(response.results);

        match response.next_cursor {
            Some(next) if response.has_more => cursor = Some(next),
            _ => break PaginationStop::Exhausted,
        }
    };

    if let Some(max) = max_items {
        items.truncate(max);
    }

    PaginationResult {
        items,
        pages_fetched,
        stop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn page(range: std::ops::Range<u32>, next: Option<&str>) -> PaginatedResponse<u32> {
        PaginatedResponse {
            results: range.collect(),
            next_cursor: next.map(str::to_string),
            has_more: next.is_some(),
        }
    }

    #[tokio::test]
    async fn follows_cursors_until_exhausted() {
        let cursors = RefCell::new(Vec::new());
        let result = collect_pages(
            |page_size, cursor| {
                assert_eq!(page_size, 100);
                cursors.borrow_mut().push(cursor.clone());
                async move {
                    Ok::<_, AppError>(match cursor.as_deref() {
                        None => page(0..100, Some("c1")),
                        Some("c1") => page(100..150, None),
                        other => panic!("unexpected cursor {:?}", other),
                    })
                }
            },
            None,
        )
        .await;

        assert_eq!(result.items.len(), 150);
        assert_eq!(result.pages_fetched, 2);
        assert_eq!(result.stop, PaginationStop::Exhausted);
        assert_eq!(*cursors.borrow(), vec![None, Some("c1".to_string())]);
    }

    #[tokio::test]
    async fn stops_at_cap_even_when_more_pages_exist() {
        let calls = RefCell::new(0u32);
        let result = collect_pages(
            |_, _| {
                *calls.borrow_mut() += 1;
                async { Ok::<_, AppError>(page(0..100, Some("more"))) }
            },
            Some(250),
        )
        .await;

        assert_eq!(*calls.borrow(), 3);
        assert_eq!(result.items.len(), 250);
        assert_eq!(result.stop, PaginationStop::CapReached);
    }

    #[tokio::test]
    async fn failure_keeps_earlier_pages() {
        let calls = RefCell::new(0u32);
        let result = collect_pages(
            |_, _| {
                *calls.borrow_mut() += 1;
                let n = *calls.borrow();
                async move {
                    if n == 1 {
                        Ok::<_, AppError>(page(0..100, Some("c1")))
                    } else {
                        Err(AppError::MalformedResponse("connection reset".into()))
                    }
                }
            },
            None,
        )
        .await;

        assert_eq!(result.items.len(), 100);
        assert!(matches!(result.stop, PaginationStop::Interrupted { .. }));
    }

    #[tokio::test]
    async fn has_more_without_cursor_ends_the_loop() {
        let result = collect_pages(
            |_, _| async {
                Ok::<_, AppError>(PaginatedResponse {
                    results: vec![1u32],
                    next_cursor: None,
                    has_more: true,
                })
            },
            None,
        )
        .await;
        assert_eq!(result.pages_fetched, 1);
        assert_eq!(result.stop, PaginationStop::Exhausted);
    }
}
