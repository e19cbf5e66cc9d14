//! Resilient page-by-page aggregation
//!
//! The top-traders listing arrives in numbered pages with a continuation
//! flag. Pages are fetched strictly in order and each page gets a bounded
//! number of attempts before the whole aggregation gives up.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Error, Result};

/// Attempts a single page gets before its failure becomes final.
pub const MAX_PAGE_RETRIES: u32 = 3;

/// One page of a paginated listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next: bool,
}

/// A paginated upstream listing, fetched one page at a time.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send;

    /// Fetch a single page. Pages are numbered from 1.
    async fn fetch_page(&self, page: u32) -> Result<Page<Self::Item>>;

    /// Decode the fallback document some 404 responses carry into a final
    /// page. The source owns the provider's page shape, so it owns this too.
    fn decode_fallback(&self, payload: Value) -> Result<Page<Self::Item>>;
}

/// Drain a paginated listing into a single ordered Vec.
///
/// Each page gets up to [`MAX_PAGE_RETRIES`] back-to-back attempts. When a
/// page runs out of attempts:
/// - a 404 that carried a fallback document decodes as one final page, and
///   its items are returned in place of everything accumulated so far;
/// - a 404 without a body aborts with the endpoint's domain error;
/// - any other failure propagates unchanged.
///
/// The listing ends when the provider clears its continuation flag; there is
/// no iteration cap beyond that.
pub async fn fetch_all_pages<S: PageSource>(source: &S) -> Result<Vec<S::Item>> {
    let mut items = Vec::new();
    let mut page = 1u32;
    let mut has_next = true;

    while has_next {
        let mut attempts = 0u32;
        loop {
            match source.fetch_page(page).await {
                Ok(fetched) => {
                    tracing::debug!(page, count = fetched.items.len(), "fetched page");
                    items.extend(fetched.items);
                    has_next = fetched.has_next;
                    page += 1;
                    break;
                }
                Err(err) => {
                    attempts += 1;
                    tracing::warn!(page, attempts, error = %err, "page fetch failed");
                    if attempts < MAX_PAGE_RETRIES {
                        continue;
                    }
                    tracing::error!(page, "page retries exhausted, aborting");
                    return match err {
                        Error::NotFound {
                            payload: Some(payload),
                            ..
                        } => {
                            let fallback = source.decode_fallback(payload)?;
                            Ok(fallback.items)
                        }
                        other => Err(other),
                    };
                }
            }
        }
    }

    Ok(items)
}
