//! HTTP adapters for the upstream market data providers

pub mod dexscreener;
pub mod paging;
pub mod tracker;
pub mod types;

pub use dexscreener::DexScreenerClient;
pub use paging::{fetch_all_pages, Page, PageSource, MAX_PAGE_RETRIES};
pub use tracker::TrackerClient;
