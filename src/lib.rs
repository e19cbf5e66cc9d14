//! Solana Insight Agent
//!
//! An AI-powered analysis plugin for conversational agent runtimes that:
//! - Answers token questions from DexScreener and Solana Tracker data
//! - Composes wallet balances, windowed PnL, and labeled trade history
//! - Renders the numbers as markdown reports through a language model
//!
//! # Data flow
//!
//! - Chat actions extract an address from free text via the model
//! - Token lookups ask DexScreener first, then Solana Tracker
//! - Wallet analysis fans out three data API reads and joins them
//! - Paginated listings retry each page and tolerate degraded 404 bodies

pub mod actions;
pub mod analysis;
pub mod api;
pub mod config;
pub mod llm;

mod error;

// Re-export commonly used types
pub use actions::{dispatch, plugin, Action, ActionResponse, ChatMessage, Plugin, ResponseSink};
pub use config::Config;
pub use error::{Error, Result};
