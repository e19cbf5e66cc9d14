//! Analysis primitives built on top of the raw provider data

pub mod classifier;
pub mod source;
pub mod wallet;

pub use classifier::{classify_transactions, ClassifiedTransaction, TradeSide, WSOL_MINT};
pub use source::{
    first_insight, DexScreenerSource, TokenDataSource, TokenInsight, TrackerSource,
};
pub use wallet::{analyze_wallet, WalletAnalysis, WalletDataSource};
