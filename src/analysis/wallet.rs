//! Wallet analysis composition
//!
//! Pulls a wallet's windowed PnL, balances, and trade history concurrently,
//! then shapes them into one report-ready document.

use async_trait::async_trait;
use serde::Serialize;

use crate::analysis::classifier::{classify_transactions, ClassifiedTransaction};
use crate::api::types::{TradesPage, WalletBalances, WalletPnl, WindowSummary};
use crate::api::TrackerClient;
use crate::error::{Error, Result};

/// Upstream queries the composer needs, factored out for test doubles.
#[async_trait]
pub trait WalletDataSource: Send + Sync {
    async fn pnl_windowed(&self, wallet: &str, window: &str) -> Result<WalletPnl>;
    async fn balances(&self, wallet: &str) -> Result<WalletBalances>;
    async fn trades(&self, wallet: &str) -> Result<TradesPage>;
}

#[async_trait]
impl WalletDataSource for TrackerClient {
    async fn pnl_windowed(&self, wallet: &str, window: &str) -> Result<WalletPnl> {
        self.wallet_pnl_windowed(wallet, window).await
    }

    async fn balances(&self, wallet: &str) -> Result<WalletBalances> {
        self.wallet_balances(wallet).await
    }

    async fn trades(&self, wallet: &str) -> Result<TradesPage> {
        self.wallet_trades(wallet).await
    }
}

/// Everything the wallet report renders, composed once per request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAnalysis {
    pub wallet_address: String,
    pub usd_balance: f64,
    pub sol_balance: f64,
    pub wallet_analysis: WindowSummary,
    pub trades: Vec<ClassifiedTransaction>,
}

/// Compose the full analysis for one wallet.
///
/// The three upstream queries run concurrently and the first failure fails
/// the whole call; there are no partial results.
pub async fn analyze_wallet<S>(source: &S, wallet: &str, window: &str) -> Result<WalletAnalysis>
where
    S: WalletDataSource + ?Sized,
{
    let (pnl, balances, trades) = futures::try_join!(
        source.pnl_windowed(wallet, window),
        source.balances(wallet),
        source.trades(wallet),
    )?;
    tracing::debug!(
        wallet,
        trades = trades.trades.len(),
        usd = balances.total,
        "wallet data fetched"
    );

    let summary = window_summary_with_metadata(pnl, window)?;

    Ok(WalletAnalysis {
        wallet_address: wallet.to_string(),
        usd_balance: balances.total,
        sol_balance: balances.total_sol,
        wallet_analysis: summary,
        trades: classify_transactions(trades.trades, None),
    })
}

/// Pull the requested window's summary out of a PnL document, backfilling
/// each new position's name, symbol, and mint from the historic metadata,
/// which the raw summary omits.
fn window_summary_with_metadata(pnl: WalletPnl, window: &str) -> Result<WindowSummary> {
    let mut historic = pnl.historic.unwrap_or_default();
    let mut summary = historic
        .summary
        .remove(window)
        .ok_or_else(|| Error::Analysis(format!("{window} summary not found in the data")))?;

    for (mint, holding) in summary.new_tokens.tokens.iter_mut() {
        let meta = historic
            .tokens
            .get(mint)
            .and_then(|token| token.current.as_ref())
            .and_then(|current| current.meta.as_ref());
        if let Some(meta) = meta {
            holding.name = meta.name.clone();
            holding.symbol = meta.symbol.clone();
            holding.mint = meta.mint.clone();
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classifier::{TradeSide, WSOL_MINT};
    use serde_json::json;

    #[derive(Default)]
    struct StubWallet {
        pnl: Option<WalletPnl>,
        balances: Option<WalletBalances>,
        trades: Option<TradesPage>,
    }

    fn unavailable<T>() -> Result<T> {
        Err(Error::Api {
            status: 500,
            message: "stub failure".to_string(),
        })
    }

    #[async_trait]
    impl WalletDataSource for StubWallet {
        async fn pnl_windowed(&self, _wallet: &str, _window: &str) -> Result<WalletPnl> {
            self.pnl.clone().map_or_else(unavailable, Ok)
        }

        async fn balances(&self, _wallet: &str) -> Result<WalletBalances> {
            self.balances.clone().map_or_else(unavailable, Ok)
        }

        async fn trades(&self, _wallet: &str) -> Result<TradesPage> {
            self.trades.clone().map_or_else(unavailable, Ok)
        }
    }

    fn pnl_fixture() -> WalletPnl {
        serde_json::from_value(json!({
            "historic": {
                "summary": {
                    "7d": {
                        "realizedChange": 12.5,
                        "unrealizedChange": -2.0,
                        "totalChange": 10.5,
                        "percentageChange": 4.2,
                        "wins": 6,
                        "losses": 4,
                        "winPercentage": 60.0,
                        "lossPercentage": 40.0,
                        "newTokens": {
                            "tokens": {
                                "mint-1": { "first_buy_amount": 1000.0, "total": 3.2 },
                                "mint-2": { "first_buy_amount": 50.0 }
                            },
                            "count": 2,
                            "total_invested": 250.0,
                            "total_current_value": 260.5,
                            "total_pnl": 10.5
                        }
                    }
                },
                "tokens": {
                    "mint-1": {
                        "current": {
                            "meta": { "name": "Example", "symbol": "EX", "mint": "mint-1" }
                        }
                    }
                }
            }
        }))
        .unwrap()
    }

    fn balances_fixture() -> WalletBalances {
        serde_json::from_value(json!({ "total": 250.75, "totalSol": 4.2 })).unwrap()
    }

    fn trades_fixture() -> TradesPage {
        serde_json::from_value(json!({
            "trades": [
                { "tx": "t1", "from": { "address": "mint-1" }, "to": { "address": WSOL_MINT } },
                { "tx": "t2", "from": { "address": WSOL_MINT }, "to": { "address": "mint-1" } }
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn composes_balances_summary_and_classified_trades() {
        let source = StubWallet {
            pnl: Some(pnl_fixture()),
            balances: Some(balances_fixture()),
            trades: Some(trades_fixture()),
        };

        let analysis = analyze_wallet(&source, "wallet-1", "7d").await.unwrap();

        assert_eq!(analysis.wallet_address, "wallet-1");
        assert_eq!(analysis.usd_balance, 250.75);
        assert_eq!(analysis.sol_balance, 4.2);
        assert_eq!(analysis.wallet_analysis.wins, 6);
        assert_eq!(analysis.wallet_analysis.new_tokens.count, 2);

        // metadata backfilled from the historic section, unknown mints untouched
        let tokens = &analysis.wallet_analysis.new_tokens.tokens;
        assert_eq!(tokens["mint-1"].name.as_deref(), Some("Example"));
        assert_eq!(tokens["mint-1"].symbol.as_deref(), Some("EX"));
        assert!(tokens["mint-2"].name.is_none());

        // trades classified with the native-mint rule, order preserved
        assert_eq!(analysis.trades.len(), 2);
        assert_eq!(analysis.trades[0].side, TradeSide::Sell);
        assert_eq!(analysis.trades[1].side, TradeSide::Buy);
    }

    #[tokio::test]
    async fn any_failed_query_fails_the_whole_call() {
        let source = StubWallet {
            pnl: Some(pnl_fixture()),
            balances: None,
            trades: Some(trades_fixture()),
        };

        let err = analyze_wallet(&source, "wallet-1", "7d").await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn missing_window_summary_is_a_labeled_error() {
        let source = StubWallet {
            pnl: Some(pnl_fixture()),
            balances: Some(balances_fixture()),
            trades: Some(trades_fixture()),
        };

        let err = analyze_wallet(&source, "wallet-1", "30d").await.unwrap_err();
        assert!(matches!(err, Error::Analysis(_)));
        assert!(err.to_string().contains("30d summary not found"));
    }

    #[tokio::test]
    async fn pnl_without_historic_section_reports_missing_summary() {
        let source = StubWallet {
            pnl: Some(WalletPnl::default()),
            balances: Some(balances_fixture()),
            trades: Some(trades_fixture()),
        };

        let err = analyze_wallet(&source, "wallet-1", "7d").await.unwrap_err();
        assert!(err.to_string().contains("7d summary not found"));
    }

    #[tokio::test]
    async fn analysis_serializes_with_camel_case_keys() {
        let source = StubWallet {
            pnl: Some(pnl_fixture()),
            balances: Some(balances_fixture()),
            trades: Some(trades_fixture()),
        };

        let analysis = analyze_wallet(&source, "wallet-1", "7d").await.unwrap();
        let value = serde_json::to_value(&analysis).unwrap();

        assert_eq!(value["walletAddress"], "wallet-1");
        assert_eq!(value["usdBalance"], 250.75);
        assert_eq!(value["solBalance"], 4.2);
        assert_eq!(value["trades"][0]["type"], "sell");
        assert!(value["walletAnalysis"]["newTokens"]["tokens"].is_object());
    }
}
