//! Wire types for the upstream market data APIs
//!
//! Every field a provider may omit is optional or defaulted. Upstream schema
//! drift should surface as `None`/zero values here, not as decode failures.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Token metadata as Solana Tracker reports it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenMeta {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub mint: Option<String>,
    pub uri: Option<String>,
    pub decimals: Option<u8>,
    pub has_file_meta_data: Option<bool>,
    pub created_on: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub show_name: Option<bool>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub website: Option<String>,
}

/// A value quoted both in the pool's quote token and in USD.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteUsd {
    pub quote: f64,
    pub usd: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PoolSecurity {
    pub freeze_authority: Option<String>,
    pub mint_authority: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolTxns {
    pub buys: u64,
    pub total: u64,
    pub volume: f64,
    pub sells: u64,
}

/// One liquidity pool backing a token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pool {
    pub pool_id: String,
    pub liquidity: QuoteUsd,
    pub price: QuoteUsd,
    pub token_supply: f64,
    pub lp_burn: f64,
    pub token_address: String,
    pub market_cap: QuoteUsd,
    pub decimals: u8,
    pub security: PoolSecurity,
    pub quote_token: String,
    pub market: String,
    pub curve_percentage: Option<f64>,
    pub curve: Option<String>,
    pub last_updated: u64,
    pub created_at: u64,
    pub deployer: Option<String>,
    pub txns: PoolTxns,
}

/// Price movement over one window ("1m" through "24h").
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PriceChangeEvent {
    pub price_change_percentage: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskItem {
    pub name: String,
    pub description: String,
    pub level: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Risk {
    pub rugged: bool,
    pub risks: Vec<RiskItem>,
    pub score: f64,
}

/// Full token document from `/tokens/{address}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenDetails {
    pub token: TokenMeta,
    pub pools: Vec<Pool>,
    pub events: HashMap<String, PriceChangeEvent>,
    pub risk: Risk,
    pub buys: u64,
    pub sells: u64,
    pub txns: u64,
}

/// Token document flattened for consumers that want metadata, pools, and a
/// headline USD price in one place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenOverview {
    #[serde(flatten)]
    pub token: TokenMeta,
    pub pools: Vec<Pool>,
    #[serde(rename = "priceUSD")]
    pub price_usd: f64,
}

impl TokenOverview {
    /// Headline price is the first pool's USD price, zero when no pool exists.
    pub fn from_details(details: TokenDetails) -> Self {
        let price_usd = details.pools.first().map(|p| p.price.usd).unwrap_or_default();
        Self {
            token: details.token,
            pools: details.pools,
            price_usd,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletTokenBalance {
    pub token: TokenMeta,
    pub balance: f64,
    pub value: f64,
}

/// Wallet balance sheet from `/wallet/{address}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WalletBalances {
    pub tokens: Vec<WalletTokenBalance>,
    pub total: f64,
    pub total_sol: f64,
}

/// Lifetime PnL totals for a wallet.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PnlSummary {
    pub realized: f64,
    pub unrealized: f64,
    pub total: f64,
    pub total_invested: f64,
    pub total_wins: u64,
    pub total_losses: u64,
    pub average_buy_amount: f64,
    pub win_percentage: f64,
    pub loss_percentage: f64,
    pub neutral_percentage: f64,
}

/// Position opened inside the analysis window. Name, symbol, and mint are
/// absent in the raw summary and get backfilled from historic metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Holding {
    pub first_buy_amount: f64,
    pub first_buy_value: f64,
    pub current_value: f64,
    pub realized: f64,
    pub unrealized: f64,
    pub total: f64,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub mint: Option<String>,
}

/// Positions opened inside the window, keyed by mint. These fields arrive in
/// snake_case, unlike the rest of the PnL document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewTokens {
    pub tokens: BTreeMap<String, Holding>,
    pub count: u64,
    pub total_invested: f64,
    pub total_current_value: f64,
    pub total_pnl: f64,
}

/// Per-window wallet performance from the historic PnL section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WindowSummary {
    pub realized_change: f64,
    pub unrealized_change: f64,
    pub total_change: f64,
    pub percentage_change: f64,
    pub wins: u64,
    pub losses: u64,
    pub win_percentage: f64,
    pub loss_percentage: f64,
    pub new_tokens: NewTokens,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldingSnapshot {
    pub meta: Option<TokenMeta>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricToken {
    pub current: Option<HoldingSnapshot>,
}

/// Windowed history attached when `showHistoricPnL` is requested.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricPnl {
    pub summary: HashMap<String, WindowSummary>,
    pub tokens: HashMap<String, HistoricToken>,
}

/// Per-mint PnL entry from `/pnl/{address}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenPnl {
    pub holding: f64,
    pub held: f64,
    pub sold: f64,
    pub sold_usd: f64,
    pub realized: f64,
    pub unrealized: f64,
    pub total: f64,
    pub total_invested: f64,
    pub current_value: f64,
    pub cost_basis: f64,
    pub meta: Option<TokenMeta>,
}

/// PnL document from `/pnl/{address}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletPnl {
    pub summary: Option<PnlSummary>,
    pub tokens: HashMap<String, TokenPnl>,
    pub historic: Option<HistoricPnl>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegToken {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub image: Option<String>,
    pub decimals: Option<u8>,
}

/// One side of a swap.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeLeg {
    pub address: String,
    pub amount: f64,
    pub token: LegToken,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TradePrice {
    pub usd: f64,
    /// The provider quotes the SOL price as a string
    pub sol: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeVolume {
    pub usd: f64,
    pub sol: f64,
}

/// A single on-chain swap as reported by the trades endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    pub tx: String,
    pub from: TradeLeg,
    pub to: TradeLeg,
    pub price: TradePrice,
    pub volume: TradeVolume,
    pub wallet: String,
    pub program: String,
    /// Unix seconds
    pub time: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TradesPage {
    pub trades: Vec<Transaction>,
}

/// One ranked wallet from the top-traders listing (`expandPnl=true`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TopTrader {
    pub wallet: String,
    pub summary: PnlSummary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopTradersPage {
    pub wallets: Vec<TopTrader>,
    pub has_next: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchHit {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub mint: Option<String>,
    pub image: Option<String>,
    pub decimals: u8,
    pub liquidity_usd: f64,
    pub market_cap_usd: f64,
    pub price_usd: f64,
    pub verified: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResults {
    pub status: Option<String>,
    pub data: Vec<SearchHit>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HolderAccount {
    pub wallet: String,
    pub amount: f64,
    pub value: QuoteUsd,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldersPage {
    pub total: u64,
    pub accounts: Vec<HolderAccount>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PairToken {
    pub address: String,
    pub name: String,
    pub symbol: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuysSells {
    pub buys: u64,
    pub sells: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PairActivity {
    pub m5: BuysSells,
    pub h1: BuysSells,
    pub h6: BuysSells,
    pub h24: BuysSells,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowedStat {
    pub m5: f64,
    pub h1: f64,
    pub h6: f64,
    pub h24: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PairLiquidity {
    pub usd: f64,
    pub base: f64,
    pub quote: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebsiteLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PairInfo {
    pub image_url: Option<String>,
    pub header: Option<String>,
    pub open_graph: Option<String>,
    pub websites: Vec<WebsiteLink>,
    pub socials: Vec<SocialLink>,
}

/// One trading pair from DexScreener.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DexPair {
    pub chain_id: String,
    pub dex_id: String,
    pub url: String,
    pub pair_address: String,
    pub labels: Vec<String>,
    pub base_token: PairToken,
    pub quote_token: PairToken,
    pub price_native: String,
    pub price_usd: Option<String>,
    pub txns: PairActivity,
    pub volume: WindowedStat,
    pub price_change: WindowedStat,
    pub liquidity: PairLiquidity,
    pub fdv: f64,
    pub market_cap: f64,
    pub pair_created_at: u64,
    pub info: Option<PairInfo>,
}

/// Response of `/latest/dex/tokens/{address}`. `pairs` is null when the
/// address is unknown to DexScreener.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DexScreenerResponse {
    pub schema_version: String,
    pub pairs: Option<Vec<DexPair>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_details_tolerates_sparse_documents() {
        let details: TokenDetails = serde_json::from_value(json!({
            "token": { "name": "Example", "symbol": "EX" },
            "pools": [{ "poolId": "pool-1", "price": { "usd": 0.042, "quote": 0.0002 } }]
        }))
        .unwrap();

        assert_eq!(details.token.name.as_deref(), Some("Example"));
        assert_eq!(details.pools[0].price.usd, 0.042);
        assert!(details.token.mint.is_none());
        assert!(details.events.is_empty());
        assert!(!details.risk.rugged);
    }

    #[test]
    fn token_overview_price_defaults_to_zero_without_pools() {
        let details = TokenDetails::default();
        let overview = TokenOverview::from_details(details);
        assert_eq!(overview.price_usd, 0.0);

        let rendered = serde_json::to_value(&overview).unwrap();
        assert_eq!(rendered["priceUSD"], 0.0);
    }

    #[test]
    fn top_traders_page_reads_camel_case_continuation_flag() {
        let page: TopTradersPage = serde_json::from_value(json!({
            "wallets": [
                { "wallet": "abc", "summary": { "total": 12.5, "winPercentage": 61.0 } }
            ],
            "hasNext": true
        }))
        .unwrap();

        assert!(page.has_next);
        assert_eq!(page.wallets.len(), 1);
        assert_eq!(page.wallets[0].summary.win_percentage, 61.0);
    }

    #[test]
    fn pnl_document_exposes_windowed_summaries() {
        let pnl: WalletPnl = serde_json::from_value(json!({
            "summary": { "realized": 10.0, "totalInvested": 100.0 },
            "historic": {
                "summary": {
                    "7d": {
                        "realizedChange": 5.5,
                        "winPercentage": 50.0,
                        "newTokens": {
                            "tokens": {
                                "mint-1": { "first_buy_amount": 2.0, "total": 1.25 }
                            },
                            "count": 1,
                            "total_invested": 20.0
                        }
                    }
                },
                "tokens": {
                    "mint-1": { "current": { "meta": { "name": "Example", "symbol": "EX" } } }
                }
            }
        }))
        .unwrap();

        let historic = pnl.historic.unwrap();
        let window = &historic.summary["7d"];
        assert_eq!(window.realized_change, 5.5);
        assert_eq!(window.new_tokens.tokens["mint-1"].first_buy_amount, 2.0);
        assert!(window.new_tokens.tokens["mint-1"].name.is_none());
        assert_eq!(pnl.summary.unwrap().total_invested, 100.0);
    }

    #[test]
    fn dexscreener_pairs_may_be_null() {
        let miss: DexScreenerResponse =
            serde_json::from_value(json!({ "schemaVersion": "1.0.0", "pairs": null })).unwrap();
        assert!(miss.pairs.is_none());

        let hit: DexScreenerResponse = serde_json::from_value(json!({
            "schemaVersion": "1.0.0",
            "pairs": [{
                "baseToken": { "address": "a", "name": "Example", "symbol": "EX" },
                "priceUsd": "0.0042",
                "txns": { "h24": { "buys": 7, "sells": 3 } },
                "liquidity": { "usd": 1000.0 }
            }]
        }))
        .unwrap();
        let pairs = hit.pairs.unwrap();
        assert_eq!(pairs[0].price_usd.as_deref(), Some("0.0042"));
        assert_eq!(pairs[0].txns.h24.buys, 7);
        assert_eq!(pairs[0].liquidity.usd, 1000.0);
    }
}
