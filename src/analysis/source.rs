//! Token insight sources and the priority chain that queries them
//!
//! DexScreener is asked first; Solana Tracker only answers for tokens
//! DexScreener has no pairs for. Each hit carries a ready-to-send prompt
//! context plus the raw provider document.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::api::types::{DexPair, DexScreenerResponse, PriceChangeEvent, TokenDetails};
use crate::api::{DexScreenerClient, TrackerClient};
use crate::error::{Error, Result};

/// Raw material for one token report: which provider answered, the prompt
/// context built from its document, and the document itself.
#[derive(Debug, Clone)]
pub struct TokenInsight {
    pub source: &'static str,
    pub report_context: String,
    pub data: Value,
    /// Line placed ahead of the generated report, when the source wants one.
    pub response_prefix: Option<String>,
}

/// A provider that may know a token. `Ok(None)` means "not my token, ask the
/// next one"; errors abort the whole lookup.
#[async_trait]
pub trait TokenDataSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch(&self, address: &str) -> Result<Option<TokenInsight>>;
}

/// Ask each source in order and keep the first hit.
pub async fn first_insight(
    sources: &[Box<dyn TokenDataSource>],
    address: &str,
) -> Result<Option<TokenInsight>> {
    for source in sources {
        if let Some(insight) = source.fetch(address).await? {
            tracing::debug!(source = insight.source, address, "token data found");
            return Ok(Some(insight));
        }
        tracing::debug!(source = source.name(), address, "no data, trying next source");
    }
    Ok(None)
}

pub struct DexScreenerSource {
    client: DexScreenerClient,
}

impl DexScreenerSource {
    pub fn new(client: DexScreenerClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenDataSource for DexScreenerSource {
    fn name(&self) -> &'static str {
        "dexScreener"
    }

    async fn fetch(&self, address: &str) -> Result<Option<TokenInsight>> {
        let response = self.client.token_pairs(address).await?;
        let Some(pair) = best_pair(&response) else {
            return Ok(None);
        };
        let report_context = dex_screener_context(pair);
        Ok(Some(TokenInsight {
            source: self.name(),
            report_context,
            data: serde_json::to_value(&response)?,
            response_prefix: None,
        }))
    }
}

pub struct TrackerSource {
    client: TrackerClient,
}

impl TrackerSource {
    pub fn new(client: TrackerClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenDataSource for TrackerSource {
    fn name(&self) -> &'static str {
        "solanaTracker"
    }

    async fn fetch(&self, address: &str) -> Result<Option<TokenInsight>> {
        let Some(details) = miss_on_not_found(self.client.token_details(address).await)? else {
            return Ok(None);
        };
        let report_context = tracker_context(&details);
        Ok(Some(TokenInsight {
            source: self.name(),
            report_context,
            data: serde_json::to_value(&details)?,
            response_prefix: Some(format!(
                "Information on the token {address} has been successfully retrieved"
            )),
        }))
    }
}

/// A token is a DexScreener hit only when at least one pair trades it.
fn best_pair(response: &DexScreenerResponse) -> Option<&DexPair> {
    response.pairs.as_ref().and_then(|pairs| pairs.first())
}

/// A 404 from the tracker is a miss for the chain, not a failure.
fn miss_on_not_found<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(Error::NotFound { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

fn opt_text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("unknown")
}

/// Prompt context for a report built from a DexScreener pair. The braced
/// placeholders are filled in by the model from the data sections below them.
pub fn dex_screener_context(pair: &DexPair) -> String {
    let socials = pair
        .info
        .as_ref()
        .map(|info| {
            info.socials
                .iter()
                .map(|social| format!("- {}:\n{}", social.kind, social.url))
                .collect::<Vec<_>>()
                .join("\n\n")
        })
        .filter(|joined| !joined.is_empty())
        .unwrap_or_else(|| "No socials".to_string());

    format!(
        r#"Using the data below, generate a comprehensive token analysis in the following format:

# {{tokenName}} ({{tokenSymbol}}) Analysis 📊

🔹 Address: [{{tokenAddress}}](https://metadapp.com/sol/{{tokenAddress}})

💹 Market Statistics:
├ Price: {price_usd}
├ Market Cap: {market_cap}
├ 24h Volume: {volume_h24}
└ Liquidity: {liquidity_usd}

📈 24h Trading Activity:
├ Buys: {{24h_buys}}
├ Sells: {{24h_sells}}
└ Sentiment: {{marketSentiment}}
[Calculate based on:
    Bullish 🟢 if buys > 60% of total transactions
    Bearish 🔴 if buys < 40% of total transactions
    Neutral 😐 otherwise]

🔒 Security:
├ Freeze Authority: {{⚫ if no, 🟢 if yes}}
├ Mint Authority: {{⚫ if no, 🟢 if yes}}
└ Liquidity Locked: {{🔒 if yes, ⚠️ if no}}

💡 Market Insight:
[Generate a 1-2 sentence insight based on:
- Price change trends (5m, 1h, 6h, 24h)
- Volume patterns
- Buy/sell ratio
- Liquidity changes]

🌐 Socials:
[List available social links or "No social links available"]

# Name
{name}

# Symbol
{symbol}

# Address
{address}

# Price Usd
${price_usd}

# Price Native
{price_native}

# Transactions
- 5 minutes:
    * buys {m5_buys}
    * sells {m5_sells}
- 1 hour:
    * buys {h1_buys}
    * sells {h1_sells}
- 6 hours:
    * buys {h6_buys}
    * sells {h6_sells}
- 24 hours:
    * buys {h24_buys}
    * sells {h24_sells}

# MarketCap
{market_cap}

# Volume
- 5 minutes:
    {volume_m5}
- 1 hour:
    {volume_h1}
- 6 hours:
    {volume_h6}
- 24 hours:
    {volume_h24}

# Price Changes
- 5 minutes:
    {change_m5}
- 1 hour:
    {change_h1}
- 6 hours:
    {change_h6}
- 24 hours:
    {change_h24}

# Liquidity
- Usd Value:
    {liquidity_usd}
- Base Value:
    {liquidity_base}
- Quote Value:
    {liquidity_quote}

# Socials
{socials}
"#,
        price_usd = pair.price_usd.as_deref().unwrap_or("unknown"),
        price_native = pair.price_native,
        market_cap = pair.market_cap,
        name = pair.base_token.name,
        symbol = pair.base_token.symbol,
        address = pair.base_token.address,
        m5_buys = pair.txns.m5.buys,
        m5_sells = pair.txns.m5.sells,
        h1_buys = pair.txns.h1.buys,
        h1_sells = pair.txns.h1.sells,
        h6_buys = pair.txns.h6.buys,
        h6_sells = pair.txns.h6.sells,
        h24_buys = pair.txns.h24.buys,
        h24_sells = pair.txns.h24.sells,
        volume_m5 = pair.volume.m5,
        volume_h1 = pair.volume.h1,
        volume_h6 = pair.volume.h6,
        volume_h24 = pair.volume.h24,
        change_m5 = pair.price_change.m5,
        change_h1 = pair.price_change.h1,
        change_h6 = pair.price_change.h6,
        change_h24 = pair.price_change.h24,
        liquidity_usd = pair.liquidity.usd,
        liquidity_base = pair.liquidity.base,
        liquidity_quote = pair.liquidity.quote,
        socials = socials,
    )
}

/// Prompt context for a report built from a Solana Tracker token document.
/// Market numbers come from the token's first pool.
pub fn tracker_context(details: &TokenDetails) -> String {
    let pool = details.pools.first().cloned().unwrap_or_default();
    let curve = pool
        .curve_percentage
        .map_or_else(|| "unknown".to_string(), |p| p.to_string());

    format!(
        r#"Using the data below, generate a comprehensive token analysis in the following format:

# {{tokenName}} ({{tokenSymbol}}) Analysis 📊

🔹 Address: [{{tokenAddress}}](https://metadapp.com/sol/{{tokenAddress}})

💹 Market Statistics:
├ Price: {price_usd}
├ Market Cap: {market_cap}
└ Liquidity: {liquidity_usd}

📈 24h Trading Activity:
├ Buys: {{24h_buys}}
├ Sells: {{24h_sells}}
└ Sentiment: {{marketSentiment}}
[Calculate based on:
    Bullish 🟢 if buys > 60% of total transactions
    Bearish 🔴 if buys < 40% of total transactions
    Neutral 😐 otherwise]

🔒 Security:
├ Freeze Authority: {{⚫ if no, 🟢 if yes}}
├ Mint Authority: {{⚫ if no, 🟢 if yes}}
└ Liquidity Locked: {{🔒 if yes, ⚠️ if no}}

💡 Market Insight:
[Generate a 1-2 sentence insight based on:
- Price change trends (5m, 1h, 6h, 24h)
- Volume patterns
- Buy/sell ratio
- Liquidity changes]

🌐 Socials:
[List available social links or "No social links available"]

# Name
{name}

# Symbol
{symbol}

# Address
{mint}

# Price Usd
${price_usd}

# Price Quote
{price_quote}

# Bonding curve percentage
{curve}

# Transactions
- buys:
    {buys}
- sells:
    {sells}

# MarketCap
{market_cap}

# Price Changes
{price_changes}

# Liquidity
- Usd Value:
    {liquidity_usd}
- Quote Value:
    {liquidity_quote}

# Socials
- Twitter:
    {twitter}
- Website:
    {website}

# Security
- Freeze Authority:
    {freeze_authority}
- Mint Authority:
    {mint_authority}
"#,
        price_usd = pool.price.usd,
        price_quote = pool.price.quote,
        market_cap = pool.market_cap.usd,
        liquidity_usd = pool.liquidity.usd,
        liquidity_quote = pool.liquidity.quote,
        name = opt_text(&details.token.name),
        symbol = opt_text(&details.token.symbol),
        mint = opt_text(&details.token.mint),
        curve = curve,
        buys = pool.txns.buys,
        sells = pool.txns.sells,
        price_changes = price_change_lines(&details.events),
        twitter = opt_text(&details.token.twitter),
        website = opt_text(&details.token.website),
        freeze_authority = pool.security.freeze_authority.as_deref().unwrap_or("none"),
        mint_authority = pool.security.mint_authority.as_deref().unwrap_or("none"),
    )
}

const EVENT_WINDOWS: [(&str, &str); 12] = [
    ("1m", "1 minute"),
    ("5m", "5 minutes"),
    ("15m", "15 minutes"),
    ("30m", "30 minutes"),
    ("1h", "1 hour"),
    ("2h", "2 hours"),
    ("3h", "3 hours"),
    ("4h", "4 hours"),
    ("5h", "5 hours"),
    ("6h", "6 hours"),
    ("12h", "12 hours"),
    ("24h", "24 hours"),
];

fn price_change_lines(events: &HashMap<String, PriceChangeEvent>) -> String {
    EVENT_WINDOWS
        .iter()
        .map(|(key, label)| {
            let change = events
                .get(*key)
                .map_or_else(|| "unknown".to_string(), |e| e.price_change_percentage.to_string());
            format!("- {label}:\n    {change}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
