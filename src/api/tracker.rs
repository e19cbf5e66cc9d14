//! Solana Tracker data API client
//!
//! Authenticated GETs against the data API. Several endpoints attach a
//! fallback document to their 404 responses; the plain lookups decode that
//! body as a degraded success, while a bodyless 404 becomes the endpoint's
//! domain error. The paginated top-traders listing interprets its own 404s,
//! see [`crate::api::paging`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::api::paging::{fetch_all_pages, Page, PageSource};
use crate::api::types::{
    HoldersPage, Pool, SearchResults, TokenDetails, TokenOverview, TopTrader, TopTradersPage,
    TradesPage, WalletBalances, WalletPnl,
};
use crate::config::Config;
use crate::error::{Error, Result};

/// Labels surfaced when an endpoint 404s without a body.
mod labels {
    pub const TOKEN: &str = "Token not found";
    pub const TOKENS: &str = "Failed to fetch tokens";
    pub const SEARCH: &str = "Failed to fetch tokens to search";
    pub const WALLET_HOLDINGS: &str = "Failed to fetch wallet holdings";
    pub const WALLET_TOKENS: &str = "Failed to fetch wallet tokens";
    pub const WALLET_TRADES: &str = "Failed to fetch wallet trades";
    pub const WALLET_TOKEN_TRADES: &str = "Failed to fetch wallet token trades";
    pub const TOP_TRADERS: &str = "Failed to fetch top wallets list";
}

/// Client for the Solana Tracker data API.
#[derive(Clone)]
pub struct TrackerClient {
    client: Client,
    base_url: Url,
}

impl TrackerClient {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.tracker.base_url)
            .map_err(|e| Error::Config(format!("invalid tracker base url: {e}")))?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(key) = &config.tracker.api_key {
            let mut value = header::HeaderValue::from_str(key.expose_secret())
                .map_err(|e| Error::Config(format!("invalid tracker api key: {e}")))?;
            value.set_sensitive(true);
            headers.insert("x-api-key", value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Token metadata, pools, and a headline USD price in one document.
    pub async fn token_overview(&self, address: &str) -> Result<TokenOverview> {
        let details: TokenDetails = self
            .get_json(&format!("/tokens/{address}"), labels::TOKEN)
            .await?;
        Ok(TokenOverview::from_details(details))
    }

    /// Raw token document.
    pub async fn token_details(&self, address: &str) -> Result<TokenDetails> {
        self.get_json(&format!("/tokens/{address}"), labels::TOKENS)
            .await
    }

    /// Multi-token terminal feed. The document shape is provider-defined and
    /// kept opaque.
    pub async fn terminal_data(&self) -> Result<Value> {
        self.get_json("/tokens/multi/all", labels::TOKENS).await
    }

    /// Holder roster for a token.
    pub async fn holders(&self, address: &str) -> Result<HoldersPage> {
        self.get_json(&format!("/tokens/{address}/holders"), labels::TOKENS)
            .await
    }

    /// Trending tokens, optionally for a specific window ("1h", "24h").
    pub async fn trending(&self, window: Option<&str>) -> Result<Vec<TokenDetails>> {
        let path = match window {
            Some(window) => format!("/tokens/trending/{window}"),
            None => "/tokens/trending".to_string(),
        };
        self.get_json(&path, labels::TOKENS).await
    }

    /// Token search.
    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        let mut url = self.endpoint("/search")?;
        url.query_pairs_mut().append_pair("query", query);
        self.get_json_url(url, labels::SEARCH).await
    }

    /// PnL document for a wallet.
    pub async fn wallet_pnl(&self, wallet: &str) -> Result<WalletPnl> {
        self.get_json(
            &format!("/pnl/{wallet}?showMeta=true"),
            labels::WALLET_HOLDINGS,
        )
        .await
    }

    /// PnL document including history for the given window ("1d", "7d", "30d").
    pub async fn wallet_pnl_windowed(&self, wallet: &str, window: &str) -> Result<WalletPnl> {
        self.get_json(
            &format!("/pnl/{wallet}?showMeta=true&showHistoricPnL={window}"),
            labels::WALLET_HOLDINGS,
        )
        .await
    }

    /// Current token balances for a wallet.
    pub async fn wallet_balances(&self, wallet: &str) -> Result<WalletBalances> {
        self.get_json(&format!("/wallet/{wallet}"), labels::WALLET_TOKENS)
            .await
    }

    /// Trade history for a wallet.
    pub async fn wallet_trades(&self, wallet: &str) -> Result<TradesPage> {
        self.get_json(
            &format!("/wallet/{wallet}/trades?showMeta=true"),
            labels::WALLET_TRADES,
        )
        .await
    }

    /// Trades of one wallet in one token.
    pub async fn wallet_token_trades(&self, wallet: &str, token: &str) -> Result<TradesPage> {
        self.get_json(
            &format!("/trades/{token}/by-wallet/{wallet}?showMeta=true"),
            labels::WALLET_TOKEN_TRADES,
        )
        .await
    }

    /// Every ranked wallet, aggregated across all pages of the listing.
    /// `sort_by` is a provider sort key such as "total" or "winPercentage".
    pub async fn top_traders(&self, sort_by: &str) -> Result<Vec<TopTrader>> {
        let source = TopTradersSource {
            client: self,
            sort_by,
        };
        fetch_all_pages(&source).await
    }

    /// Pool id for a token, optionally matching a specific quote token.
    pub async fn pool_id_for(&self, token: &str, quote_token: Option<&str>) -> Result<Option<String>> {
        let overview = self.token_overview(token).await?;
        Ok(select_pool_id(&overview.pools, token, quote_token))
    }

    /// One page of the top-traders listing. No degraded 404 decode here; the
    /// aggregator decides what an exhausted page's 404 means.
    async fn top_traders_page(&self, sort_by: &str, page: u32) -> Result<TopTradersPage> {
        let mut url = self.endpoint(&format!("/top-traders/all/{page}"))?;
        url.query_pairs_mut()
            .append_pair("sortBy", sort_by)
            .append_pair("expandPnl", "true");
        let value = self.get_value(url, labels::TOP_TRADERS).await?;
        Ok(serde_json::from_value(value)?)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Config(format!("invalid request path {path}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, label: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        self.get_json_url(url, label).await
    }

    /// GET and decode, treating a 404 that carried a body as a degraded
    /// success by decoding that body in place of the missing response.
    async fn get_json_url<T: DeserializeOwned>(&self, url: Url, label: &str) -> Result<T> {
        match self.get_value(url, label).await {
            Ok(value) => Ok(serde_json::from_value(value)?),
            Err(Error::NotFound {
                payload: Some(payload),
                ..
            }) => {
                tracing::warn!(label, "tracker replied 404 with a fallback document");
                Ok(serde_json::from_value(payload)?)
            }
            Err(err) => Err(err),
        }
    }

    /// GET a URL, surfacing 404s as [`Error::NotFound`] with the response
    /// body attached when one was sent.
    async fn get_value(&self, url: Url, label: &str) -> Result<Value> {
        tracing::debug!(%url, "tracker request");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(match serde_json::from_str::<Value>(&body) {
                Ok(payload) if !payload.is_null() => Error::not_found_with_payload(label, payload),
                _ => Error::not_found(label),
            });
        }
        Err(Error::Api {
            status: status.as_u16(),
            message: body,
        })
    }
}

fn select_pool_id(pools: &[Pool], token: &str, quote_token: Option<&str>) -> Option<String> {
    match quote_token {
        None => pools.first().map(|pool| pool.pool_id.clone()),
        Some(quote) => pools
            .iter()
            .find(|pool| pool.token_address == token && pool.quote_token == quote)
            .map(|pool| pool.pool_id.clone()),
    }
}

struct TopTradersSource<'a> {
    client: &'a TrackerClient,
    sort_by: &'a str,
}

#[async_trait]
impl PageSource for TopTradersSource<'_> {
    type Item = TopTrader;

    async fn fetch_page(&self, page: u32) -> Result<Page<TopTrader>> {
        let fetched = self.client.top_traders_page(self.sort_by, page).await?;
        Ok(Page {
            items: fetched.wallets,
            has_next: fetched.has_next,
        })
    }

    fn decode_fallback(&self, payload: Value) -> Result<Page<TopTrader>> {
        let fetched: TopTradersPage = serde_json::from_value(payload)?;
        Ok(Page {
            items: fetched.wallets,
            has_next: fetched.has_next,
        })
    }
}
