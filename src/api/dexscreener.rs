//! DexScreener public API client
//!
//! No authentication; failures propagate to the caller as-is. A token the
//! service does not know still answers 200 with `pairs: null`.

use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::api::types::DexScreenerResponse;
use crate::config::Config;
use crate::error::{Error, Result};

#[derive(Clone)]
pub struct DexScreenerClient {
    client: Client,
    base_url: Url,
}

impl DexScreenerClient {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.dexscreener.base_url)
            .map_err(|e| Error::Config(format!("invalid dexscreener base url: {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Pair listing for a token address.
    pub async fn token_pairs(&self, address: &str) -> Result<DexScreenerResponse> {
        let url = self
            .base_url
            .join(&format!("/latest/dex/tokens/{address}"))
            .map_err(|e| Error::Config(format!("invalid token address {address}: {e}")))?;
        tracing::debug!(%url, "dexscreener request");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_the_pair_lookup_url() {
        let client = DexScreenerClient::new(&Config::default()).unwrap();
        let url = client.base_url.join("/latest/dex/tokens/abc").unwrap();
        assert_eq!(url.as_str(), "https://api.dexscreener.com/latest/dex/tokens/abc");
    }
}
