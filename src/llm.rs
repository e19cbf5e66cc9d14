//! Chat-completions language model client
//!
//! The agent asks a model for two things: pulling an address out of free
//! text and rewriting a provider document into a markdown report. Both go
//! through [`LanguageModel::generate`], so tests can swap in a canned model.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};

/// Text generation seam between the actions and the model provider.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete `context`, cutting generation at any of the `stop` strings.
    async fn generate(&self, context: &str, stop: &[&str]) -> Result<String>;
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatCompletionsModel {
    client: Client,
    endpoint: Url,
    model: String,
}

impl ChatCompletionsModel {
    pub fn new(config: &Config) -> Result<Self> {
        let endpoint = completions_endpoint(&config.llm.api_url)?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(key) = &config.llm.api_key {
            let mut value =
                header::HeaderValue::from_str(&format!("Bearer {}", key.expose_secret()))
                    .map_err(|e| Error::Config(format!("invalid LLM api key: {e}")))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            model: config.llm.model.clone(),
        })
    }
}

#[async_trait]
impl LanguageModel for ChatCompletionsModel {
    async fn generate(&self, context: &str, stop: &[&str]) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatRequestMessage {
                role: "user",
                content: context,
            }],
            stop,
        };

        tracing::debug!(model = %self.model, endpoint = %self.endpoint, "requesting completion");
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Llm(format!(
                "completion request failed with status {status}: {body}"
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Llm("completion response carried no choices".to_string()))?;
        Ok(choice.message.content.trim().to_string())
    }
}

/// The configured API url may or may not carry a trailing slash; `Url::join`
/// drops the last path segment without one.
fn completions_endpoint(api_url: &str) -> Result<Url> {
    let mut base = api_url.trim_end_matches('/').to_string();
    base.push('/');
    let base = Url::parse(&base).map_err(|e| Error::Config(format!("invalid LLM api url: {e}")))?;
    base.join("chat/completions")
        .map_err(|e| Error::Config(format!("invalid LLM api url: {e}")))
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatRequestMessage<'a>>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    stop: &'a [&'a str],
}

#[derive(Debug, Serialize)]
struct ChatRequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}
