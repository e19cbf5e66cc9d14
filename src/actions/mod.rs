//! Chat actions exposed to the agent runtime
//!
//! Each action receives a raw chat message, extracts an address with the
//! language model, queries market data, and delivers a rendered report
//! through the host callback. Handler failures never surface to the host as
//! errors; the user gets the fallback reply instead.

pub mod token;
pub mod wallet;

use std::sync::Arc;

use async_trait::async_trait;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::source::{DexScreenerSource, TokenDataSource, TrackerSource};
use crate::api::{DexScreenerClient, TrackerClient};
use crate::config::Config;
use crate::error::Result;
use crate::llm::{ChatCompletionsModel, LanguageModel};

pub use token::AnalyzeTokenAction;
pub use wallet::AnalyzeWalletAction;

/// Reply sent when a handler fails for any reason.
pub const FALLBACK_TEXT: &str =
    "An error occurred while processing your request. Please try again later.";

/// One inbound chat message, as the host runtime hands it over.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ChatMessage {
    /// Free-form user text.
    pub text: String,
    /// Where the message came from (channel, client id).
    pub source: Option<String>,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: None,
        }
    }
}

/// One outbound reply delivered through the host callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub text: String,
    pub action: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// One turn of a scripted exchange used to teach the host model when an
/// action applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionExample {
    pub user: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl ActionExample {
    pub fn user(text: &str) -> Self {
        Self {
            user: "{{user1}}".to_string(),
            text: text.to_string(),
            action: None,
        }
    }

    pub fn agent(action: &str) -> Self {
        Self {
            user: "{{user2}}".to_string(),
            text: String::new(),
            action: Some(action.to_string()),
        }
    }
}

/// Callback the host supplies for delivering replies.
#[async_trait]
pub trait ResponseSink: Send + Sync {
    async fn deliver(&self, response: ActionResponse) -> Result<()>;
}

/// A chat action the plugin contributes to the host runtime.
#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;
    fn similes(&self) -> &'static [&'static str];
    fn description(&self) -> &'static str;
    fn examples(&self) -> Vec<Vec<ActionExample>>;

    /// JSON schema of the message payload the action accepts.
    fn input_schema(&self) -> Value {
        serde_json::to_value(schema_for!(ChatMessage)).unwrap_or(Value::Null)
    }

    /// Whether the action can run at all. Checked before dispatch.
    fn validate(&self, message: &ChatMessage) -> bool;

    /// Handle one message end to end, delivering every reply through `sink`,
    /// including the fallback reply on failure.
    async fn handle(&self, message: &ChatMessage, sink: &dyn ResponseSink) -> Result<()>;
}

/// Run one action against one message, skipping actions that report
/// themselves unavailable.
pub async fn dispatch(
    action: &dyn Action,
    message: &ChatMessage,
    sink: &dyn ResponseSink,
) -> Result<()> {
    let run_id = uuid::Uuid::new_v4();
    if !action.validate(message) {
        tracing::warn!(action = action.name(), %run_id, "action unavailable, skipping");
        return Ok(());
    }
    tracing::info!(action = action.name(), %run_id, "action dispatched");
    action.handle(message, sink).await
}

/// The surface handed to the host runtime.
pub struct Plugin {
    pub name: &'static str,
    pub description: &'static str,
    pub actions: Vec<Box<dyn Action>>,
}

impl Plugin {
    /// Look an action up by its name or one of its similes.
    pub fn action(&self, name: &str) -> Option<&dyn Action> {
        self.actions
            .iter()
            .find(|action| action.name() == name || action.similes().contains(&name))
            .map(|action| action.as_ref())
    }
}

/// Build the plugin with both analysis actions wired to live clients.
pub fn plugin(config: &Config) -> Result<Plugin> {
    let model: Arc<dyn LanguageModel> = Arc::new(ChatCompletionsModel::new(config)?);
    let tracker = TrackerClient::new(config)?;
    let dexscreener = DexScreenerClient::new(config)?;

    let sources: Vec<Box<dyn TokenDataSource>> = vec![
        Box::new(DexScreenerSource::new(dexscreener)),
        Box::new(TrackerSource::new(tracker.clone())),
    ];

    Ok(Plugin {
        name: "solana-insight",
        description: "Solana token and wallet analysis actions",
        actions: vec![
            Box::new(AnalyzeTokenAction::new(model.clone(), sources)),
            Box::new(AnalyzeWalletAction::new(model, Arc::new(tracker), config)),
        ],
    })
}

/// Ask the model for the address named in a message. Quotes and whitespace
/// are stripped; an empty extraction is a `None`.
pub(crate) async fn extract_address(
    model: &dyn LanguageModel,
    prompt: String,
) -> Result<Option<String>> {
    let raw = model.generate(&prompt, &["\n"]).await?;
    let address = raw.trim().replace('"', "");
    Ok((!address.is_empty()).then_some(address))
}
