//! Token analysis action
//!
//! Extracts a token address from the message, asks the data sources in
//! priority order, and has the model rewrite the winning document as a
//! markdown report.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::actions::{
    extract_address, Action, ActionExample, ActionResponse, ChatMessage, ResponseSink,
    FALLBACK_TEXT,
};
use crate::analysis::source::{first_insight, TokenDataSource};
use crate::error::Result;
use crate::llm::LanguageModel;

const RESPONSE_ACTION: &str = "ANALYZE_TOKEN_RESPONSE";
const DEFAULT_SOURCE: &str = "token analysis";

const USAGE_HINT: &str = "Unable to extract the token address. Please try using one of the following formats:\n- Analyze this token {{tokenAddress}}\n- Get me information on this token {{tokenAddress}}\n- What do you know about this token {{tokenAddress}}?\n- Do a quick research on this token {{tokenAddress}}";

pub struct AnalyzeTokenAction {
    model: Arc<dyn LanguageModel>,
    sources: Vec<Box<dyn TokenDataSource>>,
}

impl AnalyzeTokenAction {
    pub fn new(model: Arc<dyn LanguageModel>, sources: Vec<Box<dyn TokenDataSource>>) -> Self {
        Self { model, sources }
    }

    fn respond(&self, message: &ChatMessage, text: String, data: Option<Value>) -> ActionResponse {
        ActionResponse {
            text,
            action: RESPONSE_ACTION.to_string(),
            source: message
                .source
                .clone()
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            data,
        }
    }

    async fn run(&self, message: &ChatMessage, sink: &dyn ResponseSink) -> Result<()> {
        let prompt = format!(
            "Extract the token address from the user's message here: {}. Only return the token address as a string.",
            message.text
        );
        let Some(address) = extract_address(self.model.as_ref(), prompt).await? else {
            sink.deliver(self.respond(message, USAGE_HINT.to_string(), None))
                .await?;
            return Ok(());
        };

        let Some(insight) = first_insight(&self.sources, &address).await? else {
            let text = format!(
                "Unable to retrieve information for the address {address}. Please try again later."
            );
            sink.deliver(self.respond(message, text, None)).await?;
            return Ok(());
        };

        let report = self.model.generate(&insight.report_context, &[]).await?;
        let text = match &insight.response_prefix {
            Some(prefix) => format!("{prefix} \n{report}."),
            None => report,
        };
        sink.deliver(self.respond(message, text, Some(insight.data)))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Action for AnalyzeTokenAction {
    fn name(&self) -> &'static str {
        "ANALYZE_TOKEN"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["GET_TOKEN_INFO", "GET_CURRENT_TOKEN"]
    }

    fn description(&self) -> &'static str {
        "this action is used to analyze a token"
    }

    fn examples(&self) -> Vec<Vec<ActionExample>> {
        [
            "Analyze this token {{tokenAddress}}",
            "Get me information on this token {{tokenAddress}}",
            "what do you know about this token {{tokenAddress}}?",
            "Do a quick research on this token {{tokenAddress}}",
        ]
        .iter()
        .map(|text| vec![ActionExample::user(text), ActionExample::agent(self.name())])
        .collect()
    }

    fn validate(&self, _message: &ChatMessage) -> bool {
        true
    }

    async fn handle(&self, message: &ChatMessage, sink: &dyn ResponseSink) -> Result<()> {
        if let Err(err) = self.run(message, sink).await {
            tracing::error!(error = %err, "token analysis failed");
            sink.deliver(self.respond(message, FALLBACK_TEXT.to_string(), None))
                .await?;
        }
        Ok(())
    }
}
