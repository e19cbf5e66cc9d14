//! Error types for the Solana insight agent

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Upstream answered 404. Some endpoints attach a fallback document to
    /// the 404 body; callers that can use it receive it via `payload`.
    #[error("{label}")]
    NotFound {
        label: String,
        payload: Option<serde_json::Value>,
    },

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// 404 with no usable body.
    pub fn not_found(label: impl Into<String>) -> Self {
        Error::NotFound {
            label: label.into(),
            payload: None,
        }
    }

    /// 404 that carried a fallback document.
    pub fn not_found_with_payload(label: impl Into<String>, payload: serde_json::Value) -> Self {
        Error::NotFound {
            label: label.into(),
            payload: Some(payload),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_displays_its_label() {
        let err = Error::not_found("Token not found");
        assert_eq!(err.to_string(), "Token not found");
    }

    #[test]
    fn payload_is_kept_on_degraded_not_found() {
        let err = Error::not_found_with_payload(
            "Failed to fetch top wallets list",
            serde_json::json!({"wallets": []}),
        );
        match err {
            Error::NotFound {
                payload: Some(body),
                ..
            } => assert!(body.get("wallets").is_some()),
            other => panic!("expected NotFound with payload, got {other:?}"),
        }
    }
}
