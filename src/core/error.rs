//! Custom error types for act-bridge
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for act-bridge operations
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Ollama connection or API errors
    #[error("Ollama error: {0}")]
    Ollama(String),

    /// Browser automation errors
    #[error("Browser error: {0}")]
    Browser(String),

    /// The AI-driven act could not complete the task
    #[error("Act failed: {0}")]
    Act(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A bounded browser operation ran out of time
    #[error("Timed out after {ms} ms loading {url}")]
    Timeout { url: String, ms: u64 },

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Agent-browser not installed
    #[error("agent-browser not found. Install: npm i -g agent-browser && agent-browser install")]
    AgentBrowserNotFound,

    /// Model not available
    #[error("Model '{0}' not available in Ollama. Run: ollama pull {0}")]
    ModelNotFound(String),
}

/// Convenience Result type for act-bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

impl BridgeError {
    /// Create an Ollama error
    pub fn ollama(msg: impl Into<String>) -> Self {
        Self::Ollama(msg.into())
    }

    /// Create a browser error
    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }

    /// Create an act error
    pub fn act(msg: impl Into<String>) -> Self {
        Self::Act(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(url: impl Into<String>, ms: u64) -> Self {
        Self::Timeout {
            url: url.into(),
            ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message() {
        let err = BridgeError::timeout("https://example.com", 30000);
        assert_eq!(
            err.to_string(),
            "Timed out after 30000 ms loading https://example.com"
        );
    }

    #[test]
    fn test_model_not_found_message() {
        let err = BridgeError::ModelNotFound("qwen3:8b".to_string());
        assert!(err.to_string().contains("ollama pull qwen3:8b"));
    }
}
