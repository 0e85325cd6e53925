//! Bridge - primary attempt, fallback, envelope
//!
//! The primary automation runs first. Its failure is logged and noted but
//! never reported as an error; only a failing fallback makes the run fail.
//! Once an outcome is decided the shared browser session is closed.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::automation::{Automation, DirectNavigation, LlmActor};
use crate::browser::{BrowserDriver, BrowserExecutor};
use crate::core::{Config, Result};
use crate::llm::OllamaClient;

/// Message used when the fallback error renders as nothing
const FALLBACK_FAILED: &str = "fallback automation failed";

/// The JSON object printed to stdout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
    /// Suppressed primary error, set only when the fallback rescued the run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Envelope {
    /// Successful envelope
    pub fn success(result: serde_json::Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
            note: None,
        }
    }

    /// Failed envelope; an empty message is replaced so `error` is never blank
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            FALLBACK_FAILED.to_string()
        } else {
            message
        };

        Self {
            success: false,
            result: None,
            error: Some(message),
            note: None,
        }
    }

    /// Attach a diagnostic note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Serialize to a single line of JSON
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Which attempt produced the envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPath {
    Primary,
    Fallback,
    Failed,
}

/// Envelope plus the path that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub envelope: Envelope,
    pub path: AttemptPath,
}

impl Outcome {
    /// Outcome for a run that could not even be set up
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            envelope: Envelope::failure(message),
            path: AttemptPath::Failed,
        }
    }

    /// Process exit code: 0 for any reported success, 1 otherwise
    pub fn exit_code(&self) -> u8 {
        match self.path {
            AttemptPath::Primary | AttemptPath::Fallback => 0,
            AttemptPath::Failed => 1,
        }
    }
}

/// Runs a task through the primary automation, then the fallback if needed
pub struct Bridge {
    primary: Box<dyn Automation>,
    fallback: Box<dyn Automation>,
    browser: Option<Arc<dyn BrowserDriver>>,
}

impl Bridge {
    /// Create a bridge from two automations
    pub fn new(primary: Box<dyn Automation>, fallback: Box<dyn Automation>) -> Self {
        Self {
            primary,
            fallback,
            browser: None,
        }
    }

    /// Session to close after every run
    pub fn with_browser(mut self, browser: Arc<dyn BrowserDriver>) -> Self {
        self.browser = Some(browser);
        self
    }

    /// Wire the Ollama-driven act and the direct navigation to one
    /// agent-browser session
    pub fn from_config(config: &Config) -> Result<Self> {
        let browser: Arc<dyn BrowserDriver> =
            Arc::new(BrowserExecutor::from_config(&config.browser));
        let llm = OllamaClient::from_config(config)?;

        let primary = LlmActor::from_config(llm, Arc::clone(&browser), config);
        let fallback = DirectNavigation::from_config(Arc::clone(&browser), &config.browser);

        Ok(Self::new(Box::new(primary), Box::new(fallback)).with_browser(browser))
    }

    /// Run one task to an outcome, then release the browser session
    pub async fn run(&self, task: &str) -> Outcome {
        let outcome = self.attempt(task).await;
        self.teardown().await;
        outcome
    }

    /// Best-effort close; a failure here never changes the outcome
    async fn teardown(&self) {
        let Some(browser) = &self.browser else {
            return;
        };
        if let Err(e) = browser.close().await {
            tracing::warn!(error = %e, "failed to close browser session");
        }
    }

    async fn attempt(&self, task: &str) -> Outcome {
        tracing::info!(task, primary = self.primary.name(), "running task");

        let primary_err = match self.primary.run(task).await {
            Ok(result) => {
                return Outcome {
                    envelope: Envelope::success(result),
                    path: AttemptPath::Primary,
                };
            }
            Err(e) => e,
        };

        tracing::warn!(
            automation = self.primary.name(),
            error = %primary_err,
            "primary automation failed, falling back"
        );

        match self.fallback.run(task).await {
            Ok(result) => Outcome {
                envelope: Envelope::success(result)
                    .with_note(format!("primary automation failed: {}", primary_err)),
                path: AttemptPath::Fallback,
            },
            Err(e) => {
                tracing::error!(
                    automation = self.fallback.name(),
                    error = %e,
                    "fallback automation failed"
                );
                Outcome::failed(e.to_string())
            }
        }
    }
}
