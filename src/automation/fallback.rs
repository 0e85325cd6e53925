//! Fallback automation: direct navigation
//!
//! Opens the first URL found in the task (or the configured default), waits
//! for it under a fixed timeout, and reports the page heading.

use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use url::Url;

use crate::automation::Automation;
use crate::browser::BrowserDriver;
use crate::core::config::BrowserConfig;
use crate::core::{BridgeError, Result};

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s"'<>]+"#).expect("URL pattern is valid"));

/// First URL-like substring of the task, exactly as written.
///
/// Only the first match counts, and trailing punctuation is kept. A task such
/// as "see https://a.io, then https://b.io" targets `https://a.io,`.
pub fn extract_url(task: &str) -> Option<&str> {
    URL_PATTERN.find(task).map(|m| m.as_str())
}

/// URL the fallback will open for `task`
pub fn target_url<'a>(task: &'a str, default_url: &'a str) -> &'a str {
    extract_url(task).unwrap_or(default_url)
}

/// Deterministic navigation used when the act fails
pub struct DirectNavigation {
    browser: Arc<dyn BrowserDriver>,
    default_url: String,
    load_timeout_ms: u64,
    heading_selector: String,
}

impl DirectNavigation {
    /// Create a fallback with explicit settings
    pub fn new(
        browser: Arc<dyn BrowserDriver>,
        default_url: impl Into<String>,
        load_timeout_ms: u64,
    ) -> Self {
        Self {
            browser,
            default_url: default_url.into(),
            load_timeout_ms,
            heading_selector: "h1".to_string(),
        }
    }

    /// Create a fallback from the browser section of the config
    pub fn from_config(browser: Arc<dyn BrowserDriver>, config: &BrowserConfig) -> Self {
        let mut fallback = Self::new(browser, &config.fallback_url, config.fallback_timeout_ms);
        fallback.heading_selector = config.heading_selector.clone();
        fallback
    }

    /// The default target when a task has no URL
    pub fn default_url(&self) -> &str {
        &self.default_url
    }

    async fn heading(&self) -> Option<String> {
        match self.browser.get_text(&self.heading_selector).await {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(selector = %self.heading_selector, error = %e, "no heading");
                None
            }
        }
    }
}

#[async_trait]
impl Automation for DirectNavigation {
    fn name(&self) -> &str {
        "direct-navigation"
    }

    async fn run(&self, task: &str) -> Result<serde_json::Value> {
        let target = target_url(task, &self.default_url);

        Url::parse(target)
            .map_err(|e| BridgeError::browser(format!("Invalid URL '{}': {}", target, e)))?;

        tracing::info!(url = target, timeout_ms = self.load_timeout_ms, "fallback navigation");

        let load_timeout = Duration::from_millis(self.load_timeout_ms);
        tokio::time::timeout(load_timeout, self.browser.open(target))
            .await
            .map_err(|_| BridgeError::timeout(target, self.load_timeout_ms))??;

        let text = self
            .heading()
            .await
            .unwrap_or_else(|| format!("Page loaded: {} (no heading found)", target));

        Ok(serde_json::Value::String(text))
    }
}
