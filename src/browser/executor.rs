//! Browser executor - wraps agent-browser CLI
//!
//! Every command runs as a child process bounded by the configured timeout.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::browser::snapshot::Snapshot;
use crate::browser::BrowserDriver;
use crate::core::config::BrowserConfig;
use crate::core::{BridgeError, Result};

/// Executor for browser automation via agent-browser CLI
pub struct BrowserExecutor {
    /// Session name for isolation
    session_name: String,
    /// Whether to run in headed mode
    headed: bool,
    /// Upper bound for one command
    timeout: Duration,
}

impl BrowserExecutor {
    /// Create a new browser executor
    pub fn new(session_name: impl Into<String>) -> Self {
        Self {
            session_name: session_name.into(),
            headed: false,
            timeout: Duration::from_secs(60),
        }
    }

    /// Create an executor from the browser section of the config
    pub fn from_config(config: &BrowserConfig) -> Self {
        let mut executor = Self::new(&config.session_name);
        executor.set_headed(config.headed);
        executor.set_timeout(Duration::from_millis(config.timeout_ms));
        executor
    }

    /// Set headed mode
    pub fn set_headed(&mut self, headed: bool) {
        self.headed = headed;
    }

    /// Set the per-command timeout
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Check if agent-browser is installed
    pub async fn is_available() -> bool {
        Command::new("agent-browser")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Build the full argument list for a command
    fn command_args<'a>(&'a self, args: &[&'a str]) -> Vec<&'a str> {
        let mut full = vec!["--session", self.session_name.as_str()];
        if self.headed {
            full.push("--headed");
        }
        full.extend_from_slice(args);
        full
    }

    /// Run an agent-browser command
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("agent-browser");
        cmd.args(self.command_args(args));
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        tracing::debug!(session = %self.session_name, ?args, "agent-browser");

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| {
                BridgeError::browser(format!(
                    "agent-browser {} timed out after {} ms",
                    args.first().copied().unwrap_or_default(),
                    self.timeout.as_millis()
                ))
            })?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    BridgeError::AgentBrowserNotFound
                } else {
                    BridgeError::browser(format!("Failed to run agent-browser: {}", e))
                }
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(BridgeError::browser(format!(
                "agent-browser command failed: {}",
                stderr.trim()
            )))
        }
    }
}

#[async_trait]
impl BrowserDriver for BrowserExecutor {
    async fn open(&self, url: &str) -> Result<()> {
        self.run_command(&["open", url]).await?;

        // Network idle is best-effort; some pages never settle
        if let Err(e) = self.run_command(&["wait", "--load", "networkidle"]).await {
            tracing::debug!(error = %e, "network idle wait skipped");
        }
        Ok(())
    }

    async fn click(&self, target: &str) -> Result<()> {
        self.run_command(&["click", target]).await.map(|_| ())
    }

    async fn fill(&self, target: &str, text: &str) -> Result<()> {
        self.run_command(&["fill", target, text]).await.map(|_| ())
    }

    async fn press(&self, key: &str) -> Result<()> {
        self.run_command(&["press", key]).await.map(|_| ())
    }

    async fn get_text(&self, target: &str) -> Result<String> {
        self.run_command(&["get", "text", target])
            .await
            .map(|s| s.trim().to_string())
    }

    async fn snapshot(&self) -> Result<Snapshot> {
        let output = self.run_command(&["snapshot", "-i", "--json"]).await?;
        Ok(serde_json::from_str(&output)?)
    }

    async fn close(&self) -> Result<()> {
        self.run_command(&["close"]).await.map(|_| ())
    }
}

impl Default for BrowserExecutor {
    fn default() -> Self {
        Self::new("act-bridge")
    }
}
