//! In-memory driver for unit tests

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use crate::browser::{BrowserDriver, Snapshot};
use crate::core::{BridgeError, Result};

/// Records every call and answers from canned data
#[derive(Default)]
pub struct RecordingDriver {
    pub calls: Mutex<Vec<String>>,
    pub texts: HashMap<String, String>,
    pub failing: HashSet<&'static str>,
    pub open_delay: Option<Duration>,
    pub snapshot: Snapshot,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, target: &str, text: &str) -> Self {
        self.texts.insert(target.to_string(), text.to_string());
        self
    }

    pub fn failing_on(mut self, op: &'static str) -> Self {
        self.failing.insert(op);
        self
    }

    pub fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, op: &'static str, detail: String) -> Result<()> {
        self.calls.lock().unwrap().push(format!("{} {}", op, detail).trim().to_string());
        if self.failing.contains(op) {
            return Err(BridgeError::browser(format!("{} failed", op)));
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserDriver for RecordingDriver {
    async fn open(&self, url: &str) -> Result<()> {
        if let Some(delay) = self.open_delay {
            tokio::time::sleep(delay).await;
        }
        self.record("open", url.to_string())
    }

    async fn click(&self, target: &str) -> Result<()> {
        self.record("click", target.to_string())
    }

    async fn fill(&self, target: &str, text: &str) -> Result<()> {
        self.record("fill", format!("{} {}", target, text))
    }

    async fn press(&self, key: &str) -> Result<()> {
        self.record("press", key.to_string())
    }

    async fn get_text(&self, target: &str) -> Result<String> {
        self.record("get_text", target.to_string())?;
        self.texts
            .get(target)
            .cloned()
            .ok_or_else(|| BridgeError::browser(format!("no element matches {}", target)))
    }

    async fn snapshot(&self) -> Result<Snapshot> {
        self.record("snapshot", String::new())?;
        Ok(self.snapshot.clone())
    }

    async fn close(&self) -> Result<()> {
        self.record("close", String::new())
    }
}
