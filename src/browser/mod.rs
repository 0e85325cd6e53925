//! Browser automation module
//!
//! `BrowserDriver` is the seam both automations drive the browser through.
//! `BrowserExecutor` implements it on top of the agent-browser CLI.

mod executor;
#[cfg(test)]
pub(crate) mod mock;
mod snapshot;

use async_trait::async_trait;

use crate::core::Result;

pub use executor::BrowserExecutor;
pub use snapshot::{Element, Snapshot, SnapshotData};

/// Operations the automations need from a browser session.
///
/// `target` arguments accept either a CSS selector (`h1`) or an element ref
/// taken from a snapshot (`@e3`).
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigate to a URL and wait for the load to settle
    async fn open(&self, url: &str) -> Result<()>;

    /// Click an element
    async fn click(&self, target: &str) -> Result<()>;

    /// Type text into an input
    async fn fill(&self, target: &str, text: &str) -> Result<()>;

    /// Press a key (Enter, Tab, ...)
    async fn press(&self, key: &str) -> Result<()>;

    /// Read the text content of an element
    async fn get_text(&self, target: &str) -> Result<String>;

    /// Accessibility snapshot of the current page
    async fn snapshot(&self) -> Result<Snapshot>;

    /// Close the session
    async fn close(&self) -> Result<()>;
}
