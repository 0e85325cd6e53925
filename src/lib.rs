//! act-bridge - natural-language browser tasks for calling processes
//!
//! Takes a task string, tries an AI-driven browser act through Ollama and
//! agent-browser, falls back to direct navigation when that fails, and
//! reports the outcome as a single JSON envelope.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: Ollama client behind the `LLMProvider` trait
//! - **Browser**: `BrowserDriver` seam and the agent-browser executor
//! - **Tools**: Browser tool definitions and dispatch
//! - **Automation**: The primary act and the fallback navigation
//! - **Bridge**: Try/fallback control flow and the envelope
//! - **CLI**: Argument parsing
//!
//! # Usage
//!
//! ```rust,no_run
//! use act_bridge::{Bridge, Config};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load().unwrap_or_default();
//!     let bridge = Bridge::from_config(&config).unwrap();
//!
//!     let outcome = bridge.run("Go to https://example.com and read the heading").await;
//!     println!("{}", outcome.envelope.to_json_line().unwrap());
//! }
//! ```

pub mod automation;
pub mod bridge;
pub mod browser;
pub mod cli;
pub mod core;
pub mod llm;
pub mod logging;
pub mod tools;

// Re-export commonly used items
pub use automation::Automation;
pub use bridge::{AttemptPath, Bridge, Envelope, Outcome};
pub use crate::core::{BridgeError, Config, Result};
