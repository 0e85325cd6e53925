//! Automation module - the two ways a task gets carried out
//!
//! `LlmActor` is the primary, model-driven path. `DirectNavigation` is the
//! deterministic fallback.

pub mod act_state;
pub mod actor;
pub mod fallback;

use async_trait::async_trait;

use crate::core::Result;

pub use act_state::{ActState, ActStep};
pub use actor::LlmActor;
pub use fallback::{extract_url, target_url, DirectNavigation};

/// Something that can attempt a natural-language task
#[async_trait]
pub trait Automation: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Attempt the task and return its payload
    async fn run(&self, task: &str) -> Result<serde_json::Value>;
}
