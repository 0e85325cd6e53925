//! Act loop state management
//!
//! Tracks the steps taken by the primary automation and decides what the act
//! reports once the loop ends.

use serde::{Deserialize, Serialize};

use crate::core::{BridgeError, Result, ToolCall, ToolResult};

/// State of the act loop
#[derive(Debug, Clone)]
pub struct ActState {
    /// Current turn number (0-indexed)
    pub turn: usize,
    /// Maximum allowed turns
    pub max_turns: usize,
    /// Browser actions performed so far
    pub steps: Vec<ActStep>,
    /// Closing message once the model stops calling tools
    pub final_message: Option<String>,
    /// Tokens the model reported across all turns
    pub tokens: u32,
}

impl ActState {
    /// Create a new state with the given max turns
    pub fn new(max_turns: usize) -> Self {
        Self {
            turn: 0,
            max_turns,
            steps: Vec::new(),
            final_message: None,
            tokens: 0,
        }
    }

    /// Check if the loop should continue
    pub fn should_continue(&self) -> bool {
        self.turn < self.max_turns && self.final_message.is_none()
    }

    /// Record a successful browser action
    pub fn record(&mut self, step: ActStep) {
        self.steps.push(step);
    }

    /// Mark the act as finished with the model's closing text
    pub fn finish(&mut self, message: impl Into<String>) {
        self.final_message = Some(message.into());
    }

    /// Add one turn's token count
    pub fn add_tokens(&mut self, tokens: u32) {
        self.tokens = self.tokens.saturating_add(tokens);
    }

    /// Increment the turn counter
    pub fn next_turn(&mut self) {
        self.turn += 1;
    }

    /// Format the actions taken so far for the next prompt
    pub fn format_steps(&self) -> String {
        if self.steps.is_empty() {
            return String::new();
        }

        let mut output = String::from("\n\n## Actions already performed:\n");
        for (i, step) in self.steps.iter().enumerate() {
            output.push_str(&format!("{}. {} -> {}\n", i + 1, step.tool, step.output));
        }
        output
    }

    /// Turn the finished loop into the act result.
    ///
    /// An act that never touched the browser, or that ran out of turns while
    /// the model still wanted to act, is a failure.
    pub fn into_result(self) -> Result<serde_json::Value> {
        let Some(message) = self.final_message else {
            return Err(BridgeError::act(format!(
                "step limit of {} reached before the model finished",
                self.max_turns
            )));
        };

        if self.steps.is_empty() {
            let detail = if message.trim().is_empty() {
                String::new()
            } else {
                format!(": {}", message.trim())
            };
            return Err(BridgeError::act(format!(
                "model did not choose any browser action{}",
                detail
            )));
        }

        Ok(serde_json::json!({
            "success": true,
            "message": message,
            "actions": self.steps,
        }))
    }
}

/// One browser action performed during an act
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActStep {
    /// Tool that was invoked
    pub tool: String,
    /// Arguments the model supplied
    pub arguments: serde_json::Value,
    /// What the tool reported
    pub output: String,
}

impl ActStep {
    /// Build a step from the call and its result
    pub fn new(call: &ToolCall, result: &ToolResult) -> Self {
        Self {
            tool: result.tool_name.clone(),
            arguments: call.arguments.clone(),
            output: result.output.clone(),
        }
    }
}
