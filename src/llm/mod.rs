//! LLM module - Language Model integrations
//!
//! Ollama is the backend that drives the primary automation.

pub mod ollama;
pub mod traits;

pub use ollama::OllamaClient;
pub use traits::{GenerateOptions, LLMProvider, LLMResponse, TokenUsage};
