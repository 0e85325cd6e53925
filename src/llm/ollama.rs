//! Ollama client implementation
//!
//! Async HTTP client for the Ollama chat API with tool calling.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::{BridgeError, Config, Message, Result, ToolCall, ToolDefinition};
use crate::llm::traits::{GenerateOptions, LLMProvider, LLMResponse, TokenUsage};

/// Ollama API client
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

/// Ollama chat request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
    stream: bool,
}

/// Ollama message format
#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OllamaToolCall>>,
}

/// Ollama tool call format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OllamaToolCall {
    function: OllamaFunction,
}

/// Ollama function in tool call
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OllamaFunction {
    name: String,
    arguments: serde_json::Value,
}

/// Ollama generation options
#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Ollama chat response (non-streaming)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: OllamaMessage,
    model: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

/// Ollama models list response
#[derive(Debug, Deserialize)]
struct ModelsResponse {
    models: Vec<ModelInfo>,
}

/// Model information
#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}

impl OllamaClient {
    /// Create a new Ollama client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::build(config.ollama_url(), config.ollama.timeout_secs)
    }

    /// Create a client with custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::build(base_url.into(), 120)
    }

    fn build(base_url: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Convert internal Message to Ollama format
    fn to_ollama_message(msg: &Message) -> OllamaMessage {
        OllamaMessage {
            role: msg.role.clone(),
            content: msg.content.clone(),
            tool_calls: None,
        }
    }

    /// Convert Ollama response to LLMResponse
    fn to_llm_response(response: ChatResponse) -> LLMResponse {
        let tool_calls = response
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        let usage = match (response.prompt_eval_count, response.eval_count) {
            (Some(prompt), Some(completion)) => Some(TokenUsage {
                prompt_tokens: prompt,
                completion_tokens: completion,
                total_tokens: prompt + completion,
            }),
            _ => None,
        };

        LLMResponse {
            content: response.message.content,
            tool_calls,
            usage,
            model: response.model,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> BridgeError {
        if e.is_connect() {
            BridgeError::ollama(format!(
                "Cannot connect to Ollama at {}. Is it running?",
                self.base_url
            ))
        } else {
            BridgeError::from(e)
        }
    }

    async fn check_status(response: Response, model: &str) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();

        if status.as_u16() == 404 && error_text.contains("not found") {
            return Err(BridgeError::ModelNotFound(model.to_string()));
        }

        Err(BridgeError::ollama(format!(
            "Ollama API error ({}): {}",
            status, error_text
        )))
    }
}

#[async_trait]
impl LLMProvider for OllamaClient {
    async fn chat_with_tools(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
        options: Option<GenerateOptions>,
    ) -> Result<LLMResponse> {
        let ollama_messages: Vec<OllamaMessage> =
            messages.iter().map(Self::to_ollama_message).collect();

        let ollama_options = options.map(|opts| OllamaOptions {
            temperature: opts.temperature,
        });

        let request = ChatRequest {
            model,
            messages: ollama_messages,
            tools: (!tools.is_empty()).then_some(tools),
            options: ollama_options,
            stream: false,
        };

        tracing::debug!(model, tools = tools.len(), "sending chat request");

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let response = Self::check_status(response, model).await?;
        let response_text = response.text().await?;
        tracing::trace!(body = %response_text, "chat response");

        let chat_response: ChatResponse = serde_json::from_str(&response_text)
            .map_err(|e| BridgeError::ollama(format!("Failed to parse response: {}", e)))?;

        Ok(Self::to_llm_response(chat_response))
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(BridgeError::ollama("Failed to list models"));
        }

        let models_response: ModelsResponse = response.json().await?;
        Ok(models_response.models.into_iter().map(|m| m.name).collect())
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
