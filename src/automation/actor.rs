//! Primary automation: an AI-driven browser act
//!
//! The model sees the task and the current page elements, picks browser tools,
//! and the loop runs them until the model answers without tool calls.

use async_trait::async_trait;
use std::sync::Arc;

use crate::automation::act_state::{ActState, ActStep};
use crate::automation::Automation;
use crate::browser::BrowserDriver;
use crate::core::{BridgeError, Config, Message, Result};
use crate::llm::{GenerateOptions, LLMProvider};
use crate::tools::ToolRegistry;

const SYSTEM_PROMPT: &str = r#"You are a browser automation agent.
Carry out the user's task by calling browser tools.

## Browser Tools
- `browser_url`: Navigate to a URL. Args: {"url": "https://..."}
- `browser_click`: Click an element. Args: {"ref": "e8"}
- `browser_fill`: Type text into an element. Args: {"ref": "e5", "text": "search query"}
- `browser_press`: Press a key. Args: {"key": "Enter"}
- `browser_get_text`: Read text from an element or selector. Args: {"ref": "h1"}

## Rules
- Use EXACT element refs from the page elements list.
- Each turn shows the LATEST page elements. Read them before choosing the next action.
- When the task is complete, reply with a short summary and NO tool calls."#;

/// LLM-driven act over a browser session
pub struct LlmActor<P: LLMProvider> {
    llm: P,
    model: String,
    temperature: f32,
    max_steps: usize,
    browser: Arc<dyn BrowserDriver>,
    tools: ToolRegistry,
}

impl<P: LLMProvider> LlmActor<P> {
    /// Create an actor with explicit settings
    pub fn new(
        llm: P,
        model: impl Into<String>,
        max_steps: usize,
        browser: Arc<dyn BrowserDriver>,
    ) -> Self {
        Self {
            llm,
            model: model.into(),
            temperature: 0.1,
            max_steps,
            browser,
            tools: ToolRegistry::new(),
        }
    }

    /// Create an actor from configuration
    pub fn from_config(llm: P, browser: Arc<dyn BrowserDriver>, config: &Config) -> Self {
        let mut actor = Self::new(llm, &config.model.name, config.act.max_steps, browser);
        actor.temperature = config.model.temperature;
        actor
    }

    /// Describe the current page, or say there is none yet
    async fn page_context(&self) -> String {
        match self.browser.snapshot().await {
            Ok(snapshot) => snapshot.format_for_prompt(),
            Err(e) => {
                tracing::debug!(error = %e, "no snapshot available");
                "No page is open yet.".to_string()
            }
        }
    }

    fn build_user_prompt(task: &str, page: &str, state: &ActState) -> String {
        format!("TASK: {}\n\n{}{}", task, page, state.format_steps())
    }
}

#[async_trait]
impl<P: LLMProvider> Automation for LlmActor<P> {
    fn name(&self) -> &str {
        "llm-act"
    }

    async fn run(&self, task: &str) -> Result<serde_json::Value> {
        let mut state = ActState::new(self.max_steps);

        tracing::info!(model = %self.model, provider = self.llm.name(), "starting act");

        while state.should_continue() {
            let page = self.page_context().await;
            let messages = vec![
                Message::system(SYSTEM_PROMPT),
                Message::user(Self::build_user_prompt(task, &page, &state)),
            ];

            let response = self
                .llm
                .chat_with_tools(
                    &self.model,
                    &messages,
                    self.tools.definitions(),
                    Some(GenerateOptions {
                        temperature: Some(self.temperature),
                    }),
                )
                .await?;

            if let Some(usage) = &response.usage {
                tracing::debug!(
                    model = %response.model,
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    "model turn"
                );
                state.add_tokens(usage.total_tokens);
            }

            if response.tool_calls.is_empty() {
                state.finish(response.content);
                break;
            }

            tracing::debug!(
                turn = state.turn + 1,
                calls = response.tool_calls.len(),
                "executing tool calls"
            );

            // Page state depends on order, so calls run one at a time
            for call in &response.tool_calls {
                let result = self.tools.execute(call, self.browser.as_ref()).await?;
                if !result.success {
                    return Err(BridgeError::act(format!(
                        "{} failed: {}",
                        result.tool_name, result.output
                    )));
                }
                state.record(ActStep::new(call, &result));
            }

            state.next_turn();
        }

        tracing::info!(
            turns = state.turn,
            actions = state.steps.len(),
            tokens = state.tokens,
            "act finished"
        );
        state.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::mock::RecordingDriver;
    use crate::core::{ToolCall, ToolDefinition};
    use crate::llm::LLMResponse;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and remembers the prompts it saw
    struct ScriptedLlm {
        responses: Mutex<VecDeque<LLMResponse>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        fn new(responses: Vec<LLMResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedLlm {
        async fn chat_with_tools(
            &self,
            _model: &str,
            messages: &[Message],
            tools: &[ToolDefinition],
            _options: Option<GenerateOptions>,
        ) -> Result<LLMResponse> {
            assert!(!tools.is_empty());
            if let Some(last) = messages.last() {
                self.prompts.lock().unwrap().push(last.content.clone());
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| BridgeError::ollama("script exhausted"))
        }

        async fn list_models(&self) -> Result<Vec<String>> {
            Ok(vec!["scripted".to_string()])
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn reply(content: &str, calls: Vec<ToolCall>) -> LLMResponse {
        LLMResponse {
            content: content.to_string(),
            tool_calls: calls,
            usage: None,
            model: "scripted".to_string(),
        }
    }

    fn actor(
        llm: ScriptedLlm,
        driver: Arc<RecordingDriver>,
        max_steps: usize,
    ) -> LlmActor<ScriptedLlm> {
        LlmActor::new(llm, "scripted", max_steps, driver)
    }

    #[tokio::test]
    async fn test_act_runs_tools_then_finishes() {
        let llm = ScriptedLlm::new(vec![
            reply(
                "",
                vec![ToolCall::new(
                    "browser_url",
                    serde_json::json!({"url": "https://example.com"}),
                )],
            ),
            reply(
                "",
                vec![ToolCall::new("browser_click", serde_json::json!({"ref": "e2"}))],
            ),
            reply("Opened the page and clicked the link", vec![]),
        ]);
        let driver = Arc::new(RecordingDriver::new());
        let actor = actor(llm, driver.clone(), 5);

        let value = actor.run("open example.com and click more info").await.unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["message"], "Opened the page and clicked the link");
        assert_eq!(value["actions"].as_array().unwrap().len(), 2);

        let browser_calls: Vec<_> = driver
            .calls()
            .into_iter()
            .filter(|c| c != "snapshot")
            .collect();
        assert_eq!(browser_calls, vec!["open https://example.com", "click @e2"]);
    }

    #[tokio::test]
    async fn test_prompt_carries_task_and_history() {
        let llm = ScriptedLlm::new(vec![
            reply(
                "",
                vec![ToolCall::new("browser_press", serde_json::json!({"key": "Enter"}))],
            ),
            reply("done", vec![]),
        ]);
        let driver = Arc::new(RecordingDriver::new());
        let actor = actor(llm, driver, 5);

        actor.run("press enter").await.unwrap();

        let prompts = actor.llm.prompts.lock().unwrap().clone();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].starts_with("TASK: press enter"));
        assert!(!prompts[0].contains("Actions already performed"));
        assert!(prompts[1].contains("browser_press -> Pressed Enter"));
    }

    #[tokio::test]
    async fn test_no_action_is_an_error() {
        let llm = ScriptedLlm::new(vec![reply("I can't see a browser", vec![])]);
        let actor = actor(llm, Arc::new(RecordingDriver::new()), 5);

        let err = actor.run("do something").await.unwrap_err();
        assert!(matches!(err, BridgeError::Act(_)));
    }

    #[tokio::test]
    async fn test_failed_browser_action_is_an_error() {
        let llm = ScriptedLlm::new(vec![reply(
            "",
            vec![ToolCall::new("browser_click", serde_json::json!({"ref": "e9"}))],
        )]);
        let driver = Arc::new(RecordingDriver::new().failing_on("click"));
        let actor = actor(llm, driver, 5);

        let err = actor.run("click it").await.unwrap_err();
        assert!(matches!(err, BridgeError::Browser(_)));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_an_error() {
        let llm = ScriptedLlm::new(vec![reply(
            "",
            vec![ToolCall::new("write_code", serde_json::json!({}))],
        )]);
        let actor = actor(llm, Arc::new(RecordingDriver::new()), 5);

        let err = actor.run("write code").await.unwrap_err();
        assert!(err.to_string().contains("write_code failed"));
    }

    #[tokio::test]
    async fn test_step_limit() {
        let press = || {
            reply(
                "",
                vec![ToolCall::new("browser_press", serde_json::json!({"key": "Tab"}))],
            )
        };
        let llm = ScriptedLlm::new(vec![press(), press()]);
        let actor = actor(llm, Arc::new(RecordingDriver::new()), 2);

        let err = actor.run("tab forever").await.unwrap_err();
        assert!(err.to_string().contains("step limit of 2"));
    }

    #[tokio::test]
    async fn test_llm_error_propagates() {
        let llm = ScriptedLlm::new(vec![]);
        let actor = actor(llm, Arc::new(RecordingDriver::new()), 3);

        let err = actor.run("anything").await.unwrap_err();
        assert!(matches!(err, BridgeError::Ollama(_)));
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_tolerated() {
        let llm = ScriptedLlm::new(vec![
            reply(
                "",
                vec![ToolCall::new("browser_url", serde_json::json!({"url": "https://a.io"}))],
            ),
            reply("ok", vec![]),
        ]);
        let driver = Arc::new(RecordingDriver::new().failing_on("snapshot"));
        let actor = actor(llm, driver, 3);

        assert!(actor.run("go to a.io").await.is_ok());
        let prompts = actor.llm.prompts.lock().unwrap().clone();
        assert!(prompts[0].contains("No page is open yet."));
    }
}
