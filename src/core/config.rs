//! Configuration management for act-bridge
//!
//! Supports environment variables (including a local `.env` file) and an
//! optional config file.
//!
//! Config file location: ~/.config/act-bridge/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{BridgeError, Result};

/// Default target for the fallback navigation when the task names no URL
pub const DEFAULT_FALLBACK_URL: &str = "https://example.com";

/// Main configuration for act-bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ollama configuration
    pub ollama: OllamaConfig,
    /// Act model configuration
    pub model: ModelConfig,
    /// Browser configuration
    pub browser: BrowserConfig,
    /// Act loop configuration
    pub act: ActConfig,
}

/// Ollama server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Host address (default: localhost)
    pub host: String,
    /// Port number (default: 11434)
    pub port: u16,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Model used to decide browser actions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model name as known to Ollama
    /// Default: qwen3:8b
    pub name: String,
    /// Sampling temperature for tool selection
    pub temperature: f32,
}

/// Browser automation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Session name for agent-browser
    pub session_name: String,
    /// Whether to run in headed mode (visible browser)
    pub headed: bool,
    /// Upper bound for a single agent-browser command in ms
    pub timeout_ms: u64,
    /// URL the fallback opens when the task contains none
    pub fallback_url: String,
    /// Page-load bound for the fallback navigation in ms
    pub fallback_timeout_ms: u64,
    /// Selector whose text the fallback reports
    pub heading_selector: String,
}

/// Act loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActConfig {
    /// Maximum model round-trips per act
    /// Default: 5
    pub max_steps: usize,
    /// Whether to emit debug logs
    pub debug: bool,
    /// Task used when the command line carries none
    pub default_task: String,
}

/// Source of configuration variables, the process environment outside tests
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn flag(lookup: Lookup, key: &str) -> Option<bool> {
    lookup(key).map(|v| v == "true" || v == "1")
}

fn parsed<T: std::str::FromStr>(lookup: Lookup, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(&env_lookup)
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::from_lookup(&env_lookup)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::from_lookup(&env_lookup)
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self::from_lookup(&env_lookup)
    }
}

impl Default for ActConfig {
    fn default() -> Self {
        Self::from_lookup(&env_lookup)
    }
}

impl OllamaConfig {
    fn from_lookup(lookup: Lookup) -> Self {
        Self {
            host: lookup("OLLAMA_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: parsed(lookup, "OLLAMA_PORT").unwrap_or(11434),
            timeout_secs: 120,
        }
    }
}

impl ModelConfig {
    fn from_lookup(lookup: Lookup) -> Self {
        Self {
            name: lookup("ACT_BRIDGE_MODEL").unwrap_or_else(|| "qwen3:8b".to_string()),
            temperature: 0.1,
        }
    }
}

impl BrowserConfig {
    fn from_lookup(lookup: Lookup) -> Self {
        Self {
            session_name: lookup("ACT_BRIDGE_SESSION")
                .unwrap_or_else(|| "act-bridge".to_string()),
            headed: flag(lookup, "ACT_BRIDGE_HEADED").unwrap_or(false),
            timeout_ms: 60000,
            fallback_url: lookup("ACT_BRIDGE_FALLBACK_URL")
                .unwrap_or_else(|| DEFAULT_FALLBACK_URL.to_string()),
            fallback_timeout_ms: 30000,
            heading_selector: "h1".to_string(),
        }
    }
}

impl ActConfig {
    fn from_lookup(lookup: Lookup) -> Self {
        Self {
            max_steps: parsed(lookup, "ACT_BRIDGE_MAX_STEPS").unwrap_or(5),
            debug: flag(lookup, "ACT_BRIDGE_DEBUG").unwrap_or(false),
            default_task: "Hello from act-bridge".to_string(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("act-bridge")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from `.env`, config file and defaults
    /// Priority: config file > env vars > defaults
    ///
    /// Only a missing config file falls through to the defaults; a file that
    /// cannot be read or parsed is an error.
    pub fn load() -> Result<Self> {
        // A missing .env is fine
        let _ = dotenvy::dotenv();

        Self::load_or_default(&Self::config_file())
    }

    /// Load `path` if it exists, otherwise the defaults (which respect env vars)
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_path(path)
    }

    /// Build the defaults from an arbitrary variable source
    pub fn from_lookup(lookup: Lookup) -> Self {
        Self {
            ollama: OllamaConfig::from_lookup(lookup),
            model: ModelConfig::from_lookup(lookup),
            browser: BrowserConfig::from_lookup(lookup),
            act: ActConfig::from_lookup(lookup),
        }
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| BridgeError::config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| BridgeError::config(format!("Failed to parse config: {}", e)))
    }

    /// Get the full Ollama API URL
    pub fn ollama_url(&self) -> String {
        format!("http://{}:{}", self.ollama.host, self.ollama.port)
    }
}
