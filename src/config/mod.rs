//! Configuration management
//!
//! Defaults layered under an optional `hotline.toml` and `HOTLINE_*`
//! environment overrides. The hosted agent credential also falls back to
//! `OPENAI_API_KEY`; realtime mode without a key is a startup error.

use crate::domain::call::CallTimings;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub agent: AgentConfig,
    pub timings: CallTimings,
    pub demo: DemoConfig,
}

/// Which reply source backs the agent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentMode {
    /// Random pick from a fixed prompt list
    #[default]
    Canned,
    /// Hosted realtime agent session
    Realtime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub mode: AgentMode,
    pub model: String,
    /// Hosted-session credential; resolved from `OPENAI_API_KEY` when unset
    pub api_key: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            mode: AgentMode::Canned,
            model: "gpt-realtime".to_string(),
            api_key: None,
        }
    }
}

/// What the scripted caller says in the demo binary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub utterances: Vec<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            utterances: vec![
                "I need help choosing a pain reliever.".to_string(),
                "Thank you, that's very helpful.".to_string(),
            ],
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("hotline").required(false))
            .add_source(
                config::Environment::with_prefix("HOTLINE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| DomainError::Configuration(e.to_string()))?;

        let mut cfg: Config = settings
            .try_deserialize()
            .map_err(|e| DomainError::Configuration(e.to_string()))?;
        if cfg.agent.api_key.is_none() {
            cfg.agent.api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.agent.mode == AgentMode::Realtime && self.agent.api_key.is_none() {
            return Err(DomainError::Configuration(
                "realtime agent mode requires an API key (set OPENAI_API_KEY)".to_string(),
            ));
        }
        if self.timings.thinking_max_ms < self.timings.thinking_min_ms {
            return Err(DomainError::Configuration(
                "thinking_max_ms must be at least thinking_min_ms".to_string(),
            ));
        }
        Ok(())
    }
}
