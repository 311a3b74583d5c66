//! Engine configuration: estimation constants, cache policy, auto-correct.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::params::ProcessOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Gas charged for any transaction, even one with no actions.
    #[serde(default = "default_base_gas_cost")]
    pub base_gas_cost: u64,
    #[serde(default = "default_gas_per_connection")]
    pub gas_per_connection: u64,
    #[serde(default = "default_base_execution_time_ms")]
    pub base_execution_time_ms: u64,
    #[serde(default = "default_execution_time_per_action_ms")]
    pub execution_time_per_action_ms: u64,
    #[serde(default = "default_execution_time_per_connection_ms")]
    pub execution_time_per_connection_ms: u64,
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_auto_correct")]
    pub auto_correct: bool,
}

fn default_base_gas_cost() -> u64 {
    100
}

fn default_gas_per_connection() -> u64 {
    10
}

fn default_base_execution_time_ms() -> u64 {
    2000
}

fn default_execution_time_per_action_ms() -> u64 {
    500
}

fn default_execution_time_per_connection_ms() -> u64 {
    100
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_auto_correct() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_gas_cost: default_base_gas_cost(),
            gas_per_connection: default_gas_per_connection(),
            base_execution_time_ms: default_base_execution_time_ms(),
            execution_time_per_action_ms: default_execution_time_per_action_ms(),
            execution_time_per_connection_ms: default_execution_time_per_connection_ms(),
            cache_enabled: default_cache_enabled(),
            cache_ttl_secs: default_cache_ttl_secs(),
            auto_correct: default_auto_correct(),
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON document; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|e| EngineError::parse("engine config", e))
    }

    /// `from_json` followed by environment overrides.
    pub fn load(json: Option<&str>) -> Result<Self, EngineError> {
        let mut config = match json {
            Some(json) => Self::from_json(json)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Unparseable values are ignored, leaving the current setting.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(ttl) = lookup("FLOWCHECK_CACHE_TTL_SECS") {
            if let Ok(parsed) = ttl.trim().parse::<u64>() {
                self.cache_ttl_secs = parsed;
            }
        }
        if let Some(enabled) = lookup("FLOWCHECK_CACHE_ENABLED") {
            if let Some(parsed) = crate::params::boolean::parse_synonym(&enabled) {
                self.cache_enabled = parsed;
            }
        }
        if let Some(gas) = lookup("FLOWCHECK_BASE_GAS_COST") {
            if let Ok(parsed) = gas.trim().parse::<u64>() {
                self.base_gas_cost = parsed;
            }
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn process_options(&self) -> ProcessOptions {
        ProcessOptions {
            auto_correct: self.auto_correct,
        }
    }
}
