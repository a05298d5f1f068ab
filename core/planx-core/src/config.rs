//! Planner configuration
//!
//! 환경 변수 또는 JSON에서 읽습니다.
//!
//! | 환경 변수 | 필드 |
//! |---|---|
//! | `PLANX_OPTIMIZER_ENABLED` | `optimizer_enabled` |
//! | `PLANX_TRACE_RULES` | `trace_rules` |
//! | `PLANX_ARENA_LIMIT` | `arena_limit_bytes` |

use serde::{Deserialize, Serialize};
use std::env;

use crate::arena::Arena;
use crate::error::{PlanxError, PlanxResult};

pub const ENV_OPTIMIZER_ENABLED: &str = "PLANX_OPTIMIZER_ENABLED";
pub const ENV_TRACE_RULES: &str = "PLANX_TRACE_RULES";
pub const ENV_ARENA_LIMIT: &str = "PLANX_ARENA_LIMIT";

/// 플래너 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Run the rewrite rules at all
    pub optimizer_enabled: bool,
    /// Log the plan before and after each rule
    pub trace_rules: bool,
    /// Byte budget for arenas built from this config
    pub arena_limit_bytes: Option<usize>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            optimizer_enabled: true,
            trace_rules: false,
            arena_limit_bytes: None,
        }
    }
}

impl PlannerConfig {
    /// Defaults overridden by whichever `PLANX_*` variables are set.
    pub fn from_env() -> PlanxResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_json(json: &str) -> PlanxResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> PlanxResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Fresh arena honouring `arena_limit_bytes`.
    pub fn arena(&self) -> Arena {
        match self.arena_limit_bytes {
            Some(limit) => Arena::with_limit(limit),
            None => Arena::new(),
        }
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PlanxResult<Self> {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_OPTIMIZER_ENABLED) {
            config.optimizer_enabled = parse_bool(ENV_OPTIMIZER_ENABLED, &value)?;
        }
        if let Some(value) = lookup(ENV_TRACE_RULES) {
            config.trace_rules = parse_bool(ENV_TRACE_RULES, &value)?;
        }
        if let Some(value) = lookup(ENV_ARENA_LIMIT) {
            let limit = value.trim().parse::<usize>().map_err(|_| {
                PlanxError::InvalidConfig(format!(
                    "{ENV_ARENA_LIMIT}: expected bytes, got '{value}'"
                ))
            })?;
            config.arena_limit_bytes = Some(limit);
        }
        Ok(config)
    }
}

fn parse_bool(name: &str, value: &str) -> PlanxResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(PlanxError::InvalidConfig(format!(
            "{name}: expected a boolean, got '{value}'"
        ))),
    }
}
