//! Navigator configuration: loop timing and the initial collapsing mode.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a folding session's navigator.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Milliseconds between loop ticks (default: 2500).
    pub loop_period_ms: u64,
    /// Collapse default subtrees when a fold is first loaded.
    pub using_defaults: bool,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            loop_period_ms: 2_500,
            using_defaults: true,
        }
    }
}

impl NavigatorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Loop period, never shorter than one millisecond.
    pub fn loop_period(&self) -> Duration {
        Duration::from_millis(self.loop_period_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NavigatorConfig::default();
        assert_eq!(config.loop_period(), Duration::from_millis(2500));
        assert!(config.using_defaults);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = NavigatorConfig::from_json(r#"{ "loop_period_ms": 1000 }"#).unwrap();
        assert_eq!(config.loop_period_ms, 1000);
        assert!(config.using_defaults);
    }

    #[test]
    fn test_zero_period_is_floored() {
        let config = NavigatorConfig {
            loop_period_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.loop_period(), Duration::from_millis(1));
    }
}
