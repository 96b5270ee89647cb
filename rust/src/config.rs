//! Configuration types for the scheduling engine.

use serde::{Deserialize, Serialize};

/// What to do when the dependency graph contains a cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleMode {
    /// Refuse to produce timings; return `ScheduleError::CycleDetected`.
    #[default]
    Strict,
    /// Drop the back-edges that close each cycle and schedule the rest.
    /// The result is flagged `partial` and carries a warning per cycle.
    BestEffort,
}

/// Configuration for schedule computation and the optimization advisor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleConfig {
    pub mode: ScheduleMode,
    /// Tasks with more slack than this are flagged for resource reallocation.
    pub reallocation_slack_threshold: i64,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            mode: ScheduleMode::Strict,
            reallocation_slack_threshold: 5,
            verbosity: 0,
        }
    }
}

impl ScheduleConfig {
    pub fn best_effort() -> Self {
        Self {
            mode: ScheduleMode::BestEffort,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: ScheduleMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_reallocation_slack_threshold(mut self, threshold: i64) -> Self {
        self.reallocation_slack_threshold = threshold;
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ScheduleConfig::default();
        assert_eq!(config.mode, ScheduleMode::Strict);
        assert_eq!(config.reallocation_slack_threshold, 5);
        assert_eq!(config.verbosity, 0);
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: ScheduleConfig =
            serde_json::from_str(r#"{"mode":"BestEffort","verbosity":2}"#).unwrap();
        assert_eq!(config.mode, ScheduleMode::BestEffort);
        assert_eq!(config.reallocation_slack_threshold, 5);
        assert_eq!(config.verbosity, 2);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ScheduleConfig::best_effort().with_reallocation_slack_threshold(10);
        assert_eq!(config.mode, ScheduleMode::BestEffort);
        assert_eq!(config.reallocation_slack_threshold, 10);
    }
}
