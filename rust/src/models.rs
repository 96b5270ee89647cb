//! Core data types for the scheduling engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How a dependency ties the predecessor to the successor.
///
/// The first word names the predecessor's anchor, the second the successor's:
/// `FinishToStart` means "predecessor finish + lag <= successor start".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyType {
    #[default]
    FinishToStart,
    StartToStart,
    FinishToFinish,
    StartToFinish,
}

/// Which end of a task a dependency attaches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Finish,
}

impl DependencyType {
    pub fn predecessor_anchor(self) -> Anchor {
        match self {
            Self::FinishToStart | Self::FinishToFinish => Anchor::Finish,
            Self::StartToStart | Self::StartToFinish => Anchor::Start,
        }
    }

    pub fn successor_anchor(self) -> Anchor {
        match self {
            Self::FinishToStart | Self::StartToStart => Anchor::Start,
            Self::FinishToFinish | Self::StartToFinish => Anchor::Finish,
        }
    }

    /// Parse the short or long spelling ("FS", "finish_to_start", "FinishToStart").
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-' && *c != ' ')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "fs" | "finishtostart" => Some(Self::FinishToStart),
            "ss" | "starttostart" => Some(Self::StartToStart),
            "ff" | "finishtofinish" => Some(Self::FinishToFinish),
            "sf" | "starttofinish" => Some(Self::StartToFinish),
            _ => None,
        }
    }
}

impl std::fmt::Display for DependencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::FinishToStart => "finish-to-start",
            Self::StartToStart => "start-to-start",
            Self::FinishToFinish => "finish-to-finish",
            Self::StartToFinish => "start-to-finish",
        };
        f.write_str(s)
    }
}

/// A schedulable unit of work. Owned by the caller; the engine never mutates it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    /// Working days once started. Zero marks a milestone.
    pub duration: u32,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl Task {
    pub fn new(id: impl Into<String>, duration: u32) -> Self {
        Self {
            id: id.into(),
            duration,
            start_date: None,
            due_date: None,
        }
    }

    pub fn with_dates(mut self, start_date: NaiveDate, due_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self.due_date = Some(due_date);
        self
    }

    #[inline]
    pub fn duration_days(&self) -> i64 {
        i64::from(self.duration)
    }
}

/// A directed, typed, lagged edge between two tasks.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub predecessor_id: String,
    pub successor_id: String,
    #[serde(rename = "type", default)]
    pub kind: DependencyType,
    /// Positive delays the successor, negative lets it overlap (lead).
    #[serde(default)]
    pub lag: i64,
}

impl Dependency {
    pub fn new(
        predecessor_id: impl Into<String>,
        successor_id: impl Into<String>,
        kind: DependencyType,
        lag: i64,
    ) -> Self {
        Self {
            predecessor_id: predecessor_id.into(),
            successor_id: successor_id.into(),
            kind,
            lag,
        }
    }

    /// Finish-to-start with no lag, the common case.
    pub fn finish_to_start(
        predecessor_id: impl Into<String>,
        successor_id: impl Into<String>,
    ) -> Self {
        Self::new(predecessor_id, successor_id, DependencyType::FinishToStart, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchors() {
        assert_eq!(DependencyType::FinishToStart.predecessor_anchor(), Anchor::Finish);
        assert_eq!(DependencyType::FinishToStart.successor_anchor(), Anchor::Start);
        assert_eq!(DependencyType::StartToFinish.predecessor_anchor(), Anchor::Start);
        assert_eq!(DependencyType::StartToFinish.successor_anchor(), Anchor::Finish);
    }

    #[test]
    fn test_parse_spellings() {
        assert_eq!(DependencyType::parse("FS"), Some(DependencyType::FinishToStart));
        assert_eq!(
            DependencyType::parse("start_to_start"),
            Some(DependencyType::StartToStart)
        );
        assert_eq!(
            DependencyType::parse("FinishToFinish"),
            Some(DependencyType::FinishToFinish)
        );
        assert_eq!(DependencyType::parse("sf"), Some(DependencyType::StartToFinish));
        assert_eq!(DependencyType::parse("sideways"), None);
    }

    #[test]
    fn test_serde_field_names() {
        let dep = Dependency::new("a", "b", DependencyType::StartToStart, -2);
        let json = serde_json::to_value(&dep).unwrap();
        assert_eq!(json["predecessorId"], "a");
        assert_eq!(json["successorId"], "b");
        assert_eq!(json["type"], "StartToStart");
        assert_eq!(json["lag"], -2);

        let task: Task =
            serde_json::from_str(r#"{"id":"t","duration":3,"dueDate":"2025-01-10"}"#).unwrap();
        assert_eq!(task.duration, 3);
        assert_eq!(task.start_date, None);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 1, 10));
    }
}
