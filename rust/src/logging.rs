//! Verbosity-gated logging and structured diagnostics.
//!
//! The macros are zero-cost when verbosity is 0. Levels:
//! - 0: SILENT (nothing is printed; diagnostics are still collected)
//! - 1: CHANGES (warnings such as dropped edges and cycles)
//! - 2: CHECKS (per-task decisions in the passes)
//! - 3: DEBUG (full algorithm internals)
//!
//! Anything a caller may want to act on is recorded in a [`Diagnostics`]
//! collection returned with the result, never only printed.

use serde::{Deserialize, Serialize};

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1).
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            eprintln!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!($($arg)*);
        }
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
}

/// What a diagnostic is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A cycle was found; the listed tasks form it.
    CycleDetected,
    /// A dependency names a predecessor that is not in the task list.
    UnknownPredecessor,
    /// A dependency names a successor that is not in the task list.
    UnknownSuccessor,
    /// Two tasks share an id; the first one wins.
    DuplicateTask,
    /// A dependency was excluded from the passes to break a cycle.
    DroppedDependency,
    /// A dependency's lag exceeded the supported range and was clamped.
    LagOutOfRange,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    pub task_ids: Vec<String>,
}

/// Ordered collection of findings produced while building or scheduling a graph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and echo it at CHANGES verbosity.
    pub fn warn(
        &mut self,
        verbosity: u8,
        kind: DiagnosticKind,
        message: String,
        task_ids: Vec<String>,
    ) {
        log_changes!(verbosity, "warning: {}", message);
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            kind,
            message,
            task_ids,
        });
    }

    /// Record an informational finding and echo it at CHECKS verbosity.
    pub fn info(
        &mut self,
        verbosity: u8,
        kind: DiagnosticKind,
        message: String,
        task_ids: Vec<String>,
    ) {
        log_checks!(verbosity, "info: {}", message);
        self.entries.push(Diagnostic {
            severity: Severity::Info,
            kind,
            message,
            task_ids,
        });
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
