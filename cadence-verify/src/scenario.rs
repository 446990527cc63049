//! Scenario definitions — the declarative verification model.
//!
//! A [`Scenario`] is registered once and executed any number of times; the
//! definition itself is immutable and each execution produces a fresh
//! report. Definitions are plain serde types so a catalog of scenarios can
//! live in YAML next to the code under test.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A strongly-typed identifier for a scenario.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScenarioId(pub String);

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ScenarioId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ScenarioId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// What a scenario exercises. Purely informational grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioCategory {
    #[default]
    Pipeline,
    Integrity,
    Performance,
    Integration,
}

/// The comparison a [`Check`] applies to a step's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    Equals,
    Exists,
    Count,
    Performance,
    Structure,
    Contains,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::Equals => write!(f, "equals"),
            CheckKind::Exists => write!(f, "exists"),
            CheckKind::Count => write!(f, "count"),
            CheckKind::Performance => write!(f, "performance"),
            CheckKind::Structure => write!(f, "structure"),
            CheckKind::Contains => write!(f, "contains"),
        }
    }
}

/// One typed comparison against a step's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    pub kind: CheckKind,
    /// Dot-path into the step output (`"groups[0].id"`). Empty means the
    /// whole output.
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub expected: Value,
    /// Slack for `count` and `performance`. Defaults to 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
}

/// One action invocation plus the checks evaluated against its output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub action: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub checks: Vec<Check>,
}

/// A named, reusable verification definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: ScenarioId,
    #[serde(default)]
    pub category: ScenarioCategory,
    #[serde(default)]
    pub description: String,
    /// Named checks that must all pass before any step runs.
    #[serde(default)]
    pub preconditions: Vec<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Deadline for the whole scenario; enforced between steps and handed
    /// to each step's execution context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// When true, a failing step skips the remaining steps. The default
    /// runs every step regardless.
    #[serde(default)]
    pub abort_on_failure: bool,
}
