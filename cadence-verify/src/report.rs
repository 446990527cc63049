//! Execution reports.

use serde::Serialize;
use serde_json::Value;

use crate::checks::CheckOutcome;
use crate::scenario::{ScenarioCategory, ScenarioId};

/// Lifecycle of one scenario execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioState {
    NotStarted,
    PreconditionCheck,
    Blocked,
    StepExecution,
    Completed,
}

/// Outcome of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Passed,
    Failed,
    Skipped,
}

/// Record of one executed (or skipped) step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub action: String,
    pub status: StepStatus,
    pub duration_ms: u128,
    /// Captured action output; absent for skipped steps and failed dispatch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    pub checks: Vec<CheckOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepReport {
    pub(crate) fn skipped(action: &str, reason: &str) -> Self {
        Self {
            action: action.to_string(),
            status: StepStatus::Skipped,
            duration_ms: 0,
            output: None,
            checks: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

/// Aggregate result of one scenario execution.
///
/// Timing covers the precondition check through the last step. A blocked
/// or timed-out scenario is never a success, even with zero failed steps.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario: ScenarioId,
    pub category: ScenarioCategory,
    pub state: ScenarioState,
    pub success: bool,
    pub duration_ms: u128,
    pub failed_preconditions: Vec<String>,
    pub steps: Vec<StepReport>,
    pub passed_steps: usize,
    pub failed_steps: usize,
    pub skipped_steps: usize,
    pub timed_out: bool,
}

impl ScenarioReport {
    pub(crate) fn new(scenario: ScenarioId, category: ScenarioCategory) -> Self {
        Self {
            scenario,
            category,
            state: ScenarioState::NotStarted,
            success: false,
            duration_ms: 0,
            failed_preconditions: Vec::new(),
            steps: Vec::new(),
            passed_steps: 0,
            failed_steps: 0,
            skipped_steps: 0,
            timed_out: false,
        }
    }

    pub(crate) fn tally(&mut self) {
        self.passed_steps = self
            .steps
            .iter()
            .filter(|s| s.status == StepStatus::Passed)
            .count();
        self.failed_steps = self
            .steps
            .iter()
            .filter(|s| s.status == StepStatus::Failed)
            .count();
        self.skipped_steps = self
            .steps
            .iter()
            .filter(|s| s.status == StepStatus::Skipped)
            .count();
        self.success =
            self.state == ScenarioState::Completed && self.failed_steps == 0 && !self.timed_out;
    }
}
