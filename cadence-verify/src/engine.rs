//! Scenario execution engine.
//!
//! State machine per execution:
//! `NotStarted → PreconditionCheck → (Blocked | StepExecution) → Completed`.
//!
//! Actions are resolved through a pluggable [`ActionDispatcher`]; the
//! engine never knows what a step actually does. A dispatch error is a
//! normal step failure, never a crash — that includes a busy rejection
//! from a pipeline being driven as a black box.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::checks::evaluate;
use crate::error::VerifyError;
use crate::report::{ScenarioReport, ScenarioState, StepReport, StepStatus};
use crate::scenario::{Scenario, ScenarioId};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Per-step execution context handed to the dispatcher.
#[derive(Debug, Clone)]
pub struct StepContext {
    pub scenario: ScenarioId,
    pub step_index: usize,
    /// Scenario deadline, when the scenario declares `timeout_ms`. The
    /// engine skips steps once it has passed; a long-running handler is
    /// expected to respect it mid-step.
    pub deadline: Option<Instant>,
}

impl StepContext {
    /// Time left until the deadline; `None` without a deadline, zero once
    /// it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

/// Maps an action name to whatever executes it.
pub trait ActionDispatcher {
    fn dispatch(
        &mut self,
        action: &str,
        params: &Value,
        ctx: &StepContext,
    ) -> Result<Value, String>;
}

type Handler = Box<dyn FnMut(&Value, &StepContext) -> Result<Value, String> + Send>;

/// Closure-table [`ActionDispatcher`].
#[derive(Default)]
pub struct HandlerMap {
    handlers: BTreeMap<String, Handler>,
}

impl HandlerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an action name, replacing any previous one.
    pub fn register<F>(&mut self, action: impl Into<String>, handler: F)
    where
        F: FnMut(&Value, &StepContext) -> Result<Value, String> + Send + 'static,
    {
        self.handlers.insert(action.into(), Box::new(handler));
    }
}

impl ActionDispatcher for HandlerMap {
    fn dispatch(
        &mut self,
        action: &str,
        params: &Value,
        ctx: &StepContext,
    ) -> Result<Value, String> {
        match self.handlers.get_mut(action) {
            Some(handler) => handler(params, ctx),
            None => Err(format!("unknown action '{action}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

type PreconditionCheck = Box<dyn Fn() -> bool + Send + Sync>;

/// Holds registered scenarios and the precondition lookup table.
#[derive(Default)]
pub struct ValidationEngine {
    scenarios: BTreeMap<ScenarioId, Scenario>,
    preconditions: BTreeMap<String, PreconditionCheck>,
}

impl ValidationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scenario, replacing any previous definition with the
    /// same id.
    pub fn register(&mut self, scenario: Scenario) {
        self.scenarios.insert(scenario.id.clone(), scenario);
    }

    pub fn register_all(&mut self, scenarios: impl IntoIterator<Item = Scenario>) {
        for scenario in scenarios {
            self.register(scenario);
        }
    }

    /// Register a named precondition check. Scenarios referencing a name
    /// with no registered check are blocked — an unverifiable assumption
    /// counts as unmet.
    pub fn register_precondition<F>(&mut self, name: impl Into<String>, check: F)
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.preconditions.insert(name.into(), Box::new(check));
    }

    /// Registered scenario ids, sorted.
    pub fn scenario_ids(&self) -> Vec<&ScenarioId> {
        self.scenarios.keys().collect()
    }

    /// Execute one registered scenario.
    pub fn run_scenario(
        &self,
        id: &ScenarioId,
        dispatcher: &mut dyn ActionDispatcher,
    ) -> Result<ScenarioReport, VerifyError> {
        let scenario = self
            .scenarios
            .get(id)
            .ok_or_else(|| VerifyError::UnknownScenario { id: id.0.clone() })?;
        Ok(self.execute(scenario, dispatcher))
    }

    /// Execute every registered scenario, in id order.
    ///
    /// Strictly sequential; a failing scenario never cancels the ones
    /// after it, and nothing is rolled back in between.
    pub fn run_all(&self, dispatcher: &mut dyn ActionDispatcher) -> Vec<ScenarioReport> {
        self.scenarios
            .values()
            .map(|scenario| self.execute(scenario, dispatcher))
            .collect()
    }

    fn execute(&self, scenario: &Scenario, dispatcher: &mut dyn ActionDispatcher) -> ScenarioReport {
        let started = Instant::now();
        let mut report = ScenarioReport::new(scenario.id.clone(), scenario.category);
        report.state = ScenarioState::PreconditionCheck;

        let failed: Vec<String> = scenario
            .preconditions
            .iter()
            .filter(|name| match self.preconditions.get(name.as_str()) {
                Some(check) => !check(),
                None => true,
            })
            .cloned()
            .collect();
        if !failed.is_empty() {
            report.state = ScenarioState::Blocked;
            report.failed_preconditions = failed;
            report.tally();
            report.duration_ms = started.elapsed().as_millis();
            return report;
        }

        report.state = ScenarioState::StepExecution;
        let deadline = scenario
            .timeout_ms
            .map(|ms| started + Duration::from_millis(ms));
        let mut aborted = false;

        for (step_index, step) in scenario.steps.iter().enumerate() {
            if aborted {
                report
                    .steps
                    .push(StepReport::skipped(&step.action, "earlier step failed"));
                continue;
            }
            if report.timed_out {
                report
                    .steps
                    .push(StepReport::skipped(&step.action, "scenario deadline exceeded"));
                continue;
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    report.timed_out = true;
                    report
                        .steps
                        .push(StepReport::skipped(&step.action, "scenario deadline exceeded"));
                    continue;
                }
            }

            let ctx = StepContext {
                scenario: scenario.id.clone(),
                step_index,
                deadline,
            };
            let step_started = Instant::now();
            match dispatcher.dispatch(&step.action, &step.params, &ctx) {
                Ok(output) => {
                    let checks: Vec<_> =
                        step.checks.iter().map(|c| evaluate(c, &output)).collect();
                    let passed = checks.iter().all(|c| c.passed);
                    report.steps.push(StepReport {
                        action: step.action.clone(),
                        status: if passed {
                            StepStatus::Passed
                        } else {
                            StepStatus::Failed
                        },
                        duration_ms: step_started.elapsed().as_millis(),
                        output: Some(output),
                        checks,
                        error: None,
                    });
                    if !passed && scenario.abort_on_failure {
                        aborted = true;
                    }
                }
                Err(error) => {
                    report.steps.push(StepReport {
                        action: step.action.clone(),
                        status: StepStatus::Failed,
                        duration_ms: step_started.elapsed().as_millis(),
                        output: None,
                        checks: Vec::new(),
                        error: Some(error),
                    });
                    if scenario.abort_on_failure {
                        aborted = true;
                    }
                }
            }
        }

        report.state = ScenarioState::Completed;
        report.tally();
        report.duration_ms = started.elapsed().as_millis();
        report
    }
}
