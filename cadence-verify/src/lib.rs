//! # cadence-verify
//!
//! Declarative scenario verification: ordered steps dispatched against a
//! pluggable action table, each step's output checked by typed,
//! tolerance-aware comparisons.
//!
//! Register [`Scenario`]s (inline or from a YAML [`catalog`]) with a
//! [`ValidationEngine`], wire an [`ActionDispatcher`], and execute one or
//! all of them; each execution yields a fresh [`ScenarioReport`].

pub mod catalog;
pub mod checks;
pub mod engine;
pub mod error;
pub mod report;
pub mod scenario;
pub mod value;

pub use checks::{evaluate, CheckOutcome};
pub use engine::{ActionDispatcher, HandlerMap, StepContext, ValidationEngine};
pub use error::VerifyError;
pub use report::{ScenarioReport, ScenarioState, StepReport, StepStatus};
pub use scenario::{Check, CheckKind, Scenario, ScenarioCategory, ScenarioId, Step};
pub use value::lookup;
