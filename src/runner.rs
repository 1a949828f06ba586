//! Runner integration surface
//!
//! The host test runner drives this crate through two narrow seams: the
//! [`Listener`] lifecycle hooks it invokes around features, scenarios, steps
//! and outline tables, and the [`StepExecutor`] facility the controller uses
//! to run ad-hoc step text injected over the command channel.
//!
//! Hook order is fixed by the runner: `feature_name`, then per scenario
//! `scenario_name` followed by `before_step`/`step_result` pairs, and for
//! outlines `before_outline_table` followed by
//! `before_table_row`/`table_cell`.../`after_table_row` per row.

use serde::{Deserialize, Serialize};

use crate::common::Result;

/// Execution status of a step or outline table row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    Passed,
    Failed,
    /// No matching step definition was found
    Undefined,
    Skipped,
}

/// Result of executing one step or outline table row
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StepOutcome {
    /// Execution status reported by the runner
    pub status: StepStatus,
    /// Failure message, when the runner attached one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepOutcome {
    /// A passing outcome with no message
    pub fn passed() -> Self {
        Self::default()
    }

    /// A failing outcome carrying the runner's message
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: StepStatus::Failed,
            error: Some(message.into()),
        }
    }

    /// An outcome for a step with no matching definition
    pub fn undefined() -> Self {
        Self {
            status: StepStatus::Undefined,
            error: None,
        }
    }
}

/// Lifecycle hooks invoked by the host runner
///
/// All methods default to no-ops so implementers only override the events
/// they care about. Decorators must call the wrapped listener after their own
/// side effects so runner-default behavior (progress counters and the like)
/// is preserved.
#[allow(unused_variables)]
pub trait Listener {
    /// A feature was named, before any of its scenarios run
    fn feature_name(&mut self, name: &str) {}

    /// A scenario was named, before its first step
    fn scenario_name(&mut self, name: &str) {}

    /// A step is about to execute
    fn before_step(&mut self, text: &str) {}

    /// A step finished with the given outcome
    fn step_result(&mut self, outcome: &StepOutcome) {}

    /// A scenario outline's examples table is about to be walked
    fn before_outline_table(&mut self) {}

    /// A table row (header or data) is about to be walked
    fn before_table_row(&mut self) {}

    /// One cell of the current table row
    fn table_cell(&mut self, value: &str) {}

    /// The current table row finished with the given outcome
    fn after_table_row(&mut self, outcome: &StepOutcome) {}
}

/// Listener that ignores every event, for standalone use of decorators
#[derive(Debug, Default, Clone, Copy)]
pub struct NullListener;

impl Listener for NullListener {}

/// Dynamic step invocation facility supplied by the host runner
///
/// Takes ad-hoc step text, matches it against the runner's step definitions
/// and executes it in the running scenario. Failures come back as errors and
/// are reported, never re-raised.
pub trait StepExecutor {
    fn execute(&mut self, text: &str) -> Result<()>;
}

impl<F> StepExecutor for F
where
    F: FnMut(&str) -> Result<()>,
{
    fn execute(&mut self, text: &str) -> Result<()> {
        self(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_constructors() {
        assert_eq!(StepOutcome::passed().status, StepStatus::Passed);
        let failed = StepOutcome::failed("boom");
        assert_eq!(failed.status, StepStatus::Failed);
        assert_eq!(failed.error.as_deref(), Some("boom"));
        assert_eq!(StepOutcome::undefined().status, StepStatus::Undefined);
    }

    #[test]
    fn test_closures_are_executors() {
        let mut seen = Vec::new();
        let mut exec = |text: &str| {
            seen.push(text.to_string());
            Ok(())
        };
        StepExecutor::execute(&mut exec, "Given a thing").unwrap();
        assert_eq!(seen, vec!["Given a thing"]);
    }

    #[test]
    fn test_status_deserializes_snake_case() {
        let status: StepStatus = serde_json::from_str("\"undefined\"").unwrap();
        assert_eq!(status, StepStatus::Undefined);
    }
}
