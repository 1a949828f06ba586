//! Replay script configuration types
//!
//! Defines the data structures for deserializing YAML replay scripts. A
//! script describes one feature's lifecycle (scenarios, steps, outline
//! tables), an optional command sequence to drive a controller with, and
//! assertions on the resulting report stream.

use serde::Deserialize;

use crate::runner::{StepOutcome, StepStatus};

/// A complete replay script loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct ReplayScript {
    /// Name of the replay script
    pub name: String,
    /// Optional description of what the script verifies
    pub description: Option<String>,
    /// Feature name announced before any scenario
    pub feature: String,
    /// Commands posted to the channel while the replay runs, in wire form
    /// (`STEP`, `PLAY`, `STOP`, or ad-hoc step text). When present, a
    /// step-mode controller gates every step of the replay.
    #[serde(default)]
    pub commands: Vec<String>,
    /// Scenarios replayed in order
    pub scenarios: Vec<ScenarioScript>,
    /// Assertions on the captured report stream
    #[serde(default)]
    pub expect: Expectations,
}

/// One scenario of the replayed feature
#[derive(Deserialize, Debug)]
pub struct ScenarioScript {
    /// Scenario name
    pub name: String,
    /// Steps with their outcomes
    #[serde(default)]
    pub steps: Vec<StepScript>,
    /// Optional outline table walked after the steps
    pub outline: Option<OutlineScript>,
}

/// A step and the outcome the runner would report for it
#[derive(Deserialize, Debug)]
pub struct StepScript {
    /// Step text as the runner would announce it
    pub text: String,
    /// Execution status (default: passed)
    #[serde(default)]
    pub status: StepStatus,
    /// Failure message attached to the result
    pub error: Option<String>,
}

/// An outline examples table; the first row is the header
#[derive(Deserialize, Debug)]
pub struct OutlineScript {
    pub rows: Vec<RowScript>,
}

/// One table row with its cells and outcome
#[derive(Deserialize, Debug)]
pub struct RowScript {
    /// Cell values in column order
    pub cells: Vec<String>,
    /// Execution status (default: passed; ignored for the header row)
    #[serde(default)]
    pub status: StepStatus,
    /// Failure message attached to the row
    pub error: Option<String>,
}

/// Assertions checked against the captured report stream
#[derive(Deserialize, Debug, Default)]
pub struct Expectations {
    /// Substrings that must appear in the output
    #[serde(default)]
    pub contains: Vec<String>,
    /// Substrings that must not appear in the output
    #[serde(default)]
    pub not_contains: Vec<String>,
}

impl StepScript {
    /// Outcome the runner would hand to the reporter for this step
    pub fn outcome(&self) -> StepOutcome {
        StepOutcome {
            status: self.status,
            error: self.error.clone(),
        }
    }
}

impl RowScript {
    /// Outcome the runner would hand to the reporter for this row
    pub fn outcome(&self) -> StepOutcome {
        StepOutcome {
            status: self.status,
            error: self.error.clone(),
        }
    }
}

impl ReplayScript {
    /// Total number of real steps a controller would gate
    pub fn step_count(&self) -> usize {
        self.scenarios.iter().map(|s| s.steps.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_script() {
        let script: ReplayScript = serde_yaml::from_str(
            r#"
            name: smoke
            feature: Calculator
            scenarios:
              - name: Addition
                steps:
                  - text: Given two numbers
            "#,
        )
        .unwrap();

        assert_eq!(script.name, "smoke");
        assert_eq!(script.step_count(), 1);
        assert!(script.commands.is_empty());
        assert_eq!(script.scenarios[0].steps[0].status, StepStatus::Passed);
    }

    #[test]
    fn test_parse_full_script() {
        let script: ReplayScript = serde_yaml::from_str(
            r#"
            name: full
            description: failure and outline coverage
            feature: Calculator
            commands: [STEP, STEP, PLAY]
            scenarios:
              - name: Division
                steps:
                  - text: When I divide by zero
                    status: failed
                    error: division by zero
                  - text: Then nothing happened
                    status: skipped
                outline:
                  rows:
                    - cells: [a, b]
                    - cells: ["1", "2"]
                      status: undefined
            expect:
              contains:
                - "Step failed: division by zero"
              not_contains:
                - "Step failed: Step undefined"
            "#,
        )
        .unwrap();

        assert_eq!(script.commands, vec!["STEP", "STEP", "PLAY"]);
        let scenario = &script.scenarios[0];
        assert_eq!(
            scenario.steps[0].outcome().error.as_deref(),
            Some("division by zero")
        );
        let outline = scenario.outline.as_ref().unwrap();
        assert_eq!(outline.rows.len(), 2);
        assert_eq!(outline.rows[1].outcome().status, StepStatus::Undefined);
        assert_eq!(script.expect.contains.len(), 1);
    }
}
