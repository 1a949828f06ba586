//! Streaming step reporter
//!
//! Translates the runner's lifecycle callbacks into an ordered, line-oriented
//! text stream a human or an external visualizer can tail. The reporter is a
//! decorator: it emits its own lines first, then delegates every hook to the
//! wrapped base listener so runner-default behavior is preserved.
//!
//! Message text is contract — external tooling pattern-matches on lines like
//! `Step failed: ` — so only indentation varies with configuration. The sink
//! is flushed after every line; a tailer must never wait on a buffer.

use std::io::Write;

use tracing::warn;

use crate::common::config::{ReportConfig, UndefinedRowPolicy};
use crate::runner::{Listener, NullListener, StepOutcome, StepStatus};

/// Nesting depths for the emitted lines
const DEPTH_FEATURE: usize = 0;
const DEPTH_SCENARIO: usize = 1;
const DEPTH_STEP: usize = 2;
const DEPTH_TABLE_ROW: usize = 3;

/// Streaming reporter decorating a base listener
///
/// Per-scenario cursor state: `header_row` is true only for the row
/// immediately following an outline-table start (that row has no execution
/// result, so failure reporting is suppressed for it), and `row` buffers the
/// cells of the in-progress table row so they land on one output line.
pub struct StepReporter<W: Write, B: Listener = NullListener> {
    out: W,
    base: B,
    indent: usize,
    undefined_rows: UndefinedRowPolicy,
    header_row: bool,
    row: Option<String>,
}

impl<W: Write> StepReporter<W, NullListener> {
    /// Reporter with no wrapped listener, for standalone use
    pub fn standalone(out: W) -> Self {
        Self::new(out, NullListener)
    }
}

impl<W: Write, B: Listener> StepReporter<W, B> {
    pub fn new(out: W, base: B) -> Self {
        Self {
            out,
            base,
            indent: ReportConfig::default().indent,
            undefined_rows: UndefinedRowPolicy::default(),
            header_row: false,
            row: None,
        }
    }

    /// Apply report configuration (indent unit, undefined-row policy)
    pub fn with_config(mut self, config: &ReportConfig) -> Self {
        self.indent = config.indent;
        self.undefined_rows = config.undefined_rows;
        self
    }

    /// Consume the reporter, returning its output sink
    pub fn into_output(self) -> W {
        self.out
    }

    /// Consume the reporter, returning the sink and the wrapped listener
    pub fn into_parts(self) -> (W, B) {
        (self.out, self.base)
    }

    /// Write one indented line and flush
    ///
    /// Every notification is side-effecting only; a sink failure here has no
    /// error path back into the runner, so it is logged and swallowed rather
    /// than breaking the suite over a reporting problem.
    fn emit(&mut self, depth: usize, line: &str) {
        let pad = self.indent * depth;
        let result = writeln!(self.out, "{:pad$}{line}", "").and_then(|()| self.out.flush());
        if let Err(e) = result {
            warn!(error = %e, "report sink write failed");
        }
    }

    /// Emit the failure line for a step or data row outcome, if any
    fn emit_failure(&mut self, depth: usize, outcome: &StepOutcome, report_undefined: bool) {
        if let Some(message) = &outcome.error {
            self.emit(depth, &format!("Step failed: {message}"));
        } else if outcome.status == StepStatus::Undefined && report_undefined {
            self.emit(depth, "Step failed: Step undefined");
        }
    }
}

impl<W: Write, B: Listener> Listener for StepReporter<W, B> {
    fn feature_name(&mut self, name: &str) {
        self.emit(DEPTH_FEATURE, &format!("Feature: {name}"));
        self.base.feature_name(name);
    }

    fn scenario_name(&mut self, name: &str) {
        self.emit(DEPTH_SCENARIO, &format!("Scenario: {name}"));
        self.base.scenario_name(name);
    }

    fn before_step(&mut self, text: &str) {
        self.emit(DEPTH_STEP, &format!("Step: {text}"));
        self.base.before_step(text);
    }

    fn step_result(&mut self, outcome: &StepOutcome) {
        // Success is silent beyond the "Step:" line already printed.
        self.emit_failure(DEPTH_STEP, outcome, true);
        self.base.step_result(outcome);
    }

    fn before_outline_table(&mut self) {
        self.emit(DEPTH_STEP, "Outline table");
        self.header_row = true;
        self.base.before_outline_table();
    }

    fn before_table_row(&mut self) {
        self.row = Some("Table row: |".to_string());
        self.base.before_table_row();
    }

    fn table_cell(&mut self, value: &str) {
        if let Some(row) = &mut self.row {
            row.push_str(value);
            row.push('|');
        }
        self.base.table_cell(value);
    }

    fn after_table_row(&mut self, outcome: &StepOutcome) {
        if let Some(row) = self.row.take() {
            self.emit(DEPTH_TABLE_ROW, &row);
        }

        if self.header_row {
            // The header row carries no execution result; never report
            // failure for it.
            self.header_row = false;
        } else {
            let report_undefined = self.undefined_rows == UndefinedRowPolicy::Report;
            self.emit_failure(DEPTH_TABLE_ROW, outcome, report_undefined);
        }

        self.base.after_table_row(outcome);
    }
}
