//! Diagnostics collector shared by every check.
//!
//! Checks never fail: a violated rule becomes a [`Finding`] appended here,
//! and the run carries on with the next rule or document.

use std::fmt;
use std::io::Write;

use serde_json::{Map, Value};

use crate::error::{Finding, Location};

/// Append-only collection of findings for one validation run.
#[derive(Debug, Default)]
pub struct Reporter {
    findings: Vec<Finding>,
}

impl Reporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finding unconditionally.
    pub fn add(&mut self, location: Option<Location>, message: fmt::Arguments<'_>) {
        self.findings.push(Finding::new(location, message.to_string()));
    }

    /// Record a finding if `condition` does not hold.
    pub fn check(
        &mut self,
        condition: bool,
        location: Option<Location>,
        message: fmt::Arguments<'_>,
    ) {
        if !condition {
            self.add(location, message);
        }
    }

    /// Check that `container` has `field` and that it equals `expected`.
    ///
    /// `name` describes the container in the message (e.g. `metadata`).
    pub fn check_field(
        &mut self,
        location: Option<Location>,
        name: &str,
        container: &Map<String, Value>,
        field: &str,
        expected: &str,
    ) {
        match container.get(field) {
            None => self.add(location, format_args!("{name} does not contain {field}")),
            Some(Value::String(actual)) if actual == expected => {}
            Some(actual) => self.add(
                location,
                format_args!("{name} {field} is {} not {expected}", display_value(actual)),
            ),
        }
    }

    /// Findings recorded so far, in insertion order.
    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Process exit status for the findings so far: `0` if none, else `1`.
    #[must_use]
    pub fn exit_status(&self) -> i32 {
        exit_status_for(&self.findings)
    }

    /// Write every finding in insertion order, one per line, then return the
    /// exit status. Nothing is written for a clean run.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn report(&self, writer: &mut dyn Write) -> anyhow::Result<i32> {
        for finding in &self.findings {
            writeln!(writer, "{}", finding.format_human_readable())?;
        }
        Ok(self.exit_status())
    }

    #[must_use]
    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}

pub fn exit_status_for(findings: &[Finding]) -> i32 {
    i32::from(!findings.is_empty())
}

impl From<Vec<Finding>> for Reporter {
    fn from(findings: Vec<Finding>) -> Self {
        Self { findings }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
