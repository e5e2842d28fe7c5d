//! Sorted anomaly report.
//!
//! Collectors hand over records in arrival order, which changes from run to
//! run. [`AuditReport::new`] merges both streams and stably sorts them by
//! identifier so the rendered report is reproducible for the same remote
//! state.

use std::fmt;

use serde::Serialize;

use super::outcome::IconOutcome;

/// Anomalies of one run, ascending by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    records: Vec<IconOutcome>,
    total_count: usize,
}

impl AuditReport {
    /// Merges findings and fetch errors into one id-ordered report.
    #[must_use]
    pub fn new(findings: Vec<IconOutcome>, errors: Vec<IconOutcome>) -> Self {
        let mut records = findings;
        records.extend(errors);
        records.sort_by_key(|record| record.id);
        let total_count = records.len();
        Self {
            records,
            total_count,
        }
    }

    /// Returns the records in report order.
    #[must_use]
    pub fn records(&self) -> &[IconOutcome] {
        &self.records
    }

    /// Returns the number of reported anomalies.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Returns true if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose format differed from the expected one.
    pub fn mismatches(&self) -> impl Iterator<Item = &IconOutcome> {
        self.records.iter().filter(|r| !r.is_failure())
    }

    /// Records carrying a failure.
    pub fn failures(&self) -> impl Iterator<Item = &IconOutcome> {
        self.records.iter().filter(|r| r.is_failure())
    }

    /// Renders the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; not expected for this data.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// One line per record, then `total count = N`.
impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "{record}")?;
        }
        writeln!(f, "total count = {}", self.total_count)
    }
}
