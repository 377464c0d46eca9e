//! Report request model.

use serde::{Deserialize, Serialize};

/// Identifies and scopes a report generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Which report to generate (e.g. "EndOfDay", "Blotter").
    report_type: String,
    /// Inclusive start date, ISO 8601 (YYYY-MM-DD).
    date_from: String,
    /// Inclusive end date, ISO 8601 (YYYY-MM-DD).
    date_to: String,
}

impl ReportRequest {
    /// Creates a new report request.
    ///
    /// # Arguments
    ///
    /// * `report_type` - The report kind to generate.
    /// * `date_from` - Inclusive start date (YYYY-MM-DD).
    /// * `date_to` - Inclusive end date (YYYY-MM-DD).
    pub fn new(
        report_type: impl Into<String>,
        date_from: impl Into<String>,
        date_to: impl Into<String>,
    ) -> Self {
        Self {
            report_type: report_type.into(),
            date_from: date_from.into(),
            date_to: date_to.into(),
        }
    }

    pub fn get_report_type(&self) -> &str {
        &self.report_type
    }

    pub fn get_date_from(&self) -> &str {
        &self.date_from
    }

    pub fn get_date_to(&self) -> &str {
        &self.date_to
    }
}
