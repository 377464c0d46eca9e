//! End-of-day report stages.
//!
//! All three stages are placeholder hooks until the database layer
//! exists; the pipeline wiring is real, the content is not.

use crate::model::ReportRequest;
use crate::services::reports::{Report, ReportData, ReportPipeline};

/// Canonical report-type name used for registry lookup.
pub const REPORT_TYPE: &str = "EndOfDay";

fn fetch(_request: &ReportRequest) -> ReportData {
    // TODO: query trades, positions and P&L for the requested date range
    // once the persistence layer lands.
    Vec::new()
}

fn compute(_data: ReportData) -> ReportData {
    Vec::new()
}

fn format(_data: ReportData) -> Report {
    Vec::new()
}

/// Builds the end-of-day pipeline for registration.
pub fn pipeline() -> ReportPipeline {
    ReportPipeline::new(Box::new(fetch), Box::new(compute), Box::new(format))
}
