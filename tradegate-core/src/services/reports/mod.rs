//! Report generation pipeline.
//!
//! Every report runs the same fixed three-stage pipeline: fetch raw data,
//! compute the report content, format it for delivery. Concrete report
//! kinds supply their three stage functions and are selected at runtime
//! through a [`ReportRegistry`] keyed by report type.

pub mod end_of_day;

use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;

use crate::model::{ReportRequest, Response};
use crate::services::ReportService;

/// Raw or computed data rows flowing between pipeline stages.
pub type ReportData = Vec<String>;

/// A fully formatted report: one string per output row.
pub type Report = Vec<String>;

/// Stage 1: retrieve raw data for the requested date range.
pub type FetchFn = Box<dyn Fn(&ReportRequest) -> ReportData + Send + Sync>;

/// Stage 2: apply business logic to the raw rows.
pub type ComputeFn = Box<dyn Fn(ReportData) -> ReportData + Send + Sync>;

/// Stage 3: turn computed rows into the final report layout.
pub type FormatFn = Box<dyn Fn(ReportData) -> Report + Send + Sync>;

/// Three stage functions composed in a fixed order by [`run`].
///
/// [`run`]: ReportPipeline::run
pub struct ReportPipeline {
    fetch: FetchFn,
    compute: ComputeFn,
    format: FormatFn,
}

impl ReportPipeline {
    /// Assembles a pipeline from its three stages.
    pub fn new(fetch: FetchFn, compute: ComputeFn, format: FormatFn) -> Self {
        Self {
            fetch,
            compute,
            format,
        }
    }

    /// Executes fetch → compute → format for the given request.
    pub fn run(&self, request: &ReportRequest) -> Report {
        let raw = (self.fetch)(request);
        let computed = (self.compute)(raw);
        (self.format)(computed)
    }
}

/// Lookup table from report-type name to its pipeline.
///
/// Registration is overwrite-on-repeat, mirroring the command registry.
#[derive(Default)]
pub struct ReportRegistry {
    pipelines: HashMap<String, ReportPipeline>,
}

impl ReportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the pipeline for a report type.
    pub fn register(&mut self, report_type: impl Into<String>, pipeline: ReportPipeline) {
        self.pipelines.insert(report_type.into(), pipeline);
    }

    /// Looks up the pipeline for a report type.
    pub fn get(&self, report_type: &str) -> Option<&ReportPipeline> {
        self.pipelines.get(report_type)
    }
}

/// `ReportService` backed by a [`ReportRegistry`].
///
/// Selects the pipeline by `ReportRequest::report_type`, runs it, and
/// returns the report rows newline-joined in the response data.
pub struct PipelineReportService {
    registry: ReportRegistry,
}

impl PipelineReportService {
    pub fn new(registry: ReportRegistry) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl ReportService for PipelineReportService {
    async fn generate_report(&self, request: &ReportRequest) -> Response {
        let Some(pipeline) = self.registry.get(request.get_report_type()) else {
            return Response::failure(format!(
                "no report pipeline registered for {}",
                request.get_report_type()
            ));
        };
        debug!(
            "generating {} report for {}..{}",
            request.get_report_type(),
            request.get_date_from(),
            request.get_date_to()
        );
        let report = pipeline.run(request);
        Response::ok("report generated", report.join("\n").into_bytes())
    }
}
