//! Placeholder implementations of the service contracts.
//!
//! These satisfy the dependency-injection requirements of the facade so
//! the gateway binary can start without a database or business-logic
//! layer. Every data-bearing method returns a fixed failure response.
//! Replace each stub in the composition root once the corresponding
//! real service is available.

use async_trait::async_trait;
use log::info;

use crate::model::{ReportRequest, Request, Response};
use crate::services::{
    CalculationService, ManipulationService, MarketDataService, ReportService,
};

/// Placeholder `MarketDataService`.
pub struct StubMarketDataService;

#[async_trait]
impl MarketDataService for StubMarketDataService {
    async fn get_data(&self, _request: &Request) -> Response {
        Response::failure("MarketDataService: not yet implemented")
    }

    async fn subscribe(&self, symbol: &str) {
        info!("StubMarketDataService subscribe: {}", symbol);
    }

    async fn unsubscribe(&self, symbol: &str) {
        info!("StubMarketDataService unsubscribe: {}", symbol);
    }
}

/// Placeholder `CalculationService`.
pub struct StubCalculationService;

#[async_trait]
impl CalculationService for StubCalculationService {
    async fn calculate(&self, _request: &Request) -> Response {
        Response::failure("CalculationService: not yet implemented")
    }
}

/// Placeholder `ManipulationService`.
pub struct StubManipulationService;

#[async_trait]
impl ManipulationService for StubManipulationService {
    async fn manipulate(&self, _request: &Request) -> Response {
        Response::failure("ManipulationService: not yet implemented")
    }

    async fn transform(&self, _request: &Request) -> Response {
        Response::failure("ManipulationService::transform: not yet implemented")
    }
}

/// Placeholder `ReportService`.
pub struct StubReportService;

#[async_trait]
impl ReportService for StubReportService {
    async fn generate_report(&self, request: &ReportRequest) -> Response {
        Response::failure(format!(
            "ReportService: not yet implemented for {}",
            request.get_report_type()
        ))
    }
}
