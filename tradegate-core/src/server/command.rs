//! Command pattern: one executable unit per request type.
//!
//! Each concrete command is a thin adapter binding exactly one service
//! call to a request. No retries, no validation, no transformation; any
//! such logic belongs to the service behind the call.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::model::{ReportRequest, Request, Response};
use crate::services::{
    CalculationService, ManipulationService, MarketDataService, ReportService,
};

/// A one-shot server operation. Built by the registry, consumed by the
/// facade.
#[async_trait]
pub trait Command: Send {
    /// Execute the command and return the service's response.
    async fn execute(self: Box<Self>) -> Result<Response>;
}

/// Delegates to [`MarketDataService::get_data`].
pub struct GetMarketDataCommand {
    service: Arc<dyn MarketDataService>,
    request: Request,
}

impl GetMarketDataCommand {
    pub fn new(service: Arc<dyn MarketDataService>, request: Request) -> Self {
        Self { service, request }
    }
}

#[async_trait]
impl Command for GetMarketDataCommand {
    async fn execute(self: Box<Self>) -> Result<Response> {
        Ok(self.service.get_data(&self.request).await)
    }
}

/// Delegates to [`CalculationService::calculate`].
pub struct CalculationCommand {
    service: Arc<dyn CalculationService>,
    request: Request,
}

impl CalculationCommand {
    pub fn new(service: Arc<dyn CalculationService>, request: Request) -> Self {
        Self { service, request }
    }
}

#[async_trait]
impl Command for CalculationCommand {
    async fn execute(self: Box<Self>) -> Result<Response> {
        Ok(self.service.calculate(&self.request).await)
    }
}

/// Delegates to [`ManipulationService::manipulate`].
pub struct ManipulationCommand {
    service: Arc<dyn ManipulationService>,
    request: Request,
}

impl ManipulationCommand {
    pub fn new(service: Arc<dyn ManipulationService>, request: Request) -> Self {
        Self { service, request }
    }
}

#[async_trait]
impl Command for ManipulationCommand {
    async fn execute(self: Box<Self>) -> Result<Response> {
        Ok(self.service.manipulate(&self.request).await)
    }
}

/// Delegates to [`ReportService::generate_report`].
///
/// Unlike the other commands this one carries a structured
/// `ReportRequest` rather than the raw request; the registry factory is
/// responsible for producing it.
pub struct ReportCommand {
    service: Arc<dyn ReportService>,
    report_request: ReportRequest,
}

impl ReportCommand {
    pub fn new(service: Arc<dyn ReportService>, report_request: ReportRequest) -> Self {
        Self {
            service,
            report_request,
        }
    }
}

#[async_trait]
impl Command for ReportCommand {
    async fn execute(self: Box<Self>) -> Result<Response> {
        Ok(self.service.generate_report(&self.report_request).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RequestType;
    use crate::services::stubs::{StubCalculationService, StubMarketDataService};

    #[tokio::test]
    async fn commands_delegate_verbatim() -> Result<()> {
        let request = Request::new(RequestType::GetMarketData, b"AAPL".to_vec());
        let command = Box::new(GetMarketDataCommand::new(
            Arc::new(StubMarketDataService),
            request,
        ));
        let response = command.execute().await?;
        assert_eq!(response.get_message(), "MarketDataService: not yet implemented");

        let request = Request::new(RequestType::Calculate, vec![]);
        let command = Box::new(CalculationCommand::new(
            Arc::new(StubCalculationService),
            request,
        ));
        let response = command.execute().await?;
        assert_eq!(response.get_message(), "CalculationService: not yet implemented");
        Ok(())
    }
}
