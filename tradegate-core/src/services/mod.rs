//! Service contracts consumed by the command layer.
//!
//! These are the gateway's external collaborators. The dispatch layer
//! only knows their call contracts; stub implementations live in
//! [`stubs`] until the real services arrive.

pub mod reports;
pub mod stubs;

use async_trait::async_trait;

use crate::model::{ReportRequest, Request, Response};

/// Access to real-time and historical market data.
#[async_trait]
pub trait MarketDataService: Send + Sync {
    /// Retrieve market data according to the parameters in the request.
    async fn get_data(&self, request: &Request) -> Response;

    /// Subscribe to real-time updates for a trading symbol.
    async fn subscribe(&self, symbol: &str);

    /// Unsubscribe from real-time updates for a trading symbol.
    async fn unsubscribe(&self, symbol: &str);
}

/// Financial calculations (P&L, VaR, Greeks) over trading data.
#[async_trait]
pub trait CalculationService: Send + Sync {
    async fn calculate(&self, request: &Request) -> Response;
}

/// Filtering, aggregation and transformation of trading datasets.
#[async_trait]
pub trait ManipulationService: Send + Sync {
    async fn manipulate(&self, request: &Request) -> Response;

    async fn transform(&self, request: &Request) -> Response;
}

/// Structured report generation (end-of-day summary, blotter, ...).
#[async_trait]
pub trait ReportService: Send + Sync {
    /// Generate a report for the given type and date range.
    async fn generate_report(&self, request: &ReportRequest) -> Response;
}
