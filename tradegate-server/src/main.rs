//! Secure trading gateway entry point.
//!
//! Wires the stub services, the command registry, the dispatch facade,
//! and the TLS transport, then runs the serve loop until a shutdown
//! signal arrives.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use tokio::sync::Notify;

use tradegate_core::comms::{TlsTransport, Transport, TransportError};
use tradegate_core::model::{ReportRequest, Request, RequestType, Response};
use tradegate_core::server::{
    CalculationCommand, CommandRegistry, GetMarketDataCommand, ManipulationCommand,
    ReportCommand, TradingServerFacade,
};
use tradegate_core::services::stubs::{
    StubCalculationService, StubManipulationService, StubMarketDataService, StubReportService,
};
use tradegate_core::services::{
    CalculationService, ManipulationService, MarketDataService, ReportService,
};

/// Configuration surface of the gateway process.
#[derive(Parser, Debug)]
#[command(author, version, about = "Secure trading gateway server")]
struct ServerArgs {
    /// Bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// TCP port to listen on
    #[arg(long, default_value_t = 8443)]
    port: u16,

    /// Path to the PEM server certificate
    #[arg(long, default_value = "certs/server.crt")]
    cert: PathBuf,

    /// Path to the PEM private key
    #[arg(long, default_value = "certs/server.key")]
    key: PathBuf,
}

/// Populates the registry with one factory per request type.
fn build_registry(
    market_data: Arc<dyn MarketDataService>,
    calculation: Arc<dyn CalculationService>,
    manipulation: Arc<dyn ManipulationService>,
    report: Arc<dyn ReportService>,
) -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    registry.register(
        RequestType::GetMarketData,
        Box::new(move |request| Box::new(GetMarketDataCommand::new(market_data.clone(), request))),
    );

    registry.register(
        RequestType::Calculate,
        Box::new(move |request| Box::new(CalculationCommand::new(calculation.clone(), request))),
    );

    registry.register(
        RequestType::Manipulate,
        Box::new(move |request| Box::new(ManipulationCommand::new(manipulation.clone(), request))),
    );

    registry.register(
        RequestType::GenerateReport,
        Box::new(move |_request| {
            // TODO: decode the ReportRequest from the request payload once
            // the payload wire format is settled.
            let report_request = ReportRequest::new("EndOfDay", "2026-01-01", "2026-12-31");
            Box::new(ReportCommand::new(report.clone(), report_request))
        }),
    );

    registry
}

/// Receives one frame, dispatches it, and sends the response back.
async fn handle_next(transport: &TlsTransport, facade: &TradingServerFacade) {
    let payload = match transport.recv_bytes().await {
        Ok(payload) => payload,
        Err(TransportError::NoActiveConnection) => {
            // No peer yet; back off until the accept loop promotes one.
            tokio::time::sleep(Duration::from_millis(50)).await;
            return;
        }
        Err(err) => {
            warn!("receive failed: {}", err);
            return;
        }
    };

    let response = match Request::decode(&payload) {
        Ok(request) => facade.handle(request).await,
        Err(err) => Response::failure(format!("Malformed request: {}", err)),
    };

    let encoded = match response.encode() {
        Ok(encoded) => encoded,
        Err(err) => {
            error!("failed to encode response: {}", err);
            return;
        }
    };
    if let Err(err) = transport.send_bytes(&encoded).await {
        warn!("send failed: {}", err);
    }
}

#[cfg(unix)]
async fn terminate_signal() {
    use tokio::signal::unix::{signal, SignalKind};
    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            term.recv().await;
        }
        Err(err) => {
            error!("failed to install SIGTERM handler: {}", err);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate_signal() {
    std::future::pending::<()>().await;
}

/// Waits for SIGINT/SIGTERM. The only action performed on the signal
/// path is an atomic flag write plus a wakeup; the supervisor loop does
/// the actual shutdown.
async fn signal_listener(shutdown: Arc<AtomicBool>, wakeup: Arc<Notify>) {
    tokio::select! {
        interrupted = tokio::signal::ctrl_c() => {
            if let Err(err) = interrupted {
                error!("failed to listen for shutdown signal: {}", err);
                return;
            }
        }
        _ = terminate_signal() => {}
    }
    shutdown.store(true, Ordering::SeqCst);
    wakeup.notify_waiters();
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = ServerArgs::parse();

    info!("starting gateway on {}:{}", args.host, args.port);
    info!("certificate : {}", args.cert.display());
    info!("private key : {}", args.key.display());

    // Service layer. Replace stubs with real implementations once they
    // are available.
    let market_data: Arc<dyn MarketDataService> = Arc::new(StubMarketDataService);
    let calculation: Arc<dyn CalculationService> = Arc::new(StubCalculationService);
    let manipulation: Arc<dyn ManipulationService> = Arc::new(StubManipulationService);
    let report: Arc<dyn ReportService> = Arc::new(StubReportService);

    let registry = build_registry(market_data, calculation, manipulation, report);
    let facade = TradingServerFacade::new(registry);

    let transport = TlsTransport::new(args.host, args.port, args.cert, args.key);
    transport
        .start()
        .await
        .context("failed to start transport")?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let wakeup = Arc::new(Notify::new());
    tokio::spawn(signal_listener(Arc::clone(&shutdown), Arc::clone(&wakeup)));

    info!("gateway running, press Ctrl+C to stop");
    while !shutdown.load(Ordering::SeqCst) {
        tokio::select! {
            _ = wakeup.notified() => {}
            _ = handle_next(&transport, &facade) => {}
        }
    }

    transport.stop().await.context("failed to stop transport")?;
    info!("gateway stopped cleanly");
    Ok(())
}
