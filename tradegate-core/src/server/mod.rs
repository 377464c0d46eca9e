//! Request dispatch layer: commands, the command registry, and the
//! facade that guarantees every request yields a structured response.

pub mod command;
pub mod facade;
pub mod registry;

use thiserror::Error;

pub use command::{
    CalculationCommand, Command, GetMarketDataCommand, ManipulationCommand, ReportCommand,
};
pub use facade::TradingServerFacade;
pub use registry::{CommandFactory, CommandRegistry};

/// Errors raised inside the dispatch layer.
#[derive(Error, Debug)]
pub enum ServerError {
    /// No command factory is registered for the request's tag.
    #[error("no command registered for request type {0}")]
    UnregisteredType(u32),
}
