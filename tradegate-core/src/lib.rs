//! # Tradegate Core Library
//!
//! The shared foundation of the secure trading gateway: a length-framed
//! TLS transport, the command registry/dispatch layer, and the service
//! contracts the gateway delegates to.
//!
//! ## Modules
//! - `model`: Wire-level data types (Request, Response, ReportRequest).
//! - `comms`: Frame codec and transport implementations (TLS, Memory).
//! - `server`: Command registry and the request-dispatch facade.
//! - `services`: Service traits, stub implementations, and the report pipeline.

pub mod comms;
pub mod model;
pub mod server;
pub mod services;
