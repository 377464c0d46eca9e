pub mod memory;
pub mod tls;
