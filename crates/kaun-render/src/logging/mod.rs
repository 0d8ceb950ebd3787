//! Logging setup.
//!
//! The renderer reports every diagnostic through the `log` facade. Hosts that
//! do not bring their own logger can install the `env_logger` backend here.

mod init;

pub use init::{init_logging, LoggingConfig};
