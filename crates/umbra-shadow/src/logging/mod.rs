//! Logging setup.
//!
//! The crate only emits through the `log` facade. Hosts that do not install
//! their own logger can call [`init_logging`] early.

mod init;

pub use init::{init_logging, LoggingConfig};
