//! Logging utilities.
//!
//! Centralizes logger initialization. The engine itself only uses the `log`
//! facade; binaries pick the backend through [`init_logging`].

mod init;

pub use init::{init_logging, LoggingConfig};
