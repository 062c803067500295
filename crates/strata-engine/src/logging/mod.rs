//! Logging setup.
//!
//! The engine reports through the `log` facade only: rebuild and recompile
//! decisions at `debug`, ignored misconfiguration at `warn`, missing required
//! arrays and failed node executions at `error`. Binaries and tests pick the
//! backend; [`init_logging`] wires up `env_logger` for the common case.

mod init;

pub use init::{init_logging, LoggingConfig};
