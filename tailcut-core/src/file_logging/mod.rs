//! Logging setup for console and run log files (log4rs).

pub mod setup;

pub use setup::setup_logging;
