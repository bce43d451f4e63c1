// tailcut-cli/src/lib.rs
//
// Library portion of the tailcut CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, DetectorArgs, ProbeArgs, TrimArgs};
pub use commands::probe::run_probe;
pub use commands::trim::{RunContext, discover_trim_files, run_trim};
