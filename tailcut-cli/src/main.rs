// tailcut-cli/src/main.rs
//
// Entry point for the tailcut binary.
//
// Parses the command line, resolves the input files and log locations,
// installs the logger and dispatches to the subcommand. Any error ends the
// process with exit code 1; per-file failures during a trim run are part of
// the summary and do not.

use clap::Parser;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::process;

use tailcut_cli::error::CliResult;
use tailcut_cli::logging::{get_timestamp, init_logging, run_log_path};
use tailcut_cli::{Cli, Commands, RunContext, TrimArgs, discover_trim_files, run_probe, run_trim};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        if std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none() {
            eprintln!("{} {e}", "Error:".red().bold());
        } else {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Trim(args) => trim_command(args, cli.verbose, cli.no_log_file),
        Commands::Probe(args) => {
            init_logging(None, cli.verbose)?;
            run_probe(args)
        }
    }
}

fn trim_command(args: TrimArgs, verbose: bool, no_log_file: bool) -> CliResult<()> {
    // Bad input paths are reported before anything is created on disk
    let (files, effective_input_dir) = discover_trim_files(&args)?;

    let log_dir = args
        .log_dir
        .clone()
        .unwrap_or_else(|| args.output_dir.join("logs"));
    let timestamp = get_timestamp();
    let log_file = (!no_log_file).then(|| run_log_path(&log_dir, &timestamp));

    init_logging(log_file.as_deref(), verbose)?;
    log::debug!("tailcut {} starting", env!("CARGO_PKG_VERSION"));

    let ctx = RunContext {
        log_dir,
        log_file,
        timestamp,
        write_summary: !no_log_file,
    };
    run_trim(args, files, effective_input_dir, &ctx)?;
    Ok(())
}
