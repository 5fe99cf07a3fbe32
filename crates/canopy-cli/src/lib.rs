//! Canopy CLI library.
//!
//! Exposes [`run_cli`] (parses `std::env::args`) and [`run_cli_with_args`]
//! (parses an explicit argument vector, for tests) on top of the
//! `validate`/`solve` subcommands in [`cli`].

mod cli;
mod error;
mod stand_ins;
mod wire;

use clap::Parser as _;

pub use cli::{Cli, Commands};
pub use error::{CliError, CliResult};

/// Parses `std::env::args` and dispatches to the matching subcommand.
pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::try_init().ok();
    let parsed = Cli::parse_from(std::env::args());
    Ok(cli::run(parsed)?)
}

/// Parses an explicit argument vector (argv[0] included) and dispatches.
/// Lets tests exercise subcommand parsing without spawning a process.
pub fn run_cli_with_args(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Cli::parse_from(args);
    Ok(cli::run(parsed)?)
}
