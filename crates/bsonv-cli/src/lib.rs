//! bsonv command-line validator.
//!
//! `bsonv check <objectid|dbref> [INPUT]` validates one JSON document and
//! prints a JSON report on stdout. Exit status: 0 valid, 1 invalid, 2 usage
//! or input error.

pub mod check;
pub mod cli;
pub mod config;

use std::io::Read;

use anyhow::Result;

pub use check::{Report, Settings};
pub use cli::{CheckArgs, Cli, Command, SchemaKind};
pub use config::{Config, Mode};

pub const EXIT_INVALID: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

/// Execute a parsed command line. `stdin` supplies the document when no
/// INPUT argument is given.
pub async fn run(cli: Cli, stdin: impl Read) -> Result<Report> {
    match cli.command {
        Command::Check(args) => check::run(&args, stdin).await,
    }
}
