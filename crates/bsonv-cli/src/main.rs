//! bsonv entry point.
//!
//! ```bash
//! bsonv check objectid '"507f1f77bcf86cd799439011"'
//! echo '{"$ref": "users", "$id": "507f1f77bcf86cd799439011"}' | bsonv check dbref --bson
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bsonv_cli::{Cli, EXIT_USAGE};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the JSON report.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bsonv=warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    match bsonv_cli::run(cli, std::io::stdin().lock()).await {
        Ok(report) => {
            println!("{}", report.to_json());
            ExitCode::from(report.exit_code())
        }
        Err(e) => {
            eprintln!("bsonv: {e:#}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}
