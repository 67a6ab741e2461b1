//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "bsonv", version, about = "Validate BSON identifiers and references", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate one JSON document
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Which validator to run
    #[arg(value_enum)]
    pub schema: SchemaKind,

    /// Document as JSON text; read from stdin when omitted
    pub input: Option<String>,

    /// Produce native values instead of hex strings
    #[arg(long)]
    pub bson: bool,

    /// Use the asynchronous entry point
    #[arg(long = "async")]
    pub async_mode: bool,

    /// Path prefix for reported issues; repeat for each segment, numbers are indexes
    #[arg(long = "path", value_name = "SEG")]
    pub path: Vec<String>,

    /// Config file (default: $XDG_CONFIG_HOME/bsonv/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    #[value(name = "objectid")]
    ObjectId,
    #[value(name = "dbref")]
    DbRef,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_full_check_line() {
        let cli = Cli::try_parse_from([
            "bsonv", "check", "dbref", "{}", "--bson", "--async", "--path", "refs", "--path", "0",
        ])
        .unwrap();
        let Command::Check(args) = cli.command;
        assert_eq!(args.schema, SchemaKind::DbRef);
        assert_eq!(args.input.as_deref(), Some("{}"));
        assert!(args.bson);
        assert!(args.async_mode);
        assert_eq!(args.path, ["refs", "0"]);
        assert!(args.config.is_none());
    }

    #[test]
    fn rejects_unknown_schema() {
        let err = Cli::try_parse_from(["bsonv", "check", "uuid"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
