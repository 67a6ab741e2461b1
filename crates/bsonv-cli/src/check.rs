//! The `check` command: read a document, run a validator, report.

use std::io::Read;

use anyhow::{Context, Result};
use serde::Serialize;

use bsonv_kernel::{db_ref, object_id, ParseParams, SafeParseResult, Schema};
use bsonv_types::{Issue, PathSegment, Value};

use crate::cli::{CheckArgs, SchemaKind};
use crate::config::{Config, Mode};
use crate::EXIT_INVALID;

/// Effective options for one check, after config and flags are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub parse_to_bson: bool,
    pub mode: Mode,
    pub path: Vec<PathSegment>,
}

impl Settings {
    /// Flags can only switch options on; the config supplies the rest.
    pub fn merge(args: &CheckArgs, config: &Config) -> Self {
        Self {
            parse_to_bson: args.bson || config.parse_to_bson,
            mode: if args.async_mode { Mode::Async } else { config.mode },
            path: args.path.iter().map(|s| segment(s)).collect(),
        }
    }

    fn params(&self) -> ParseParams {
        ParseParams::new()
            .path(self.path.clone())
            .parse_to_bson(self.parse_to_bson)
            .is_async(self.mode == Mode::Async)
    }
}

fn segment(raw: &str) -> PathSegment {
    match raw.parse::<usize>() {
        Ok(index) => PathSegment::Index(index),
        Err(_) => PathSegment::from(raw),
    }
}

/// What `check` prints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
}

impl Report {
    fn from_result<T: Into<Value>>(result: SafeParseResult<T>) -> Self {
        match result {
            SafeParseResult::Success { data } => Self {
                success: true,
                data: Some(data.into().to_json()),
                issues: Vec::new(),
            },
            SafeParseResult::Failure(failure) => Self {
                success: false,
                data: None,
                issues: failure.issues().to_vec(),
            },
        }
    }

    pub fn exit_code(&self) -> u8 {
        if self.success { 0 } else { EXIT_INVALID }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Decode the document from the INPUT argument, or from `stdin` without one.
pub fn read_input(arg: Option<&str>, mut stdin: impl Read) -> Result<Value> {
    let text = match arg {
        Some(text) => text.to_string(),
        None => {
            let mut buf = String::new();
            stdin
                .read_to_string(&mut buf)
                .context("Failed to read document from stdin")?;
            buf
        }
    };
    let json: serde_json::Value =
        serde_json::from_str(&text).context("Input is not valid JSON")?;
    Ok(Value::from(json))
}

/// Validate `data` with the chosen validator.
pub async fn check(schema: SchemaKind, data: &Value, settings: &Settings) -> Report {
    tracing::debug!(?schema, ?settings, "check");
    let params = settings.params();
    match (schema, settings.mode) {
        (SchemaKind::ObjectId, Mode::Sync) => Report::from_result(object_id().safe_parse(data, params)),
        (SchemaKind::ObjectId, Mode::Async) => {
            Report::from_result(object_id().safe_parse_async(data, params).await)
        }
        (SchemaKind::DbRef, Mode::Sync) => Report::from_result(db_ref().safe_parse(data, params)),
        (SchemaKind::DbRef, Mode::Async) => {
            Report::from_result(db_ref().safe_parse_async(data, params).await)
        }
    }
}

pub async fn run(args: &CheckArgs, stdin: impl Read) -> Result<Report> {
    let config = Config::load(args.config.as_deref())?;
    let settings = Settings::merge(args, &config);
    let data = read_input(args.input.as_deref(), stdin)?;
    Ok(check(args.schema, &data, &settings).await)
}
