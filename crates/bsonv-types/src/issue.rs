//! Structured validation issues.

use std::fmt;

use serde::Serialize;

use crate::value::ParsedType;

/// One step into a value: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Render a path as `a[0].$id`, or `(root)` when empty.
pub fn format_path(path: &[PathSegment]) -> String {
    if path.is_empty() {
        return "(root)".to_string();
    }
    let mut out = String::new();
    for segment in path {
        match segment {
            PathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathSegment::Index(i) => {
                out.push('[');
                out.push_str(&i.to_string());
                out.push(']');
            }
        }
    }
    out
}

/// What kind of failure an issue describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum IssueCode {
    /// The input was not one of the accepted representations.
    InvalidType {
        expected: String,
        received: ParsedType,
    },
    /// A validator-specific failure; the message says what went wrong.
    Custom,
}

impl IssueCode {
    pub fn invalid_type(expected: impl Into<String>, received: ParsedType) -> Self {
        IssueCode::InvalidType {
            expected: expected.into(),
            received,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IssueCode::InvalidType { .. } => "invalid_type",
            IssueCode::Custom => "custom",
        }
    }

    /// Message used when neither the issue nor any error map supplies one.
    pub fn default_message(&self) -> String {
        match self {
            IssueCode::InvalidType { expected, received } => {
                format!("Expected {expected}, received {received}")
            }
            IssueCode::Custom => "Invalid input".to_string(),
        }
    }
}

/// An issue as reported by a validator, before a message has been settled on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueData {
    pub code: IssueCode,
    /// An explicit message bypasses every error map.
    pub message: Option<String>,
}

impl IssueData {
    pub fn invalid_type(expected: impl Into<String>, received: ParsedType) -> Self {
        Self {
            code: IssueCode::invalid_type(expected, received),
            message: None,
        }
    }

    pub fn custom(message: impl Into<String>) -> Self {
        Self {
            code: IssueCode::Custom,
            message: Some(message.into()),
        }
    }
}

/// A recorded issue: what went wrong, where, and the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    #[serde(flatten)]
    pub code: IssueCode,
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", format_path(&self.path), self.message)
    }
}
