//! The aggregate validation error and user-supplied error maps.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::issue::{Issue, IssueData, PathSegment};
use crate::value::Value;

/// What an error map sees besides the issue itself.
#[derive(Debug, Clone, Copy)]
pub struct ErrorMapContext<'a> {
    /// The value the issue was raised against.
    pub data: &'a Value,
    /// Message produced by the maps consulted so far.
    pub default_error: &'a str,
}

/// Maps an issue to a user-facing message.
pub type ErrorMap = Arc<dyn Fn(&IssueData, &ErrorMapContext<'_>) -> String + Send + Sync>;

/// Box a closure as an [`ErrorMap`].
pub fn error_map<F>(map: F) -> ErrorMap
where
    F: Fn(&IssueData, &ErrorMapContext<'_>) -> String + Send + Sync + 'static,
{
    Arc::new(map)
}

/// Every issue collected during one top-level validation call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation failed with {} issue(s):\n{}", .issues.len(), IssueList(.issues))]
pub struct ValidationError {
    issues: Vec<Issue>,
}

/// Issues split into root-level messages and messages keyed by top-level field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlattenedErrors {
    pub form_errors: Vec<String>,
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Group messages by the first path segment.
    pub fn flatten(&self) -> FlattenedErrors {
        let mut out = FlattenedErrors::default();
        for issue in &self.issues {
            match issue.path.first() {
                None => out.form_errors.push(issue.message.clone()),
                Some(segment) => {
                    let key = match segment {
                        PathSegment::Key(k) => k.clone(),
                        PathSegment::Index(i) => i.to_string(),
                    };
                    out.field_errors
                        .entry(key)
                        .or_default()
                        .push(issue.message.clone());
                }
            }
        }
        out
    }
}

struct IssueList<'a>(&'a [Issue]);

impl fmt::Display for IssueList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {issue}")?;
        }
        Ok(())
    }
}
