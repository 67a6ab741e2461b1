//! SafeParseResult: what a caller gets back from a validation call.
//!
//! ```text
//! ParseStatus::Valid(v)  ──▶ SafeParseResult::Success { data: v }
//! ParseStatus::Invalid   ──▶ SafeParseResult::Failure(ParseFailure)
//!                              └─ error(): ValidationError, built on first use
//! ```

use std::sync::OnceLock;

use bsonv_types::{Issue, ValidationError};

use crate::context::ParseContext;
use crate::status::ParseStatus;

/// Outcome of `safe_parse` / `safe_parse_async`.
#[derive(Debug, Clone, PartialEq)]
pub enum SafeParseResult<T> {
    Success { data: T },
    Failure(ParseFailure),
}

/// A failed call: the issues it recorded and the aggregate error over them.
#[derive(Debug, Clone)]
pub struct ParseFailure {
    issues: Vec<Issue>,
    error: OnceLock<ValidationError>,
}

impl ParseFailure {
    fn new(issues: Vec<Issue>) -> Self {
        Self {
            issues,
            error: OnceLock::new(),
        }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// The aggregate error. Built from the issues on first access and
    /// cached for the lifetime of this value.
    pub fn error(&self) -> &ValidationError {
        self.error
            .get_or_init(|| ValidationError::new(self.issues.clone()))
    }

    pub fn into_error(self) -> ValidationError {
        match self.error.into_inner() {
            Some(error) => error,
            None => ValidationError::new(self.issues),
        }
    }
}

impl PartialEq for ParseFailure {
    fn eq(&self, other: &Self) -> bool {
        self.issues == other.issues
    }
}

impl<T> SafeParseResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, SafeParseResult::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            SafeParseResult::Success { data } => Some(data),
            SafeParseResult::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            SafeParseResult::Success { .. } => None,
            SafeParseResult::Failure(failure) => Some(failure.error()),
        }
    }

    /// Issues recorded by a failed call; empty on success.
    pub fn issues(&self) -> &[Issue] {
        match self {
            SafeParseResult::Success { .. } => &[],
            SafeParseResult::Failure(failure) => failure.issues(),
        }
    }

    pub fn into_result(self) -> Result<T, ValidationError> {
        match self {
            SafeParseResult::Success { data } => Ok(data),
            SafeParseResult::Failure(failure) => Err(failure.into_error()),
        }
    }
}

/// Turn a finished call's status into its result, consuming the context.
///
/// # Panics
///
/// If the status is invalid but no issue was recorded. A validator that
/// fails without saying why has broken its contract; that is a bug, not a
/// validation failure.
pub fn resolve<T>(ctx: ParseContext, status: ParseStatus<T>) -> SafeParseResult<T> {
    match status {
        ParseStatus::Valid(data) => SafeParseResult::Success { data },
        ParseStatus::Invalid => {
            let issues = ctx.into_issues();
            if issues.is_empty() {
                panic!("validation failed but no issues were recorded");
            }
            tracing::debug!(issues = issues.len(), "validation failed");
            SafeParseResult::Failure(ParseFailure::new(issues))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ParseParams;
    use bsonv_types::{IssueCode, PathSegment};

    fn issue(message: &str) -> Issue {
        Issue {
            code: IssueCode::Custom,
            path: vec![PathSegment::from("$id")],
            message: message.to_string(),
        }
    }

    #[test]
    fn valid_status_becomes_success() {
        let ctx = ParseContext::new(ParseParams::new(), false);
        let result = resolve(ctx, ParseStatus::Valid(7));
        assert!(result.is_success());
        assert_eq!(result.data(), Some(&7));
        assert!(result.error().is_none());
        assert!(result.issues().is_empty());
    }

    #[test]
    fn invalid_status_carries_issues() {
        let ctx = ParseContext::new(ParseParams::new(), false);
        ctx.push_issue(issue("first"));
        ctx.push_issue(issue("second"));

        let result: SafeParseResult<i32> = resolve(ctx, ParseStatus::Invalid);
        assert!(!result.is_success());
        assert_eq!(result.issues().len(), 2);
        let error = result.error().unwrap();
        assert_eq!(error.issues()[1].message, "second");
    }

    #[test]
    fn error_is_built_once() {
        let ctx = ParseContext::new(ParseParams::new(), false);
        ctx.push_issue(issue("only"));

        let result: SafeParseResult<i32> = resolve(ctx, ParseStatus::Invalid);
        let first = result.error().unwrap() as *const ValidationError;
        let second = result.error().unwrap() as *const ValidationError;
        assert_eq!(first, second);
    }

    #[test]
    #[should_panic(expected = "no issues were recorded")]
    fn invalid_without_issues_is_a_bug() {
        let ctx = ParseContext::new(ParseParams::new(), false);
        let _ = resolve::<i32>(ctx, ParseStatus::Invalid);
    }

    #[test]
    fn into_result_maps_both_arms() {
        let ctx = ParseContext::new(ParseParams::new(), false);
        assert_eq!(resolve(ctx, ParseStatus::Valid("ok")).into_result(), Ok("ok"));

        let ctx = ParseContext::new(ParseParams::new(), false);
        ctx.push_issue(issue("bad"));
        let err = resolve::<&str>(ctx, ParseStatus::Invalid)
            .into_result()
            .unwrap_err();
        assert_eq!(err.len(), 1);
    }

    #[test]
    fn failures_compare_by_issues() {
        let a = ParseContext::new(ParseParams::new(), false);
        a.push_issue(issue("x"));
        let b = ParseContext::new(ParseParams::new(), true);
        b.push_issue(issue("x"));

        let a: SafeParseResult<i32> = resolve(a, ParseStatus::Invalid);
        let b: SafeParseResult<i32> = resolve(b, ParseStatus::Invalid);
        let _ = a.error();
        assert_eq!(a, b);
    }
}
