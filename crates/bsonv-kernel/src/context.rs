//! Per-call parse state.
//!
//! A [`ParseContext`] lives for exactly one top-level `safe_parse` or
//! `safe_parse_async` call. Every validator reached during that call, however
//! deeply nested, records issues on the same context through the
//! [`ParseInput`] it was handed.

use std::sync::{Mutex, MutexGuard, PoisonError};

use bsonv_types::{ErrorMap, ErrorMapContext, Issue, IssueData, PathSegment, Value};

use crate::schema::SchemaDef;

/// Caller-supplied options for one validation call.
#[derive(Clone, Default)]
pub struct ParseParams {
    /// Path prefix for every issue raised during the call.
    pub path: Vec<PathSegment>,
    /// Contextual error map; consulted after the schema's own map.
    pub error_map: Option<ErrorMap>,
    /// Caller intent only. The entry point that is called decides the mode.
    pub is_async: bool,
    /// Produce native binary-format values instead of plain scalars.
    pub parse_to_bson: bool,
}

impl ParseParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        self.path = segments.into_iter().map(Into::into).collect();
        self
    }

    pub fn error_map<F>(mut self, map: F) -> Self
    where
        F: Fn(&IssueData, &ErrorMapContext<'_>) -> String + Send + Sync + 'static,
    {
        self.error_map = Some(bsonv_types::error_map(map));
        self
    }

    pub fn is_async(mut self, is_async: bool) -> Self {
        self.is_async = is_async;
        self
    }

    pub fn parse_to_bson(mut self, parse_to_bson: bool) -> Self {
        self.parse_to_bson = parse_to_bson;
        self
    }
}

impl std::fmt::Debug for ParseParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseParams")
            .field("path", &self.path)
            .field("error_map", &self.error_map.is_some())
            .field("is_async", &self.is_async)
            .field("parse_to_bson", &self.parse_to_bson)
            .finish()
    }
}

/// Shared state for one top-level validation call.
///
/// The mode flags are fixed at construction. The issue list only grows.
/// The mutex only makes `&ParseContext` `Sync` so async parse futures are
/// `Send`; one call never touches it from two threads at once.
pub struct ParseContext {
    issues: Mutex<Vec<Issue>>,
    is_async: bool,
    parse_to_bson: bool,
    error_map: Option<ErrorMap>,
    path: Vec<PathSegment>,
}

impl ParseContext {
    /// Create a context. `is_async` is the mode of the entry point, not the
    /// caller's `ParseParams::is_async` hint.
    pub fn new(params: ParseParams, is_async: bool) -> Self {
        Self {
            issues: Mutex::new(Vec::new()),
            is_async,
            parse_to_bson: params.parse_to_bson,
            error_map: params.error_map,
            path: params.path,
        }
    }

    pub fn is_async(&self) -> bool {
        self.is_async
    }

    pub fn parse_to_bson(&self) -> bool {
        self.parse_to_bson
    }

    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// Snapshot of the issues recorded so far.
    pub fn issues(&self) -> Vec<Issue> {
        self.lock().clone()
    }

    pub fn issue_count(&self) -> usize {
        self.lock().len()
    }

    /// Append an already-resolved issue.
    pub fn push_issue(&self, issue: Issue) {
        tracing::trace!(code = issue.code.name(), path = ?issue.path, "issue recorded");
        self.lock().push(issue);
    }

    /// Input for the top of the value tree.
    pub fn root_input<'a>(&'a self, data: &'a Value) -> ParseInput<'a> {
        ParseInput {
            data,
            path: self.path.clone(),
            parent: self,
        }
    }

    pub(crate) fn into_issues(self) -> Vec<Issue> {
        self.issues
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Issue>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.issues.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ParseContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseContext")
            .field("issues", &self.issue_count())
            .field("is_async", &self.is_async)
            .field("parse_to_bson", &self.parse_to_bson)
            .field("error_map", &self.error_map.is_some())
            .field("path", &self.path)
            .finish()
    }
}

/// One value handed to one parse step.
#[derive(Debug, Clone)]
pub struct ParseInput<'a> {
    pub data: &'a Value,
    /// Where `data` sits in the overall input.
    pub path: Vec<PathSegment>,
    /// The context of the enclosing top-level call.
    pub parent: &'a ParseContext,
}

impl<'a> ParseInput<'a> {
    /// Input for a value nested below this one.
    pub fn child<I, S>(&self, segments: I, data: &'a Value) -> ParseInput<'a>
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        let mut path = self.path.clone();
        path.extend(segments.into_iter().map(Into::into));
        ParseInput {
            data,
            path,
            parent: self.parent,
        }
    }

    pub fn parse_to_bson(&self) -> bool {
        self.parent.parse_to_bson
    }

    /// Record an issue at this input's path.
    ///
    /// An explicit message is kept as is. Otherwise the default message is
    /// passed through the schema's error map, then the call's error map, each
    /// seeing the previous result as its default.
    pub fn add_issue(&self, def: &SchemaDef, issue: IssueData) {
        let message = match &issue.message {
            Some(message) => message.clone(),
            None => {
                let mut message = issue.code.default_message();
                for map in [def.error_map.as_ref(), self.parent.error_map.as_ref()]
                    .into_iter()
                    .flatten()
                {
                    let ctx = ErrorMapContext {
                        data: self.data,
                        default_error: &message,
                    };
                    message = map(&issue, &ctx);
                }
                message
            }
        };

        self.parent.push_issue(Issue {
            code: issue.code,
            path: self.path.clone(),
            message,
        });
    }
}
