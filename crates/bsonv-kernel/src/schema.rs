//! The validator abstraction and its entry points.
//!
//! A validator implements one thing: [`Schema::parse_step`], a decision
//! procedure over a single [`ParseInput`]. Everything a caller touches is
//! provided on top of it:
//!
//! ```text
//! safe_parse ──────▶ ParseContext (sync) ──▶ run_sync  ──┐
//!                                                        ├─▶ parse_step ──▶ resolve
//! safe_parse_async ▶ ParseContext (async) ─▶ run_async ──┘
//! ```

use std::fmt;

use async_trait::async_trait;
use bsonv_types::{error_map, ErrorMap, IssueCode, ValidationError, Value};
use thiserror::Error;

use crate::context::{ParseContext, ParseInput, ParseParams};
use crate::result::{resolve, SafeParseResult};
use crate::status::{ParseFuture, ParseReturn, ParseStatus};

/// Discriminant naming each kind of validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeName {
    ObjectId,
    DbRef,
}

impl TypeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeName::ObjectId => "ObjectId",
            TypeName::DbRef => "DBRef",
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Definition record shared by all validators.
#[derive(Clone)]
pub struct SchemaDef {
    pub type_name: TypeName,
    /// Schema-level error map; consulted before the call's contextual map.
    pub error_map: Option<ErrorMap>,
    pub description: Option<String>,
}

impl SchemaDef {
    pub fn new(type_name: TypeName) -> Self {
        Self {
            type_name,
            error_map: None,
            description: None,
        }
    }

    /// Build a definition from user-facing creation options.
    pub fn from_params(type_name: TypeName, params: CreateParams) -> Result<Self, CreateParamsError> {
        let map = match (params.error_map, params.invalid_type_error) {
            (Some(_), Some(_)) => return Err(CreateParamsError::ConflictingErrorMaps),
            (Some(map), None) => Some(map),
            (None, Some(message)) => Some(error_map(move |issue, ctx| match issue.code {
                IssueCode::InvalidType { .. } => message.clone(),
                _ => ctx.default_error.to_string(),
            })),
            (None, None) => None,
        };

        Ok(Self {
            type_name,
            error_map: map,
            description: params.description,
        })
    }
}

impl fmt::Debug for SchemaDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDef")
            .field("type_name", &self.type_name)
            .field("error_map", &self.error_map.is_some())
            .field("description", &self.description)
            .finish()
    }
}

/// Options accepted by validator factories.
#[derive(Clone, Default)]
pub struct CreateParams {
    pub error_map: Option<ErrorMap>,
    /// Replaces the message of every `invalid_type` issue this validator raises.
    pub invalid_type_error: Option<String>,
    pub description: Option<String>,
}

impl CreateParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_map(mut self, map: ErrorMap) -> Self {
        self.error_map = Some(map);
        self
    }

    pub fn invalid_type_error(mut self, message: impl Into<String>) -> Self {
        self.invalid_type_error = Some(message.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Debug for CreateParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateParams")
            .field("error_map", &self.error_map.is_some())
            .field("invalid_type_error", &self.invalid_type_error)
            .field("description", &self.description)
            .finish()
    }
}

/// Invalid combination of creation options.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CreateParamsError {
    #[error("cannot combine error_map with invalid_type_error; customize invalid_type inside the error map")]
    ConflictingErrorMaps,
}

/// A validator.
///
/// Implementors hold no per-call state; everything a call accumulates lives
/// on the [`ParseContext`] reachable from the input.
#[async_trait]
pub trait Schema: Send + Sync {
    /// What a successful parse produces.
    type Output: Send;

    fn def(&self) -> &SchemaDef;

    /// Validate one input.
    ///
    /// Expected failures are reported by recording an issue through
    /// [`ParseInput::add_issue`] and returning `Invalid`. This must not
    /// panic for any input.
    fn parse_step<'a>(&'a self, input: ParseInput<'a>) -> ParseReturn<'a, Self::Output>;

    fn description(&self) -> Option<&str> {
        self.def().description.as_deref()
    }

    /// Run the parse step in synchronous mode.
    ///
    /// # Panics
    ///
    /// If the step hands back a deferred result; sync callers cannot await it.
    fn run_sync<'a>(&'a self, input: ParseInput<'a>) -> ParseStatus<Self::Output> {
        match self.parse_step(input) {
            ParseReturn::Ready(status) => status,
            ParseReturn::Deferred(_) => panic!(
                "{} returned a deferred result during synchronous parse; use safe_parse_async",
                self.def().type_name
            ),
        }
    }

    /// Run the parse step in asynchronous mode. Immediate results are
    /// treated as already resolved.
    fn run_async<'a>(&'a self, input: ParseInput<'a>) -> ParseFuture<'a, Self::Output> {
        match self.parse_step(input) {
            ParseReturn::Ready(status) => Box::pin(futures::future::ready(status)),
            ParseReturn::Deferred(fut) => fut,
        }
    }

    /// Validate `data` synchronously.
    ///
    /// Always runs in synchronous mode, whatever `params.is_async` says.
    fn safe_parse(&self, data: &Value, params: ParseParams) -> SafeParseResult<Self::Output> {
        if params.is_async {
            tracing::debug!(
                schema = %self.def().type_name,
                "async requested on the synchronous entry point; parsing synchronously"
            );
        }
        tracing::debug!(
            schema = %self.def().type_name,
            parse_to_bson = params.parse_to_bson,
            "safe_parse"
        );

        let ctx = ParseContext::new(params, false);
        let status = self.run_sync(ctx.root_input(data));
        resolve(ctx, status)
    }

    /// Validate `data`, allowing nested validators to suspend.
    async fn safe_parse_async(
        &self,
        data: &Value,
        params: ParseParams,
    ) -> SafeParseResult<Self::Output> {
        tracing::debug!(
            schema = %self.def().type_name,
            parse_to_bson = params.parse_to_bson,
            "safe_parse_async"
        );

        let ctx = ParseContext::new(params, true);
        let status = self.run_async(ctx.root_input(data)).await;
        resolve(ctx, status)
    }

    /// Like [`Schema::safe_parse`], but as a `Result`.
    fn parse(&self, data: &Value, params: ParseParams) -> Result<Self::Output, ValidationError> {
        self.safe_parse(data, params).into_result()
    }

    /// Like [`Schema::safe_parse_async`], but as a `Result`.
    async fn parse_async(
        &self,
        data: &Value,
        params: ParseParams,
    ) -> Result<Self::Output, ValidationError> {
        self.safe_parse_async(data, params).await.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsonv_types::{IssueData, ParsedType, PathSegment};

    /// Accepts booleans; always answers in deferred form.
    struct DeferredBool {
        def: SchemaDef,
    }

    impl Schema for DeferredBool {
        type Output = bool;

        fn def(&self) -> &SchemaDef {
            &self.def
        }

        fn parse_step<'a>(&'a self, input: ParseInput<'a>) -> ParseReturn<'a, bool> {
            ParseReturn::Deferred(Box::pin(async move {
                match input.data {
                    Value::Bool(b) => ParseStatus::Valid(*b),
                    other => {
                        input.add_issue(
                            &self.def,
                            IssueData::invalid_type("boolean", other.parsed_type()),
                        );
                        ParseStatus::Invalid
                    }
                }
            }))
        }
    }

    /// Fails without recording anything.
    struct Silent {
        def: SchemaDef,
    }

    impl Schema for Silent {
        type Output = ();

        fn def(&self) -> &SchemaDef {
            &self.def
        }

        fn parse_step<'a>(&'a self, _input: ParseInput<'a>) -> ParseReturn<'a, ()> {
            ParseReturn::invalid()
        }
    }

    fn deferred_bool() -> DeferredBool {
        DeferredBool {
            def: SchemaDef::new(TypeName::ObjectId),
        }
    }

    #[tokio::test]
    async fn async_entry_awaits_deferred_steps() {
        let result = deferred_bool()
            .safe_parse_async(&Value::Bool(true), ParseParams::new())
            .await;
        assert_eq!(result.data(), Some(&true));
    }

    #[tokio::test]
    async fn async_entry_collects_issues_from_deferred_steps() {
        let result = deferred_bool()
            .safe_parse_async(&Value::Int(1), ParseParams::new().path(["flag"]))
            .await;
        let issues = result.issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, vec![PathSegment::from("flag")]);
        assert_eq!(
            issues[0].code,
            IssueCode::invalid_type("boolean", ParsedType::Number)
        );
    }

    #[test]
    #[should_panic(expected = "deferred result during synchronous parse")]
    fn sync_entry_rejects_deferred_steps() {
        let _ = deferred_bool().safe_parse(&Value::Bool(true), ParseParams::new());
    }

    #[test]
    #[should_panic(expected = "no issues were recorded")]
    fn silent_failure_panics() {
        let silent = Silent {
            def: SchemaDef::new(TypeName::DbRef),
        };
        let _ = silent.safe_parse(&Value::Null, ParseParams::new());
    }

    #[test]
    fn conflicting_create_params_are_rejected() {
        let params = CreateParams::new()
            .error_map(error_map(|_, ctx| ctx.default_error.to_string()))
            .invalid_type_error("nope");
        let err = SchemaDef::from_params(TypeName::ObjectId, params).unwrap_err();
        assert_eq!(err, CreateParamsError::ConflictingErrorMaps);
    }

    #[test]
    fn invalid_type_error_only_touches_invalid_type() {
        let def = SchemaDef::from_params(
            TypeName::ObjectId,
            CreateParams::new().invalid_type_error("need an id").description("owner id"),
        )
        .unwrap();
        assert_eq!(def.description.as_deref(), Some("owner id"));

        let ctx = ParseContext::new(ParseParams::new(), false);
        let data = Value::Int(1);
        let input = ctx.root_input(&data);
        input.add_issue(&def, IssueData::invalid_type("ObjectId | string", ParsedType::Number));
        input.add_issue(
            &def,
            IssueData {
                code: IssueCode::Custom,
                message: None,
            },
        );

        let issues = ctx.issues();
        assert_eq!(issues[0].message, "need an id");
        assert_eq!(issues[1].message, "Invalid input");
    }

    #[test]
    fn type_names() {
        assert_eq!(TypeName::ObjectId.to_string(), "ObjectId");
        assert_eq!(TypeName::DbRef.to_string(), "DBRef");
    }
}
