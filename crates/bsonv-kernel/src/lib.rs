//! bsonv-kernel: the validation core of bsonv.
//!
//! This crate provides:
//!
//! - **Parse context**: per-call state shared by every nested validator
//! - **Status & results**: the low-level valid/invalid signal, its deferred
//!   form, and the caller-facing [`SafeParseResult`]
//! - **Schema trait**: the abstract parse step plus the sync and async entry
//!   points built on it
//! - **Nested composition**: [`parse_nested`] lets a composite validator hand
//!   part of its input to another validator without caring which mode the
//!   call runs in
//! - **BSON validators**: [`ObjectIdSchema`] and [`DbRefSchema`]
//!
//! # Example
//!
//! ```
//! use bsonv_kernel::{object_id, ParseParams, Schema};
//! use bsonv_types::Value;
//!
//! let result = object_id().safe_parse(
//!     &Value::from("507f1f77bcf86cd799439011"),
//!     ParseParams::new().parse_to_bson(true),
//! );
//! assert!(result.is_success());
//! ```

pub mod context;
pub mod nested;
pub mod result;
pub mod schema;
pub mod schemas;
pub mod status;

pub use context::{ParseContext, ParseInput, ParseParams};
pub use nested::parse_nested;
pub use result::{ParseFailure, SafeParseResult};
pub use schema::{CreateParams, CreateParamsError, Schema, SchemaDef, TypeName};
pub use schemas::{db_ref, object_id, DbRefSchema, ObjectIdOutput, ObjectIdSchema};
pub use status::{ParseFuture, ParseReturn, ParseStatus};
