//! bsonv-types: pure data types shared across bsonv crates.
//!
//! Nothing in here validates anything. These are the values that flow in and
//! out of validators, the native binary-format values a validator may hand
//! back, and the issue records that describe why a value was rejected.
//!
//! - [`Value`]: the dynamic input/output model
//! - [`DbRef`]: native composite reference (`$ref` / `$id` / `$db`)
//! - [`Issue`], [`IssueCode`], [`PathSegment`]: structured failure records
//! - [`ValidationError`]: the aggregate error built from a call's issues

pub mod dbref;
pub mod error;
pub mod issue;
pub mod value;

pub use bson::oid::ObjectId;
pub use dbref::{DbRef, DbRefError};
pub use error::{error_map, ErrorMap, ErrorMapContext, FlattenedErrors, ValidationError};
pub use issue::{format_path, Issue, IssueCode, IssueData, PathSegment};
pub use value::{ParsedType, Value, ValueConversionError};
