//! DBRef validator.
//!
//! A native `DbRef` passes through untouched. A plain object needs `$ref`
//! and `$id`; the `$id` goes through the [`ObjectIdSchema`] at path `$id`
//! and a reference is only built once it passes.

use bsonv_types::{DbRef, DbRefError, IssueData, Value};

use super::failure_message;
use super::object_id::{ObjectIdOutput, ObjectIdSchema};
use crate::context::ParseInput;
use crate::nested::parse_nested;
use crate::schema::{CreateParams, CreateParamsError, Schema, SchemaDef, TypeName};
use crate::status::{ParseReturn, ParseStatus};

pub const REF_FIELD: &str = "$ref";
pub const ID_FIELD: &str = "$id";
pub const DB_FIELD: &str = "$db";

/// Validates composite references.
#[derive(Debug, Clone)]
pub struct DbRefSchema {
    def: SchemaDef,
    object_id: ObjectIdSchema,
}

impl DbRefSchema {
    pub fn new() -> Self {
        Self {
            def: SchemaDef::new(TypeName::DbRef),
            object_id: ObjectIdSchema::new(),
        }
    }

    /// Creation options apply to the reference itself. The nested `$id`
    /// check keeps the identifier validator's defaults.
    pub fn create(params: CreateParams) -> Result<Self, CreateParamsError> {
        Ok(Self {
            def: SchemaDef::from_params(TypeName::DbRef, params)?,
            object_id: ObjectIdSchema::new(),
        })
    }

    fn build(
        &self,
        input: &ParseInput<'_>,
        collection: &Value,
        id: ObjectIdOutput,
        db: Option<&Value>,
    ) -> ParseStatus<DbRef> {
        let built = id
            .to_object_id()
            .map_err(|e| DbRefError::InvalidId(e.to_string()))
            .and_then(|oid| DbRef::from_fields(collection, oid, db));

        match built {
            Ok(dbref) => ParseStatus::Valid(dbref),
            Err(err) => {
                input.add_issue(&self.def, IssueData::custom(failure_message(&err)));
                ParseStatus::Invalid
            }
        }
    }

    fn reject<'a>(&self, input: &ParseInput<'_>) -> ParseReturn<'a, DbRef> {
        input.add_issue(
            &self.def,
            IssueData::invalid_type(TypeName::DbRef.as_str(), input.data.parsed_type()),
        );
        ParseReturn::invalid()
    }
}

impl Default for DbRefSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema for DbRefSchema {
    type Output = DbRef;

    fn def(&self) -> &SchemaDef {
        &self.def
    }

    fn parse_step<'a>(&'a self, input: ParseInput<'a>) -> ParseReturn<'a, DbRef> {
        let data: &'a Value = input.data;
        let map = match data {
            Value::DbRef(dbref) => return ParseReturn::valid(dbref.clone()),
            Value::Object(map) => map,
            _ => return self.reject(&input),
        };

        let (Some(collection), Some(id)) = (map.get(REF_FIELD), map.get(ID_FIELD)) else {
            return self.reject(&input);
        };
        let db = map.get(DB_FIELD);

        let outer = input.clone();
        parse_nested(&self.object_id, [ID_FIELD], &input, id, move |status| match status {
            ParseStatus::Valid(id) => self.build(&outer, collection, id, db),
            ParseStatus::Invalid => ParseStatus::Invalid,
        })
    }
}
