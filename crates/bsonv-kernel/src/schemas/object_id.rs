//! ObjectId validator.
//!
//! Accepts three shapes and nothing else:
//!
//! | input                         | candidate                 |
//! |-------------------------------|---------------------------|
//! | native `ObjectId`             | used directly             |
//! | string                        | the string                |
//! | object with a `$oid` field    | the field's value         |
//!
//! Output depends on the call's `parse_to_bson` flag: a native `ObjectId`
//! when set, its 24-char lowercase hex form otherwise.

use bson::oid::ObjectId;
use bsonv_types::{IssueData, Value};

use super::failure_message;
use crate::context::ParseInput;
use crate::schema::{CreateParams, CreateParamsError, Schema, SchemaDef, TypeName};
use crate::status::{ParseReturn, ParseStatus};

/// Tagged-encoding field recognized on plain objects.
pub const OID_TAG: &str = "$oid";

/// What `invalid_type` issues report as expected.
const EXPECTED: &str = "ObjectId | string";

/// A validated identifier in the representation the call asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectIdOutput {
    Bson(ObjectId),
    Hex(String),
}

impl ObjectIdOutput {
    pub fn to_hex(&self) -> String {
        match self {
            ObjectIdOutput::Bson(oid) => oid.to_hex(),
            ObjectIdOutput::Hex(hex) => hex.clone(),
        }
    }

    /// The native identifier, re-parsing the hex form if needed.
    pub fn to_object_id(&self) -> Result<ObjectId, bson::oid::Error> {
        match self {
            ObjectIdOutput::Bson(oid) => Ok(*oid),
            ObjectIdOutput::Hex(hex) => ObjectId::parse_str(hex),
        }
    }
}

impl From<ObjectIdOutput> for Value {
    fn from(out: ObjectIdOutput) -> Self {
        match out {
            ObjectIdOutput::Bson(oid) => Value::ObjectId(oid),
            ObjectIdOutput::Hex(hex) => Value::String(hex),
        }
    }
}

/// Validates identifiers.
#[derive(Debug, Clone)]
pub struct ObjectIdSchema {
    def: SchemaDef,
}

impl ObjectIdSchema {
    pub fn new() -> Self {
        Self {
            def: SchemaDef::new(TypeName::ObjectId),
        }
    }

    pub fn create(params: CreateParams) -> Result<Self, CreateParamsError> {
        Ok(Self {
            def: SchemaDef::from_params(TypeName::ObjectId, params)?,
        })
    }

    fn reject(&self, input: &ParseInput<'_>) -> ParseStatus<ObjectIdOutput> {
        input.add_issue(
            &self.def,
            IssueData::invalid_type(EXPECTED, input.data.parsed_type()),
        );
        ParseStatus::Invalid
    }

    fn check(&self, input: &ParseInput<'_>) -> ParseStatus<ObjectIdOutput> {
        let candidate = match input.data {
            Value::ObjectId(oid) => return ParseStatus::Valid(output(input, *oid)),
            Value::String(s) => s.as_str(),
            Value::Object(map) => match map.get(OID_TAG) {
                Some(Value::String(s)) => s.as_str(),
                Some(other) => {
                    input.add_issue(
                        &self.def,
                        IssueData::custom(format!(
                            "{OID_TAG} must be a hex string, received {}",
                            other.parsed_type()
                        )),
                    );
                    return ParseStatus::Invalid;
                }
                None => return self.reject(input),
            },
            _ => return self.reject(input),
        };

        match ObjectId::parse_str(candidate) {
            Ok(oid) => ParseStatus::Valid(output(input, oid)),
            Err(err) => {
                input.add_issue(&self.def, IssueData::custom(failure_message(&err)));
                ParseStatus::Invalid
            }
        }
    }
}

impl Default for ObjectIdSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema for ObjectIdSchema {
    type Output = ObjectIdOutput;

    fn def(&self) -> &SchemaDef {
        &self.def
    }

    fn parse_step<'a>(&'a self, input: ParseInput<'a>) -> ParseReturn<'a, ObjectIdOutput> {
        ParseReturn::Ready(self.check(&input))
    }
}

fn output(input: &ParseInput<'_>, oid: ObjectId) -> ObjectIdOutput {
    if input.parse_to_bson() {
        ObjectIdOutput::Bson(oid)
    } else {
        ObjectIdOutput::Hex(oid.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ParseParams;
    use bsonv_types::{IssueCode, ParsedType};
    use rstest::rstest;

    const HEX: &str = "507f1f77bcf86cd799439011";

    fn oid() -> ObjectId {
        ObjectId::parse_str(HEX).unwrap()
    }

    fn plain() -> ParseParams {
        ParseParams::new()
    }

    fn native() -> ParseParams {
        ParseParams::new().parse_to_bson(true)
    }

    #[rstest]
    #[case::string(Value::from(HEX))]
    #[case::tagged(Value::object([(OID_TAG, Value::from(HEX))]))]
    #[case::native(Value::ObjectId(oid()))]
    fn every_shape_yields_hex_in_plain_mode(#[case] data: Value) {
        let result = ObjectIdSchema::new().safe_parse(&data, plain());
        assert_eq!(result.data(), Some(&ObjectIdOutput::Hex(HEX.to_string())));
    }

    #[rstest]
    #[case::string(Value::from(HEX))]
    #[case::tagged(Value::object([(OID_TAG, Value::from(HEX))]))]
    #[case::native(Value::ObjectId(oid()))]
    fn every_shape_yields_native_in_bson_mode(#[case] data: Value) {
        let result = ObjectIdSchema::new().safe_parse(&data, native());
        assert_eq!(result.data(), Some(&ObjectIdOutput::Bson(oid())));
    }

    #[test]
    fn uppercase_hex_normalizes_to_lowercase() {
        let result = ObjectIdSchema::new().safe_parse(&Value::from(HEX.to_uppercase()), plain());
        assert_eq!(result.data(), Some(&ObjectIdOutput::Hex(HEX.to_string())));
    }

    #[rstest]
    #[case(Value::Int(42), ParsedType::Number)]
    #[case(Value::Null, ParsedType::Null)]
    #[case(Value::Bool(true), ParsedType::Boolean)]
    #[case(Value::Array(vec![]), ParsedType::Array)]
    #[case(Value::object([("id", Value::from(HEX))]), ParsedType::Object)]
    fn unsupported_shapes_are_invalid_type(#[case] data: Value, #[case] received: ParsedType) {
        let result = ObjectIdSchema::new().safe_parse(&data, plain());
        let issues = result.issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::invalid_type(EXPECTED, received));
        assert!(issues[0].path.is_empty());
    }

    #[test]
    fn malformed_string_is_custom_with_construction_message() {
        let result = ObjectIdSchema::new().safe_parse(&Value::from("not-an-id"), plain());
        let issues = result.issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::Custom);
        let expected = ObjectId::parse_str("not-an-id").unwrap_err().to_string();
        assert_eq!(issues[0].message, expected);
    }

    #[test]
    fn non_string_tag_is_custom() {
        let data = Value::object([(OID_TAG, Value::Int(5))]);
        let result = ObjectIdSchema::new().safe_parse(&data, plain());
        let issues = result.issues();
        assert_eq!(issues[0].code, IssueCode::Custom);
        assert_eq!(issues[0].message, "$oid must be a hex string, received number");
    }

    #[test]
    fn dbref_input_is_not_an_identifier() {
        let dbref = bsonv_types::DbRef::new("users", oid(), None).unwrap();
        let result = ObjectIdSchema::new().safe_parse(&Value::DbRef(dbref), plain());
        assert_eq!(
            result.issues()[0].code,
            IssueCode::invalid_type(EXPECTED, ParsedType::DbRef)
        );
    }

    #[test]
    fn invalid_type_error_replaces_message() {
        let schema =
            ObjectIdSchema::create(CreateParams::new().invalid_type_error("owner must be an id"))
                .unwrap();
        let result = schema.safe_parse(&Value::Int(1), plain());
        assert_eq!(result.issues()[0].message, "owner must be an id");
    }

    #[test]
    fn output_conversions() {
        let hex = ObjectIdOutput::Hex(HEX.to_string());
        assert_eq!(hex.to_object_id().unwrap(), oid());
        assert_eq!(Value::from(hex), Value::from(HEX));
        assert_eq!(Value::from(ObjectIdOutput::Bson(oid())), Value::ObjectId(oid()));
        assert_eq!(ObjectIdOutput::Bson(oid()).to_hex(), HEX);
    }
}
