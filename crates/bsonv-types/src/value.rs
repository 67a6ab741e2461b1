//! The dynamic value model validators operate on.
//!
//! A [`Value`] is either a plain scalar/container (what a JSON document can
//! express) or one of the native binary-format values a validator may be
//! asked to accept or produce.

use std::collections::BTreeMap;
use std::fmt;

use bson::oid::ObjectId;
use bson::spec::ElementType;
use bson::{Bson, Document};
use serde::Serialize;
use thiserror::Error;

use crate::dbref::DbRef;

/// A value flowing into or out of a validator.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    /// Native 12-byte identifier.
    ObjectId(ObjectId),
    /// Native composite reference.
    DbRef(DbRef),
}

/// Display name of a value's runtime type, used when reporting what a
/// validator actually received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsedType {
    Null,
    Boolean,
    Number,
    Nan,
    String,
    Array,
    Object,
    ObjectId,
    DbRef,
}

impl ParsedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParsedType::Null => "null",
            ParsedType::Boolean => "boolean",
            ParsedType::Number => "number",
            ParsedType::Nan => "nan",
            ParsedType::String => "string",
            ParsedType::Array => "array",
            ParsedType::Object => "object",
            ParsedType::ObjectId => "objectid",
            ParsedType::DbRef => "dbref",
        }
    }
}

impl fmt::Display for ParsedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error converting a foreign value into the [`Value`] model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueConversionError {
    /// The bson element kind has no counterpart in the value model.
    #[error("unsupported bson element type: {0:?}")]
    UnsupportedBson(ElementType),
}

impl Value {
    /// Build an object from key/value pairs.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// The type-display name for this value.
    pub fn parsed_type(&self) -> ParsedType {
        match self {
            Value::Null => ParsedType::Null,
            Value::Bool(_) => ParsedType::Boolean,
            Value::Int(_) => ParsedType::Number,
            Value::Float(f) if f.is_nan() => ParsedType::Nan,
            Value::Float(_) => ParsedType::Number,
            Value::String(_) => ParsedType::String,
            Value::Array(_) => ParsedType::Array,
            Value::Object(_) => ParsedType::Object,
            Value::ObjectId(_) => ParsedType::ObjectId,
            Value::DbRef(_) => ParsedType::DbRef,
        }
    }

    /// Look up a field on an object value. Non-objects have no fields.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render as extended JSON.
    ///
    /// Native values use their canonical tagged encodings, so the output can
    /// be fed back through a validator and recognized again.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::ObjectId(oid) => serde_json::json!({ "$oid": oid.to_hex() }),
            Value::DbRef(dbref) => dbref.to_json(),
        }
    }

    /// Convert into a bson value, keeping native values native.
    pub fn to_bson(&self) -> Bson {
        match self {
            Value::Null => Bson::Null,
            Value::Bool(b) => Bson::Boolean(*b),
            Value::Int(i) => Bson::Int64(*i),
            Value::Float(f) => Bson::Double(*f),
            Value::String(s) => Bson::String(s.clone()),
            Value::Array(items) => Bson::Array(items.iter().map(Value::to_bson).collect()),
            Value::Object(map) => {
                let mut doc = Document::new();
                for (k, v) in map {
                    doc.insert(k.clone(), v.to_bson());
                }
                Bson::Document(doc)
            }
            Value::ObjectId(oid) => Bson::ObjectId(*oid),
            Value::DbRef(dbref) => Bson::Document(dbref.to_document()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    Value::String(n.to_string())
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl TryFrom<Bson> for Value {
    type Error = ValueConversionError;

    fn try_from(bson: Bson) -> Result<Self, Self::Error> {
        Ok(match bson {
            Bson::Null => Value::Null,
            Bson::Boolean(b) => Value::Bool(b),
            Bson::Int32(i) => Value::Int(i64::from(i)),
            Bson::Int64(i) => Value::Int(i),
            Bson::Double(f) => Value::Float(f),
            Bson::String(s) => Value::String(s),
            Bson::ObjectId(oid) => Value::ObjectId(oid),
            Bson::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Bson::Document(doc) => {
                let mut map = BTreeMap::new();
                for (k, v) in doc {
                    map.insert(k, Value::try_from(v)?);
                }
                Value::Object(map)
            }
            other => return Err(ValueConversionError::UnsupportedBson(other.element_type())),
        })
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<ObjectId> for Value {
    fn from(oid: ObjectId) -> Self {
        Value::ObjectId(oid)
    }
}

impl From<DbRef> for Value {
    fn from(dbref: DbRef) -> Self {
        Value::DbRef(dbref)
    }
}
