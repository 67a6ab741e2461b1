//! Shared sample values.

use bson::oid::ObjectId;
use bsonv_types::Value;

/// A well-formed identifier in canonical lowercase hex.
pub const SAMPLE_HEX: &str = "507f1f77bcf86cd799439011";

/// Strings that must never be accepted as identifiers.
pub const MALFORMED_HEX: &[&str] = &[
    "",
    "not-an-id",
    "507f1f77bcf86cd79943901",
    "507f1f77bcf86cd7994390111",
    "507f1f77bcf86cd79943901g",
];

/// [`SAMPLE_HEX`] as a native identifier.
pub fn sample_oid() -> ObjectId {
    ObjectId::from_bytes([
        0x50, 0x7f, 0x1f, 0x77, 0xbc, 0xf8, 0x6c, 0xd7, 0x99, 0x43, 0x90, 0x11,
    ])
}

/// `{ "$oid": hex }`
pub fn tagged_oid(hex: &str) -> Value {
    Value::object([("$oid", Value::from(hex))])
}

/// A reference-shaped plain object: `{ $ref, $id, $db? }`.
pub fn reference(collection: impl Into<Value>, id: impl Into<Value>, db: Option<&str>) -> Value {
    let mut fields = vec![("$ref", collection.into()), ("$id", id.into())];
    if let Some(db) = db {
        fields.push(("$db", Value::from(db)));
    }
    Value::object(fields)
}
