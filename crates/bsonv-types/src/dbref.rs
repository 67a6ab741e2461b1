//! Native composite reference: a pointer to a document in another collection.
//!
//! Follows the DBRef convention: `$ref` names the collection, `$id` holds the
//! target's identifier, and `$db` optionally names the database.

use bson::oid::ObjectId;
use bson::Document;
use thiserror::Error;

use crate::value::{ParsedType, Value};

/// Why a [`DbRef`] could not be constructed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DbRefError {
    #[error("collection name must be a string, received {0}")]
    CollectionNotString(ParsedType),

    #[error("collection name must not be empty")]
    EmptyCollection,

    #[error("database name must be a string, received {0}")]
    DatabaseNotString(ParsedType),

    #[error("database name must not be empty")]
    EmptyDatabase,

    /// Names end up as BSON cstrings, which cannot carry NUL.
    #[error("{field} name must not contain NUL bytes")]
    NulByte { field: &'static str },

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

/// A validated reference to `collection` (optionally in `db`) by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DbRef {
    collection: String,
    id: ObjectId,
    db: Option<String>,
}

impl DbRef {
    /// Construct a reference.
    ///
    /// When no database is given and `collection` has the form
    /// `database.collection`, the name is split into its two parts.
    pub fn new(
        collection: impl Into<String>,
        id: ObjectId,
        db: Option<String>,
    ) -> Result<Self, DbRefError> {
        let mut collection = collection.into();
        let mut db = db;

        if db.is_none() {
            if let Some((database, name)) = split_namespace(&collection) {
                db = Some(database.to_string());
                collection = name.to_string();
            }
        }

        check_name("collection", &collection, DbRefError::EmptyCollection)?;
        if let Some(db) = &db {
            check_name("database", db, DbRefError::EmptyDatabase)?;
        }

        Ok(Self { collection, id, db })
    }

    /// Construct from raw field values as they appear in an untyped object.
    ///
    /// A `$db` of `null` counts as absent.
    pub fn from_fields(
        collection: &Value,
        id: ObjectId,
        db: Option<&Value>,
    ) -> Result<Self, DbRefError> {
        let collection = match collection {
            Value::String(s) => s.clone(),
            other => return Err(DbRefError::CollectionNotString(other.parsed_type())),
        };
        let db = match db {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => return Err(DbRefError::DatabaseNotString(other.parsed_type())),
        };
        Self::new(collection, id, db)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn db(&self) -> Option<&str> {
        self.db.as_deref()
    }

    /// `{ $ref, $id, $db? }` in that field order.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("$ref", self.collection.clone());
        doc.insert("$id", self.id);
        if let Some(db) = &self.db {
            doc.insert("$db", db.clone());
        }
        doc
    }

    /// Extended JSON rendering.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("$ref".into(), serde_json::Value::String(self.collection.clone()));
        map.insert("$id".into(), serde_json::json!({ "$oid": self.id.to_hex() }));
        if let Some(db) = &self.db {
            map.insert("$db".into(), serde_json::Value::String(db.clone()));
        }
        serde_json::Value::Object(map)
    }
}

/// Split `db.collection` when there is exactly one dot with text on both sides.
fn split_namespace(name: &str) -> Option<(&str, &str)> {
    let (db, collection) = name.split_once('.')?;
    if db.is_empty() || collection.is_empty() || collection.contains('.') {
        return None;
    }
    Some((db, collection))
}

fn check_name(field: &'static str, name: &str, empty: DbRefError) -> Result<(), DbRefError> {
    if name.is_empty() {
        return Err(empty);
    }
    if name.contains('\0') {
        return Err(DbRefError::NulByte { field });
    }
    Ok(())
}
