//! Concrete BSON validators.

mod db_ref;
mod object_id;

pub use db_ref::DbRefSchema;
pub use object_id::{ObjectIdOutput, ObjectIdSchema};

/// Default [`ObjectIdSchema`].
pub fn object_id() -> ObjectIdSchema {
    ObjectIdSchema::new()
}

/// Default [`DbRefSchema`].
pub fn db_ref() -> DbRefSchema {
    DbRefSchema::new()
}

/// Message for a `custom` issue raised from a construction failure.
fn failure_message(err: &impl std::fmt::Display) -> String {
    let message = err.to_string();
    if message.is_empty() {
        "unknown error".to_string()
    } else {
        message
    }
}
