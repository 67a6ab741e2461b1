//! Nested composition: validate part of an input with another validator.
//!
//! The nested validator shares the caller's [`ParseContext`], so whatever it
//! records shows up in the top-level result with no extra plumbing. The mode
//! (sync or async) comes from the context and is decided once at entry.
//!
//! [`ParseContext`]: crate::context::ParseContext

use bsonv_types::{PathSegment, Value};

use crate::context::ParseInput;
use crate::schema::Schema;
use crate::status::{ParseReturn, ParseStatus};

/// Run `schema` over `data`, found at `segments` below `input`, and map its
/// status through `then`.
///
/// In sync mode `then` runs immediately. In async mode the caller gets a
/// deferred result that awaits the nested validator and then applies `then`.
pub fn parse_nested<'a, S, I, P, U, F>(
    schema: &'a S,
    segments: I,
    input: &ParseInput<'a>,
    data: &'a Value,
    then: F,
) -> ParseReturn<'a, U>
where
    S: Schema + ?Sized,
    I: IntoIterator<Item = P>,
    P: Into<PathSegment>,
    U: Send + 'a,
    F: FnOnce(ParseStatus<S::Output>) -> ParseStatus<U> + Send + 'a,
{
    let child = input.child(segments, data);
    let is_async = input.parent.is_async();
    tracing::trace!(
        schema = %schema.def().type_name,
        path = ?child.path,
        is_async,
        "nested parse"
    );

    if is_async {
        let nested = schema.run_async(child);
        ParseReturn::Deferred(Box::pin(async move { then(nested.await) }))
    } else {
        ParseReturn::Ready(then(schema.run_sync(child)))
    }
}
