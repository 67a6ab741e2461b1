//! Low-level parse results.
//!
//! A validator's parse step answers with a [`ParseStatus`]: the value it
//! produced, or `Invalid` after it has recorded at least one issue on the
//! context. In async mode the answer may not be ready yet, which is what
//! [`ParseReturn::Deferred`] carries.

use futures::future::BoxFuture;

/// Valid-with-value or invalid.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseStatus<T> {
    Valid(T),
    Invalid,
}

impl<T> ParseStatus<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, ParseStatus::Valid(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseStatus<U> {
        match self {
            ParseStatus::Valid(v) => ParseStatus::Valid(f(v)),
            ParseStatus::Invalid => ParseStatus::Invalid,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            ParseStatus::Valid(v) => Some(v),
            ParseStatus::Invalid => None,
        }
    }
}

/// A status that resolves later.
pub type ParseFuture<'a, T> = BoxFuture<'a, ParseStatus<T>>;

/// What a parse step hands back: a status now, or one to await.
pub enum ParseReturn<'a, T> {
    Ready(ParseStatus<T>),
    Deferred(ParseFuture<'a, T>),
}

impl<'a, T> ParseReturn<'a, T> {
    pub fn valid(value: T) -> Self {
        ParseReturn::Ready(ParseStatus::Valid(value))
    }

    pub fn invalid() -> Self {
        ParseReturn::Ready(ParseStatus::Invalid)
    }

    /// True when the result has to be awaited.
    pub fn is_deferred(&self) -> bool {
        matches!(self, ParseReturn::Deferred(_))
    }
}

impl<T> From<ParseStatus<T>> for ParseReturn<'_, T> {
    fn from(status: ParseStatus<T>) -> Self {
        ParseReturn::Ready(status)
    }
}

impl<T> std::fmt::Debug for ParseReturn<'_, T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseReturn::Ready(status) => f.debug_tuple("Ready").field(status).finish(),
            ParseReturn::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}
