//! Validation errors raised while mapping client input into stored items.
//!
//! # Design
//! Every variant describes a precondition on client-supplied data. Store
//! failures are not represented here; they belong to the server crate, which
//! wraps both kinds when building a response.

use thiserror::Error;

/// Client-supplied data failed a precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The title was empty, whitespace-only, or absent.
    #[error("the title is required")]
    EmptyTitle,

    /// An operation that targets an existing item was given no id.
    #[error("the todo id is required")]
    MissingId,

    /// The id is not a valid todo identifier.
    #[error("invalid todo id: {0}")]
    InvalidId(String),

    /// A stored item was presented without its creation timestamp.
    #[error("the created_at timestamp is required")]
    MissingCreatedAt,

    /// An update carried neither a title nor a completed flag.
    #[error("nothing to update: supply a title or a completed flag")]
    EmptyPatch,

    /// The request body was not valid JSON for the expected shape.
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}
