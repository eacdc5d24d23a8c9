//! Error types for registry resolution and encoding.
//!
//! All errors that can occur while resolving identifiers, encoding or
//! decoding bonus data are represented by the `CodecError` enum.

use crate::id::ResourceId;
use thiserror::Error;

/// Errors that can occur while encoding, decoding or resolving values.
///
/// None of these are fatal to the owning gameplay action: list readers
/// drop the offending record and keep going.
///
/// # Examples
///
/// ```rust
/// use skilltree::{CodecError, ResourceId};
///
/// let id = ResourceId::parse("mod:nonexistent").unwrap();
/// let err = CodecError::UnknownType { family: "item_bonus", id };
/// assert_eq!(err.to_string(), "Unknown item_bonus type: mod:nonexistent");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    /// No decoder is registered under the identifier.
    #[error("Unknown {family} type: {id}")]
    UnknownType {
        family: &'static str,
        id: ResourceId,
    },

    /// A value's kind has no identifier in its family registry.
    #[error("No {family} identifier registered for kind {kind}")]
    UnregisteredKind { family: &'static str, kind: String },

    /// The identifier (or kind) was registered twice.
    #[error("Duplicate {family} registration: {id}")]
    DuplicateIdentifier { family: &'static str, id: String },

    /// The string is not a valid `namespace:path` identifier.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A persisted record lacks a required field.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// A persisted record has a field of the wrong shape.
    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    /// The byte stream ended before a value was complete.
    #[error("Unexpected end of stream: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// A length-prefixed string was not valid UTF-8.
    #[error("Invalid UTF-8 in string")]
    InvalidUtf8,

    /// A string exceeded the maximum encodable length.
    #[error("String too long: {0} bytes")]
    StringTooLong(usize),

    /// A VarInt ran past five bytes.
    #[error("VarInt too long")]
    VarIntTooLong,

    /// A collection count was negative.
    #[error("Invalid collection length: {0}")]
    InvalidLength(i32),

    /// An enum ordinal or name did not map to a value.
    #[error("Invalid {what}: {value}")]
    InvalidOrdinal { what: &'static str, value: String },

    /// Configuration could not be parsed.
    #[error("Invalid config: {0}")]
    Config(String),
}

impl CodecError {
    /// Whether a list reader should drop the record and continue.
    ///
    /// Unknown types and malformed records degrade to "feature absent".
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CodecError::UnknownType { .. }
                | CodecError::MissingField(_)
                | CodecError::InvalidField { .. }
                | CodecError::InvalidIdentifier(_)
                | CodecError::InvalidOrdinal { .. }
        )
    }
}
