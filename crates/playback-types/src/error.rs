//! Decode errors raised at the schema-reader boundary.
//!
//! Every variant signals a malformed stream or a schema version mismatch.
//! None of them are recoverable for the round being decoded.

/// Errors that can occur while decoding wire values into typed values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// An action carried the reserved `NONE` tag.
    #[error("action tag NONE encountered (codec/schema mismatch)")]
    NoneActionTag,

    /// An action tag outside the closed set.
    #[error("unknown action tag: {0}")]
    UnknownActionTag(u8),

    /// A robot type outside the closed set, or the reserved `NONE` type.
    #[error("unknown robot type: {0}")]
    UnknownRobotType(u8),

    /// A die type outside the closed set.
    #[error("unknown die type: {0}")]
    UnknownDieType(u8),

    /// A mandatory field was absent from the record.
    #[error("missing mandatory field {field} at index {index}")]
    MissingField {
        /// Name of the accessor that returned nothing.
        field: &'static str,
        /// Team slot or action index the field was read at.
        index: usize,
    },

    /// The payload returned by the tag-indexed accessor is of another kind.
    #[error("payload mismatch: tag {expected:?} but payload is {found:?}")]
    PayloadMismatch {
        /// Tag the payload was requested with.
        expected: crate::ActionTag,
        /// Tag of the payload actually returned.
        found: crate::ActionTag,
    },
}
