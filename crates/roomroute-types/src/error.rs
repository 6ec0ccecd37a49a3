//! Error types for the types layer.
//!
//! Each crate in roomroute defines its own error enum. A `TypesError`
//! always means some text from outside the process could not be turned
//! into one of our value types.

/// Errors produced while parsing identifiers and server attributes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypesError {
    /// The text is not a decimal room id.
    #[error("invalid room id: {0:?}")]
    InvalidRoomId(String),

    /// The text is not a decimal server id.
    #[error("invalid server id: {0:?}")]
    InvalidServerId(String),

    /// The protocol name is not one we can route to.
    #[error("unknown protocol: {0:?}")]
    UnknownProtocol(String),
}
