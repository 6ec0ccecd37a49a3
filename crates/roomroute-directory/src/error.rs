//! Error types for the directory layer.

use roomroute_types::{RoomId, ServerId};

/// Errors raised while maintaining or reading the server directory.
///
/// Provider failures surface here and stop snapshot collection; the
/// placement layer only ever sees complete data.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// A server with this id is already registered.
    #[error("server {0} is already registered")]
    DuplicateServer(ServerId),

    /// No server with this id is registered.
    #[error("server {0} is not registered")]
    UnknownServer(ServerId),

    /// The room is already open on a different server.
    /// A room lives on exactly one server at a time.
    #[error("room {room} is already open on server {server}")]
    RoomAlreadyOpen { room: RoomId, server: ServerId },

    /// An external provider could not answer (registry unreachable,
    /// catalog query failed, ...).
    #[error("directory provider unavailable: {0}")]
    Unavailable(String),

    /// The seed document is not valid JSON for a [`DirectorySeed`](crate::DirectorySeed).
    #[error("invalid directory seed: {0}")]
    Seed(#[from] serde_json::Error),

    /// The seed file could not be read.
    #[error("failed to read directory seed: {0}")]
    Io(#[from] std::io::Error),
}
