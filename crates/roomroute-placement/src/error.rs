//! Error types for the placement layer.

/// Errors returned by placement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    /// The directory offered no active server to place the room on.
    /// Callers fall back to their default/unrouted mode.
    #[error("no server available")]
    NoServerAvailable,
}
