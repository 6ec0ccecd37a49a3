//! Unified error type for roomroute.

use roomroute_directory::DirectoryError;
use roomroute_placement::PlacementError;
use roomroute_types::TypesError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates a `From` impl, so
/// `?` converts layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RoomrouteError {
    /// Parsing an id or protocol failed.
    #[error(transparent)]
    Types(#[from] TypesError),

    /// A provider failed or the directory was misconfigured.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// No server could take the room.
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

impl RoomrouteError {
    /// Returns `true` if the failure is "no server available" rather than
    /// a broken provider. Callers usually fall back to unrouted mode here.
    pub fn is_no_server(&self) -> bool {
        matches!(self, Self::Placement(PlacementError::NoServerAvailable))
    }
}
