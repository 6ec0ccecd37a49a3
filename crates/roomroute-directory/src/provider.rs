//! Provider traits: where directory data comes from.
//!
//! roomroute doesn't own the server registry, the session tracker, or
//! the room catalog. Those live in the surrounding application (a
//! database, a health service, an in-process session map). Each is
//! reached through one small trait so production code, the in-memory
//! implementations in this crate, and test doubles are interchangeable.
//!
//! # Trait bounds
//!
//! - `Send + Sync + 'static` → one provider instance is shared by every
//!   concurrent placement request.
//! - Methods return `impl Future + Send` so callers can run them on any
//!   Tokio worker thread.

use std::future::Future;

use roomroute_types::{Capacity, RoomId, Server};

use crate::DirectoryError;

/// Lists the servers that may host rooms.
///
/// # Example
///
/// ```rust
/// use roomroute_directory::{DirectoryError, ServerRegistry};
/// use roomroute_types::{Protocol, Server, ServerId};
///
/// /// A single fixed media server, handy in development.
/// struct SingleServer;
///
/// impl ServerRegistry for SingleServer {
///     async fn active_servers(&self) -> Result<Vec<Server>, DirectoryError> {
///         Ok(vec![Server::new(ServerId(1), "localhost", Protocol::Http, 5080)])
///     }
/// }
/// ```
pub trait ServerRegistry: Send + Sync + 'static {
    /// Returns the currently active servers.
    ///
    /// Order matters: it is the order placement walks the servers in, so
    /// it must be stable between calls (registry insertion/listing order).
    fn active_servers(
        &self,
    ) -> impl Future<Output = Result<Vec<Server>, DirectoryError>> + Send;
}

/// Knows which rooms are currently open on each server.
pub trait RoomSessions: Send + Sync + 'static {
    /// Returns the ids of rooms open on `server`, in the order they were
    /// opened. A server with no open rooms yields an empty list.
    fn active_room_ids(
        &self,
        server: &Server,
    ) -> impl Future<Output = Result<Vec<RoomId>, DirectoryError>> + Send;
}

/// Room metadata store: seat capacity per room.
pub trait RoomCatalog: Send + Sync + 'static {
    /// Returns `(room, seats)` for every room in `room_ids` the catalog
    /// knows. Unknown rooms are left out.
    fn room_capacities(
        &self,
        room_ids: &[RoomId],
    ) -> impl Future<Output = Result<Vec<(RoomId, u32)>, DirectoryError>> + Send;

    /// The aggregate load of `room_ids`. Placement compares servers by
    /// exactly this value, so a catalog with its own occupancy metric
    /// overrides it.
    ///
    /// The provided method sums seat counts; unknown rooms contribute
    /// nothing.
    fn aggregate_capacity(
        &self,
        room_ids: &[RoomId],
    ) -> impl Future<Output = Result<Capacity, DirectoryError>> + Send {
        async move {
            let seats = self.room_capacities(room_ids).await?;
            Ok(Capacity::from_seats(seats.into_iter().map(|(_, s)| s)))
        }
    }
}
