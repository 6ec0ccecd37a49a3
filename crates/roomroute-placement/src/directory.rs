//! The read-only directory view placement decides against.

use roomroute_directory::DirectorySnapshot;
use roomroute_types::{Capacity, RoomId, Server};

/// Everything placement needs to know, already fetched.
///
/// Implementations must be cheap and infallible: any I/O belongs in
/// building the view (see [`DirectorySnapshot::collect`]), not in these
/// methods.
pub trait ServerDirectory {
    /// Active servers, in a stable order. The order decides which server
    /// wins a capacity tie and which wins if a room is (wrongly) listed
    /// on two servers.
    fn active_servers(&self) -> &[Server];

    /// Rooms currently open on `server`.
    fn active_room_ids(&self, server: &Server) -> &[RoomId];

    /// Aggregate load of the rooms open on `server`, as the room catalog
    /// measures it.
    fn aggregate_capacity(&self, server: &Server) -> Capacity;
}

impl ServerDirectory for DirectorySnapshot {
    fn active_servers(&self) -> &[Server] {
        self.servers()
    }

    fn active_room_ids(&self, server: &Server) -> &[RoomId] {
        self.room_ids(server.id)
    }

    fn aggregate_capacity(&self, server: &Server) -> Capacity {
        self.load(server.id)
    }
}
