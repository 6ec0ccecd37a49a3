//! Directory seed: the JSON document that populates the in-memory
//! providers at startup.
//!
//! ```json
//! {
//!   "servers": [
//!     { "id": 1, "name": "eu-1", "address": "media1.example.org",
//!       "protocol": "https", "port": 5443, "webapp": "openmeetings" }
//!   ],
//!   "rooms": [ { "id": 10, "capacity": 25 } ],
//!   "assignments": [ { "room_id": 10, "server_id": 1 } ]
//! }
//! ```
//!
//! Every section is optional. Servers default to active.

use std::path::Path;

use roomroute_types::{RoomId, Server, ServerId};
use serde::{Deserialize, Serialize};

use crate::{
    DirectoryError, InMemoryCatalog, InMemoryDirectory, InMemoryRegistry, InMemorySessions,
};

/// A room and its seat capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSeed {
    pub id: RoomId,
    pub capacity: u32,
}

/// A room already open on a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub room_id: RoomId,
    pub server_id: ServerId,
}

/// Initial contents of an [`InMemoryDirectory`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorySeed {
    /// Servers, in registry listing order.
    pub servers: Vec<Server>,
    /// Room seat capacities.
    pub rooms: Vec<RoomSeed>,
    /// Rooms open at startup, in open order.
    pub assignments: Vec<Assignment>,
}

impl DirectorySeed {
    /// Parses a seed from JSON text.
    pub fn from_json(json: &str) -> Result<Self, DirectoryError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a seed file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Builds the three in-memory providers.
    ///
    /// # Errors
    /// - [`DirectoryError::DuplicateServer`] — two servers share an id
    /// - [`DirectoryError::UnknownServer`] — an assignment names a server
    ///   the seed doesn't list
    /// - [`DirectoryError::RoomAlreadyOpen`] — a room is assigned to two
    ///   different servers
    pub fn into_directory(self) -> Result<InMemoryDirectory, DirectoryError> {
        for assignment in &self.assignments {
            if !self.servers.iter().any(|s| s.id == assignment.server_id) {
                return Err(DirectoryError::UnknownServer(assignment.server_id));
            }
        }

        let sessions = InMemorySessions::with_assignments(
            self.assignments.iter().map(|a| (a.server_id, a.room_id)),
        )?;
        let catalog =
            InMemoryCatalog::with_capacities(self.rooms.iter().map(|r| (r.id, r.capacity)));
        let registry = InMemoryRegistry::with_servers(self.servers)?;

        Ok(InMemoryDirectory {
            registry,
            sessions,
            catalog,
        })
    }
}
