//! In-memory providers.
//!
//! Good enough for single-node deployments, demos, and tests. Each type
//! guards its data with a `tokio::sync::RwLock`, so one instance can be
//! shared (behind `Arc`) by every placement request while an admin task
//! registers servers or the session layer opens and closes rooms.

use std::collections::HashMap;

use roomroute_types::{RoomId, Server, ServerId};
use tokio::sync::RwLock;

use crate::{DirectoryError, RoomCatalog, RoomSessions, ServerRegistry};

// ---------------------------------------------------------------------------
// InMemoryRegistry
// ---------------------------------------------------------------------------

/// Server registry backed by a `Vec`, so listing order is insertion order.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    servers: RwLock<Vec<Server>>,
}

impl InMemoryRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding `servers`, in order.
    ///
    /// # Errors
    /// Returns [`DirectoryError::DuplicateServer`] if two servers share an id.
    pub fn with_servers(servers: Vec<Server>) -> Result<Self, DirectoryError> {
        let mut seen = Vec::with_capacity(servers.len());
        for server in &servers {
            if seen.contains(&server.id) {
                return Err(DirectoryError::DuplicateServer(server.id));
            }
            seen.push(server.id);
        }
        Ok(Self {
            servers: RwLock::new(servers),
        })
    }

    /// Adds a server at the end of the listing order.
    pub async fn register(&self, server: Server) -> Result<(), DirectoryError> {
        let mut servers = self.servers.write().await;
        if servers.iter().any(|s| s.id == server.id) {
            return Err(DirectoryError::DuplicateServer(server.id));
        }
        tracing::info!(server_id = %server.id, address = %server.address, "server registered");
        servers.push(server);
        Ok(())
    }

    /// Marks a server active or inactive. Its position in the listing
    /// order is kept.
    pub async fn set_active(
        &self,
        id: ServerId,
        active: bool,
    ) -> Result<(), DirectoryError> {
        let mut servers = self.servers.write().await;
        let server = servers
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(DirectoryError::UnknownServer(id))?;
        server.active = active;
        tracing::info!(server_id = %id, active, "server activity changed");
        Ok(())
    }

    /// Removes a server and returns it.
    pub async fn remove(&self, id: ServerId) -> Result<Server, DirectoryError> {
        let mut servers = self.servers.write().await;
        let pos = servers
            .iter()
            .position(|s| s.id == id)
            .ok_or(DirectoryError::UnknownServer(id))?;
        tracing::info!(server_id = %id, "server removed");
        Ok(servers.remove(pos))
    }

    /// Returns the server with this id, active or not.
    pub async fn get(&self, id: ServerId) -> Option<Server> {
        self.servers.read().await.iter().find(|s| s.id == id).cloned()
    }

    /// Number of registered servers, active or not.
    pub async fn len(&self) -> usize {
        self.servers.read().await.len()
    }

    /// Returns `true` if no server is registered.
    pub async fn is_empty(&self) -> bool {
        self.servers.read().await.is_empty()
    }
}

impl ServerRegistry for InMemoryRegistry {
    async fn active_servers(&self) -> Result<Vec<Server>, DirectoryError> {
        Ok(self
            .servers
            .read()
            .await
            .iter()
            .filter(|s| s.is_active())
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// InMemorySessions
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct SessionIndex {
    /// Open rooms per server, in the order they were opened.
    by_server: HashMap<ServerId, Vec<RoomId>>,
    /// Reverse index. Kept in sync with `by_server`.
    owner: HashMap<RoomId, ServerId>,
}

/// Tracks which rooms are open on which server.
///
/// Enforces the key invariant of sticky placement: a room is open on at
/// most one server at a time.
#[derive(Debug, Default)]
pub struct InMemorySessions {
    index: RwLock<SessionIndex>,
}

impl InMemorySessions {
    /// Creates an empty session tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracker with `assignments` already open, in order.
    pub fn with_assignments<I>(assignments: I) -> Result<Self, DirectoryError>
    where
        I: IntoIterator<Item = (ServerId, RoomId)>,
    {
        let mut index = SessionIndex::default();
        for (server_id, room_id) in assignments {
            index.open(server_id, room_id)?;
        }
        Ok(Self {
            index: RwLock::new(index),
        })
    }

    /// Records that `room_id` is now open on `server_id`.
    ///
    /// Opening a room again on the server already hosting it is a no-op.
    ///
    /// # Errors
    /// Returns [`DirectoryError::RoomAlreadyOpen`] if another server
    /// hosts the room.
    pub async fn open_room(
        &self,
        server_id: ServerId,
        room_id: RoomId,
    ) -> Result<(), DirectoryError> {
        self.index.write().await.open(server_id, room_id)?;
        tracing::debug!(%room_id, %server_id, "room opened");
        Ok(())
    }

    /// Records that `room_id` closed. Returns the server that hosted it.
    pub async fn close_room(&self, room_id: RoomId) -> Option<ServerId> {
        let server_id = self.index.write().await.close(room_id)?;
        tracing::debug!(%room_id, %server_id, "room closed");
        Some(server_id)
    }

    /// Moves `room_id` from `from` to `to` in one step.
    ///
    /// Succeeds if the room was open on `from`, or open nowhere (it is
    /// then simply opened on `to`).
    ///
    /// # Errors
    /// [`DirectoryError::RoomAlreadyOpen`] if a third server holds the room.
    pub async fn move_room(
        &self,
        room_id: RoomId,
        from: ServerId,
        to: ServerId,
    ) -> Result<(), DirectoryError> {
        let mut index = self.index.write().await;
        match index.owner.get(&room_id).copied() {
            Some(current) if current != from && current != to => {
                return Err(DirectoryError::RoomAlreadyOpen {
                    room: room_id,
                    server: current,
                });
            }
            Some(current) if current == from => {
                index.close(room_id);
            }
            _ => {}
        }
        index.open(to, room_id)?;
        tracing::info!(%room_id, %from, %to, "room moved");
        Ok(())
    }

    /// Drops every room hosted by `server_id` (the server went away).
    /// Returns the dropped rooms in the order they were opened.
    pub async fn close_server(&self, server_id: ServerId) -> Vec<RoomId> {
        let mut index = self.index.write().await;
        let rooms = index.by_server.remove(&server_id).unwrap_or_default();
        for room_id in &rooms {
            index.owner.remove(room_id);
        }
        if !rooms.is_empty() {
            tracing::info!(%server_id, rooms = rooms.len(), "server rooms dropped");
        }
        rooms
    }

    /// Returns the server hosting `room_id`, if any.
    pub async fn server_of(&self, room_id: RoomId) -> Option<ServerId> {
        self.index.read().await.owner.get(&room_id).copied()
    }
}

impl SessionIndex {
    fn close(&mut self, room_id: RoomId) -> Option<ServerId> {
        let server_id = self.owner.remove(&room_id)?;
        if let Some(rooms) = self.by_server.get_mut(&server_id) {
            rooms.retain(|r| *r != room_id);
        }
        Some(server_id)
    }

    fn open(&mut self, server_id: ServerId, room_id: RoomId) -> Result<(), DirectoryError> {
        match self.owner.get(&room_id) {
            Some(current) if *current == server_id => Ok(()),
            Some(current) => Err(DirectoryError::RoomAlreadyOpen {
                room: room_id,
                server: *current,
            }),
            None => {
                self.owner.insert(room_id, server_id);
                self.by_server.entry(server_id).or_default().push(room_id);
                Ok(())
            }
        }
    }
}

impl RoomSessions for InMemorySessions {
    async fn active_room_ids(&self, server: &Server) -> Result<Vec<RoomId>, DirectoryError> {
        Ok(self
            .index
            .read()
            .await
            .by_server
            .get(&server.id)
            .cloned()
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// InMemoryCatalog
// ---------------------------------------------------------------------------

/// Seat capacity per room.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    seats: RwLock<HashMap<RoomId, u32>>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog from `(room, seats)` pairs. Later pairs win.
    pub fn with_capacities<I>(capacities: I) -> Self
    where
        I: IntoIterator<Item = (RoomId, u32)>,
    {
        Self {
            seats: RwLock::new(capacities.into_iter().collect()),
        }
    }

    /// Sets the seat capacity of a room, returning the previous value.
    pub async fn set_capacity(&self, room_id: RoomId, seats: u32) -> Option<u32> {
        self.seats.write().await.insert(room_id, seats)
    }

    /// Forgets a room.
    pub async fn remove(&self, room_id: RoomId) -> Option<u32> {
        self.seats.write().await.remove(&room_id)
    }
}

impl RoomCatalog for InMemoryCatalog {
    async fn room_capacities(
        &self,
        room_ids: &[RoomId],
    ) -> Result<Vec<(RoomId, u32)>, DirectoryError> {
        let seats = self.seats.read().await;
        Ok(room_ids
            .iter()
            .filter_map(|id| seats.get(id).map(|s| (*id, *s)))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// InMemoryDirectory
// ---------------------------------------------------------------------------

/// The three in-memory providers, built together from a
/// [`DirectorySeed`](crate::DirectorySeed).
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    pub registry: InMemoryRegistry,
    pub sessions: InMemorySessions,
    pub catalog: InMemoryCatalog,
}
