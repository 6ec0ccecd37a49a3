//! Immutable, point-in-time view of the directory.
//!
//! Placement is a pure decision; all provider I/O happens here, before
//! it. A snapshot is gathered fresh for every placement request and
//! then only read.
//!
//! # Staleness
//!
//! Two requests for the same new room can collect snapshots at slightly
//! different moments and pick different least-loaded servers. That race
//! is accepted: once the first join opens the room, every later snapshot
//! sees it and sticky placement sends everyone to that server.


use std::collections::{HashMap, HashSet};

use futures_util::future::try_join_all;
use roomroute_types::{Capacity, RoomId, Server, ServerId};

use crate::{DirectoryError, RoomCatalog, RoomSessions, ServerRegistry};

/// Active servers, their open rooms, and each server's aggregate load,
/// as seen at one moment.
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    /// Servers in registry listing order, each id once.
    servers: Vec<Server>,
    /// Open rooms per server, in open order.
    rooms: HashMap<ServerId, Vec<RoomId>>,
    /// Load the catalog reported for each server's open rooms.
    loads: HashMap<ServerId, Capacity>,
}

impl DirectorySnapshot {
    /// Gathers a snapshot from the three providers.
    ///
    /// 1. Lists the active servers.
    /// 2. Fetches every server's open rooms concurrently; results keep
    ///    the registry order.
    /// 3. Asks the catalog for the aggregate load of each server's rooms,
    ///    again concurrently and in order. Whatever metric the catalog's
    ///    [`RoomCatalog::aggregate_capacity`] implements is the one
    ///    placement compares.
    ///
    /// # Errors
    /// The first provider error aborts collection and is returned as is.
    pub async fn collect<R, S, C>(
        registry: &R,
        sessions: &S,
        catalog: &C,
    ) -> Result<Self, DirectoryError>
    where
        R: ServerRegistry,
        S: RoomSessions,
        C: RoomCatalog,
    {
        let servers = registry.active_servers().await?;
        let room_lists =
            try_join_all(servers.iter().map(|s| sessions.active_room_ids(s))).await?;
        let loads =
            try_join_all(room_lists.iter().map(|rooms| catalog.aggregate_capacity(rooms)))
                .await?;

        tracing::trace!(
            servers = servers.len(),
            rooms = room_lists.iter().map(Vec::len).sum::<usize>(),
            "directory snapshot collected"
        );

        Ok(Self::from_loads(
            servers
                .into_iter()
                .zip(room_lists)
                .zip(loads)
                .map(|((server, rooms), load)| (server, rooms, load)),
        ))
    }

    /// Builds a snapshot from data the caller already gathered, with
    /// each server's load taken as the seat sum of its rooms.
    ///
    /// `entries` are `(server, open rooms)` pairs in directory order.
    /// Rooms missing from `seats` count as zero. If a server id appears
    /// twice it keeps its first position and its room lists are
    /// concatenated.
    pub fn from_entries<E, C>(entries: E, seats: C) -> Self
    where
        E: IntoIterator<Item = (Server, Vec<RoomId>)>,
        C: IntoIterator<Item = (RoomId, u32)>,
    {
        let seats: HashMap<RoomId, u32> = seats.into_iter().collect();
        let mut snapshot = Self::from_loads(
            entries
                .into_iter()
                .map(|(server, rooms)| (server, rooms, Capacity::ZERO)),
        );
        for (id, rooms) in &snapshot.rooms {
            let load = Capacity::from_seats(rooms.iter().filter_map(|r| seats.get(r).copied()));
            snapshot.loads.insert(*id, load);
        }
        snapshot
    }

    /// Builds a snapshot from `(server, open rooms, load)` triples in
    /// directory order.
    ///
    /// A server id seen twice keeps its first position; its room lists
    /// are concatenated and its loads summed.
    pub fn from_loads<E>(entries: E) -> Self
    where
        E: IntoIterator<Item = (Server, Vec<RoomId>, Capacity)>,
    {
        let mut seen = HashSet::new();
        let mut snapshot = Self::default();
        for (server, room_ids, load) in entries {
            snapshot.rooms.entry(server.id).or_default().extend(room_ids);
            let total = snapshot.loads.entry(server.id).or_default();
            *total = *total + load;
            if seen.insert(server.id) {
                snapshot.servers.push(server);
            }
        }
        snapshot
    }

    /// The servers, in directory order.
    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Rooms open on the server with this id (empty if none or unknown).
    pub fn room_ids(&self, server_id: ServerId) -> &[RoomId] {
        self.rooms.get(&server_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Aggregate load of the server with this id (zero if unknown).
    pub fn load(&self, server_id: ServerId) -> Capacity {
        self.loads.get(&server_id).copied().unwrap_or_default()
    }

    /// Number of servers in the snapshot.
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Returns `true` if the snapshot lists no server.
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}
