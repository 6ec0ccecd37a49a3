//! `RoomRouter`: snapshot the directory, then decide.
//!
//! This is the entry point for the surrounding application. Every call
//! gathers a fresh [`DirectorySnapshot`] from the providers and runs the
//! pure placement decision against it. The router keeps no state of its
//! own beyond the providers, so one instance (cloned freely) serves every
//! concurrent room-join request.

use std::sync::Arc;

use roomroute_directory::{
    DirectoryError, DirectorySeed, DirectorySnapshot, InMemoryCatalog, InMemoryRegistry,
    InMemorySessions, RoomCatalog, RoomSessions, ServerRegistry,
};
use roomroute_placement::{
    PlacementDecision, PlacementError, resolve, resolve_param, resolve_unassigned,
};
use roomroute_types::RoomId;

use crate::RoomrouteError;

/// A router over the in-memory providers.
pub type InMemoryRouter = RoomRouter<InMemoryRegistry, InMemorySessions, InMemoryCatalog>;

struct Providers<R, S, C> {
    registry: R,
    sessions: S,
    catalog: C,
}

/// Routes rooms to media servers.
///
/// Cheap to clone: the providers live behind one `Arc`.
pub struct RoomRouter<R, S, C> {
    providers: Arc<Providers<R, S, C>>,
}

impl<R, S, C> Clone for RoomRouter<R, S, C> {
    fn clone(&self) -> Self {
        Self {
            providers: Arc::clone(&self.providers),
        }
    }
}

impl<R, S, C> RoomRouter<R, S, C>
where
    R: ServerRegistry,
    S: RoomSessions,
    C: RoomCatalog,
{
    /// Creates a router over the given providers.
    pub fn new(registry: R, sessions: S, catalog: C) -> Self {
        Self {
            providers: Arc::new(Providers {
                registry,
                sessions,
                catalog,
            }),
        }
    }

    /// The server registry.
    pub fn registry(&self) -> &R {
        &self.providers.registry
    }

    /// The room session tracker.
    pub fn sessions(&self) -> &S {
        &self.providers.sessions
    }

    /// The room catalog.
    pub fn catalog(&self) -> &C {
        &self.providers.catalog
    }

    /// Gathers a fresh snapshot from the providers.
    pub async fn snapshot(&self) -> Result<DirectorySnapshot, RoomrouteError> {
        let p = &self.providers;
        Ok(DirectorySnapshot::collect(&p.registry, &p.sessions, &p.catalog).await?)
    }

    /// Decides which server should host `room_id`.
    ///
    /// # Errors
    /// - [`RoomrouteError::Directory`] — a provider failed
    /// - [`RoomrouteError::Placement`] — no active server
    pub async fn route(&self, room_id: RoomId) -> Result<PlacementDecision, RoomrouteError> {
        let snapshot = self.snapshot().await?;
        let decision = resolve(room_id, &snapshot);
        Ok(log_decision(&room_id.to_string(), decision)?)
    }

    /// Like [`route`](Self::route) for a room id still in text form.
    /// A malformed id is placed as a new room.
    pub async fn route_param(&self, raw: &str) -> Result<PlacementDecision, RoomrouteError> {
        let snapshot = self.snapshot().await?;
        let decision = resolve_param(raw, &snapshot);
        Ok(log_decision(raw, decision)?)
    }

    /// Picks the least-loaded server without checking for an open room.
    pub async fn route_unassigned(&self) -> Result<PlacementDecision, RoomrouteError> {
        let snapshot = self.snapshot().await?;
        let decision = resolve_unassigned(&snapshot);
        Ok(log_decision("<new>", decision)?)
    }
}

impl InMemoryRouter {
    /// Builds a router over in-memory providers populated from `seed`.
    pub fn from_seed(seed: DirectorySeed) -> Result<Self, RoomrouteError> {
        let dir = seed.into_directory()?;
        Ok(Self::new(dir.registry, dir.sessions, dir.catalog))
    }

    /// Routes `room_id` and, if it was new, records it as open on the
    /// chosen server so later joins stick to it. On success the session
    /// tracker always agrees with the returned decision.
    ///
    /// The room may already be recorded on a server the decision did not
    /// see:
    /// - the owner is no longer active, so the room is moved to the
    ///   chosen server;
    /// - a concurrent join opened it first, so the room is routed again
    ///   and sticks to that server.
    ///
    /// # Errors
    /// [`DirectoryError::RoomAlreadyOpen`] if the room keeps changing
    /// owner under the retry.
    pub async fn join(&self, room_id: RoomId) -> Result<PlacementDecision, RoomrouteError> {
        let decision = self.route(room_id).await?;
        if decision.is_sticky() {
            return Ok(decision);
        }
        let chosen = decision.server.id;
        let owner = match self.sessions().open_room(chosen, room_id).await {
            Ok(()) => return Ok(decision),
            Err(DirectoryError::RoomAlreadyOpen { server, .. }) => server,
            Err(e) => return Err(e.into()),
        };

        let owner_active = self.registry().get(owner).await.is_some_and(|s| s.is_active());
        if !owner_active {
            tracing::info!(
                %room_id,
                stale = %owner,
                to = %chosen,
                "reclaiming room from inactive server"
            );
            self.sessions().move_room(room_id, owner, chosen).await?;
            return Ok(decision);
        }

        tracing::debug!(%room_id, winner = %owner, "lost placement race, routing again");
        let retry = self.route(room_id).await?;
        if retry.is_sticky() {
            Ok(retry)
        } else {
            Err(DirectoryError::RoomAlreadyOpen {
                room: room_id,
                server: owner,
            }
            .into())
        }
    }

    /// Closes `room_id` for everyone in it, freeing it to be placed
    /// afresh. Returns `true` if it was open.
    pub async fn close(&self, room_id: RoomId) -> bool {
        self.sessions().close_room(room_id).await.is_some()
    }
}

fn log_decision(
    room: &str,
    decision: Result<PlacementDecision, PlacementError>,
) -> Result<PlacementDecision, PlacementError> {
    match &decision {
        Ok(d) => tracing::info!(
            room,
            server = %d.server.id,
            endpoint = %d.server.endpoint_url(),
            sticky = d.is_sticky(),
            "room placed"
        ),
        Err(e) => tracing::warn!(room, error = %e, "room not placed"),
    }
    decision
}
