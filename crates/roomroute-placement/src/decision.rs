//! The outcome of a placement.

use roomroute_types::{Capacity, Server};
use serde::Serialize;

/// Why a server was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum PlacementReason {
    /// The room was already open on this server.
    Sticky,
    /// The room was new; this server carried the least load.
    LeastLoaded { capacity: Capacity },
}

/// The server that should host a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementDecision {
    pub server: Server,
    #[serde(flatten)]
    pub reason: PlacementReason,
}

impl PlacementDecision {
    pub(crate) fn sticky(server: &Server) -> Self {
        Self {
            server: server.clone(),
            reason: PlacementReason::Sticky,
        }
    }

    pub(crate) fn least_loaded(server: &Server, capacity: Capacity) -> Self {
        Self {
            server: server.clone(),
            reason: PlacementReason::LeastLoaded { capacity },
        }
    }

    /// Returns `true` if the room was already open on the chosen server.
    pub fn is_sticky(&self) -> bool {
        matches!(self.reason, PlacementReason::Sticky)
    }
}
