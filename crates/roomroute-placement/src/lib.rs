//! Room placement for roomroute.
//!
//! Decides which media server hosts a room:
//!
//! 1. If an active server already hosts the room, that server wins
//!    (sticky placement keeps every participant on one endpoint).
//! 2. Otherwise the server whose open rooms have the smallest aggregate
//!    capacity wins. Ties go to the server listed first.
//!
//! # Key types
//!
//! - [`ServerDirectory`] — the read-only view placement decides against
//! - [`resolve`] — the decision itself, a pure function
//! - [`PlacementDecision`] — the chosen server and why
//! - [`PlacementError`] — no server could take the room
//!
//! Nothing here does I/O, locks, or keeps state between calls, so any
//! number of tasks can resolve against the same snapshot at once.

mod decision;
mod directory;
mod error;
mod resolver;

pub use decision::{PlacementDecision, PlacementReason};
pub use directory::ServerDirectory;
pub use error::PlacementError;
pub use resolver::{resolve, resolve_param, resolve_unassigned};
