//! The server directory for roomroute.
//!
//! Placement needs three facts about the world, each owned by a
//! different system:
//!
//! 1. **Which servers are up** ([`ServerRegistry`])
//! 2. **Which rooms each server is hosting** ([`RoomSessions`])
//! 3. **How many seats those rooms have** ([`RoomCatalog`])
//!
//! This crate defines those three provider traits, ships in-memory
//! implementations of each, and gathers them into an immutable
//! [`DirectorySnapshot`] that the placement layer decides against.
//!
//! # How it fits in the stack
//!
//! ```text
//! Placement Layer (above)  ← decides against a snapshot, never does I/O
//!     ↕
//! Directory Layer (this crate)  ← fetches provider data, builds snapshots
//!     ↕
//! Types Layer (below)  ← provides RoomId, Server, Capacity
//! ```

mod error;
mod memory;
mod provider;
mod seed;
mod snapshot;

pub use error::DirectoryError;
pub use memory::{InMemoryCatalog, InMemoryDirectory, InMemoryRegistry, InMemorySessions};
pub use provider::{RoomCatalog, RoomSessions, ServerRegistry};
pub use seed::{Assignment, DirectorySeed, RoomSeed};
pub use snapshot::DirectorySnapshot;
