//! # roomroute
//!
//! Decides which backend media server hosts a conference room.
//!
//! A room that is already open somewhere stays there, so everyone in it
//! shares one transport endpoint. A new room goes to the active server
//! whose open rooms carry the least aggregate seat capacity.
//!
//! The surrounding application supplies three providers (server
//! registry, room sessions, room catalog); [`RoomRouter`] snapshots
//! them per request and runs the pure placement decision.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roomroute::prelude::*;
//!
//! # async fn run() -> Result<(), RoomrouteError> {
//! let seed = DirectorySeed::from_path("directory.json")?;
//! let router = RoomRouter::from_seed(seed)?;
//! let decision = router.route(RoomId(42)).await?;
//! println!("connect to {}", decision.server.endpoint_url());
//! # Ok(())
//! # }
//! ```

mod error;
pub mod logging;
mod router;

pub use error::RoomrouteError;
pub use router::{InMemoryRouter, RoomRouter};

pub mod prelude {
    //! Everyday imports: `use roomroute::prelude::*;`

    pub use crate::{InMemoryRouter, RoomRouter, RoomrouteError};
    pub use roomroute_directory::{
        DirectoryError, DirectorySeed, DirectorySnapshot, InMemoryCatalog, InMemoryDirectory,
        InMemoryRegistry, InMemorySessions, RoomCatalog, RoomSessions, ServerRegistry,
    };
    pub use roomroute_placement::{
        PlacementDecision, PlacementError, PlacementReason, ServerDirectory, resolve,
        resolve_param, resolve_unassigned,
    };
    pub use roomroute_types::{Capacity, Protocol, RoomId, Server, ServerId, TypesError};
}
