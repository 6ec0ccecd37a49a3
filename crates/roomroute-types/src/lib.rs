//! Shared value types for roomroute.
//!
//! This crate defines the nouns every other layer talks about:
//!
//! - **Identity** ([`RoomId`], [`ServerId`]) — opaque numeric ids.
//! - **Servers** ([`Server`], [`Protocol`]) — a backend media node and
//!   how clients reach it.
//! - **Load** ([`Capacity`]) — the aggregate seat count used to balance
//!   new rooms across servers.
//! - **Errors** ([`TypesError`]) — what can go wrong while parsing ids
//!   and protocols coming from outside.
//!
//! # Architecture
//!
//! ```text
//! Types (this crate) → Directory (providers, snapshots) → Placement (decision)
//! ```
//!
//! Nothing here performs I/O or holds state.

mod capacity;
mod error;
mod ids;
mod server;

pub use capacity::Capacity;
pub use error::TypesError;
pub use ids::{RoomId, ServerId};
pub use server::{Protocol, Server};
