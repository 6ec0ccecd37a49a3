//! Identity types for rooms and servers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TypesError;

// ---------------------------------------------------------------------------
// RoomId
// ---------------------------------------------------------------------------

/// An opaque identifier for a conference room.
///
/// A newtype around `u64` so a `RoomId` can never be passed where a
/// `ServerId` is expected. `#[serde(transparent)]` keeps the JSON form a
/// bare number: `RoomId(42)` is written as `42`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

/// Parses the decimal form used in request parameters (`"42"`).
///
/// Surrounding whitespace is ignored. The `R-` display prefix is NOT
/// accepted: it is for humans reading logs, not for the wire.
impl FromStr for RoomId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(RoomId)
            .map_err(|_| TypesError::InvalidRoomId(s.to_string()))
    }
}

impl From<u64> for RoomId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// ---------------------------------------------------------------------------
// ServerId
// ---------------------------------------------------------------------------

/// Registry identifier of a backend media server.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ServerId(pub u64);

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

impl FromStr for ServerId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(ServerId)
            .map_err(|_| TypesError::InvalidServerId(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_display() {
        assert_eq!(RoomId(7).to_string(), "R-7");
        assert_eq!(ServerId(3).to_string(), "S-3");
    }

    #[test]
    fn test_room_id_parses_decimal_with_whitespace() {
        assert_eq!(" 42 ".parse::<RoomId>(), Ok(RoomId(42)));
        assert_eq!("0".parse::<RoomId>(), Ok(RoomId(0)));
    }

    #[test]
    fn test_room_id_rejects_malformed() {
        for raw in ["", "abc", "-1", "R-4", "4.5", "99999999999999999999999"] {
            assert_eq!(
                raw.parse::<RoomId>(),
                Err(TypesError::InvalidRoomId(raw.to_string())),
                "{raw:?}"
            );
        }
    }

    #[test]
    fn test_server_id_rejects_malformed() {
        assert!(matches!(
            "x".parse::<ServerId>(),
            Err(TypesError::InvalidServerId(_))
        ));
    }

    #[test]
    fn test_ids_serialize_as_bare_numbers() {
        assert_eq!(serde_json::to_string(&RoomId(12)).unwrap(), "12");
        let id: ServerId = serde_json::from_str("5").unwrap();
        assert_eq!(id, ServerId(5));
    }
}
