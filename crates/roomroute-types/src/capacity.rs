//! Aggregate room load.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// The aggregate "load" of a set of rooms: the sum of their seat counts.
///
/// Unsigned, so a negative load cannot be expressed. Zero is a valid
/// value and means the server hosts no rooms with known seats.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Capacity(pub u64);

impl Capacity {
    /// No load at all.
    pub const ZERO: Capacity = Capacity(0);

    /// Sums per-room seat counts into an aggregate.
    ///
    /// Saturates instead of overflowing; a load that large is already
    /// the worst candidate.
    pub fn from_seats<I>(seats: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        seats.into_iter().map(|s| Capacity(u64::from(s))).sum()
    }
}

impl Add for Capacity {
    type Output = Capacity;

    fn add(self, rhs: Capacity) -> Capacity {
        Capacity(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Capacity {
    fn sum<I: Iterator<Item = Capacity>>(iter: I) -> Self {
        iter.fold(Capacity::ZERO, Add::add)
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
