//! Sign parities and reachability statuses.

use std::fmt;
use std::ops::Mul;

/// The sign of a derived connection: an even or odd number of sign flips.
///
/// Parities multiply like the signs `+1` and `-1`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    pub fn flipped(self) -> Self {
        match self {
            Parity::Even => Parity::Odd,
            Parity::Odd => Parity::Even,
        }
    }
}

impl Mul for Parity {
    type Output = Parity;

    fn mul(self, rhs: Parity) -> Parity {
        if self == rhs {
            Parity::Even
        } else {
            Parity::Odd
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::Even => write!(f, "+"),
            Parity::Odd => write!(f, "-"),
        }
    }
}

/// Which parities a pair of states is known to be connected with.
///
/// Both flags may be set at once: the same pair can be joined by one path
/// with an even and another with an odd number of sign flips.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct ReachabilityStatus {
    pub even: bool,
    pub odd: bool,
}

impl ReachabilityStatus {
    pub const NONE: Self = Self { even: false, odd: false };

    pub fn of(parity: Parity) -> Self {
        match parity {
            Parity::Even => Self { even: true, odd: false },
            Parity::Odd => Self { even: false, odd: true },
        }
    }

    pub fn is_empty(self) -> bool {
        !self.even && !self.odd
    }

    pub fn contains(self, parity: Parity) -> bool {
        match parity {
            Parity::Even => self.even,
            Parity::Odd => self.odd,
        }
    }

    /// Records `parity`, returning `false` if it was already known.
    pub fn insert(&mut self, parity: Parity) -> bool {
        let flag = match parity {
            Parity::Even => &mut self.even,
            Parity::Odd => &mut self.odd,
        };
        !std::mem::replace(flag, true)
    }

    pub fn flipped(self) -> Self {
        Self {
            even: self.odd,
            odd: self.even,
        }
    }

    /// Status of a path made of a `self` path followed by an `other` path.
    ///
    /// Even if both parts agree in parity, odd if they disagree.
    pub fn compose(self, other: Self) -> Self {
        Self {
            even: (self.even && other.even) || (self.odd && other.odd),
            odd: (self.even && other.odd) || (self.odd && other.even),
        }
    }

    /// Iterates over the parities that are set.
    pub fn parities(self) -> impl Iterator<Item = Parity> {
        [(self.even, Parity::Even), (self.odd, Parity::Odd)]
            .into_iter()
            .filter_map(|(set, parity)| set.then_some(parity))
    }
}

impl Mul for ReachabilityStatus {
    type Output = ReachabilityStatus;

    fn mul(self, rhs: ReachabilityStatus) -> ReachabilityStatus {
        self.compose(rhs)
    }
}

impl Mul<Parity> for ReachabilityStatus {
    type Output = ReachabilityStatus;

    fn mul(self, rhs: Parity) -> ReachabilityStatus {
        self.compose(ReachabilityStatus::of(rhs))
    }
}
