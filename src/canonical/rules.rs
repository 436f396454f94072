//! The relation table and the derivation of implied facts.
//!
//! Writing `n` for the sign flip, `x` for the order-2 generator and `y` for
//! the order-3 generator, the group satisfies
//!
//! ```text
//! x² = y³ = n,    n² = 1,    n central
//! ```
//!
//! Every derived fact relates two states by a path whose word equals one of
//! `±1`, `±x`, `±y`, `±y²`. The sign is the fact's [`Parity`], the rest is its
//! [`Class`]. Two facts that meet at a state compose into a third one whenever
//! the product of their words is again of that shape.

use std::fmt;

use super::index::ReachIndex;
use super::status::{Parity, ReachabilityStatus};
use crate::types::StateId;

/// The group element a derived fact stands for, up to sign.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Class {
    /// `±1`: identity or sign flip.
    Sign,
    /// `±x`.
    X,
    /// `±y`.
    Y,
    /// `±y²`.
    YY,
}

impl Class {
    pub const ALL: [Class; 4] = [Class::Sign, Class::X, Class::Y, Class::YY];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Class::Sign => write!(f, "1"),
            Class::X => write!(f, "x"),
            Class::Y => write!(f, "y"),
            Class::YY => write!(f, "y²"),
        }
    }
}

/// `from` reaches `to` by a word equal to `parity · class`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Fact {
    pub from: StateId,
    pub to: StateId,
    pub class: Class,
    pub parity: Parity,
}

impl Fact {
    pub fn new(from: StateId, to: StateId, class: Class, parity: Parity) -> Self {
        Self {
            from,
            to,
            class,
            parity,
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --{}{}--> {}", self.from, self.parity, self.class, self.to)
    }
}

/// Product of a `left` word followed by a `right` word.
///
/// Returns the class of the product and the sign it picks up, or `None` if the
/// product is not one of the tracked classes.
pub fn compose(left: Class, right: Class) -> Option<(Class, Parity)> {
    use Class::*;
    match (left, right) {
        (Sign, c) | (c, Sign) => Some((c, Parity::Even)),
        // x·x = n
        (X, X) => Some((Sign, Parity::Odd)),
        (Y, Y) => Some((YY, Parity::Even)),
        // y·y² = y²·y = n
        (Y, YY) | (YY, Y) => Some((Sign, Parity::Odd)),
        // y²·y² = n·y
        (YY, YY) => Some((Y, Parity::Odd)),
        (X, _) | (_, X) => None,
    }
}

/// All facts implied by `fact` together with the facts already in `index`.
///
/// Facts ending at `fact.from` are composed on the left, facts starting at
/// `fact.to` on the right. `fact` itself must already be in the index, so
/// that a self-loop composes with itself.
pub fn consequences(index: &ReachIndex, fact: &Fact) -> Vec<Fact> {
    let mut implied = Vec::new();
    let own = ReachabilityStatus::of(fact.parity);

    for left in Class::ALL {
        let Some((class, sign)) = compose(left, fact.class) else {
            continue;
        };
        for (from, status) in index.incoming(fact.from, left) {
            for parity in (status * own * sign).parities() {
                implied.push(Fact::new(from, fact.to, class, parity));
            }
        }
    }

    for right in Class::ALL {
        let Some((class, sign)) = compose(fact.class, right) else {
            continue;
        };
        for (to, status) in index.outgoing(fact.to, right) {
            for parity in (own * status * sign).parities() {
                implied.push(Fact::new(fact.from, to, class, parity));
            }
        }
    }

    implied
}
