//! Type-safe wrappers for automaton states and transition labels.
//!
//! This module provides a newtype for state identifiers and an enum for
//! transition labels, so that a state id is never confused with a plain index
//! and the silent move is never confused with a letter of the alphabet.
use std::fmt;

/// A state identifier (0-indexed).
///
/// State ids are allocated by [`Automaton::add_state`][crate::automaton::Automaton::add_state]
/// from a monotonically increasing counter.
///
/// # Invariants
///
/// - Ids are never reused within one automaton, even after the state is deleted
/// - Ids are only meaningful relative to the automaton that allocated them
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct StateId(u32);

impl StateId {
    /// Creates a state id from a raw index.
    pub const fn new(id: u32) -> Self {
        StateId(id)
    }

    /// Returns the raw id as a `u32`.
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Returns the raw id as a `usize`, for indexing dense tables.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the id following this one.
    pub(crate) const fn next(self) -> Self {
        StateId(self.0 + 1)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

impl From<StateId> for u32 {
    fn from(state: StateId) -> Self {
        state.0
    }
}

impl From<u32> for StateId {
    fn from(id: u32) -> Self {
        StateId(id)
    }
}

/// The character used to spell [`Symbol::Epsilon`] in regex patterns and in output.
pub const EPSILON_CHAR: char = 'ε';

/// A transition label.
///
/// `Epsilon` is the silent move. It is usable in every automaton regardless of
/// its alphabet and is never itself a member of the alphabet.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Symbol {
    /// Silent move, consumed without reading input.
    Epsilon,
    /// A letter of the alphabet.
    Char(char),
}

impl Symbol {
    /// Checks if this is the silent move.
    pub const fn is_epsilon(self) -> bool {
        matches!(self, Symbol::Epsilon)
    }

    /// Returns the letter, or `None` for the silent move.
    pub const fn as_char(self) -> Option<char> {
        match self {
            Symbol::Epsilon => None,
            Symbol::Char(c) => Some(c),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Epsilon => write!(f, "{}", EPSILON_CHAR),
            Symbol::Char(c) => write!(f, "{}", c),
        }
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        if c == EPSILON_CHAR {
            Symbol::Epsilon
        } else {
            Symbol::Char(c)
        }
    }
}
