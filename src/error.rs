//! Error type for automaton operations.

use std::fmt;

use crate::types::{StateId, Symbol};

/// Errors reported by automaton construction and transformation.
///
/// Every error is a deterministic function of the input: retrying the same
/// call on the same automaton fails the same way.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Error {
    /// The state does not belong to the automaton.
    UnknownState(StateId),
    /// The symbol is neither Epsilon nor a letter of the alphabet.
    InvalidSymbol(Symbol),
    /// The id allocator produced an id that is already in use.
    DuplicateState(StateId),
    /// The regex pattern is malformed.
    InvalidRegex {
        /// Character offset in the pattern (the pattern length for errors at the end).
        position: usize,
        /// What went wrong.
        reason: String,
    },
    /// A DFA-only operation was requested on an automaton that is not a DFA.
    NotDfa(String),
    /// Intersection operands have alphabets where neither contains the other.
    AlphabetMismatch,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownState(state) => write!(f, "unknown state {}", state),
            Error::InvalidSymbol(symbol) => write!(f, "symbol '{}' is not in the alphabet", symbol),
            Error::DuplicateState(state) => write!(f, "state {} already exists", state),
            Error::InvalidRegex { position, reason } => {
                write!(f, "invalid regex at position {}: {}", position, reason)
            }
            Error::NotDfa(reason) => write!(f, "automaton is not a DFA: {}", reason),
            Error::AlphabetMismatch => write!(f, "alphabets are not compatible"),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
