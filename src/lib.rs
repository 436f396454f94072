//! # sl2z-automata: finite automata for word problems over the modular group
//!
//! **`sl2z-automata`** is a small automaton engine built for one job: deciding
//! which words over the generators of a matrix group map one vector onto another,
//! by turning the question into operations on regular languages.
//!
//! ## What is in here?
//!
//! - A general **automaton engine**: NFAs with Epsilon moves, simulation,
//!   subset construction, product intersection and minimization.
//! - A **regex compiler** (Thompson construction) for building automata from
//!   textual patterns.
//! - A **canonicalization engine** that saturates an automaton with every
//!   sign-flip or identity edge forced by the relations `x² = y³ = n`, `n² = 1`,
//!   so that automata built from different spellings of the same group element
//!   accept the same words.
//!
//! Matrix arithmetic and the decomposition of a matrix into a generator word
//! are not part of this crate: they only produce the strings fed into
//! [`Automaton::from_regex`][crate::automaton::Automaton::from_regex] and
//! [`Automaton::from_word`][crate::automaton::Automaton::from_word].
//!
//! ## Basic Usage
//!
//! ```rust
//! use sl2z_automata::automaton::Automaton;
//! use sl2z_automata::canonical::GroupAlphabet;
//!
//! let group = GroupAlphabet::default();
//!
//! // 1. Words spelling `x·n`
//! let mut left = Automaton::from_word(group.symbols(), "XN").unwrap();
//!
//! // 2. Close it under the group relations, then determinize and minimize
//! left.canonicalize(&group).unwrap();
//! let left = left.to_dfa().minimize().unwrap();
//!
//! // 3. Words spelling `n` followed by one `x`
//! let right = Automaton::from_regex(group.symbols(), "NX").unwrap().to_dfa();
//!
//! // 4. `n·x = x·n`, so the intersection is not empty
//! let both = left.intersect(&right).unwrap().minimize().unwrap();
//! assert!(!both.is_empty());
//! assert_eq!(both.shortest_word().as_deref(), Some("NX"));
//! ```
//!
//! ## Core Components
//!
//! - **[`automaton`]**: The [`Automaton`][crate::automaton::Automaton] itself, with construction and simulation.
//! - **[`regex`]**: Pattern compilation.
//! - **[`subset`]**, **[`product`]**, **[`minimize`]**: The transformations.
//! - **[`canonical`]**: Relation saturation.
//! - **[`words`]**: Emptiness, shortest word, enumeration and counting.

pub mod automaton;
pub mod canonical;
pub mod error;
pub mod minimize;
pub mod partition;
pub mod product;
pub mod regex;
pub mod subset;
pub mod transitions;
pub mod types;
pub mod words;
