//! The automaton: states, alphabet, transitions, start and goal sets.
//!
//! An [`Automaton`] owns everything it refers to. States are opaque ids
//! allocated by [`Automaton::add_state`]; membership in the start or goal set
//! is recorded in the automaton, not on the state.
//!
//! The transformation algorithms live in their own modules and are exposed as
//! methods on `Automaton`:
//!
//! - [`to_dfa`][Automaton::to_dfa] (subset construction),
//! - [`intersect`][Automaton::intersect] (product construction),
//! - [`minimize`][Automaton::minimize] (partition refinement),
//! - [`saturate`][Automaton::saturate] and [`canonicalize`][Automaton::canonicalize]
//!   (relation saturation over the generator alphabet).
//!
//! Transformations return a fresh automaton and leave `self` untouched.
//! Canonicalization is the exception: it augments `self` in place.
//!
//! # Examples
//!
//! ```
//! use sl2z_automata::automaton::Automaton;
//!
//! let mut a = Automaton::new(['a', 'b']);
//! let s0 = a.add_state(false, true).unwrap();
//! let s1 = a.add_state(true, false).unwrap();
//! a.add_transition(s0, s1, 'a').unwrap();
//! a.add_transition(s1, s1, 'b').unwrap();
//!
//! assert!(a.is_valid_word("a"));
//! assert!(a.is_valid_word("abbb"));
//! assert!(!a.is_valid_word("b"));
//! assert!(a.is_dfa());
//! ```

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use log::debug;

use crate::error::{Error, Result};
use crate::transitions::TransitionRelation;
use crate::types::{StateId, Symbol};

#[derive(Debug, Clone)]
pub struct Automaton {
    alphabet: BTreeSet<char>,
    states: BTreeSet<StateId>,
    start_states: BTreeSet<StateId>,
    goal_states: BTreeSet<StateId>,
    transitions: TransitionRelation,
    next_id: StateId,
}

impl Automaton {
    /// Creates an empty automaton over a fixed alphabet.
    pub fn new(alphabet: impl IntoIterator<Item = char>) -> Self {
        Self {
            alphabet: alphabet.into_iter().collect(),
            states: BTreeSet::new(),
            start_states: BTreeSet::new(),
            goal_states: BTreeSet::new(),
            transitions: TransitionRelation::new(),
            next_id: StateId::new(0),
        }
    }

    /// Creates a linear automaton accepting exactly `word`.
    pub fn from_word(alphabet: impl IntoIterator<Item = char>, word: &str) -> Result<Self> {
        let mut automaton = Automaton::new(alphabet);
        let mut current = automaton.add_state(false, true)?;
        for c in word.chars() {
            let next = automaton.add_state(false, false)?;
            automaton.add_transition(current, next, c)?;
            current = next;
        }
        automaton.set_goal_state(current)?;
        Ok(automaton)
    }
}

impl Automaton {
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }
    pub fn states(&self) -> &BTreeSet<StateId> {
        &self.states
    }
    pub fn start_states(&self) -> &BTreeSet<StateId> {
        &self.start_states
    }
    pub fn goal_states(&self) -> &BTreeSet<StateId> {
        &self.goal_states
    }
    pub fn transitions(&self) -> &TransitionRelation {
        &self.transitions
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }
    pub fn num_transitions(&self) -> usize {
        self.transitions.len()
    }

    pub fn has_state(&self, state: StateId) -> bool {
        self.states.contains(&state)
    }
    pub fn is_start(&self, state: StateId) -> bool {
        self.start_states.contains(&state)
    }
    pub fn is_goal(&self, state: StateId) -> bool {
        self.goal_states.contains(&state)
    }

    /// Returns the start state if there is exactly one.
    pub fn start_state(&self) -> Option<StateId> {
        if self.start_states.len() == 1 {
            self.start_states.first().copied()
        } else {
            None
        }
    }

    /// Checks if `symbol` may label a transition (Epsilon or an alphabet letter).
    pub fn is_usable(&self, symbol: Symbol) -> bool {
        match symbol {
            Symbol::Epsilon => true,
            Symbol::Char(c) => self.alphabet.contains(&c),
        }
    }

    /// Destinations of `(state, symbol)`.
    pub fn successors(&self, state: StateId, symbol: impl Into<Symbol>) -> impl Iterator<Item = StateId> + '_ {
        self.transitions
            .get(state, symbol.into())
            .into_iter()
            .flat_map(|targets| targets.iter().copied())
    }

    /// The unique destination of `(state, symbol)`, if there is exactly one.
    pub fn target(&self, state: StateId, symbol: impl Into<Symbol>) -> Option<StateId> {
        match self.transitions.get(state, symbol.into()) {
            Some(targets) if targets.len() == 1 => targets.first().copied(),
            _ => None,
        }
    }

    fn ensure_state(&self, state: StateId) -> Result<()> {
        if self.has_state(state) {
            Ok(())
        } else {
            Err(Error::UnknownState(state))
        }
    }
}

// Mutation
impl Automaton {
    /// Allocates a fresh state, optionally marking it as goal and/or start.
    pub fn add_state(&mut self, is_goal: bool, is_start: bool) -> Result<StateId> {
        if self.has_state(self.next_id) {
            return Err(Error::DuplicateState(self.next_id));
        }
        Ok(self.alloc_state(is_goal, is_start))
    }

    /// Infallible allocation: `next_id` only grows, so it is never taken.
    pub(crate) fn alloc_state(&mut self, is_goal: bool, is_start: bool) -> StateId {
        let state = self.next_id;
        let fresh = self.states.insert(state);
        debug_assert!(fresh, "state {} allocated twice", state);
        self.next_id = state.next();
        if is_goal {
            self.goal_states.insert(state);
        }
        if is_start {
            self.start_states.insert(state);
        }
        state
    }

    /// Edge insertion for builders whose operands are valid by construction.
    pub(crate) fn link(&mut self, from: StateId, symbol: Symbol, to: StateId) -> bool {
        debug_assert!(self.is_usable(symbol), "symbol '{}' is not usable", symbol);
        debug_assert!(self.has_state(from) && self.has_state(to));
        self.transitions.add(from, symbol, to)
    }

    /// Adds the edge `from --symbol--> to`.
    ///
    /// Returns `false` if the edge was already present.
    pub fn add_transition(&mut self, from: StateId, to: StateId, symbol: impl Into<Symbol>) -> Result<bool> {
        let symbol = symbol.into();
        if !self.is_usable(symbol) {
            return Err(Error::InvalidSymbol(symbol));
        }
        self.ensure_state(from)?;
        self.ensure_state(to)?;
        Ok(self.transitions.add(from, symbol, to))
    }

    /// Removes the edge `from --symbol--> to`.
    ///
    /// Returns `false` if the edge was not present.
    pub fn remove_transition(&mut self, from: StateId, to: StateId, symbol: impl Into<Symbol>) -> Result<bool> {
        let symbol = symbol.into();
        if !self.is_usable(symbol) {
            return Err(Error::InvalidSymbol(symbol));
        }
        self.ensure_state(from)?;
        self.ensure_state(to)?;
        Ok(self.transitions.remove(from, symbol, to))
    }

    /// Removes `state` together with its outgoing edges.
    ///
    /// Incoming edges are removed too, unless `skip_incoming` is set. Only pass
    /// `true` when `state` is known to have no incoming edges; otherwise the
    /// automaton is left with dangling edges.
    pub fn delete_state(&mut self, state: StateId, skip_incoming: bool) -> Result<()> {
        self.ensure_state(state)?;
        self.transitions.remove_outgoing(state);
        if !skip_incoming {
            self.transitions.remove_incoming(state);
        }
        self.states.remove(&state);
        self.start_states.remove(&state);
        self.goal_states.remove(&state);
        Ok(())
    }

    pub fn set_start_state(&mut self, state: StateId) -> Result<()> {
        self.ensure_state(state)?;
        self.start_states.insert(state);
        Ok(())
    }

    pub fn unset_start_state(&mut self, state: StateId) -> Result<()> {
        self.ensure_state(state)?;
        self.start_states.remove(&state);
        Ok(())
    }

    pub fn set_goal_state(&mut self, state: StateId) -> Result<()> {
        self.ensure_state(state)?;
        self.goal_states.insert(state);
        Ok(())
    }

    pub fn unset_goal_state(&mut self, state: StateId) -> Result<()> {
        self.ensure_state(state)?;
        self.goal_states.remove(&state);
        Ok(())
    }
}

// Simulation
impl Automaton {
    /// Returns all states reachable from `states` through zero or more Epsilon edges.
    pub fn epsilon_closure(&self, states: &BTreeSet<StateId>) -> BTreeSet<StateId> {
        let mut closure = states.clone();
        let mut queue: VecDeque<StateId> = states.iter().copied().collect();
        while let Some(state) = queue.pop_front() {
            for next in self.successors(state, Symbol::Epsilon) {
                if closure.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        closure
    }

    /// Returns the direct `symbol`-successors of every state in `states` (no closure).
    pub fn step(&self, states: &BTreeSet<StateId>, symbol: impl Into<Symbol>) -> BTreeSet<StateId> {
        let symbol = symbol.into();
        states
            .iter()
            .flat_map(|&state| self.successors(state, symbol))
            .collect()
    }

    /// Checks whether the automaton accepts `word`.
    ///
    /// `ε` in `word` stands for the empty word and is skipped, as in regex
    /// patterns.
    pub fn is_valid_word(&self, word: &str) -> bool {
        if self.start_states.is_empty() || self.goal_states.is_empty() {
            return false;
        }
        let mut frontier = self.epsilon_closure(&self.start_states);
        for c in word.chars() {
            if Symbol::from(c).is_epsilon() {
                continue;
            }
            frontier = self.epsilon_closure(&self.step(&frontier, c));
            if frontier.is_empty() {
                return false;
            }
        }
        !frontier.is_disjoint(&self.goal_states)
    }
}

// DFA structure
impl Automaton {
    /// Returns the first violated DFA condition, or `None` for a DFA.
    ///
    /// Conditions are checked in order: exactly one start state, at most one
    /// destination per `(state, symbol)`, no Epsilon edges.
    pub fn dfa_violation(&self) -> Option<String> {
        if self.start_states.len() != 1 {
            return Some(format!(
                "expected exactly one start state, found {}",
                self.start_states.len()
            ));
        }
        for state in &self.states {
            for (symbol, targets) in self.transitions.row(*state) {
                if targets.len() > 1 {
                    return Some(format!(
                        "state {} has {} transitions on '{}'",
                        state,
                        targets.len(),
                        symbol
                    ));
                }
            }
        }
        if let Some((from, _, to)) = self.transitions.iter().find(|(_, symbol, _)| symbol.is_epsilon()) {
            return Some(format!("epsilon transition from {} to {}", from, to));
        }
        None
    }

    pub fn is_dfa(&self) -> bool {
        self.dfa_violation().is_none()
    }

    /// Fails with [`Error::NotDfa`] naming the first violation, if any.
    pub fn check_dfa(&self) -> Result<()> {
        match self.dfa_violation() {
            None => Ok(()),
            Some(reason) => {
                debug!("check_dfa: {}", reason);
                Err(Error::NotDfa(reason))
            }
        }
    }
}

impl PartialEq for Automaton {
    fn eq(&self, other: &Self) -> bool {
        self.alphabet == other.alphabet
            && self.states == other.states
            && self.start_states == other.start_states
            && self.goal_states == other.goal_states
            && self.transitions == other.transitions
    }
}

impl Eq for Automaton {}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Automaton(states = {}, transitions = {}, alphabet = {:?})",
            self.num_states(),
            self.num_transitions(),
            self.alphabet
        )?;
        for &state in &self.states {
            let marker = match (self.is_start(state), self.is_goal(state)) {
                (true, true) => "->*",
                (true, false) => "-> ",
                (false, true) => "  *",
                (false, false) => "   ",
            };
            write!(f, "{} {}:", marker, state)?;
            for (symbol, to) in self.transitions.outgoing(state) {
                write!(f, " {}->{}", symbol, to)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    /// 0 -a-> 1 -b-> 2 -c-> {1, 3}, start {0}, goal {3}.
    fn sample_nfa() -> Automaton {
        let mut a = Automaton::new(['a', 'b', 'c']);
        let s0 = a.add_state(false, true).unwrap();
        let s1 = a.add_state(false, false).unwrap();
        let s2 = a.add_state(false, false).unwrap();
        let s3 = a.add_state(true, false).unwrap();
        a.add_transition(s0, s1, 'a').unwrap();
        a.add_transition(s1, s2, 'b').unwrap();
        a.add_transition(s2, s1, 'c').unwrap();
        a.add_transition(s2, s3, 'c').unwrap();
        a
    }

    #[test]
    fn test_add_state_allocates_fresh_ids() {
        let mut a = Automaton::new(['a']);
        let s0 = a.add_state(false, true).unwrap();
        let s1 = a.add_state(true, false).unwrap();
        a.delete_state(s1, false).unwrap();
        let s2 = a.add_state(false, false).unwrap();
        assert_eq!(s0, StateId::new(0));
        assert_eq!(s2, StateId::new(2));
        assert!(a.is_start(s0));
        assert!(!a.is_goal(s1));
        assert_eq!(a.num_states(), 2);
    }

    #[test]
    fn test_add_transition_reports_novelty() {
        let mut a = Automaton::new(['a']);
        let s0 = a.add_state(false, true).unwrap();
        let s1 = a.add_state(true, false).unwrap();
        assert_eq!(a.add_transition(s0, s1, 'a'), Ok(true));
        assert_eq!(a.add_transition(s0, s1, 'a'), Ok(false));
        assert_eq!(a.add_transition(s0, s1, Symbol::Epsilon), Ok(true));
        assert_eq!(a.num_transitions(), 2);
    }

    #[test]
    fn test_add_transition_invalid_operands() {
        let mut a = Automaton::new(['a']);
        let s0 = a.add_state(false, true).unwrap();
        assert_eq!(
            a.add_transition(s0, s0, 'b'),
            Err(Error::InvalidSymbol(Symbol::Char('b')))
        );
        assert_eq!(
            a.add_transition(s0, StateId::new(7), 'a'),
            Err(Error::UnknownState(StateId::new(7)))
        );
        assert_eq!(a.set_goal_state(StateId::new(7)), Err(Error::UnknownState(StateId::new(7))));
    }

    #[test]
    fn test_remove_transition() {
        let mut a = sample_nfa();
        let (s1, s2) = (StateId::new(1), StateId::new(2));
        assert_eq!(a.num_transitions(), 4);
        assert_eq!(a.remove_transition(s1, s2, 'b'), Ok(true));
        assert_eq!(a.num_transitions(), 3);
        assert_eq!(a.remove_transition(s1, s2, 'b'), Ok(false));
        assert_eq!(a.num_transitions(), 3);
        assert!(!a.is_valid_word("abc"));

        assert_eq!(
            a.remove_transition(s1, s2, 'z'),
            Err(Error::InvalidSymbol(Symbol::Char('z')))
        );
        assert_eq!(
            a.remove_transition(s1, StateId::new(9), 'b'),
            Err(Error::UnknownState(StateId::new(9)))
        );
        assert_eq!(a.remove_transition(s1, s2, Symbol::Epsilon), Ok(false));
    }

    #[test]
    fn test_epsilon_in_word_is_skipped() {
        let a = Automaton::from_regex(['a'], "a").unwrap();
        assert!(a.is_valid_word("a"));
        assert!(a.is_valid_word("aε"));
        assert!(a.is_valid_word("εaε"));
        assert!(!a.is_valid_word("ε"));
        assert!(!a.is_valid_word("aεa"));
    }

    #[test]
    fn test_delete_state_removes_incoming() {
        let mut a = sample_nfa();
        let s1 = StateId::new(1);
        a.delete_state(s1, false).unwrap();
        assert_eq!(a.num_states(), 3);
        // Only 2 -c-> 3 survives
        assert_eq!(a.num_transitions(), 1);
        assert!(a.transitions().iter().all(|(from, _, to)| from != s1 && to != s1));
    }

    #[test]
    fn test_start_goal_toggles_are_idempotent() {
        let mut a = Automaton::new(['a']);
        let s0 = a.add_state(false, false).unwrap();
        a.set_start_state(s0).unwrap();
        a.set_start_state(s0).unwrap();
        assert_eq!(a.start_states().len(), 1);
        a.unset_start_state(s0).unwrap();
        a.unset_start_state(s0).unwrap();
        assert!(a.start_states().is_empty());
        a.set_goal_state(s0).unwrap();
        a.unset_goal_state(s0).unwrap();
        assert!(a.goal_states().is_empty());
    }

    #[test]
    fn test_is_valid_word() {
        let a = sample_nfa();
        println!("{}", a);
        assert!(a.is_valid_word("abc"));
        assert!(a.is_valid_word("abcbcbc"));
        assert!(!a.is_valid_word("abb"));
        assert!(!a.is_valid_word("bbbaacc"));
        assert!(!a.is_valid_word(""));
    }

    #[test]
    fn test_is_valid_word_without_start_or_goal() {
        let mut a = Automaton::new(['a']);
        let s0 = a.add_state(true, false).unwrap();
        assert!(!a.is_valid_word(""));
        a.set_start_state(s0).unwrap();
        assert!(a.is_valid_word(""));
        a.unset_goal_state(s0).unwrap();
        assert!(!a.is_valid_word(""));
    }

    #[test]
    fn test_epsilon_closure() {
        let mut a = Automaton::new(['a']);
        let s0 = a.add_state(false, true).unwrap();
        let s1 = a.add_state(false, false).unwrap();
        let s2 = a.add_state(true, false).unwrap();
        let s3 = a.add_state(false, false).unwrap();
        a.add_transition(s0, s1, Symbol::Epsilon).unwrap();
        a.add_transition(s1, s2, Symbol::Epsilon).unwrap();
        a.add_transition(s2, s0, Symbol::Epsilon).unwrap();
        a.add_transition(s2, s3, 'a').unwrap();

        let closure = a.epsilon_closure(&BTreeSet::from([s0]));
        assert_eq!(closure, BTreeSet::from([s0, s1, s2]));
        assert!(a.is_valid_word(""));
        assert!(!a.is_valid_word("a"));
    }

    #[test]
    fn test_clone_is_independent() {
        let a = sample_nfa();
        let mut b = a.clone();
        assert_eq!(a, b);
        b.unset_goal_state(StateId::new(3)).unwrap();
        assert_ne!(a, b);
        assert!(a.is_valid_word("abc"));
        assert!(!b.is_valid_word("abc"));
    }

    #[test]
    fn test_dfa_violation_order() {
        let mut a = Automaton::new(['a']);
        assert!(a.dfa_violation().unwrap().contains("exactly one start state"));

        let s0 = a.add_state(false, true).unwrap();
        let s1 = a.add_state(true, false).unwrap();
        assert!(a.is_dfa());

        a.add_transition(s0, s1, Symbol::Epsilon).unwrap();
        assert!(a.dfa_violation().unwrap().contains("epsilon"));

        a.add_transition(s0, s0, 'a').unwrap();
        a.add_transition(s0, s1, 'a').unwrap();
        assert!(a.dfa_violation().unwrap().contains("2 transitions on 'a'"));
        assert!(matches!(a.check_dfa(), Err(Error::NotDfa(_))));
    }

    #[test]
    fn test_from_word() {
        let a = Automaton::from_word(['X', 'Y', 'N'], "XYY").unwrap();
        assert!(a.is_dfa());
        assert!(a.is_valid_word("XYY"));
        assert!(!a.is_valid_word("XY"));
        assert!(!a.is_valid_word("XYYY"));
        assert!(Automaton::from_word(['X'], "Z").is_err());
    }
}
