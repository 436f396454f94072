//! Relation saturation over the generator alphabet.
//!
//! The automata handled here spell words over three generators of the modular
//! group: an order-2 generator `x`, an order-3 generator `y`, and the central
//! sign flip `n`, related by `x² = y³ = n` and `n² = 1`. Two automata built
//! from different spellings of the same group element only become
//! language-equivalent once every relation has been applied everywhere.
//!
//! [`Automaton::saturate`] does that by closing the automaton under the
//! relation table in [`rules`]: whenever a path between two states spells
//! `±1`, a direct `n` edge (odd) or Epsilon edge (even) is added between
//! them. The closure runs as a FIFO fixpoint over facts
//! `(from, to, class, parity)`, backed by a [`ReachIndex`]; every fact is
//! recorded and expanded exactly once, so the run terminates after at most
//! `states² × 4 × 2` facts.
//!
//! [`Automaton::add_surrounded_paths`] adds, next to every `x` or `y` edge, a
//! detour `n s n` through two fresh states. These give the closure places to
//! commute `n` past a generator. [`Automaton::canonicalize`] runs both.
//!
//! The engine only applies the relation table; it does not check that the
//! chosen characters actually satisfy the relations.
//!
//! # Examples
//!
//! ```
//! use sl2z_automata::automaton::Automaton;
//! use sl2z_automata::canonical::GroupAlphabet;
//!
//! let group = GroupAlphabet::default();
//! // y·y·y = n
//! let mut a = Automaton::from_word(group.symbols(), "YYY").unwrap();
//! assert!(!a.is_valid_word("N"));
//! assert_eq!(a.saturate(&group).unwrap(), 1);
//! assert!(a.is_valid_word("N"));
//! ```

use std::collections::VecDeque;

use log::{debug, trace};

use crate::automaton::Automaton;
use crate::error::{Error, Result};
use crate::types::{StateId, Symbol};

pub mod index;
pub mod rules;
pub mod status;

pub use index::ReachIndex;
pub use rules::{Class, Fact};
pub use status::{Parity, ReachabilityStatus};

/// Assignment of the three generator roles to alphabet characters.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GroupAlphabet {
    /// Generator of order two up to sign (`x² = n`).
    pub x: char,
    /// Generator of order three up to sign (`y³ = n`).
    pub y: char,
    /// Central sign flip (`n² = 1`).
    pub n: char,
}

impl Default for GroupAlphabet {
    fn default() -> Self {
        Self { x: 'X', y: 'Y', n: 'N' }
    }
}

impl GroupAlphabet {
    pub fn new(x: char, y: char, n: char) -> Self {
        Self { x, y, n }
    }

    /// The three generator characters, as an alphabet.
    pub fn symbols(&self) -> [char; 3] {
        [self.x, self.y, self.n]
    }

    /// The fact carried by a single edge labeled `symbol`, if any.
    pub fn classify(&self, symbol: Symbol) -> Option<(Class, Parity)> {
        match symbol {
            Symbol::Epsilon => Some((Class::Sign, Parity::Even)),
            Symbol::Char(c) if c == self.n => Some((Class::Sign, Parity::Odd)),
            Symbol::Char(c) if c == self.x => Some((Class::X, Parity::Even)),
            Symbol::Char(c) if c == self.y => Some((Class::Y, Parity::Even)),
            Symbol::Char(_) => None,
        }
    }

    /// The edge label realizing a `±1` fact.
    pub fn sign_symbol(&self, parity: Parity) -> Symbol {
        match parity {
            Parity::Even => Symbol::Epsilon,
            Parity::Odd => Symbol::Char(self.n),
        }
    }

    fn is_generator(&self, symbol: Symbol) -> bool {
        symbol == Symbol::Char(self.x) || symbol == Symbol::Char(self.y)
    }

    fn check(&self, automaton: &Automaton) -> Result<()> {
        let flip = Symbol::Char(self.n);
        if automaton.is_usable(flip) {
            Ok(())
        } else {
            Err(Error::InvalidSymbol(flip))
        }
    }
}

impl Automaton {
    /// Closes the automaton under the group relations.
    ///
    /// Adds an `n` edge for every pair of states joined by a path equal to
    /// `-1`, and an Epsilon edge for every pair of distinct states joined by a
    /// path equal to `1`. Returns the number of edges added; running it again
    /// right away adds nothing.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSymbol`] if the sign flip is not in the alphabet.
    pub fn saturate(&mut self, group: &GroupAlphabet) -> Result<usize> {
        group.check(self)?;
        debug!(
            "saturate(states = {}, transitions = {})",
            self.num_states(),
            self.num_transitions()
        );

        let mut queue: VecDeque<Fact> = self
            .transitions()
            .iter()
            .filter_map(|(from, symbol, to)| {
                group
                    .classify(symbol)
                    .map(|(class, parity)| Fact::new(from, to, class, parity))
            })
            .collect();

        let mut index = ReachIndex::default();
        let mut added = 0;
        while let Some(fact) = queue.pop_front() {
            if !index.insert(&fact) {
                continue;
            }
            if fact.class == Class::Sign && !(fact.parity == Parity::Even && fact.from == fact.to) {
                let symbol = group.sign_symbol(fact.parity);
                if self.link(fact.from, symbol, fact.to) {
                    trace!("saturate: {} --{}--> {}", fact.from, symbol, fact.to);
                    added += 1;
                }
            }
            for implied in rules::consequences(&index, &fact) {
                if !index.contains(&implied) {
                    queue.push_back(implied);
                }
            }
        }

        debug!("saturate: {} facts, {} transitions added", index.len(), added);
        Ok(added)
    }

    /// Adds a detour `p -n-> u -s-> v -n-> q` for every generator edge `p -s-> q`.
    ///
    /// `u` and `v` are fresh states. Since `n s n = s`, the language is
    /// unchanged up to the group relations. Returns the number of edges added.
    pub fn add_surrounded_paths(&mut self, group: &GroupAlphabet) -> Result<usize> {
        group.check(self)?;
        let edges: Vec<(StateId, Symbol, StateId)> = self
            .transitions()
            .iter()
            .filter(|&(_, symbol, _)| group.is_generator(symbol))
            .collect();
        debug!("add_surrounded_paths: {} generator edges", edges.len());

        let flip = Symbol::Char(group.n);
        let mut added = 0;
        for (from, symbol, to) in edges {
            let before = self.alloc_state(false, false);
            let after = self.alloc_state(false, false);
            for (p, s, q) in [(from, flip, before), (before, symbol, after), (after, flip, to)] {
                if self.link(p, s, q) {
                    added += 1;
                }
            }
        }
        Ok(added)
    }

    /// Saturates, adds the surrounding detours, and saturates again.
    ///
    /// Returns the total number of edges added.
    pub fn canonicalize(&mut self, group: &GroupAlphabet) -> Result<usize> {
        let mut added = self.saturate(group)?;
        added += self.add_surrounded_paths(group)?;
        added += self.saturate(group)?;
        debug!("canonicalize: {} transitions added", added);
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};

    use test_log::test;

    use super::*;

    fn chain(word: &str) -> Automaton {
        Automaton::from_word(GroupAlphabet::default().symbols(), word).unwrap()
    }

    fn new_edges(before: &Automaton, after: &Automaton) -> Vec<(StateId, Symbol, StateId)> {
        let old: BTreeSet<_> = before.transitions().iter().collect();
        after.transitions().iter().filter(|e| !old.contains(e)).collect()
    }

    #[test]
    fn test_three_y_steps_add_one_flip() {
        let group = GroupAlphabet::default();
        let before = chain("YYY");
        let mut a = before.clone();
        assert_eq!(a.saturate(&group).unwrap(), 1);
        assert_eq!(
            new_edges(&before, &a),
            vec![(StateId::new(0), Symbol::Char('N'), StateId::new(3))]
        );
    }

    #[test]
    fn test_two_x_steps_add_one_flip() {
        let group = GroupAlphabet::default();
        let before = chain("XX");
        let mut a = before.clone();
        assert_eq!(a.saturate(&group).unwrap(), 1);
        assert_eq!(
            new_edges(&before, &a),
            vec![(StateId::new(0), Symbol::Char('N'), StateId::new(2))]
        );
        assert!(a.is_valid_word("N"));
    }

    #[test]
    fn test_flips_cancel() {
        let group = GroupAlphabet::default();
        let mut a = chain("NN");
        a.saturate(&group).unwrap();
        assert!(a.transitions().contains(StateId::new(0), Symbol::Epsilon, StateId::new(2)));
        assert!(a.is_valid_word(""));
    }

    #[test]
    fn test_x_flip_x_is_identity() {
        // x·n·x = n² = 1
        let group = GroupAlphabet::default();
        let mut a = chain("XNX");
        a.saturate(&group).unwrap();
        assert!(a.transitions().contains(StateId::new(0), Symbol::Epsilon, StateId::new(3)));
        assert!(a.is_valid_word(""));
    }

    #[test]
    fn test_y_to_the_sixth_is_identity() {
        let group = GroupAlphabet::default();
        let mut a = chain("YYYYYY");
        a.saturate(&group).unwrap();
        let edges = a.transitions();
        for i in 0..4 {
            assert!(edges.contains(StateId::new(i), Symbol::Char('N'), StateId::new(i + 3)));
        }
        assert!(edges.contains(StateId::new(0), Symbol::Epsilon, StateId::new(6)));
        assert!(a.is_valid_word(""));
        assert!(a.is_valid_word("NN"));
        assert!(a.is_valid_word("YYYN"));
    }

    #[test]
    fn test_saturate_is_idempotent() {
        let group = GroupAlphabet::default();
        let mut a = chain("YYXXNYYYXNXYY");
        let added = a.saturate(&group).unwrap();
        assert!(added > 0);
        let snapshot = a.clone();
        assert_eq!(a.saturate(&group).unwrap(), 0);
        assert_eq!(a, snapshot);
    }

    #[test]
    fn test_surrounded_paths_commute_flip() {
        let group = GroupAlphabet::default();
        let mut a = chain("XN");
        assert!(!a.is_valid_word("NX"));
        a.canonicalize(&group).unwrap();
        println!("{}", a);
        assert!(a.is_valid_word("XN"));
        assert!(a.is_valid_word("NX"));
        assert!(!a.is_valid_word("X"));
    }

    #[test]
    fn test_add_surrounded_paths_shape() {
        let group = GroupAlphabet::default();
        let mut a = chain("XNY");
        // Two generator edges, three new edges and two new states each
        assert_eq!(a.add_surrounded_paths(&group).unwrap(), 6);
        assert_eq!(a.num_states(), 4 + 4);
        assert!(a.is_valid_word("NXNNNYN"));
    }

    /// Copy of `a` with state ids reversed and edges inserted in reverse order.
    fn relabeled(a: &Automaton) -> (Automaton, HashMap<StateId, StateId>) {
        let mut b = Automaton::new(a.alphabet().iter().copied());
        let mut map = HashMap::new();
        for &state in a.states().iter().rev() {
            map.insert(state, b.add_state(a.is_goal(state), a.is_start(state)).unwrap());
        }
        let edges: Vec<_> = a.transitions().iter().collect();
        for &(from, symbol, to) in edges.iter().rev() {
            b.add_transition(map[&from], map[&to], symbol).unwrap();
        }
        (b, map)
    }

    #[test]
    fn test_canonicalize_is_order_independent() {
        let group = GroupAlphabet::default();
        let mut a = chain("YYXNXYYYNX");
        let (mut b, map) = relabeled(&a);
        assert_ne!(a, b);

        a.canonicalize(&group).unwrap();
        b.canonicalize(&group).unwrap();
        assert_eq!(a.num_states(), b.num_states());
        assert_eq!(a.num_transitions(), b.num_transitions());

        // Edges between the original states agree under the relabeling
        let inner = |x: &Automaton, keep: &dyn Fn(StateId) -> Option<StateId>| -> BTreeSet<_> {
            x.transitions()
                .iter()
                .filter_map(|(from, symbol, to)| Some((keep(from)?, symbol, keep(to)?)))
                .collect()
        };
        let mapped = inner(&a, &|s: StateId| map.get(&s).copied());
        let native = inner(&b, &|s: StateId| map.values().find(|&&v| v == s).copied());
        println!("{} edges between original states", mapped.len());
        assert!(mapped.len() > 10);
        assert_eq!(mapped, native);

        for word in ["NX", "XNN", "YYXNXYYYNX", "NYYXXXYYYNX", "YYNXXYYYNX"] {
            assert_eq!(a.is_valid_word(word), b.is_valid_word(word), "word {:?}", word);
        }
    }

    #[test]
    fn test_requires_flip_in_alphabet() {
        let group = GroupAlphabet::default();
        let mut a = Automaton::from_word(['X', 'Y'], "XX").unwrap();
        assert_eq!(a.saturate(&group), Err(Error::InvalidSymbol(Symbol::Char('N'))));
        assert_eq!(
            a.add_surrounded_paths(&group),
            Err(Error::InvalidSymbol(Symbol::Char('N')))
        );
    }

    #[test]
    fn test_custom_alphabet() {
        let group = GroupAlphabet::new('a', 'b', 'c');
        let mut a = Automaton::from_word(['a', 'b', 'c'], "bbb").unwrap();
        assert_eq!(a.saturate(&group).unwrap(), 1);
        assert!(a.is_valid_word("c"));
    }
}
