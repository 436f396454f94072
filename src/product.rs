//! Product construction (DFA intersection).

use std::collections::{HashMap, VecDeque};

use log::debug;

use crate::automaton::Automaton;
use crate::error::{Error, Result};
use crate::types::{StateId, Symbol};

impl Automaton {
    /// Intersects two DFAs.
    ///
    /// Both operands must be DFAs, and one alphabet must contain the other;
    /// the result is over the larger alphabet. Only pairs of states reachable
    /// from the pair of start states are created, and a pair is a goal iff both
    /// components are goals.
    ///
    /// # Errors
    ///
    /// - [`Error::NotDfa`] if either operand fails [`Automaton::check_dfa`],
    /// - [`Error::AlphabetMismatch`] if the alphabets are not nested.
    ///
    /// # Examples
    ///
    /// ```
    /// use sl2z_automata::automaton::Automaton;
    ///
    /// let ab = ['a', 'b'];
    /// let even_a = Automaton::from_regex(ab, "(b*ab*a)*b*").unwrap().to_dfa();
    /// let ends_b = Automaton::from_regex(ab, "(a|b)*b").unwrap().to_dfa();
    /// let both = even_a.intersect(&ends_b).unwrap();
    /// assert!(both.is_valid_word("aab"));
    /// assert!(!both.is_valid_word("ab"));
    /// assert!(!both.is_valid_word("aa"));
    /// ```
    pub fn intersect(&self, other: &Automaton) -> Result<Automaton> {
        debug!(
            "intersect(left = {} states, right = {} states)",
            self.num_states(),
            other.num_states()
        );
        self.check_dfa()?;
        other.check_dfa()?;

        let alphabet = if self.alphabet().is_superset(other.alphabet()) {
            self.alphabet()
        } else if other.alphabet().is_superset(self.alphabet()) {
            other.alphabet()
        } else {
            return Err(Error::AlphabetMismatch);
        };

        let (Some(left_start), Some(right_start)) = (self.start_state(), other.start_state()) else {
            unreachable!("check_dfa guarantees a unique start state");
        };

        let mut product = Automaton::new(alphabet.iter().copied());
        let mut pairs: HashMap<(StateId, StateId), StateId> = HashMap::new();
        let mut queue = VecDeque::new();

        let is_goal = |a: StateId, b: StateId| self.is_goal(a) && other.is_goal(b);
        let start = product.alloc_state(is_goal(left_start, right_start), true);
        pairs.insert((left_start, right_start), start);
        queue.push_back((left_start, right_start, start));

        while let Some((a, b, from)) = queue.pop_front() {
            for &c in alphabet {
                let (Some(a2), Some(b2)) = (self.target(a, c), other.target(b, c)) else {
                    continue;
                };
                let to = *pairs.entry((a2, b2)).or_insert_with(|| {
                    let state = product.alloc_state(is_goal(a2, b2), false);
                    queue.push_back((a2, b2, state));
                    state
                });
                product.link(from, Symbol::Char(c), to);
            }
        }

        debug!(
            "intersect: {} states, {} transitions",
            product.num_states(),
            product.num_transitions()
        );
        Ok(product)
    }
}
