//! Subset construction (NFA to DFA).

use std::collections::{BTreeSet, HashMap, VecDeque};

use log::{debug, trace};

use crate::automaton::Automaton;
use crate::types::{StateId, Symbol};

impl Automaton {
    /// Determinizes the automaton with the subset construction.
    ///
    /// Each DFA state stands for an Epsilon-closed set of NFA states. The
    /// initial DFA state is the closure of the start set; subsets are explored
    /// breadth-first, one alphabet letter at a time. Empty subsets are the
    /// implicit dead state and are never materialized, so the result may be
    /// partial.
    ///
    /// The result accepts exactly the same words as `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sl2z_automata::automaton::Automaton;
    ///
    /// let nfa = Automaton::from_regex(['a', 'b'], "(a|b)*").unwrap();
    /// let dfa = nfa.to_dfa();
    /// assert!(dfa.is_dfa());
    /// assert_eq!(dfa.num_states(), 3);
    /// ```
    pub fn to_dfa(&self) -> Automaton {
        debug!(
            "to_dfa(states = {}, transitions = {})",
            self.num_states(),
            self.num_transitions()
        );

        let mut dfa = Automaton::new(self.alphabet().iter().copied());
        let mut subsets: HashMap<BTreeSet<StateId>, StateId> = HashMap::new();
        let mut queue: VecDeque<(BTreeSet<StateId>, StateId)> = VecDeque::new();

        let initial = self.epsilon_closure(self.start_states());
        let is_goal = !initial.is_disjoint(self.goal_states());
        let start = dfa.alloc_state(is_goal, true);
        subsets.insert(initial.clone(), start);
        queue.push_back((initial, start));

        while let Some((subset, from)) = queue.pop_front() {
            for &c in self.alphabet() {
                let next = self.epsilon_closure(&self.step(&subset, c));
                if next.is_empty() {
                    continue;
                }
                let to = match subsets.get(&next) {
                    Some(&existing) => existing,
                    None => {
                        let is_goal = !next.is_disjoint(self.goal_states());
                        let state = dfa.alloc_state(is_goal, false);
                        trace!("to_dfa: {} = {:?}", state, next);
                        subsets.insert(next.clone(), state);
                        queue.push_back((next, state));
                        state
                    }
                };
                dfa.link(from, Symbol::Char(c), to);
            }
        }

        debug!(
            "to_dfa: {} states, {} transitions",
            dfa.num_states(),
            dfa.num_transitions()
        );
        dfa
    }
}
