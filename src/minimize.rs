//! DFA minimization by partition refinement.
//!
//! The partial transition function of the DFA is made total with a virtual
//! *dead* element: every missing transition goes to it, and it loops to
//! itself on every letter. It is never accepting.
//!
//! Refinement starts from `{goals}` and `{non-goals + dead}` and splits a
//! block whenever two of its members disagree on the block of some successor
//! (their *signature*). After a split, only the blocks holding predecessors of
//! the split block's members can change, so only those are re-examined.
//!
//! The block of the dead element (every state that cannot reach a goal) is
//! not materialized, unless it holds the start state.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet, VecDeque};

use log::{debug, trace};

use crate::automaton::Automaton;
use crate::error::Result;
use crate::partition::{BlockId, PartitionTree};
use crate::types::{StateId, Symbol};

impl Automaton {
    /// Returns the minimal DFA accepting the same language.
    ///
    /// # Errors
    ///
    /// [`Error::NotDfa`][crate::error::Error::NotDfa] if `self` is not a DFA;
    /// run [`to_dfa`][Automaton::to_dfa] first.
    ///
    /// # Examples
    ///
    /// ```
    /// use sl2z_automata::automaton::Automaton;
    ///
    /// let dfa = Automaton::from_regex(['a', 'b'], "(a|b)*").unwrap().to_dfa();
    /// assert_eq!(dfa.num_states(), 3);
    /// let min = dfa.minimize().unwrap();
    /// assert_eq!(min.num_states(), 1);
    /// ```
    pub fn minimize(&self) -> Result<Automaton> {
        debug!(
            "minimize(states = {}, transitions = {})",
            self.num_states(),
            self.num_transitions()
        );
        self.check_dfa()?;

        let states: Vec<StateId> = self.states().iter().copied().collect();
        let alphabet: Vec<char> = self.alphabet().iter().copied().collect();
        let index: HashMap<StateId, usize> = states.iter().enumerate().map(|(i, &s)| (s, i)).collect();
        let dead = states.len();

        // Total successor table over `0..=dead`
        let mut successors: Vec<Vec<usize>> = states
            .iter()
            .map(|&s| {
                alphabet
                    .iter()
                    .map(|&c| self.target(s, c).map_or(dead, |t| index[&t]))
                    .collect()
            })
            .collect();
        successors.push(vec![dead; alphabet.len()]);

        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); dead + 1];
        for (x, row) in successors.iter().enumerate() {
            for &y in row {
                predecessors[y].push(x);
            }
        }

        let (goals, others): (Vec<usize>, Vec<usize>) =
            (0..=dead).partition(|&x| x != dead && self.is_goal(states[x]));
        let mut tree = PartitionTree::new(dead + 1, [goals, others]);

        let mut queue: VecDeque<BlockId> = tree.leaves().collect();
        let mut queued: HashSet<BlockId> = queue.iter().copied().collect();
        let mut splits = 0;

        while let Some(block) = queue.pop_front() {
            queued.remove(&block);
            let signatures: Vec<Vec<BlockId>> = tree
                .members(block)
                .iter()
                .map(|&x| successors[x].iter().map(|&y| tree.block_of(y)).collect())
                .collect();
            let children = tree.split_by(block, signatures);
            if children.is_empty() {
                continue;
            }
            splits += 1;
            trace!("minimize: {} split into {:?}", block, children);

            for &x in tree.members(block) {
                for &p in &predecessors[x] {
                    let b = tree.block_of(p);
                    if queued.insert(b) {
                        queue.push_back(b);
                    }
                }
            }
        }
        debug!("minimize: {} blocks after {} splits", tree.num_blocks(), splits);

        let start = match self.start_state() {
            Some(s) => index[&s],
            None => unreachable!("check_dfa guarantees a unique start state"),
        };
        let start_block = tree.block_of(start);
        let dead_block = tree.block_of(dead);

        let mut min = Automaton::new(alphabet.iter().copied());
        let mut ids: HashMap<BlockId, StateId> = HashMap::new();
        let mut representatives: Vec<(BlockId, usize)> = Vec::new();
        for x in std::iter::once(start).chain(0..dead) {
            let block = tree.block_of(x);
            if block == dead_block && block != start_block {
                continue;
            }
            if let Entry::Vacant(e) = ids.entry(block) {
                e.insert(min.alloc_state(self.is_goal(states[x]), block == start_block));
                representatives.push((block, x));
            }
        }

        for &(block, x) in &representatives {
            for (i, &c) in alphabet.iter().enumerate() {
                let target = tree.block_of(successors[x][i]);
                if target == dead_block {
                    continue;
                }
                min.link(ids[&block], Symbol::Char(c), ids[&target]);
            }
        }

        debug!(
            "minimize: {} states, {} transitions",
            min.num_states(),
            min.num_transitions()
        );
        Ok(min)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::error::Error;

    /// Five states over {a, b}, where 3 and 4 are equivalent accepting sinks.
    fn five_state_dfa() -> Automaton {
        let mut dfa = Automaton::new(['a', 'b']);
        let s: Vec<StateId> = (0..5)
            .map(|i| dfa.add_state(i >= 3, i == 0).unwrap())
            .collect();
        dfa.add_transition(s[0], s[1], 'a').unwrap();
        dfa.add_transition(s[0], s[2], 'b').unwrap();
        dfa.add_transition(s[1], s[3], 'a').unwrap();
        dfa.add_transition(s[1], s[0], 'b').unwrap();
        dfa.add_transition(s[2], s[4], 'a').unwrap();
        dfa.add_transition(s[2], s[2], 'b').unwrap();
        dfa.add_transition(s[3], s[3], 'a').unwrap();
        dfa.add_transition(s[4], s[4], 'a').unwrap();
        dfa
    }

    #[test]
    fn test_minimize_merges_equivalent_states() {
        let dfa = five_state_dfa();
        let min = dfa.minimize().unwrap();
        println!("{}", min);
        assert!(min.is_dfa());
        assert_eq!(min.num_states(), 4);
        for word in ["aa", "aaa", "ba", "bba", "abaa", "bbbaaa"] {
            assert!(dfa.is_valid_word(word), "word {:?}", word);
            assert!(min.is_valid_word(word), "word {:?}", word);
        }
        for word in ["", "a", "b", "ab", "aab", "abba"] {
            assert_eq!(dfa.is_valid_word(word), min.is_valid_word(word), "word {:?}", word);
        }
    }

    #[test]
    fn test_minimize_is_idempotent() {
        let min = five_state_dfa().minimize().unwrap();
        let again = min.minimize().unwrap();
        assert_eq!(min.num_states(), again.num_states());
        assert_eq!(min.num_transitions(), again.num_transitions());
    }

    #[test]
    fn test_minimize_drops_dead_states() {
        // 0 -a-> 1 (goal), 0 -b-> 2, 2 -a-> 2: state 2 never reaches a goal
        let mut dfa = Automaton::new(['a', 'b']);
        let s0 = dfa.add_state(false, true).unwrap();
        let s1 = dfa.add_state(true, false).unwrap();
        let s2 = dfa.add_state(false, false).unwrap();
        dfa.add_transition(s0, s1, 'a').unwrap();
        dfa.add_transition(s0, s2, 'b').unwrap();
        dfa.add_transition(s2, s2, 'a').unwrap();

        let min = dfa.minimize().unwrap();
        assert_eq!(min.num_states(), 2);
        assert_eq!(min.num_transitions(), 1);
        assert!(min.is_valid_word("a"));
        assert!(!min.is_valid_word("ba"));
    }

    #[test]
    fn test_minimize_empty_language() {
        let mut dfa = Automaton::new(['a']);
        let s0 = dfa.add_state(false, true).unwrap();
        let s1 = dfa.add_state(false, false).unwrap();
        dfa.add_transition(s0, s1, 'a').unwrap();

        let min = dfa.minimize().unwrap();
        assert_eq!(min.num_states(), 1);
        assert_eq!(min.num_transitions(), 0);
        assert!(min.start_state().is_some());
        assert!(min.goal_states().is_empty());
    }

    #[test]
    fn test_minimize_requires_dfa() {
        let nfa = Automaton::from_regex(['a'], "a*").unwrap();
        assert!(matches!(nfa.minimize(), Err(Error::NotDfa(_))));
        assert_eq!(nfa.to_dfa().minimize().unwrap().num_states(), 1);
    }
}
