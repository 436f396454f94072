//! Language queries: emptiness, shortest word, enumeration and counting.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use log::debug;
use num_bigint::BigUint;

use crate::automaton::Automaton;
use crate::error::Result;
use crate::types::StateId;

impl Automaton {
    /// Checks whether the automaton accepts no word at all.
    pub fn is_empty(&self) -> bool {
        let mut seen: HashSet<StateId> = self.start_states().iter().copied().collect();
        let mut queue: VecDeque<StateId> = self.start_states().iter().copied().collect();
        while let Some(state) = queue.pop_front() {
            if self.is_goal(state) {
                return false;
            }
            for (_, next) in self.transitions().outgoing(state) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        true
    }

    /// Returns the shortest accepted word, smallest in alphabet order among
    /// those of that length, or `None` if the language is empty.
    pub fn shortest_word(&self) -> Option<String> {
        let start = self.epsilon_closure(self.start_states());
        let mut seen: HashSet<BTreeSet<StateId>> = HashSet::new();
        let mut queue: VecDeque<(String, BTreeSet<StateId>)> = VecDeque::new();
        seen.insert(start.clone());
        queue.push_back((String::new(), start));

        while let Some((word, frontier)) = queue.pop_front() {
            if !frontier.is_disjoint(self.goal_states()) {
                debug!("shortest_word() -> {:?}", word);
                return Some(word);
            }
            for &c in self.alphabet() {
                let next = self.epsilon_closure(&self.step(&frontier, c));
                if next.is_empty() || seen.contains(&next) {
                    continue;
                }
                seen.insert(next.clone());
                let mut longer = word.clone();
                longer.push(c);
                queue.push_back((longer, next));
            }
        }
        None
    }

    /// Iterates over the accepted words of length at most `max_len`, shortest
    /// first and in alphabet order within each length.
    pub fn words(&self, max_len: usize) -> Words<'_> {
        let start = self.epsilon_closure(self.start_states());
        let mut queue = VecDeque::new();
        if !start.is_empty() {
            queue.push_back((String::new(), 0, start));
        }
        Words {
            automaton: self,
            max_len,
            queue,
        }
    }

    /// Number of accepted words of length exactly `len`.
    ///
    /// # Errors
    ///
    /// [`Error::NotDfa`][crate::error::Error::NotDfa] if `self` is not a DFA.
    /// In a DFA every word has at most one run, so counting runs counts words.
    pub fn count_words(&self, len: usize) -> Result<BigUint> {
        self.check_dfa()?;

        let mut counts: HashMap<StateId, BigUint> = HashMap::new();
        if let Some(start) = self.start_state() {
            counts.insert(start, BigUint::from(1u32));
        }
        for _ in 0..len {
            let mut next: HashMap<StateId, BigUint> = HashMap::new();
            for (state, count) in &counts {
                for (_, target) in self.transitions().outgoing(*state) {
                    *next.entry(target).or_insert(BigUint::ZERO) += count;
                }
            }
            counts = next;
        }

        let total: BigUint = counts
            .iter()
            .filter(|(state, _)| self.is_goal(**state))
            .map(|(_, count)| count)
            .sum();
        debug!("count_words(len = {}) -> {}", len, total);
        Ok(total)
    }
}

/// Accepted words in shortlex order, bounded in length.
///
/// Created by [`Automaton::words`].
pub struct Words<'a> {
    automaton: &'a Automaton,
    max_len: usize,
    queue: VecDeque<(String, usize, BTreeSet<StateId>)>,
}

impl Iterator for Words<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some((word, len, frontier)) = self.queue.pop_front() {
            if len < self.max_len {
                for &c in self.automaton.alphabet() {
                    let next = self
                        .automaton
                        .epsilon_closure(&self.automaton.step(&frontier, c));
                    if next.is_empty() {
                        continue;
                    }
                    let mut longer = word.clone();
                    longer.push(c);
                    self.queue.push_back((longer, len + 1, next));
                }
            }
            if !frontier.is_disjoint(self.automaton.goal_states()) {
                return Some(word);
            }
        }
        None
    }
}
