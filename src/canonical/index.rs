//! Incoming/outgoing index of derived facts.
//!
//! For each state, the index keeps two views of the facts touching it: facts
//! ending there (incoming) and facts starting there (outgoing). Each view is
//! split by [`Class`] and maps the other endpoint to a [`ReachabilityStatus`].
//!
//! The index is scratch space for one saturation run and is dropped after it.

use std::collections::{BTreeMap, HashMap};

use super::rules::{Class, Fact};
use super::status::ReachabilityStatus;
use crate::types::StateId;

type ClassTable = [BTreeMap<StateId, ReachabilityStatus>; 4];

#[derive(Debug, Default)]
pub struct ReachIndex {
    incoming: HashMap<StateId, ClassTable>,
    outgoing: HashMap<StateId, ClassTable>,
    len: usize,
}

impl ReachIndex {
    /// Number of distinct facts recorded.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Known parities of `from --class--> to`.
    pub fn status(&self, from: StateId, to: StateId, class: Class) -> ReachabilityStatus {
        self.outgoing
            .get(&from)
            .and_then(|table| table[class.index()].get(&to))
            .copied()
            .unwrap_or_default()
    }

    pub fn contains(&self, fact: &Fact) -> bool {
        self.status(fact.from, fact.to, fact.class).contains(fact.parity)
    }

    /// Records `fact` in both views.
    ///
    /// Returns `false` if it was already known.
    pub fn insert(&mut self, fact: &Fact) -> bool {
        let c = fact.class.index();
        let added = self.outgoing.entry(fact.from).or_default()[c]
            .entry(fact.to)
            .or_default()
            .insert(fact.parity);
        if added {
            self.incoming.entry(fact.to).or_default()[c]
                .entry(fact.from)
                .or_default()
                .insert(fact.parity);
            self.len += 1;
        }
        added
    }

    /// Facts `p --class--> state`, as `(p, status)`.
    pub fn incoming(&self, state: StateId, class: Class) -> impl Iterator<Item = (StateId, ReachabilityStatus)> + '_ {
        Self::view(&self.incoming, state, class)
    }

    /// Facts `state --class--> q`, as `(q, status)`.
    pub fn outgoing(&self, state: StateId, class: Class) -> impl Iterator<Item = (StateId, ReachabilityStatus)> + '_ {
        Self::view(&self.outgoing, state, class)
    }

    fn view(
        tables: &HashMap<StateId, ClassTable>,
        state: StateId,
        class: Class,
    ) -> impl Iterator<Item = (StateId, ReachabilityStatus)> + '_ {
        tables
            .get(&state)
            .into_iter()
            .flat_map(move |table| table[class.index()].iter().map(|(&s, &status)| (s, status)))
    }
}
