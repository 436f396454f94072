//! Sparse transition relation.
//!
//! Maps each `(state, symbol)` pair to the *set* of destination states.
//! Parallel identical edges collapse into one, while distinct destinations
//! for the same pair are kept (so an NFA is representable).
//!
//! Ordered maps are used throughout, so iteration order depends only on the
//! contents of the relation and never on insertion order.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{StateId, Symbol};

type Row = BTreeMap<Symbol, BTreeSet<StateId>>;

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TransitionRelation {
    rows: BTreeMap<StateId, Row>,
    len: usize,
}

impl TransitionRelation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Adds the edge `from --symbol--> to`.
    ///
    /// Returns `false` if the edge was already present.
    pub fn add(&mut self, from: StateId, symbol: Symbol, to: StateId) -> bool {
        let added = self
            .rows
            .entry(from)
            .or_default()
            .entry(symbol)
            .or_default()
            .insert(to);
        if added {
            self.len += 1;
        }
        added
    }

    /// Removes the edge `from --symbol--> to`.
    ///
    /// Returns `false` if the edge was not present.
    pub fn remove(&mut self, from: StateId, symbol: Symbol, to: StateId) -> bool {
        let Some(row) = self.rows.get_mut(&from) else {
            return false;
        };
        let Some(targets) = row.get_mut(&symbol) else {
            return false;
        };
        let removed = targets.remove(&to);
        if removed {
            self.len -= 1;
            if targets.is_empty() {
                row.remove(&symbol);
            }
            if row.is_empty() {
                self.rows.remove(&from);
            }
        }
        removed
    }

    pub fn contains(&self, from: StateId, symbol: Symbol, to: StateId) -> bool {
        self.get(from, symbol).is_some_and(|targets| targets.contains(&to))
    }

    /// Destinations of `(from, symbol)`, if any.
    pub fn get(&self, from: StateId, symbol: Symbol) -> Option<&BTreeSet<StateId>> {
        self.rows.get(&from).and_then(|row| row.get(&symbol))
    }

    /// Iterates over `(symbol, destinations)` for all edges leaving `from`.
    pub fn row(&self, from: StateId) -> impl Iterator<Item = (Symbol, &BTreeSet<StateId>)> + '_ {
        self.rows
            .get(&from)
            .into_iter()
            .flat_map(|row| row.iter().map(|(&symbol, targets)| (symbol, targets)))
    }

    /// Iterates over `(symbol, destination)` for all edges leaving `from`.
    pub fn outgoing(&self, from: StateId) -> impl Iterator<Item = (Symbol, StateId)> + '_ {
        self.row(from)
            .flat_map(|(symbol, targets)| targets.iter().map(move |&to| (symbol, to)))
    }

    /// Iterates over all edges as `(from, symbol, to)`, ordered by source, then symbol, then destination.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, Symbol, StateId)> + '_ {
        self.rows.iter().flat_map(|(&from, row)| {
            row.iter()
                .flat_map(move |(&symbol, targets)| targets.iter().map(move |&to| (from, symbol, to)))
        })
    }

    /// Removes every edge leaving `state`.
    pub fn remove_outgoing(&mut self, state: StateId) {
        if let Some(row) = self.rows.remove(&state) {
            self.len -= row.values().map(BTreeSet::len).sum::<usize>();
        }
    }

    /// Removes every edge entering `state`. Scans the whole relation.
    pub fn remove_incoming(&mut self, state: StateId) {
        let mut removed = 0;
        for row in self.rows.values_mut() {
            for targets in row.values_mut() {
                if targets.remove(&state) {
                    removed += 1;
                }
            }
            row.retain(|_, targets| !targets.is_empty());
        }
        self.rows.retain(|_, row| !row.is_empty());
        self.len -= removed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(id: u32) -> StateId {
        StateId::new(id)
    }

    #[test]
    fn test_add_collapses_parallel_edges() {
        let mut rel = TransitionRelation::new();
        assert!(rel.add(s(0), Symbol::Char('a'), s(1)));
        assert!(!rel.add(s(0), Symbol::Char('a'), s(1)));
        assert!(rel.add(s(0), Symbol::Char('a'), s(2)));
        assert_eq!(rel.len(), 2);
        assert_eq!(rel.get(s(0), Symbol::Char('a')).map(BTreeSet::len), Some(2));
    }

    #[test]
    fn test_remove() {
        let mut rel = TransitionRelation::new();
        rel.add(s(0), Symbol::Char('a'), s(1));
        rel.add(s(0), Symbol::Epsilon, s(2));
        assert!(rel.remove(s(0), Symbol::Char('a'), s(1)));
        assert!(!rel.remove(s(0), Symbol::Char('a'), s(1)));
        assert_eq!(rel.len(), 1);
        assert!(rel.get(s(0), Symbol::Char('a')).is_none());
        assert!(rel.contains(s(0), Symbol::Epsilon, s(2)));
    }

    #[test]
    fn test_remove_incoming_and_outgoing() {
        let mut rel = TransitionRelation::new();
        rel.add(s(0), Symbol::Char('a'), s(1));
        rel.add(s(2), Symbol::Char('b'), s(1));
        rel.add(s(1), Symbol::Char('c'), s(0));
        rel.add(s(1), Symbol::Char('c'), s(2));

        rel.remove_outgoing(s(1));
        assert_eq!(rel.len(), 2);
        rel.remove_incoming(s(1));
        assert!(rel.is_empty());
        assert_eq!(rel.iter().count(), 0);
    }

    #[test]
    fn test_iter_is_ordered() {
        let mut rel = TransitionRelation::new();
        rel.add(s(1), Symbol::Char('b'), s(0));
        rel.add(s(0), Symbol::Char('b'), s(1));
        rel.add(s(0), Symbol::Epsilon, s(2));
        rel.add(s(0), Symbol::Char('a'), s(1));
        let edges: Vec<_> = rel.iter().collect();
        assert_eq!(
            edges,
            vec![
                (s(0), Symbol::Epsilon, s(2)),
                (s(0), Symbol::Char('a'), s(1)),
                (s(0), Symbol::Char('b'), s(1)),
                (s(1), Symbol::Char('b'), s(0)),
            ]
        );
    }
}
