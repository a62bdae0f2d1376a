use std::{collections::HashMap, hash::BuildHasher};

use crate::{
    math::{Map, Set},
    minimization::MinimizationError,
    State, Symbol,
};

/// The inverse of a transition function. For a symbol `a` and a state `q`, it stores the set
/// of all states `p` such that there is a transition from `p` to `q` on `a`.
///
/// The relation is sparse: pairs for which nothing is stored simply have no predecessors.
/// An entry with an empty set of predecessors is allowed and treated exactly like a missing
/// one, except that its target still counts as a state of the automaton.
///
/// No attempt is made to verify that the relation really is the inverse of a deterministic
/// and complete transition function. If it is not, minimization still terminates and produces
/// a partition, which then reflects the relation as it was given.
#[derive(Clone, PartialEq, Eq)]
pub struct InverseTransitions<A: Symbol, S: State> {
    edges: Map<A, Map<S, Set<S>>>,
}

impl<A: Symbol, S: State> Default for InverseTransitions<A, S> {
    fn default() -> Self {
        Self {
            edges: Map::default(),
        }
    }
}

impl<A: Symbol, S: State> InverseTransitions<A, S> {
    /// Creates an empty relation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the relation from an iterator over forward transitions, given as triples
    /// `(source, symbol, target)`.
    pub fn from_edges<I: IntoIterator<Item = (S, A, S)>>(edges: I) -> Self {
        let mut out = Self::new();
        for (source, symbol, target) in edges {
            out.add_edge(source, symbol, target);
        }
        out
    }

    /// Records the forward transition from `source` to `target` on `symbol`.
    pub fn add_edge(&mut self, source: S, symbol: A, target: S) {
        self.entry(symbol, target).insert(source);
    }

    /// Adds `predecessors` to the set stored for `(symbol, target)`. The entry is created even
    /// if `predecessors` yields nothing.
    pub fn insert<I: IntoIterator<Item = S>>(&mut self, symbol: A, target: S, predecessors: I) {
        self.entry(symbol, target).extend(predecessors);
    }

    fn entry(&mut self, symbol: A, target: S) -> &mut Set<S> {
        self.edges
            .entry(symbol)
            .or_default()
            .entry(target)
            .or_default()
    }

    /// Returns an iterator over the predecessors of `target` on `symbol`. The iterator is empty
    /// if no such predecessors are known.
    pub fn predecessors<'a>(
        &'a self,
        symbol: &A,
        target: &S,
    ) -> impl Iterator<Item = &'a S> + 'a {
        self.edges
            .get(symbol)
            .and_then(|targets| targets.get(target))
            .into_iter()
            .flatten()
    }

    /// Iterates over all stored entries as triples `(symbol, target, predecessors)`.
    pub fn entries(&self) -> impl Iterator<Item = (&A, &S, &Set<S>)> + '_ {
        self.edges.iter().flat_map(|(symbol, targets)| {
            targets
                .iter()
                .map(move |(target, preds)| (symbol, target, preds))
        })
    }

    /// Iterates over the distinct symbols that occur in some entry.
    pub fn symbols(&self) -> impl Iterator<Item = &A> + '_ {
        self.edges.keys()
    }

    /// Returns the number of stored `(symbol, target)` entries.
    pub fn len(&self) -> usize {
        self.edges.values().map(|targets| targets.len()).sum()
    }

    /// Returns `true` if no entry is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the symbols that occur in the relation but are not part of `alphabet`.
    /// Entries for such symbols are never looked at during minimization.
    pub fn undeclared_symbols<'a>(
        &'a self,
        alphabet: &'a Set<A>,
    ) -> impl Iterator<Item = &'a A> + 'a {
        self.symbols().filter(move |sym| !alphabet.contains(*sym))
    }

    /// Verifies that every symbol used in the relation is part of `alphabet`, returning an
    /// error for the first one that is not.
    pub fn check_alphabet(&self, alphabet: &Set<A>) -> Result<(), MinimizationError> {
        match self.undeclared_symbols(alphabet).next() {
            Some(sym) => Err(MinimizationError::UndeclaredSymbol(format!("{sym:?}"))),
            None => Ok(()),
        }
    }
}

impl<A, S, I> FromIterator<((A, S), I)> for InverseTransitions<A, S>
where
    A: Symbol,
    S: State,
    I: IntoIterator<Item = S>,
{
    fn from_iter<T: IntoIterator<Item = ((A, S), I)>>(iter: T) -> Self {
        let mut out = Self::new();
        for ((symbol, target), preds) in iter {
            out.insert(symbol, target, preds);
        }
        out
    }
}

impl<A, S, I, H> From<HashMap<(A, S), I, H>> for InverseTransitions<A, S>
where
    A: Symbol,
    S: State,
    I: IntoIterator<Item = S>,
    H: BuildHasher,
{
    fn from(value: HashMap<(A, S), I, H>) -> Self {
        value.into_iter().collect()
    }
}

impl<A: Symbol, S: State> std::fmt::Debug for InverseTransitions<A, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.entries()
                    .map(|(symbol, target, preds)| ((symbol, target), preds)),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::InverseTransitions;
    use crate::{math::Set, minimization::MinimizationError};

    #[test]
    fn build_from_forward_edges() {
        let rel = InverseTransitions::from_edges([(0, 'a', 1), (2, 'a', 1), (1, 'b', 0)]);
        assert_eq!(rel.len(), 2);
        assert_eq!(
            rel.predecessors(&'a', &1).copied().collect::<Set<_>>(),
            Set::from_iter([0, 2])
        );
        assert_eq!(rel.predecessors(&'b', &1).count(), 0);
        assert_eq!(rel.predecessors(&'c', &0).count(), 0);
    }

    #[test]
    fn empty_entries_are_kept() {
        let mut rel = InverseTransitions::new();
        rel.insert('a', 5, []);
        rel.insert('a', 0, [5]);
        assert_eq!(rel.len(), 2);
        assert!(!rel.is_empty());
        assert_eq!(rel.predecessors(&'a', &5).count(), 0);
    }

    #[test]
    fn from_std_map() {
        let map = std::collections::HashMap::from([
            (("x", "start"), vec!["start"]),
            (("x", "accept"), vec!["start"]),
        ]);
        let rel = InverseTransitions::from(map);
        assert_eq!(rel.entries().count(), 2);
        assert_eq!(rel.symbols().collect::<Vec<_>>(), vec![&"x"]);
    }

    #[test]
    fn undeclared_symbols() {
        let rel = InverseTransitions::from_edges([(0, 'a', 1), (1, 'z', 0)]);
        let alphabet = Set::from_iter(['a', 'b']);
        assert_eq!(
            rel.undeclared_symbols(&alphabet).collect::<Vec<_>>(),
            vec![&'z']
        );
        assert_eq!(
            rel.check_alphabet(&alphabet),
            Err(MinimizationError::UndeclaredSymbol("'z'".to_string()))
        );
        assert_eq!(rel.check_alphabet(&Set::from_iter(['a', 'z'])), Ok(()));
    }
}
