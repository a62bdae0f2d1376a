use itertools::Itertools;

use crate::State;

/// Hash set over states or symbols, backed by `fxhash`. Keys are opaque user values, so a
/// fast non-cryptographic hasher is all that is needed.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Hash map keyed by states or symbols, backed by `fxhash` just like [`Set`].
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// A partition groups states into disjoint, non-empty blocks. It is the result of a
/// minimization, where each block is one Myhill-Nerode equivalence class.
///
/// The order of the blocks carries no meaning, two partitions are equal if they consist
/// of the same blocks. Dereferencing yields the blocks as a slice.
#[derive(Clone)]
pub struct Partition<S: State>(Vec<Set<S>>);

impl<S: State> Default for Partition<S> {
    fn default() -> Self {
        Self(vec![])
    }
}

impl<S: State> std::ops::Deref for Partition<S> {
    type Target = [Set<S>];

    fn deref(&self) -> &[Set<S>] {
        self.0.as_slice()
    }
}

impl<S: State> PartialEq for Partition<S> {
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size() && self.0.iter().all(|block| other.0.contains(block))
    }
}

impl<S: State> Eq for Partition<S> {}

impl<S: State> IntoIterator for Partition<S> {
    type Item = Set<S>;
    type IntoIter = std::vec::IntoIter<Set<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_blocks().into_iter()
    }
}

impl<'a, S: State> IntoIterator for &'a Partition<S> {
    type Item = &'a Set<S>;
    type IntoIter = std::slice::Iter<'a, Set<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: State> Partition<S> {
    /// Collects each of the given groups of states into one block. Nothing is checked, use
    /// [`Partition::is_partition_of`] to verify that the blocks are disjoint and non-empty.
    pub fn new<B, I>(blocks: I) -> Self
    where
        B: IntoIterator<Item = S>,
        I: IntoIterator<Item = B>,
    {
        blocks
            .into_iter()
            .map(|block| block.into_iter().collect::<Set<_>>())
            .collect()
    }

    /// Number of blocks, which after a minimization is the number of states of the
    /// minimal automaton.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Consumes `self` and returns the underlying blocks.
    pub fn into_blocks(self) -> Vec<Set<S>> {
        self.0
    }

    /// Returns the position of the block containing `state`, or `None` if the state
    /// does not occur in any block.
    pub fn class_of(&self, state: &S) -> Option<usize> {
        self.0.iter().position(|block| block.contains(state))
    }

    /// Returns a reference to the block containing `state`, if there is one.
    pub fn block_of(&self, state: &S) -> Option<&Set<S>> {
        self.0.iter().find(|block| block.contains(state))
    }

    /// Checks whether `p` and `q` are in the same block. If either of them does not
    /// appear in the partition, `false` is returned.
    pub fn same_class(&self, p: &S, q: &S) -> bool {
        self.block_of(p).is_some_and(|block| block.contains(q))
    }

    /// Computes the union of all blocks.
    pub fn universe(&self) -> Set<S> {
        self.0.iter().flatten().cloned().collect()
    }

    /// Checks whether `self` is a valid partition of `universe`, meaning all blocks are
    /// non-empty and pairwise disjoint, and their union is exactly `universe`.
    pub fn is_partition_of(&self, universe: &Set<S>) -> bool {
        let mut seen = Set::default();
        for block in &self.0 {
            if block.is_empty() {
                return false;
            }
            for state in block {
                if !seen.insert(state) {
                    return false;
                }
            }
        }
        seen.len() == universe.len() && universe.iter().all(|q| seen.contains(q))
    }
}

impl<S: State> From<Vec<Set<S>>> for Partition<S> {
    fn from(value: Vec<Set<S>>) -> Self {
        Self(value)
    }
}

impl<S: State> FromIterator<Set<S>> for Partition<S> {
    fn from_iter<T: IntoIterator<Item = Set<S>>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<S: State> std::fmt::Debug for Partition<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let blocks = self
            .0
            .iter()
            .map(|block| block.iter().map(|q| format!("{q:?}")).join(", "))
            .map(|block| format!("[{block}]"))
            .join(", ");
        write!(f, "{{{blocks}}}")
    }
}
