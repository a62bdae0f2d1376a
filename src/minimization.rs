use bit_set::BitSet;
use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    collect,
    math::{Map, Partition, Set},
    relation::InverseTransitions,
    State, Symbol,
};

/// Errors that a [`Minimizer`] may report. Minimization itself is total, errors only arise
/// from optional input validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MinimizationError {
    /// The inverse transition relation uses a symbol that is not part of the alphabet. Only
    /// reported by a [`Minimizer`] in strict mode, otherwise such entries are ignored.
    #[error("symbol {0} is used in the transition relation but not declared in the alphabet")]
    UndeclaredSymbol(String),
}

/// Counts the work performed during a single run of the refinement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefinementStats {
    /// Number of blocks that were taken from the worklist and used as splitter.
    pub splitters: usize,
    /// Number of times the predecessors of a state on a symbol were looked up.
    pub lookups: usize,
    /// Number of blocks that were split into two.
    pub splits: usize,
}

/// Computes the coarsest partition of the states of a DFA into Myhill-Nerode equivalence
/// classes, using Hopcroft's algorithm.
///
/// The automaton is described by its `accepting` states, the input `alphabet` and the inverse
/// transition `relation`. The set of states is derived from these (see [`collect::states`]).
/// Entries of `relation` whose symbol is not in `alphabet` are ignored; use a strict
/// [`Minimizer`] to reject them instead.
///
/// Two states end up in the same block only if they agree on acceptance and, for every
/// symbol, their successors are again in the same block. If the set of states is empty, so
/// is the returned partition.
///
/// ```
/// use hopcroft::prelude::*;
///
/// // states 2 and 3 behave identically
/// let relation = InverseTransitions::from_edges([
///     (0, '0', 0), (0, '1', 1), (1, '0', 2), (1, '1', 0),
///     (2, '0', 1), (2, '1', 2), (3, '0', 1), (3, '1', 2),
/// ]);
/// let partition = hopcroft_minimize([0], ['0', '1'], &relation);
/// assert_eq!(partition.size(), 3);
/// assert!(partition.same_class(&2, &3));
/// ```
pub fn hopcroft_minimize<A, S, I, J>(
    accepting: I,
    alphabet: J,
    relation: &InverseTransitions<A, S>,
) -> Partition<S>
where
    A: Symbol,
    S: State,
    I: IntoIterator<Item = S>,
    J: IntoIterator<Item = A>,
{
    let symbols = alphabet.into_iter().unique().collect_vec();
    refine(accepting, &symbols, relation).0
}

/// Configures and runs minimizations over a fixed alphabet.
///
/// By default, a [`Minimizer`] behaves exactly like [`hopcroft_minimize`]. In strict mode, it
/// refuses relations that mention symbols which are not part of the alphabet.
#[derive(Debug, Clone)]
pub struct Minimizer<A: Symbol> {
    alphabet: Vec<A>,
    strict: bool,
}

impl<A: Symbol> Minimizer<A> {
    /// Creates a new minimizer for the given alphabet. Duplicate symbols are dropped.
    pub fn new<J: IntoIterator<Item = A>>(alphabet: J) -> Self {
        Self {
            alphabet: alphabet.into_iter().unique().collect(),
            strict: false,
        }
    }

    /// Enables or disables strict mode.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Returns the symbols of the alphabet.
    pub fn alphabet(&self) -> &[A] {
        &self.alphabet
    }

    /// Computes the partition into equivalence classes, see [`hopcroft_minimize`].
    pub fn minimize<S, I>(
        &self,
        accepting: I,
        relation: &InverseTransitions<A, S>,
    ) -> Result<Partition<S>, MinimizationError>
    where
        S: State,
        I: IntoIterator<Item = S>,
    {
        self.minimize_with_stats(accepting, relation)
            .map(|(partition, _)| partition)
    }

    /// Works like [`Minimizer::minimize`] but additionally reports how much work the
    /// refinement performed.
    pub fn minimize_with_stats<S, I>(
        &self,
        accepting: I,
        relation: &InverseTransitions<A, S>,
    ) -> Result<(Partition<S>, RefinementStats), MinimizationError>
    where
        S: State,
        I: IntoIterator<Item = S>,
    {
        if self.strict {
            relation.check_alphabet(&self.alphabet.iter().cloned().collect())?;
        }
        Ok(refine(accepting, &self.alphabet, relation))
    }
}

fn refine<A, S, I>(
    accepting: I,
    alphabet: &[A],
    relation: &InverseTransitions<A, S>,
) -> (Partition<S>, RefinementStats)
where
    A: Symbol,
    S: State,
    I: IntoIterator<Item = S>,
{
    let accepting: Set<S> = accepting.into_iter().collect();
    let states = collect::states(accepting.iter().cloned(), relation)
        .into_iter()
        .collect_vec();
    debug!(
        "minimizing {} states over {} symbols",
        states.len(),
        alphabet.len()
    );

    let (accepting, rejecting): (Vec<StateId>, Vec<StateId>) =
        (0..states.len()).partition(|&q| accepting.contains(&states[q]));
    debug!(
        "initial split into {} accepting and {} rejecting states",
        accepting.len(),
        rejecting.len()
    );
    if accepting.is_empty() || rejecting.is_empty() {
        trace!("all states agree on acceptance, nothing to refine");
        let partition: Partition<S> = if states.is_empty() {
            Partition::default()
        } else {
            Partition::new([states])
        };
        return (partition, RefinementStats::default());
    }

    let predecessors = index_predecessors(&states, alphabet, relation);
    let mut refinement = Refinement::new(states.len(), predecessors);
    refinement.run(accepting, rejecting);
    let Refinement { blocks, stats, .. } = refinement;

    let partition: Partition<S> = blocks
        .into_iter()
        .filter(|block| !block.is_empty())
        .map(|block| {
            block
                .into_iter()
                .map(|q| states[q].clone())
                .collect::<Set<_>>()
        })
        .collect();
    debug!(
        "refinement produced {} classes, {:?}",
        partition.size(),
        stats
    );
    (partition, stats)
}

/// Translates `relation` to dense state indices. Only declared symbols that have at least one
/// predecessor are kept, and for each of them only the targets that have predecessors.
fn index_predecessors<A, S>(
    states: &[S],
    alphabet: &[A],
    relation: &InverseTransitions<A, S>,
) -> Vec<Map<StateId, Vec<StateId>>>
where
    A: Symbol,
    S: State,
{
    let ids: Map<&S, StateId> = states.iter().enumerate().map(|(i, q)| (q, i)).collect();
    let declared: Set<&A> = alphabet.iter().collect();
    let mut positions: Map<&A, usize> = Map::default();
    let mut predecessors: Vec<Map<StateId, Vec<StateId>>> = Vec::new();
    for (symbol, target, preds) in relation.entries() {
        // entries for undeclared symbols are never visited
        if preds.is_empty() || !declared.contains(symbol) {
            continue;
        }
        let sym = *positions.entry(symbol).or_insert_with(|| {
            predecessors.push(Map::default());
            predecessors.len() - 1
        });
        predecessors[sym]
            .entry(ids[target])
            .or_default()
            .extend(preds.iter().map(|p| ids[p]));
    }
    trace!(
        "{} of {} declared symbols have predecessors",
        predecessors.len(),
        alphabet.len()
    );
    predecessors
}

/// States are interned to dense indices before refinement starts.
type StateId = usize;

/// Handle of a block in the arena of a [`Refinement`]. A block is never modified after its
/// creation, once it is split it is retired and two new blocks take its place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct BlockId(usize);

/// The state of Hopcroft's algorithm on an automaton whose states are `0..n`.
struct Refinement {
    // predecessors[a][q] holds all p that move to q on the a-th symbol in use
    predecessors: Vec<Map<StateId, Vec<StateId>>>,
    // arena of blocks, a retired block is left empty
    blocks: Vec<Vec<StateId>>,
    block_of: Vec<BlockId>,
    worklist: Vec<BlockId>,
    // blocks that are currently in the worklist, stale worklist entries are skipped
    pending: BitSet,
    marked: BitSet,
    stats: RefinementStats,
}

impl Refinement {
    fn new(states: usize, predecessors: Vec<Map<StateId, Vec<StateId>>>) -> Self {
        Self {
            predecessors,
            blocks: Vec::with_capacity(2 * states),
            block_of: vec![BlockId(0); states],
            worklist: Vec::new(),
            pending: BitSet::with_capacity(2 * states),
            marked: BitSet::with_capacity(states),
            stats: RefinementStats::default(),
        }
    }

    fn add_block(&mut self, states: Vec<StateId>) -> BlockId {
        let id = BlockId(self.blocks.len());
        for &q in &states {
            self.block_of[q] = id;
        }
        self.blocks.push(states);
        id
    }

    fn enqueue(&mut self, block: BlockId) {
        if self.pending.insert(block.0) {
            self.worklist.push(block);
        }
    }

    fn next_splitter(&mut self) -> Option<BlockId> {
        while let Some(block) = self.worklist.pop() {
            if self.pending.remove(block.0) {
                return Some(block);
            }
        }
        None
    }

    /// Refines the partition `{accepting, rejecting}`, both of which must be non-empty, until
    /// the worklist is exhausted.
    fn run(&mut self, accepting: Vec<StateId>, rejecting: Vec<StateId>) {
        let seed_accepting = accepting.len() <= rejecting.len();
        let accepting = self.add_block(accepting);
        let rejecting = self.add_block(rejecting);
        self.enqueue(if seed_accepting { accepting } else { rejecting });

        let mut affected: Map<BlockId, Vec<StateId>> = Map::default();
        while let Some(splitter) = self.next_splitter() {
            self.stats.splitters += 1;
            // the splitter may itself be split below, we keep working with its old content
            let members = self.blocks[splitter.0].clone();
            trace!(
                "using block {} of size {} as splitter",
                splitter.0,
                members.len()
            );

            for sym in 0..self.predecessors.len() {
                self.collect_affected(&members, sym, &mut affected);
                for (block, overlap) in affected.drain() {
                    self.split(block, overlap);
                }
            }
        }
    }

    /// Groups the predecessors of `members` on `sym` by the block they currently belong to.
    fn collect_affected(
        &mut self,
        members: &[StateId],
        sym: usize,
        affected: &mut Map<BlockId, Vec<StateId>>,
    ) {
        for &target in members {
            self.stats.lookups += 1;
            let Some(preds) = self.predecessors[sym].get(&target) else {
                continue;
            };
            for &p in preds {
                if self.marked.insert(p) {
                    affected.entry(self.block_of[p]).or_default().push(p);
                }
            }
        }
        for &p in affected.values().flatten() {
            self.marked.remove(p);
        }
    }

    /// Splits `block` into `overlap` and the remaining states, unless `overlap` covers the
    /// whole block.
    fn split(&mut self, block: BlockId, overlap: Vec<StateId>) {
        if overlap.len() == self.blocks[block.0].len() {
            return;
        }
        let old = std::mem::take(&mut self.blocks[block.0]);
        let inside = self.add_block(overlap);
        let rest = old
            .into_iter()
            .filter(|&q| self.block_of[q] == block)
            .collect_vec();
        let outside = self.add_block(rest);
        self.stats.splits += 1;
        trace!(
            "split block {} into {} ({} states) and {} ({} states)",
            block.0,
            inside.0,
            self.blocks[inside.0].len(),
            outside.0,
            self.blocks[outside.0].len()
        );

        if self.pending.remove(block.0) {
            self.enqueue(inside);
            self.enqueue(outside);
        } else if self.blocks[inside.0].len() <= self.blocks[outside.0].len() {
            self.enqueue(inside);
        } else {
            self.enqueue(outside);
        }
    }
}
