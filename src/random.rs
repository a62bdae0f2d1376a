use bit_set::BitSet;
use itertools::Itertools;
use tracing::debug;

use crate::{
    math::{Map, Partition, Set},
    relation::InverseTransitions,
};

/// A complete deterministic automaton over the states `0..size` and the symbols `0..symbols`,
/// stored in forward form. It is mainly used to generate inputs for the minimization and to
/// compare the result against a straightforward reference computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomDfa {
    symbols: usize,
    // transitions[q][a] is the successor of q on a
    transitions: Vec<Vec<usize>>,
    accepting: Set<usize>,
}

impl RandomDfa {
    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.transitions.len()
    }

    /// Returns the input alphabet, which consists of the symbols `0..symbols`.
    pub fn alphabet(&self) -> std::ops::Range<usize> {
        0..self.symbols
    }

    /// Returns the set of accepting states.
    pub fn accepting(&self) -> &Set<usize> {
        &self.accepting
    }

    /// Returns the successor of `state` on `symbol`, or `None` if either of them does not exist.
    pub fn successor(&self, state: usize, symbol: usize) -> Option<usize> {
        self.transitions.get(state)?.get(symbol).copied()
    }

    /// Computes the inverse transition relation of `self`.
    pub fn inverse(&self) -> InverseTransitions<usize, usize> {
        InverseTransitions::from_edges(self.transitions.iter().enumerate().flat_map(
            |(source, targets)| {
                targets
                    .iter()
                    .enumerate()
                    .map(move |(symbol, &target)| (source, symbol, target))
            },
        ))
    }

    /// Decides whether `p` and `q` are equivalent by exploring the pair graph, whose nodes are
    /// pairs of states and which has an edge from `(p, q)` to `(p', q')` on every symbol that
    /// leads from `p` to `p'` and from `q` to `q'`. The two states are distinguishable exactly
    /// if some pair that is reachable from `(p, q)` disagrees on acceptance.
    ///
    /// Every call walks the pair graph anew, which makes this far slower than a minimization,
    /// but it shares no code with either refinement algorithm. Panics if `p` or `q` is not a
    /// state of `self`.
    pub fn equivalent(&self, p: usize, q: usize) -> bool {
        let n = self.size();
        assert!(p < n && q < n, "states {p} and {q} must be below {n}");
        let mut seen = BitSet::with_capacity(n * n);
        let mut stack = vec![(p, q)];
        seen.insert(p * n + q);
        while let Some((p, q)) = stack.pop() {
            if self.accepting.contains(&p) != self.accepting.contains(&q) {
                return false;
            }
            for (&left, &right) in self.transitions[p].iter().zip(&self.transitions[q]) {
                if seen.insert(left * n + right) {
                    stack.push((left, right));
                }
            }
        }
        true
    }

    /// Computes the partition into equivalence classes with Moore's algorithm. Each round
    /// assigns every state the signature consisting of its own class and the classes of its
    /// successors, until the number of classes no longer grows. This takes quadratic time in
    /// the worst case and serves as a reference for checking the result of Hopcroft's algorithm.
    pub fn moore_partition(&self) -> Partition<usize> {
        let mut class: Vec<usize> = (0..self.size())
            .map(|q| usize::from(self.accepting.contains(&q)))
            .collect();
        let mut count = class.iter().unique().count();
        loop {
            let mut signatures: Map<(usize, Vec<usize>), usize> = Map::default();
            let refined = (0..self.size())
                .map(|q| {
                    let signature = (
                        class[q],
                        self.transitions[q].iter().map(|&p| class[p]).collect_vec(),
                    );
                    let next = signatures.len();
                    *signatures.entry(signature).or_insert(next)
                })
                .collect_vec();
            class = refined;
            if signatures.len() == count {
                break;
            }
            count = signatures.len();
        }

        let mut blocks: Vec<Set<usize>> = vec![Set::default(); count];
        for (q, c) in class.into_iter().enumerate() {
            blocks[c].insert(q);
        }
        blocks.into()
    }
}

/// Draws a random complete DFA with `size` states over `symbols` symbols. Every transition
/// target is drawn uniformly, and every state is accepting with probability one half.
pub fn random_dfa(symbols: usize, size: usize) -> RandomDfa {
    random_dfa_with(&mut fastrand::Rng::new(), symbols, size)
}

/// Works as [`random_dfa`], but draws from the given random number generator, which makes
/// it possible to reproduce the result by seeding the generator.
pub fn random_dfa_with(rng: &mut fastrand::Rng, symbols: usize, size: usize) -> RandomDfa {
    let transitions = (0..size)
        .map(|_| (0..symbols).map(|_| rng.usize(..size)).collect_vec())
        .collect();
    let accepting = (0..size).filter(|_| rng.bool()).collect();
    debug!("generated random DFA with {size} states over {symbols} symbols");
    RandomDfa {
        symbols,
        transitions,
        accepting,
    }
}

#[cfg(test)]
mod tests {
    use super::{random_dfa, random_dfa_with, RandomDfa};
    use crate::{
        collect,
        math::{Partition, Set},
        minimization::Minimizer,
        prelude::hopcroft_minimize,
    };

    #[test]
    fn random_dfa_shape() {
        let dfa = random_dfa(3, 20);
        assert_eq!(dfa.size(), 20);
        assert_eq!(dfa.alphabet().len(), 3);
        for q in 0..20 {
            for a in dfa.alphabet() {
                assert!(dfa.successor(q, a).is_some_and(|p| p < 20));
            }
        }
        assert_eq!(dfa.successor(20, 0), None);
        let edges: usize = dfa.inverse().entries().map(|(_, _, preds)| preds.len()).sum();
        assert_eq!(edges, 60);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let left = random_dfa_with(&mut fastrand::Rng::with_seed(7), 2, 30);
        let right = random_dfa_with(&mut fastrand::Rng::with_seed(7), 2, 30);
        assert_eq!(left, right);
    }

    #[test_log::test]
    fn hopcroft_agrees_with_moore() {
        for seed in 0..60u64 {
            let mut rng = fastrand::Rng::with_seed(seed);
            let symbols = 1 + (seed as usize % 3);
            let size = 1 + (seed as usize * 7) % 45;
            let dfa = random_dfa_with(&mut rng, symbols, size);
            let relation = dfa.inverse();
            let partition =
                hopcroft_minimize(dfa.accepting().iter().copied(), dfa.alphabet(), &relation);
            assert!(partition.is_partition_of(&collect::states(
                dfa.accepting().iter().copied(),
                &relation
            )));
            assert_eq!(partition, dfa.moore_partition(), "seed {seed}");
            for p in 0..size {
                for q in p..size {
                    assert_eq!(
                        partition.same_class(&p, &q),
                        dfa.equivalent(p, q),
                        "seed {seed}, states {p} and {q}"
                    );
                }
            }
        }
    }

    #[test]
    fn pair_graph_equivalence() {
        // 0 and 2 both lead into the accepting sink 1, 3 never reaches it
        let dfa = RandomDfa {
            symbols: 1,
            transitions: vec![vec![1], vec![1], vec![1], vec![3]],
            accepting: Set::from_iter([1]),
        };
        assert!(dfa.equivalent(0, 2));
        assert!(dfa.equivalent(3, 3));
        assert!(!dfa.equivalent(0, 1));
        assert!(!dfa.equivalent(0, 3));
        assert_eq!(
            dfa.moore_partition(),
            Partition::new([vec![0, 2], vec![1], vec![3]])
        );
    }

    #[test]
    fn work_stays_within_hopcroft_bound() {
        let mut rng = fastrand::Rng::with_seed(42);
        for (symbols, size) in [(2, 500), (3, 300), (1, 1000)] {
            let dfa = random_dfa_with(&mut rng, symbols, size);
            let (partition, stats) = Minimizer::new(dfa.alphabet())
                .minimize_with_stats(dfa.accepting().iter().copied(), &dfa.inverse())
                .unwrap();
            assert_eq!(partition, dfa.moore_partition());
            let bound = symbols * size * (size.ilog2() as usize + 1);
            assert!(stats.lookups <= bound, "{stats:?} exceeds {bound}");
            let initial = if dfa.accepting().is_empty() || dfa.accepting().len() == size {
                1
            } else {
                2
            };
            assert_eq!(stats.splits + initial, partition.size());
        }
    }
}
