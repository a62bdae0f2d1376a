//! Minimization of deterministic finite automata by partition refinement.
//!
//! The crate computes the coarsest partition of the states of a DFA into Myhill-Nerode equivalence classes, that is two states end up in the same block if and only if no input word distinguishes them with respect to acceptance. The computation follows Hopcroft's algorithm, which runs in $O(k \cdot n \log n)$ for $n$ states and an alphabet of size $k$.
//!
//! The automaton is not given in forward form. Instead, the caller supplies the set of accepting states, the input alphabet and the *inverse* transition relation (see [`InverseTransitions`]), which maps a pair of a symbol and a target state to the set of states that move to the target on that symbol. States and symbols are opaque, anything that is [`Clone`], [`Eq`] and [`std::hash::Hash`] can be used. The set of all states is derived from the input (see [`collect::states`]), so states never need to be declared separately.
//!
//! The main entry point is [`hopcroft_minimize`], which is a pure function of its three inputs. For more control, e.g. rejecting relations that mention symbols outside of the alphabet or obtaining statistics about the work that was performed, use a [`Minimizer`].
//!
//! ```
//! use hopcroft::prelude::*;
//!
//! // accepts all words over {a, b} that end in b
//! let relation: InverseTransitions<char, u32> =
//!     InverseTransitions::from_edges([(0, 'a', 0), (0, 'b', 1), (1, 'a', 0), (1, 'b', 1)]);
//! let partition = hopcroft_minimize([1], ['a', 'b'], &relation);
//! assert_eq!(partition, Partition::new([vec![0], vec![1]]));
//! ```
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::{fmt::Debug, hash::Hash};

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use hopcroft::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        collect,
        math::{self, Partition},
        minimization::{hopcroft_minimize, MinimizationError, Minimizer, RefinementStats},
        relation::InverseTransitions,
        State, Symbol,
    };

    #[cfg(feature = "random")]
    pub use super::random::{random_dfa, random_dfa_with, RandomDfa};
}

/// Type aliases for the collections used throughout the crate as well as the [`Partition`]
/// type, which is the result of a minimization.
pub mod math;

/// The inverse transition relation of an automaton, which is the input to a minimization.
pub mod relation;
pub use relation::InverseTransitions;

/// Derives the set of all states of an automaton from its accepting states and inverse
/// transition relation.
pub mod collect;

/// Implements Hopcroft's partition refinement algorithm.
pub mod minimization;
pub use minimization::{hopcroft_minimize, Minimizer};

/// Implements the generation of random automata. This is feature gated behind the `random` feature.
#[cfg(feature = "random")]
pub mod random;

pub use math::Partition;

/// A state of an automaton. States carry no structure beyond their identity, so any type
/// that can be cloned, compared and hashed will do.
pub trait State: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> State for T {}

/// A symbol of the input alphabet. Just like a [`State`], a symbol is only ever used as
/// a key and never interpreted.
pub trait Symbol: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Symbol for T {}
