use crate::{math::Set, relation::InverseTransitions, State, Symbol};

/// Pulls together all states that can be found in the input. These are the accepting states,
/// every state that is the target of some entry in `relation` and every state that appears as a
/// predecessor. Entries of `relation` are taken into account regardless of their symbol.
///
/// ```
/// use hopcroft::prelude::*;
///
/// let mut relation = InverseTransitions::new();
/// relation.insert('a', 0, [5]);
/// relation.insert('a', 5, []);
/// let states = collect::states([7], &relation);
/// assert_eq!(states, math::Set::from_iter([0, 5, 7]));
/// ```
pub fn states<A, S, I>(accepting: I, relation: &InverseTransitions<A, S>) -> Set<S>
where
    A: Symbol,
    S: State,
    I: IntoIterator<Item = S>,
{
    let mut states: Set<S> = accepting.into_iter().collect();
    for (_, target, preds) in relation.entries() {
        states.insert(target.clone());
        states.extend(preds.iter().cloned());
    }
    states
}

#[cfg(test)]
mod tests {
    use crate::{math::Set, relation::InverseTransitions};

    #[test]
    fn empty_input_gives_empty_universe() {
        let relation = InverseTransitions::<char, u32>::new();
        assert!(super::states([], &relation).is_empty());
    }

    #[test]
    fn accepting_states_need_no_transitions() {
        let relation = InverseTransitions::from_edges([(1, 'a', 1)]);
        assert_eq!(super::states([0, 1], &relation), Set::from_iter([0, 1]));
    }

    #[test]
    fn predecessors_and_targets_are_collected() {
        let relation = InverseTransitions::from_iter([
            (('a', 1), vec![0]),
            (('b', 3), vec![]),
            (('z', 4), vec![2]),
        ]);
        assert_eq!(
            super::states([], &relation),
            Set::from_iter([0, 1, 2, 3, 4])
        );
    }
}
