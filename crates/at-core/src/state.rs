//! State-space enumeration and indexing.
//!
//! A `StateSpace` is the ordered Cartesian product of its features'
//! domains, enumerated lexicographically (last dimension fastest), with a
//! total bijection between state tuples and dense indices in `[0, N)`.
//! Every tool that touches a Q-table goes through the same instance, so
//! index semantics cannot drift between training, replay, evaluation, and
//! inspection.

use at_common::{Error, Feature, Result};

/// Domain-list-parameterized discrete state space.
#[derive(Debug, Clone)]
pub struct StateSpace {
    features: Vec<Feature>,
    // strides[i] = product of cardinalities of dimensions after i.
    strides: Vec<usize>,
    len: usize,
}

impl StateSpace {
    /// Build a state space over an ordered feature list.
    pub fn new(features: &[Feature]) -> StateSpace {
        let mut strides = vec![1usize; features.len()];
        let mut len = 1usize;
        for (i, feature) in features.iter().enumerate().rev() {
            strides[i] = len;
            len *= feature.cardinality() as usize;
        }
        StateSpace {
            features: features.to_vec(),
            strides,
            len,
        }
    }

    /// The canonical 7-feature space (432 states).
    pub fn auth7() -> StateSpace {
        StateSpace::new(&Feature::AUTH7)
    }

    /// The 5-feature space used by offline log replay (72 states).
    pub fn auth5() -> StateSpace {
        StateSpace::new(&Feature::AUTH5)
    }

    /// Number of states.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of dimensions.
    pub fn arity(&self) -> usize {
        self.features.len()
    }

    /// The ordered feature list.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Dense index of a state tuple.
    ///
    /// Fails with `ArityMismatch` for a tuple of the wrong length and
    /// `OutOfDomain` for any value outside its feature's domain.
    pub fn index(&self, state: &[u8]) -> Result<usize> {
        if state.len() != self.features.len() {
            return Err(Error::ArityMismatch {
                expected: self.features.len(),
                actual: state.len(),
            });
        }
        let mut index = 0usize;
        for ((&value, feature), &stride) in
            state.iter().zip(&self.features).zip(&self.strides)
        {
            if value >= feature.cardinality() {
                return Err(Error::OutOfDomain {
                    state: state.to_vec(),
                });
            }
            index += value as usize * stride;
        }
        Ok(index)
    }

    /// State tuple for a dense index; inverse of [`StateSpace::index`].
    pub fn state(&self, index: usize) -> Result<Vec<u8>> {
        if index >= self.len {
            return Err(Error::IndexOutOfRange {
                index,
                states: self.len,
            });
        }
        let mut state = Vec::with_capacity(self.features.len());
        let mut rest = index;
        for (feature, &stride) in self.features.iter().zip(&self.strides) {
            let value = rest / stride;
            rest %= stride;
            debug_assert!(value < feature.cardinality() as usize);
            state.push(value as u8);
        }
        Ok(state)
    }

    /// Enumerate all states in index order.
    pub fn iter(&self) -> impl Iterator<Item = Vec<u8>> + '_ {
        (0..self.len).map(|i| {
            self.state(i)
                .expect("index in range by construction")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn auth7_has_432_states() {
        assert_eq!(StateSpace::auth7().len(), 432);
        assert_eq!(StateSpace::auth5().len(), 72);
    }

    #[test]
    fn bijection_round_trips_every_state() {
        let space = StateSpace::auth7();
        let mut seen = HashSet::new();
        for (i, state) in space.iter().enumerate() {
            let index = space.index(&state).unwrap();
            assert_eq!(index, i);
            assert_eq!(space.state(index).unwrap(), state);
            assert!(seen.insert(index), "index {index} assigned twice");
        }
        assert_eq!(seen.len(), 432);
    }

    #[test]
    fn enumeration_is_lexicographic() {
        let space = StateSpace::auth7();
        assert_eq!(space.state(0).unwrap(), vec![0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(space.state(1).unwrap(), vec![0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(space.state(3).unwrap(), vec![0, 0, 0, 0, 0, 1, 0]);
        assert_eq!(space.state(431).unwrap(), vec![2, 1, 1, 1, 1, 2, 2]);
    }

    #[test]
    fn out_of_domain_value_is_rejected() {
        let space = StateSpace::auth7();
        let err = space.index(&[3, 0, 0, 0, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, Error::OutOfDomain { .. }));
        let err = space.index(&[0, 2, 0, 0, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, Error::OutOfDomain { .. }));
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let space = StateSpace::auth7();
        let err = space.index(&[0, 0, 0, 0, 0]).unwrap_err();
        assert!(matches!(
            err,
            Error::ArityMismatch {
                expected: 7,
                actual: 5
            }
        ));
    }

    #[test]
    fn index_out_of_range_is_rejected() {
        let space = StateSpace::auth5();
        assert!(matches!(
            space.state(72).unwrap_err(),
            Error::IndexOutOfRange { index: 72, states: 72 }
        ));
    }
}
