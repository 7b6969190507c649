//! The result of a reordering: a bijection between old and new vertex ids
//!
//! Example: if the vertices `v0, v1, v2` are stored as `v2, v0, v1` after
//! reordering, then `new_to_old = [2, 0, 1]` and `old_to_new = [1, 2, 0]`.
//! `new_to_old[1] == 0` says the vertex now at position 1 used to be at 0;
//! `old_to_new[2] == 0` says the vertex that was at 2 moved to position 0.

use crate::data::*;
use crate::vec_map::{NumericId, VecMap};

/// Unassigned slot while inverting
const UNSET: VertexId = VertexId(u32::MAX);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    new_to_old: VecMap<VertexId, VertexId>,
    old_to_new: VecMap<VertexId, VertexId>,
}

impl Permutation {
    /// Leave every vertex where it is
    pub fn identity(n: usize) -> Self {
        let ids: Vec<_> = VertexId::all(n).collect();
        Self {
            new_to_old: VecMap::new(ids.clone()),
            old_to_new: VecMap::new(ids),
        }
    }

    /// Build the map from the new order of the old ids, checking that it
    /// really is a permutation
    pub fn try_from_new_to_old(new_to_old: Vec<VertexId>) -> Result<Self> {
        let n = new_to_old.len();
        let mut old_to_new = VecMap::filled(UNSET, n);

        for (new, &old) in new_to_old.iter().enumerate() {
            if old.to_index() >= n {
                return Err(ReorderError::NotAPermutation {
                    len: n,
                    reason: format!("{} is out of range", old),
                });
            }
            if old_to_new[old] != UNSET {
                return Err(ReorderError::NotAPermutation {
                    len: n,
                    reason: format!("{} appears twice", old),
                });
            }
            old_to_new[old] = VertexId::from_index(new);
        }

        Ok(Self {
            new_to_old: VecMap::new(new_to_old),
            old_to_new,
        })
    }

    /// Like `try_from_new_to_old`, for orders that are a permutation by
    /// construction
    ///
    /// Panics otherwise.
    pub(crate) fn from_order(new_to_old: Vec<VertexId>) -> Self {
        match Self::try_from_new_to_old(new_to_old) {
            Ok(perm) => perm,
            Err(e) => panic!("reordering produced an invalid order: {}", e),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.new_to_old.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.new_to_old.is_empty()
    }

    /// Indexed by new id
    #[inline]
    pub fn new_to_old(&self) -> &[VertexId] {
        self.new_to_old.as_slice()
    }

    /// Indexed by old id
    #[inline]
    pub fn old_to_new(&self) -> &[VertexId] {
        self.old_to_new.as_slice()
    }

    /// Where the vertex now at `new` used to be
    #[inline]
    pub fn old_of(&self, new: VertexId) -> VertexId {
        self.new_to_old[new]
    }

    /// Where the vertex that was at `old` is now
    #[inline]
    pub fn new_of(&self, old: VertexId) -> VertexId {
        self.old_to_new[old]
    }

    /// The permutation undoing this one
    pub fn inverse(&self) -> Self {
        Self {
            new_to_old: self.old_to_new.clone(),
            old_to_new: self.new_to_old.clone(),
        }
    }

    /// Move per-vertex data into the new order: entry `new` of the result is
    /// `old_values[old_of(new)]`
    pub fn apply<T: Clone>(&self, old_values: &[T]) -> Vec<T> {
        assert_eq!(
            old_values.len(),
            self.len(),
            "permutation doesn't cover the values"
        );
        self.new_to_old
            .inner
            .iter()
            .map(|&old| old_values[old.to_index()].clone())
            .collect()
    }
}
