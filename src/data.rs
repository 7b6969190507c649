//! Some helper datatypes

use crate::vec_map::NumericId;
use std::fmt::{self, Debug, Display, Formatter};
use std::io;
use thiserror::Error;

/// A vertex ID
///
/// Vertex ids are dense: a graph with `n` vertices uses exactly `0..n`
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct VertexId(pub u32);

impl VertexId {
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Panics if `index` doesn't fit in 32 bits
    #[inline]
    pub fn from_index(index: usize) -> Self {
        assert!(index <= u32::MAX as usize, "vertex index {} overflows u32", index);
        Self(index as u32)
    }

    /// All the ids of a graph with `n` vertices, in order
    pub fn all(n: usize) -> impl Iterator<Item = VertexId> + Clone {
        (0..n).map(VertexId::from_index)
    }
}

impl NumericId for VertexId {
    #[inline]
    fn to_index(self) -> usize {
        self.0 as usize
    }
}

impl Debug for VertexId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl Display for VertexId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything that can go wrong before the reordering itself starts
///
/// Once the input is validated, the reordering can't fail; a broken internal
/// invariant panics instead.
#[derive(Debug, Error)]
pub enum ReorderError {
    #[error("vertex {vertex} has neighbor {neighbor}, but the graph only has {num_vertices} vertices")]
    VertexOutOfRange {
        vertex: VertexId,
        neighbor: VertexId,
        num_vertices: usize,
    },

    #[error("window size must be at least 1")]
    InvalidWindow,

    #[error("not a permutation of 0..{len}: {reason}")]
    NotAPermutation { len: usize, reason: String },

    #[error("padded neighbor buffer of length {len} isn't a multiple of max degree {max_degree}")]
    InvalidPadding { len: usize, max_degree: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ReorderError>;
