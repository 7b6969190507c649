//! Read-only access to the out-edges of a graph
//!
//! The reordering only ever asks two questions of a graph: how many vertices
//! it has, and what a given vertex points to.

use crate::data::*;
use crate::permutation::Permutation;
use crate::vec_map::VecMap;

/// A directed graph over the dense ids `0..num_vertices()`
///
/// Neighbor lists may contain duplicates. Ids are checked against
/// `num_vertices()` once, when the incoming adjacency is built.
pub trait Graph {
    fn num_vertices(&self) -> usize;

    /// The out-neighbors of `v`
    fn neighbors(&self, v: VertexId) -> &[VertexId];

    #[inline]
    fn out_degree(&self, v: VertexId) -> u32 {
        self.neighbors(v).len() as u32
    }

    /// Total number of edges
    fn num_edges(&self) -> usize {
        VertexId::all(self.num_vertices())
            .map(|v| self.neighbors(v).len())
            .sum()
    }
}

/// An in-memory graph storing one neighbor list per vertex
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdjacencyList {
    neighbors: VecMap<VertexId, Vec<VertexId>>,
}

impl AdjacencyList {
    pub fn new(neighbors: Vec<Vec<VertexId>>) -> Self {
        Self {
            neighbors: VecMap::new(neighbors),
        }
    }

    /// A graph with `n` vertices and the given `(source, target)` edges
    ///
    /// Each source's neighbors keep the order the edges came in. Panics if a
    /// source is out of range; targets are checked later like any other
    /// neighbor.
    pub fn from_edges(n: usize, edges: impl IntoIterator<Item = (VertexId, VertexId)>) -> Self {
        let mut neighbors = VecMap::filled(Vec::new(), n);
        for (src, dst) in edges {
            neighbors[src].push(dst);
        }
        Self { neighbors }
    }

    /// Read neighbor lists stored in fixed-width slots of `max_degree` entries
    ///
    /// A negative entry ends the list for that vertex, the same layout FAISS
    /// uses for the bottom level of an HNSW graph:
    /// `[1, 4, 6, -1, | 0, 2, -1, -1, | ...]`
    pub fn from_padded(flat: &[i32], max_degree: usize) -> Result<Self> {
        if max_degree == 0 || flat.len() % max_degree != 0 {
            return Err(ReorderError::InvalidPadding {
                len: flat.len(),
                max_degree,
            });
        }

        let neighbors = flat
            .chunks_exact(max_degree)
            .map(|slots| {
                slots
                    .iter()
                    .take_while(|&&id| id >= 0)
                    .map(|&id| VertexId(id as u32))
                    .collect()
            })
            .collect();

        Ok(Self::new(neighbors))
    }

    /// Relabel the graph: vertex `new` gets the neighbor list of
    /// `perm.old_of(new)`, with every neighbor mapped to its new id
    ///
    /// The order within each neighbor list is kept as is.
    pub fn renumbered(&self, perm: &Permutation) -> Self {
        assert_eq!(
            perm.len(),
            self.num_vertices(),
            "permutation doesn't cover the graph"
        );

        let neighbors = perm
            .new_to_old()
            .iter()
            .map(|&old| {
                self.neighbors[old]
                    .iter()
                    .map(|&w| perm.new_of(w))
                    .collect()
            })
            .collect();

        Self::new(neighbors)
    }
}

impl Graph for AdjacencyList {
    #[inline]
    fn num_vertices(&self) -> usize {
        self.neighbors.len()
    }

    #[inline]
    fn neighbors(&self, v: VertexId) -> &[VertexId] {
        &self.neighbors[v][..]
    }
}
