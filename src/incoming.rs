//! Incoming adjacency: for every vertex, the vertices pointing at it
//!
//! Stored CSR-style: one flat array of sources, plus a `(start, end)` pair of
//! offsets per vertex.

use crate::data::*;
use crate::graph::Graph;
use crate::vec_map::{NumericId, VecMap};
use tinyvec::TinyVec;

/// Most vertices of a proximity graph have a modest in-degree, so the lists
/// are collected inline before being flattened
type SourceList = TinyVec<[VertexId; 8]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingAdjacency {
    incoming: Vec<VertexId>,
    /// `offsets[2v]` is the start and `offsets[2v + 1]` the exclusive end of
    /// `v`'s sources in `incoming`
    offsets: Vec<u32>,
}

impl IncomingAdjacency {
    /// Invert the out-edges of `graph`
    ///
    /// Sources appear in the order they were discovered, ie. ascending by
    /// source id (with repeats for duplicate edges).
    pub fn build<G: Graph + ?Sized>(graph: &G) -> Result<Self> {
        let n = graph.num_vertices();
        let mut lists: VecMap<VertexId, SourceList> = VecMap::filled(TinyVec::new(), n);

        for v in VertexId::all(n) {
            for &w in graph.neighbors(v) {
                if w.to_index() >= n {
                    return Err(ReorderError::VertexOutOfRange {
                        vertex: v,
                        neighbor: w,
                        num_vertices: n,
                    });
                }
                lists[w].push(v);
            }
        }

        let total: usize = lists.inner.iter().map(|l| l.len()).sum();
        assert!(total <= u32::MAX as usize, "too many edges: {}", total);

        let mut incoming = Vec::with_capacity(total);
        let mut offsets = Vec::with_capacity(2 * n);
        for list in &lists.inner {
            offsets.push(incoming.len() as u32);
            incoming.extend_from_slice(&list[..]);
            offsets.push(incoming.len() as u32);
        }

        log::debug!("Built incoming adjacency: {} vertices, {} edges", n, total);

        Ok(Self { incoming, offsets })
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.offsets.len() / 2
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.incoming.len()
    }

    #[inline]
    pub fn start(&self, v: VertexId) -> usize {
        self.offsets[2 * v.to_index()] as usize
    }

    /// Exclusive
    #[inline]
    pub fn end(&self, v: VertexId) -> usize {
        self.offsets[2 * v.to_index() + 1] as usize
    }

    /// The in-degree of `v`
    #[inline]
    pub fn degree(&self, v: VertexId) -> u32 {
        (self.end(v) - self.start(v)) as u32
    }

    /// The vertices with an edge to `v`
    #[inline]
    pub fn sources(&self, v: VertexId) -> &[VertexId] {
        &self.incoming[self.start(v)..self.end(v)]
    }

    pub fn incoming(&self) -> &[VertexId] {
        &self.incoming[..]
    }

    pub fn offsets(&self) -> &[u32] {
        &self.offsets[..]
    }
}
