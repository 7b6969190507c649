//! # Greedy windowed reordering
//!
//! Lays the vertices out one at a time. At every step the next vertex is the
//! one sharing the most graph neighborhood with the last `window` vertices
//! laid out, so vertices that a search tends to visit together end up stored
//! close together.
//!
//! The score of a candidate `v` counts, over the vertices `x` in the window:
//!
//!  - `v -> x`: `v` points into the window
//!  - `x -> v`: the window points at `v`
//!  - `u -> x` and `u -> v` for some `u` with more than one out-edge: `v` is a
//!    sibling of a window vertex
//!
//! Scores are kept in a [`UnitHeap`], which makes both the +1 updates for the
//! vertex entering the window and the -1 updates for the vertex leaving it
//! cheap.

use crate::data::*;
use crate::graph::Graph;
use crate::incoming::IncomingAdjacency;
use crate::permutation::Permutation;
use crate::unit_heap::UnitHeap;
use crate::vec_map::VecMap;
use std::mem;

pub const DEFAULT_WINDOW: usize = 16;

/// Pending change of every vertex that's already placed, high enough that the
/// updates it still receives never bring it near an ordinary score
const PLACED: i32 = i32::MAX / 2;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// How many of the last placed vertices influence the next choice
    pub window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
        }
    }
}

impl Config {
    pub fn with_window(window: usize) -> Self {
        Self { window }
    }

    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(ReorderError::InvalidWindow);
        }
        Ok(())
    }
}

/// Compute a locality-improving order for the vertices of `graph`
pub fn reorder<G: Graph + ?Sized>(graph: &G, config: &Config) -> Result<Permutation> {
    config.validate()?;
    let incoming = IncomingAdjacency::build(graph)?;

    log::info!(
        "Reordering {} vertices and {} edges with window {}",
        graph.num_vertices(),
        incoming.num_edges(),
        config.window
    );

    let mut reorderer = Reorderer::new(graph, &incoming, config.window);
    reorderer.seed();
    while !reorderer.is_done() {
        reorderer.slide_window();
        reorderer.place_next();
    }
    Ok(reorderer.finish())
}

/// The state for one reordering run
struct Reorderer<'a, G: ?Sized> {
    graph: &'a G,
    incoming: &'a IncomingAdjacency,
    window: usize,

    heap: UnitHeap,

    /// Vertices placed so far; the last `window` of them are the window
    order: Vec<VertexId>,

    /// Vertices with no edges at all, in id order. They go last.
    isolated: Vec<VertexId>,

    /// `u` has the vertex leaving the window as a sibling, so the sibling
    /// updates for `u` cancel out this step
    shares_leaving: VecMap<VertexId, bool>,
}

impl<'a, G: Graph + ?Sized> Reorderer<'a, G> {
    fn new(graph: &'a G, incoming: &'a IncomingAdjacency, window: usize) -> Self {
        let n = graph.num_vertices();
        debug_assert_eq!(incoming.num_vertices(), n);

        Self {
            graph,
            incoming,
            window,
            heap: UnitHeap::new(n),
            order: Vec::with_capacity(n),
            isolated: Vec::new(),
            shares_leaving: VecMap::filled(false, n),
        }
    }

    /// Number of vertices that get placed through the heap
    fn connected_count(&self) -> usize {
        self.graph.num_vertices() - self.isolated.len()
    }

    fn is_done(&self) -> bool {
        self.order.len() >= self.connected_count()
    }

    /// Set up the starting scores, set aside the isolated vertices, and place
    /// the vertex with the highest in-degree first
    fn seed(&mut self) {
        let n = self.graph.num_vertices();
        let incoming = self.incoming;

        // Every score starts at 0, but the in-degree decides the order among
        // equal scores until the first decrease is folded in
        self.heap.set_initial_keys(|v| incoming.degree(v) as i32);
        for v in VertexId::all(n) {
            self.heap.set_delta(v, -(incoming.degree(v) as i32));
        }

        let mut first = None;
        let mut max_in_degree = 0;
        for v in VertexId::all(n) {
            let in_degree = incoming.degree(v);
            if in_degree == 0 && self.graph.out_degree(v) == 0 {
                self.isolated.push(v);
                self.heap.delete_element(v);
                self.heap.set_delta(v, PLACED);
            } else if first.is_none() || in_degree > max_in_degree {
                max_in_degree = in_degree;
                first = Some(v);
            }
        }

        log::debug!(
            "{} isolated vertices, starting from {:?} with in-degree {}",
            self.isolated.len(),
            first,
            max_in_degree
        );

        if let Some(v) = first {
            self.place(v);
        }
    }

    fn place(&mut self, v: VertexId) {
        log::trace!("Placing {:?} at {}", v, self.order.len());
        self.heap.delete_element(v);
        self.heap.set_delta(v, PLACED);
        self.order.push(v);

        if self.order.len() % 1_000_000 == 0 {
            log::debug!(
                "Placed {} of {} vertices",
                self.order.len(),
                self.connected_count()
            );
        }
    }

    /// The vertex dropping out of the window this step, if any
    fn leaving(&self) -> Option<VertexId> {
        let placed = self.order.len();
        if placed > self.window {
            Some(self.order[placed - self.window - 1])
        } else {
            None
        }
    }

    /// Apply the score changes for the last placed vertex entering the
    /// window, and for the oldest one leaving it
    fn slide_window(&mut self) {
        let entering = match self.order.last() {
            Some(&v) => v,
            None => return,
        };
        let leaving = self.leaving();

        self.enter(entering, leaving);
        if let Some(vb) = leaving {
            self.leave(vb);
        }
    }

    /// Extract the best scoring vertex and place it
    fn place_next(&mut self) {
        let v = self.heap.extract_max();
        self.place(v);
    }

    fn increment(&mut self, v: VertexId) {
        if self.heap.delta(v) == 0 {
            self.heap.increase_key(v);
        } else {
            self.heap.add_delta(v, 1);
        }
    }

    #[inline]
    fn decrement(&mut self, v: VertexId) {
        self.heap.add_delta(v, -1);
    }

    fn enter(&mut self, ve: VertexId, vb: Option<VertexId>) {
        let graph = self.graph;
        let incoming = self.incoming;

        for &u in incoming.sources(ve) {
            self.increment(u);

            let siblings = graph.neighbors(u);
            if siblings.len() > 1 {
                // The leaving vertex is a sibling too: its -1 and our +1
                // cancel, so skip both
                if vb.map_or(false, |vb| siblings.contains(&vb)) {
                    self.shares_leaving[u] = true;
                } else {
                    for &w in siblings {
                        self.increment(w);
                    }
                }
            }
        }

        for &w in graph.neighbors(ve) {
            self.increment(w);
        }
    }

    fn leave(&mut self, vb: VertexId) {
        let graph = self.graph;
        let incoming = self.incoming;

        for &u in incoming.sources(vb) {
            self.decrement(u);

            let siblings = graph.neighbors(u);
            if siblings.len() > 1 && !mem::replace(&mut self.shares_leaving[u], false) {
                for &w in siblings {
                    self.decrement(w);
                }
            }
        }

        for &w in graph.neighbors(vb) {
            self.decrement(w);
        }
    }

    /// Append the isolated vertices and build the permutation
    fn finish(self) -> Permutation {
        let Self {
            mut order,
            isolated,
            graph,
            ..
        } = self;
        order.extend(isolated);
        debug_assert_eq!(order.len(), graph.num_vertices());
        Permutation::from_order(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AdjacencyList;
    use crate::vec_map::NumericId;
    use proptest::prelude::*;

    fn graph(lists: &[&[u32]]) -> AdjacencyList {
        AdjacencyList::new(
            lists
                .iter()
                .map(|l| l.iter().copied().map(VertexId).collect())
                .collect(),
        )
    }

    /// Score of `v` recomputed from scratch for the given window, by
    /// checking every edge
    fn naive_score(g: &AdjacencyList, window: &[VertexId], v: VertexId) -> i32 {
        let mut score = 0;
        for &x in window {
            for u in VertexId::all(g.num_vertices()) {
                let nu = g.neighbors(u);
                for _ in nu.iter().filter(|&&w| w == x) {
                    // u -> x
                    if u == v {
                        score += 1;
                    }
                    // u -> x, u -> v
                    if nu.len() > 1 {
                        score += nu.iter().filter(|&&w| w == v).count() as i32;
                    }
                }
            }
            // x -> v
            score += g.neighbors(x).iter().filter(|&&w| w == v).count() as i32;
        }
        score
    }

    /// Vertices whose entering update has been applied and whose leaving
    /// update hasn't: the last `window` placed
    fn current_window(order: &[VertexId], window: usize) -> Vec<VertexId> {
        order[order.len().saturating_sub(window)..].to_vec()
    }

    /// Run the reordering step by step, checking every live vertex's score
    /// against the naive recomputation right before each extraction
    fn check_scores(g: &AdjacencyList, window: usize) -> Permutation {
        let incoming = IncomingAdjacency::build(g).unwrap();
        let mut r = Reorderer::new(g, &incoming, window);
        r.seed();
        while !r.is_done() {
            r.slide_window();

            let win = current_window(&r.order, window);
            for v in VertexId::all(g.num_vertices()) {
                if r.heap.is_deleted(v) {
                    continue;
                }
                assert_eq!(
                    r.heap.effective_key(v),
                    naive_score(g, &win, v),
                    "score of {:?} after placing {:?}",
                    v,
                    r.order
                );
            }

            r.place_next();
        }
        r.finish()
    }

    #[test]
    fn default_window_is_16() {
        assert_eq!(Config::default().window, 16);
        assert!(matches!(
            Config::with_window(0).validate(),
            Err(ReorderError::InvalidWindow)
        ));
    }

    #[test]
    fn empty_graph() {
        let perm = reorder(&AdjacencyList::default(), &Config::default()).unwrap();
        assert!(perm.is_empty());
    }

    #[test]
    fn path_starts_at_first_max_in_degree() {
        let g = graph(&[&[1], &[2], &[3], &[4], &[]]);
        let perm = check_scores(&g, 16);
        assert_eq!(perm.old_of(VertexId(0)), VertexId(1));
        assert_eq!(perm.len(), 5);
    }

    #[test]
    fn no_edges_keeps_id_order() {
        let g = graph(&[&[], &[], &[], &[]]);
        let incoming = IncomingAdjacency::build(&g).unwrap();
        let mut r = Reorderer::new(&g, &incoming, 16);
        r.seed();
        assert!(r.is_done());
        assert!(r.heap.is_empty());

        let perm = r.finish();
        assert_eq!(perm, Permutation::identity(4));
    }

    #[test]
    fn isolated_vertices_go_last() {
        // 1 and 3 have no edges
        let g = graph(&[&[2], &[], &[4, 0], &[], &[0]]);
        let perm = check_scores(&g, 2);
        assert_eq!(&perm.new_to_old()[3..], &[VertexId(1), VertexId(3)]);
    }

    #[test]
    fn isolated_vertex_is_never_first() {
        // 0 is isolated and comes first in id order, but 1 has an edge
        let g = graph(&[&[], &[2], &[]]);
        let perm = reorder(&g, &Config::default()).unwrap();
        assert_eq!(perm.new_to_old(), &[VertexId(2), VertexId(1), VertexId(0)]);
    }

    #[test]
    fn two_triangles_start_at_zero() {
        let g = graph(&[&[1], &[2], &[0], &[4], &[5], &[3]]);
        let perm = check_scores(&g, 16);
        assert_eq!(perm.old_of(VertexId(0)), VertexId(0));
        // the rest of the first triangle comes before the second
        let mut first_three: Vec<_> = perm.new_to_old()[..3].to_vec();
        first_three.sort();
        assert_eq!(first_three, vec![VertexId(0), VertexId(1), VertexId(2)]);
    }

    #[test]
    fn window_leaves_once_window_plus_one_are_placed() {
        let g = graph(&[&[1, 2], &[2, 3], &[3, 4], &[4, 0], &[0, 1]]);
        let incoming = IncomingAdjacency::build(&g).unwrap();
        let mut r = Reorderer::new(&g, &incoming, 2);
        r.seed();

        let mut leaving = Vec::new();
        while !r.is_done() {
            leaving.push((r.order.len(), r.leaving()));
            r.slide_window();
            r.place_next();
        }

        // nothing leaves until 3 vertices are placed; then the first one
        // does, and at 4 placed the vertex at index 4 - 2 - 1 = 1
        assert_eq!(leaving[..2].iter().map(|l| l.1).collect::<Vec<_>>(), vec![None; 2]);
        assert_eq!(leaving[2], (3, Some(r.order[0])));
        assert_eq!(leaving[3], (4, Some(r.order[1])));
    }

    #[test]
    fn leaving_undoes_entering() {
        // With a window of 1, after sliding past a vertex its contribution
        // must be gone again; the naive check compares against a window
        // without it
        let g = graph(&[&[1, 2, 3], &[2, 3], &[3, 0], &[0, 1], &[0, 2, 3]]);
        check_scores(&g, 1);
        check_scores(&g, 2);
    }

    #[test]
    fn wide_window_never_evicts() {
        let g = graph(&[&[1, 2], &[2], &[0], &[1, 0]]);
        let incoming = IncomingAdjacency::build(&g).unwrap();
        let mut r = Reorderer::new(&g, &incoming, 4);
        r.seed();
        while !r.is_done() {
            assert_eq!(r.leaving(), None);
            r.slide_window();
            r.place_next();
        }
    }

    #[test]
    fn huge_window_is_a_plain_greedy_walk() {
        let g = graph(&[&[1], &[2], &[0, 3], &[1]]);
        let unbounded = check_scores(&g, usize::MAX);
        assert_eq!(unbounded, reorder(&g, &Config::with_window(4)).unwrap());
        assert_eq!(unbounded, reorder(&g, &Config::with_window(usize::MAX)).unwrap());
    }

    #[test]
    fn first_vertex_leaves_a_window_of_one() {
        let g = graph(&[&[1], &[2], &[3], &[0]]);
        let incoming = IncomingAdjacency::build(&g).unwrap();
        let mut r = Reorderer::new(&g, &incoming, 1);
        r.seed();
        r.slide_window();
        r.place_next();
        assert_eq!(r.order.len(), 2);
        assert_eq!(r.leaving(), Some(r.order[0]));
    }

    #[test]
    fn rejects_bad_input() {
        let g = graph(&[&[1], &[7]]);
        assert!(matches!(
            reorder(&g, &Config::default()),
            Err(ReorderError::VertexOutOfRange { .. })
        ));
        assert!(matches!(
            reorder(&graph(&[&[]]), &Config::with_window(0)),
            Err(ReorderError::InvalidWindow)
        ));
    }

    #[test]
    fn is_deterministic() {
        let g = graph(&[&[3, 1], &[0, 2], &[1, 3], &[2, 0], &[1, 2]]);
        let a = reorder(&g, &Config::with_window(2)).unwrap();
        let b = reorder(&g, &Config::with_window(2)).unwrap();
        assert_eq!(a, b);
    }

    /// Random graphs without duplicate edges or self loops
    fn random_graph() -> impl Strategy<Value = AdjacencyList> {
        (1..16usize).prop_flat_map(|n| {
            proptest::collection::vec(proptest::collection::vec(0..n as u32, 0..5), n).prop_map(
                |lists| {
                    let mut neighbors = Vec::with_capacity(lists.len());
                    for (v, raw) in lists.into_iter().enumerate() {
                        let mut list: Vec<VertexId> = Vec::new();
                        for w in raw.into_iter().map(VertexId) {
                            if w.to_index() != v && !list.contains(&w) {
                                list.push(w);
                            }
                        }
                        neighbors.push(list);
                    }
                    AdjacencyList::new(neighbors)
                },
            )
        })
    }

    proptest! {
        #[test]
        fn scores_match_naive_recomputation(g in random_graph(), window in 1..6usize) {
            check_scores(&g, window);
        }

        #[test]
        fn output_is_a_permutation_with_isolates_last(g in random_graph(), window in 1..20usize) {
            let perm = reorder(&g, &Config::with_window(window)).unwrap();
            let n = g.num_vertices();
            prop_assert_eq!(perm.len(), n);
            for new in VertexId::all(n) {
                prop_assert_eq!(perm.new_of(perm.old_of(new)), new);
            }

            let incoming = IncomingAdjacency::build(&g).unwrap();
            let isolated: Vec<_> = VertexId::all(n)
                .filter(|&v| incoming.degree(v) == 0 && g.out_degree(v) == 0)
                .collect();
            prop_assert_eq!(&perm.new_to_old()[n - isolated.len()..], &isolated[..]);

            if isolated.len() < n {
                let first = perm.old_of(VertexId(0));
                let best = VertexId::all(n)
                    .filter(|v| !isolated.contains(v))
                    .map(|v| incoming.degree(v))
                    .max()
                    .unwrap();
                prop_assert_eq!(incoming.degree(first), best);
                for v in VertexId::all(first.to_index()) {
                    prop_assert!(isolated.contains(&v) || incoming.degree(v) < best);
                }
            }
        }
    }
}
