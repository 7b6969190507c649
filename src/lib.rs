pub mod data;
pub mod gorder;
pub mod graph;
pub mod graph_reader;
pub mod incoming;
pub mod permutation;
pub mod unit_heap;
pub mod vec_map;

pub use self::data::{ReorderError, Result, VertexId};
pub use self::gorder::{reorder, Config};
pub use self::graph::{AdjacencyList, Graph};
pub use self::permutation::Permutation;
