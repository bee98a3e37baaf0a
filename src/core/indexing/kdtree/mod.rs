// src/core/indexing/kdtree/mod.rs

//! KD-Tree implementation for exact k-nearest-neighbour search.
//!
//! The tree is built once by [`build_kdtree`] and queried with [`find_knn`]
//! (or [`KdTree::nearest`]). A query keeps its candidates in a per-call
//! [`BoundedNeighbors`], so concurrent queries against one tree share no
//! mutable state.

// Re-export key components for easier use.
pub use self::builder::build_kdtree;
pub use self::error::KdTreeError;
pub use self::neighbors::{BoundedNeighbors, Neighbor};
pub use self::search::{find_knn, PruningStrategy};
pub use self::tree::{KdNode, KdTree, LabeledPoint, Points};

// Modules within the kdtree crate
mod builder;
mod error;
mod neighbors;
mod search;
mod tree;
