// src/core/indexing/mod.rs

//! Spatial indexes used by the neighbour classifier.

pub mod kdtree;

pub use kdtree::KdTree;
