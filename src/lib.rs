#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::cast_precision_loss)]
#![forbid(unsafe_code)]
#![warn(clippy::all)]

//! # kdknn: exact k-nearest-neighbour classification over a KD-tree
//!
//! `kdknn` builds a binary space-partitioning tree once over a static set of
//! labelled points and answers exact k-nearest-neighbour queries against it.
//! A [`KnnClassifier`] turns the labels of those neighbours into a prediction
//! by majority vote.
//!
//! - Median-split KD-tree; points tied on the pivot coordinate share a node
//! - Backtracking search with a bounded best-k accumulator
//! - Pluggable distance strategy (Euclidean by default)
//! - TOML-loadable classifier configuration
//!
//! ```
//! use kdknn::KnnClassifier;
//!
//! let mut knn = KnnClassifier::new(1).unwrap();
//! knn.fit(&[[0.0, 0.0], [1.0, 1.0]], &[3, 7]).unwrap();
//! assert_eq!(knn.predict(&[0.9, 0.8]).unwrap(), 7);
//! ```

pub mod core;

// Re-export key types for easier use by library consumers
pub use crate::core::classifier::KnnClassifier;
pub use crate::core::common::{KnnError, Label};
pub use crate::core::config::{ClassifierConfig, ClassifierConfigBuilder};
pub use crate::core::distance::{Chebyshev, Distance, DistanceMetric, Euclidean, FnDistance, Manhattan};
pub use crate::core::indexing::kdtree::{KdTree, KdTreeError, Neighbor, PruningStrategy};

/// Core result type for the library
pub type Result<T> = std::result::Result<T, KnnError>;
