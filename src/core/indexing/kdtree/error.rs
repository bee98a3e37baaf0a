// src/core/indexing/kdtree/error.rs

use std::fmt;

/// Custom error types for KD-Tree operations.
#[derive(Debug, Clone, PartialEq)]
pub enum KdTreeError {
    /// A point's dimensionality differs from the tree's.
    DimensionMismatch { expected: usize, found: usize },
    /// A point cannot be indexed, e.g. it has no coordinates or a non-finite one.
    InvalidPoint(String),
    /// Points and labels were supplied in different quantities.
    LengthMismatch { points: usize, labels: usize },
    /// The requested neighbour count is unusable.
    InvalidK(String),
}

impl fmt::Display for KdTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KdTreeError::DimensionMismatch { expected, found } => write!(
                f,
                "KD-Tree Dimension Mismatch: expected {}, found {}",
                expected, found
            ),
            KdTreeError::InvalidPoint(msg) => write!(f, "KD-Tree Invalid Point: {}", msg),
            KdTreeError::LengthMismatch { points, labels } => write!(
                f,
                "KD-Tree Length Mismatch: {} points but {} labels",
                points, labels
            ),
            KdTreeError::InvalidK(msg) => write!(f, "KD-Tree Invalid K: {}", msg),
        }
    }
}

impl std::error::Error for KdTreeError {}
