// src/core/indexing/kdtree/builder.rs

//! Logic for building a KD-Tree from a set of labelled points.

use std::cmp::Ordering;

use log::debug;

use super::error::KdTreeError;
use super::tree::{KdNode, KdTree, LabeledPoint};
use crate::core::common::Label;

/// Builds a KD-Tree from parallel slices of points and labels.
///
/// Each level splits on one axis, cycling `0, 1, .., dimension - 1`. The pivot
/// is the coordinate ranked in the middle of the partition on that axis; every
/// point tied with the pivot is stored at the node itself, so each recursive
/// call receives strictly fewer points and a data set of identical points
/// collapses into a single node.
///
/// # Arguments
/// * `points`: The training points, each of length `dimension`.
/// * `labels`: One label per point, index-aligned with `points`.
/// * `dimension`: The dimensionality of the points. Must be non-zero.
///
/// # Returns
/// A `Result` containing the built `KdTree` (empty if `points` is empty) or a `KdTreeError`.
pub fn build_kdtree<P: AsRef<[f64]>>(
    points: &[P],
    labels: &[Label],
    dimension: usize,
) -> Result<KdTree, KdTreeError> {
    if dimension == 0 {
        return Err(KdTreeError::InvalidPoint("Dimension cannot be 0.".to_string()));
    }
    if points.len() != labels.len() {
        return Err(KdTreeError::LengthMismatch {
            points: points.len(),
            labels: labels.len(),
        });
    }

    let mut build_points = Vec::with_capacity(points.len());
    for (index, (point, &label)) in points.iter().zip(labels.iter()).enumerate() {
        let coords = point.as_ref();
        validate_point(coords, dimension)
            .map_err(|e| annotate_index(e, index))?;
        build_points.push(LabeledPoint {
            index,
            coords: coords.to_vec(),
            label,
        });
    }

    let len = build_points.len();
    let mut tree = KdTree::new(dimension);
    tree.set_root(build_recursive(build_points, dimension, 0), len);

    debug!(
        "Built KD-tree over {} points: {} nodes, depth {}",
        tree.len(),
        tree.node_count(),
        tree.depth()
    );
    Ok(tree)
}

/// Checks that `coords` has `dimension` finite coordinates.
pub(super) fn validate_point(coords: &[f64], dimension: usize) -> Result<(), KdTreeError> {
    if coords.len() != dimension {
        return Err(KdTreeError::DimensionMismatch {
            expected: dimension,
            found: coords.len(),
        });
    }
    if let Some(axis) = coords.iter().position(|c| !c.is_finite()) {
        return Err(KdTreeError::InvalidPoint(format!(
            "Coordinate {} on axis {} is not finite.",
            coords[axis], axis
        )));
    }
    Ok(())
}

fn annotate_index(err: KdTreeError, index: usize) -> KdTreeError {
    match err {
        KdTreeError::InvalidPoint(msg) => {
            KdTreeError::InvalidPoint(format!("Point {}: {}", index, msg))
        }
        other => other,
    }
}

/// Recursively builds the subtree for `partition`, splitting on `axis`.
///
/// Returns `None` for an empty partition.
fn build_recursive(
    mut partition: Vec<LabeledPoint>,
    dimension: usize,
    axis: usize,
) -> Option<Box<KdNode>> {
    if partition.is_empty() {
        return None;
    }

    let median_idx = partition.len() / 2;
    let (_, median, _) = partition.select_nth_unstable_by(median_idx, |a, b| {
        a.coords[axis].total_cmp(&b.coords[axis])
    });
    let split_value = median.coords[axis];

    let mut equal = Vec::new();
    let mut less = Vec::new();
    let mut greater = Vec::new();
    for point in partition {
        match point.coords[axis].partial_cmp(&split_value) {
            Some(Ordering::Less) => less.push(point),
            Some(Ordering::Greater) => greater.push(point),
            // Coordinates are finite, so anything else compares equal.
            _ => equal.push(point),
        }
    }

    let next_axis = (axis + 1) % dimension;
    Some(Box::new(KdNode {
        axis,
        split_value,
        points: equal,
        left_child: build_recursive(less, dimension, next_axis),
        right_child: build_recursive(greater, dimension, next_axis),
    }))
}
