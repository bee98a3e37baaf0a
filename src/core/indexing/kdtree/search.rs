// src/core/indexing/kdtree/search.rs

//! Logic for performing K-Nearest Neighbor (KNN) search in a KD-Tree.

use serde::{Deserialize, Serialize};

use super::builder::validate_point;
use super::error::KdTreeError;
use super::neighbors::{BoundedNeighbors, Neighbor};
use super::tree::{KdNode, KdTree};
use crate::core::distance::Distance;

/// Decides when the subtree on the far side of a splitting plane is searched.
///
/// The far side is visited when the threshold is strictly greater than the
/// query's distance to the splitting plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PruningStrategy {
    /// Threshold is infinite until k neighbours are held, then the k-th best
    /// distance. Always returns the exact k nearest neighbours.
    #[default]
    KthBest,
    /// Threshold is the smallest distance seen within the current subtree.
    /// Reproduces an older approximation: it can skip a side that still holds
    /// one of the k nearest when fewer than k points have been collected.
    RunningMinimum,
}

/// Performs a K-Nearest Neighbor search in the KD-Tree.
///
/// # Arguments
/// * `tree`: A reference to the `KdTree`.
/// * `query`: The point to find neighbours for.
/// * `k`: The number of nearest neighbours to find. Must be at least 1.
/// * `distance`: The distance strategy to rank points by.
/// * `pruning`: How the far side of each split is pruned.
///
/// # Returns
/// The `min(k, tree.len())` nearest neighbours sorted by ascending distance;
/// equidistant neighbours are ordered by training index.
pub fn find_knn<'a>(
    tree: &'a KdTree,
    query: &[f64],
    k: usize,
    distance: &dyn Distance,
    pruning: PruningStrategy,
) -> Result<Vec<Neighbor<'a>>, KdTreeError> {
    if k == 0 {
        return Err(KdTreeError::InvalidK("k must be at least 1.".to_string()));
    }
    validate_point(query, tree.dimension())?;

    let Some(root) = tree.root() else {
        return Ok(Vec::new()); // Empty tree
    };

    let mut best_neighbors = BoundedNeighbors::new(k.min(tree.len()));
    search_recursive(Some(root), query, distance, pruning, &mut best_neighbors);
    Ok(best_neighbors.into_sorted_vec())
}

/// Visits `node`, offering its points to `best_neighbors`.
///
/// Returns the smallest distance found anywhere in the visited part of this
/// subtree, or infinity if nothing was visited.
fn search_recursive<'a>(
    node: Option<&'a KdNode>,
    query: &[f64],
    distance: &dyn Distance,
    pruning: PruningStrategy,
    best_neighbors: &mut BoundedNeighbors<'a>,
) -> f64 {
    let Some(node) = node else {
        return f64::INFINITY;
    };

    let query_coord_on_axis = query[node.axis];

    // The side that contains the query is searched first.
    let (near_child, far_child) = if query_coord_on_axis <= node.split_value {
        (node.left_child.as_deref(), node.right_child.as_deref())
    } else {
        (node.right_child.as_deref(), node.left_child.as_deref())
    };

    let mut min_distance = search_recursive(near_child, query, distance, pruning, best_neighbors);

    for point in &node.points {
        let d = distance.distance(query, &point.coords);
        min_distance = min_distance.min(d);
        best_neighbors.offer(Neighbor {
            index: point.index,
            point: &point.coords,
            label: point.label,
            distance: d,
        });
    }

    let distance_to_split_plane = (query_coord_on_axis - node.split_value).abs();
    let threshold = match pruning {
        PruningStrategy::KthBest => best_neighbors.worst_distance(),
        PruningStrategy::RunningMinimum => min_distance,
    };

    if threshold > distance_to_split_plane {
        let far_min = search_recursive(far_child, query, distance, pruning, best_neighbors);
        min_distance = min_distance.min(far_min);
    }

    min_distance
}

impl KdTree {
    /// Convenience wrapper around [`find_knn`].
    pub fn nearest<'a>(
        &'a self,
        query: &[f64],
        k: usize,
        distance: &dyn Distance,
        pruning: PruningStrategy,
    ) -> Result<Vec<Neighbor<'a>>, KdTreeError> {
        find_knn(self, query, k, distance, pruning)
    }
}
