// src/core/indexing/kdtree/neighbors.rs

//! The bounded best-k accumulator used during a single KNN query.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::common::Label;

/// One search result: a stored point, its label and its distance to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor<'a> {
    /// Position of the point in the training input.
    pub index: usize,
    pub point: &'a [f64],
    pub label: Label,
    pub distance: f64,
}

/// Heap entry ordered by `(distance, index)`.
///
/// `BinaryHeap` is a max-heap, so the worst retained neighbour sits at `peek()`.
/// Breaking distance ties on the training index makes the retained set
/// independent of the order in which candidates are offered.
#[derive(Debug)]
struct Candidate<'a>(Neighbor<'a>);

impl Candidate<'_> {
    fn key_cmp(&self, other: &Self) -> Ordering {
        self.0
            .distance
            .total_cmp(&other.0.distance)
            .then_with(|| self.0.index.cmp(&other.0.index))
    }
}

impl PartialEq for Candidate<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key_cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate<'_> {}

impl PartialOrd for Candidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key_cmp(other)
    }
}

/// Holds at most `capacity` neighbours: the closest ones offered so far.
///
/// Created per query and consumed by [`BoundedNeighbors::into_sorted_vec`].
#[derive(Debug)]
pub struct BoundedNeighbors<'a> {
    capacity: usize,
    heap: BinaryHeap<Candidate<'a>>,
}

impl<'a> BoundedNeighbors<'a> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// Largest retained distance once the container is full, infinity before that.
    ///
    /// A candidate can only enter the container if it is closer than this.
    pub fn worst_distance(&self) -> f64 {
        if !self.is_full() {
            return f64::INFINITY;
        }
        self.heap.peek().map_or(f64::INFINITY, |c| c.0.distance)
    }

    /// Offers a neighbour; returns whether it was retained.
    ///
    /// When full, the worst entry is evicted if the newcomer ranks before it.
    pub fn offer(&mut self, neighbor: Neighbor<'a>) -> bool {
        let candidate = Candidate(neighbor);
        if self.heap.len() < self.capacity {
            self.heap.push(candidate);
            return true;
        }
        match self.heap.peek_mut() {
            Some(mut worst) if candidate < *worst => {
                *worst = candidate;
                true
            }
            _ => false,
        }
    }

    /// Offers every entry of `other` to `self`.
    pub fn merge(&mut self, other: BoundedNeighbors<'a>) {
        for candidate in other.heap {
            self.offer(candidate.0);
        }
    }

    /// Drains the container, closest neighbour first.
    pub fn into_sorted_vec(self) -> Vec<Neighbor<'a>> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|candidate| candidate.0)
            .collect()
    }
}
