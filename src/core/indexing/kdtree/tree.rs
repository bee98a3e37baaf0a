// src/core/indexing/kdtree/tree.rs

//! Defines the core KD-Tree structures: `LabeledPoint`, `KdNode` and `KdTree`.

use crate::core::common::Label;

/// A training point together with its label and its position in the training input.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledPoint {
    /// Position of this point in the slice the tree was built from.
    pub index: usize,
    pub coords: Vec<f64>,
    pub label: Label,
}

/// Represents a node in the KD-Tree.
///
/// A node holds every point whose coordinate on `axis` equals `split_value`
/// within its partition. Points strictly below the pivot live in the left
/// subtree, points strictly above it in the right subtree. An absent child
/// means that side of the partition is empty.
#[derive(Debug)]
pub struct KdNode {
    pub axis: usize,
    pub split_value: f64,
    /// Never empty.
    pub points: Vec<LabeledPoint>,
    pub left_child: Option<Box<KdNode>>,
    pub right_child: Option<Box<KdNode>>,
}

impl KdNode {
    /// Number of nodes in the subtree rooted here, this node included.
    pub fn subtree_nodes(&self) -> usize {
        1 + self.left_child.as_ref().map_or(0, |n| n.subtree_nodes())
            + self.right_child.as_ref().map_or(0, |n| n.subtree_nodes())
    }

    /// Height of the subtree rooted here; a lone node has height 1.
    pub fn subtree_depth(&self) -> usize {
        let left = self.left_child.as_ref().map_or(0, |n| n.subtree_depth());
        let right = self.right_child.as_ref().map_or(0, |n| n.subtree_depth());
        1 + left.max(right)
    }
}

/// Represents a KD-Tree.
///
/// The tree is built once from a static set of labelled points (see
/// [`build_kdtree`](super::build_kdtree)) and is immutable afterwards, so a
/// single tree can serve concurrent read-only queries.
#[derive(Debug)]
pub struct KdTree {
    pub(super) root: Option<Box<KdNode>>,
    dimension: usize,
    len: usize,
}

impl KdTree {
    /// Creates a new, empty KD-Tree for a given dimension.
    /// The actual tree structure is built using the `build_kdtree` function.
    pub fn new(dimension: usize) -> Self {
        KdTree {
            root: None,
            dimension,
            len: 0,
        }
    }

    /// Returns the dimensionality of the points this tree is designed for.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Total number of points stored across all nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn root(&self) -> Option<&KdNode> {
        self.root.as_deref()
    }

    pub fn node_count(&self) -> usize {
        self.root().map_or(0, KdNode::subtree_nodes)
    }

    /// Height of the tree; zero for an empty tree.
    pub fn depth(&self) -> usize {
        self.root().map_or(0, KdNode::subtree_depth)
    }

    /// Iterates over every stored point in pre-order (node group, then left, then right).
    pub fn points(&self) -> Points<'_> {
        Points {
            stack: self.root().into_iter().collect(),
            current: Default::default(),
        }
    }

    /// Sets the root node of the tree. Primarily used by the builder.
    pub(super) fn set_root(&mut self, root_node: Option<Box<KdNode>>, len: usize) {
        self.root = root_node;
        self.len = len;
    }
}

/// Iterator returned by [`KdTree::points`].
#[derive(Debug)]
pub struct Points<'a> {
    stack: Vec<&'a KdNode>,
    current: std::slice::Iter<'a, LabeledPoint>,
}

impl<'a> Iterator for Points<'a> {
    type Item = &'a LabeledPoint;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(point) = self.current.next() {
                return Some(point);
            }
            let node = self.stack.pop()?;
            // Push right first so the left subtree is visited next.
            if let Some(right) = node.right_child.as_deref() {
                self.stack.push(right);
            }
            if let Some(left) = node.left_child.as_deref() {
                self.stack.push(left);
            }
            self.current = node.points.iter();
        }
    }
}
