// src/core/distance.rs

//! Pairwise distance strategies for neighbour search.
//!
//! The KD-tree prunes a subtree when the query's distance to the splitting
//! hyperplane already exceeds the current k-th best distance. That is only
//! sound when `distance(a, b) >= |a[i] - b[i]|` holds on every axis `i`, which
//! is true for all built-in metrics here. Custom closures wrapped in
//! [`FnDistance`] must satisfy it too, or results may miss true neighbours.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A symmetric, non-negative pairwise distance between two points of equal length.
pub trait Distance: fmt::Debug + Send + Sync {
    /// Returns the name of the distance function.
    fn name(&self) -> &str;

    /// Computes the distance between `a` and `b`.
    ///
    /// Callers guarantee `a.len() == b.len()`.
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;
}

/// Straight-line (L2) distance. The default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl Distance for Euclidean {
    fn name(&self) -> &str {
        "euclidean"
    }

    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

/// Taxicab (L1) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Manhattan;

impl Distance for Manhattan {
    fn name(&self) -> &str {
        "manhattan"
    }

    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
    }
}

/// Largest per-axis difference (L-infinity).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Chebyshev;

impl Distance for Chebyshev {
    fn name(&self) -> &str {
        "chebyshev"
    }

    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max)
    }
}

/// Adapts a closure into a [`Distance`].
///
/// The closure must never report less than the difference on any single axis.
/// Weighted L1 with every weight at least 1 qualifies; squared L2 does not.
///
/// ```
/// use kdknn::{Distance, FnDistance};
///
/// let weights = [1.0, 2.0];
/// let weighted_l1 = FnDistance::new("weighted_l1", move |a: &[f64], b: &[f64]| {
///     a.iter().zip(b).zip(weights).map(|((x, y), w)| w * (x - y).abs()).sum()
/// });
/// assert_eq!(weighted_l1.distance(&[0.0, 0.0], &[1.0, 2.0]), 5.0);
/// ```
pub struct FnDistance<F> {
    name: String,
    func: F,
}

impl<F> FnDistance<F>
where
    F: Fn(&[f64], &[f64]) -> f64 + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self { name: name.into(), func }
    }
}

impl<F> fmt::Debug for FnDistance<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDistance").field("name", &self.name).finish_non_exhaustive()
    }
}

impl<F> Distance for FnDistance<F>
where
    F: Fn(&[f64], &[f64]) -> f64 + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        (self.func)(a, b)
    }
}

/// Built-in metrics that can be named in a configuration file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    #[default]
    #[serde(alias = "l2")]
    Euclidean,
    #[serde(alias = "l1")]
    Manhattan,
    #[serde(alias = "linf")]
    Chebyshev,
}

impl DistanceMetric {
    /// Instantiates the distance strategy for this metric.
    #[must_use]
    pub fn build(self) -> Arc<dyn Distance> {
        match self {
            Self::Euclidean => Arc::new(Euclidean),
            Self::Manhattan => Arc::new(Manhattan),
            Self::Chebyshev => Arc::new(Chebyshev),
        }
    }

    /// Get the name of the distance metric
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Manhattan => "manhattan",
            Self::Chebyshev => "chebyshev",
        }
    }
}
