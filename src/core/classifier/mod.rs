// src/core/classifier/mod.rs

//! k-nearest-neighbour classification on top of the KD-tree index.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use crate::core::common::{KnnError, Label};
use crate::core::config::ClassifierConfig;
use crate::core::distance::{Distance, Euclidean};
use crate::core::indexing::kdtree::{build_kdtree, find_knn, KdTree, Neighbor, PruningStrategy};

/// `KnnClassifier`: predicts a label by majority vote among the k nearest training points.
///
/// The classifier owns one [`KdTree`] per fitted data set. Fitting again
/// replaces the tree and the retained training arrays entirely. Once fitted,
/// the classifier is only read by `predict`, so a shared reference can be used
/// from several threads at once.
#[derive(Debug, Clone)]
pub struct KnnClassifier {
    /// Requested neighbour count, as configured.
    k: usize,
    /// `min(k, training_len)` once fitted.
    effective_k: usize,
    distance: Arc<dyn Distance>,
    pruning: PruningStrategy,
    fitted: Option<Arc<FittedModel>>,
}

#[derive(Debug)]
struct FittedModel {
    tree: KdTree,
    points: Vec<Vec<f64>>,
    labels: Vec<Label>,
}

impl KnnClassifier {
    /// Creates an unfitted classifier using Euclidean distance.
    ///
    /// # Errors
    /// `KnnError::DegenerateConfiguration` if `k` is zero.
    pub fn new(k: usize) -> Result<Self, KnnError> {
        Self::with_distance(k, Arc::new(Euclidean))
    }

    /// Creates an unfitted classifier using the given distance strategy.
    ///
    /// # Errors
    /// `KnnError::DegenerateConfiguration` if `k` is zero.
    pub fn with_distance(k: usize, distance: Arc<dyn Distance>) -> Result<Self, KnnError> {
        if k == 0 {
            return Err(KnnError::DegenerateConfiguration(
                "k must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            k,
            effective_k: k,
            distance,
            pruning: PruningStrategy::default(),
            fitted: None,
        })
    }

    /// Creates an unfitted classifier from a validated configuration.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, KnnError> {
        config.validate()?;
        Ok(Self::with_distance(config.k, config.metric.build())?.with_pruning(config.pruning))
    }

    /// Replaces the pruning strategy used by subsequent queries.
    #[must_use]
    pub fn with_pruning(mut self, pruning: PruningStrategy) -> Self {
        self.pruning = pruning;
        self
    }

    /// Fits the classifier: retains the training data, builds a fresh index and
    /// clamps k to the number of training points.
    ///
    /// On error the previous fit, if any, is left untouched.
    ///
    /// # Errors
    /// `KnnError::InvalidInput` for an empty training set, mismatched lengths,
    /// zero-dimensional or non-finite points; `KnnError::DimensionMismatch` if
    /// the points do not all share the first point's dimensionality.
    pub fn fit<P: AsRef<[f64]>>(&mut self, points: &[P], labels: &[Label]) -> Result<(), KnnError> {
        if points.len() != labels.len() {
            return Err(KnnError::invalid_input(format!(
                "{} points but {} labels",
                points.len(),
                labels.len()
            )));
        }
        let Some(first) = points.first() else {
            return Err(KnnError::invalid_input("cannot fit on an empty training set"));
        };
        let dimension = first.as_ref().len();
        if dimension == 0 {
            return Err(KnnError::invalid_input("points must have at least one coordinate"));
        }

        let tree = build_kdtree(points, labels, dimension)?;

        let effective_k = self.k.min(points.len());
        if effective_k < self.k {
            debug!(
                "Clamping k from {} to the training set size {}",
                self.k, effective_k
            );
        }

        self.effective_k = effective_k;
        self.fitted = Some(Arc::new(FittedModel {
            tree,
            points: points.iter().map(|p| p.as_ref().to_vec()).collect(),
            labels: labels.to_vec(),
        }));
        Ok(())
    }

    /// Returns the `effective_k` nearest training points to `point`, closest first.
    pub fn kneighbors(&self, point: &[f64]) -> Result<Vec<Neighbor<'_>>, KnnError> {
        let model = self.model()?;
        let neighbors = find_knn(
            &model.tree,
            point,
            self.effective_k,
            self.distance.as_ref(),
            self.pruning,
        )?;
        Ok(neighbors)
    }

    /// Predicts the label of a single point.
    ///
    /// The most frequent label among the k nearest neighbours wins; a tie goes
    /// to the lowest label value.
    pub fn predict(&self, point: &[f64]) -> Result<Label, KnnError> {
        let neighbors = self.kneighbors(point)?;
        // A successful fit holds at least one point, so only an unfitted model votes on nothing.
        majority_vote(neighbors.iter().map(|n| n.label)).ok_or(KnnError::NotFitted)
    }

    /// Predicts one label per row, index-aligned with `points`.
    ///
    /// Fails on the first row that cannot be classified.
    pub fn predict_batch<P: AsRef<[f64]>>(&self, points: &[P]) -> Result<Vec<Label>, KnnError> {
        points.iter().map(|p| self.predict(p.as_ref())).collect()
    }

    /// Fraction of `points` whose predicted label equals the given label.
    #[allow(clippy::cast_precision_loss)]
    pub fn score<P: AsRef<[f64]>>(&self, points: &[P], labels: &[Label]) -> Result<f64, KnnError> {
        if points.len() != labels.len() {
            return Err(KnnError::invalid_input(format!(
                "{} points but {} labels",
                points.len(),
                labels.len()
            )));
        }
        if points.is_empty() {
            return Err(KnnError::invalid_input("cannot score an empty set"));
        }

        let predictions = self.predict_batch(points)?;
        let correct = predictions
            .iter()
            .zip(labels.iter())
            .filter(|(predicted, expected)| predicted == expected)
            .count();
        Ok(correct as f64 / points.len() as f64)
    }

    /// The neighbour count as configured.
    pub fn k(&self) -> usize {
        self.k
    }

    /// The neighbour count queries actually use: `min(k, training_len)` once fitted.
    pub fn effective_k(&self) -> usize {
        self.effective_k
    }

    pub fn pruning(&self) -> PruningStrategy {
        self.pruning
    }

    pub fn distance_name(&self) -> &str {
        self.distance.name()
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Dimensionality of the fitted training points.
    pub fn dimension(&self) -> Option<usize> {
        self.fitted.as_ref().map(|m| m.tree.dimension())
    }

    pub fn training_len(&self) -> usize {
        self.fitted.as_ref().map_or(0, |m| m.labels.len())
    }

    /// The retained training points, in input order.
    pub fn training_points(&self) -> &[Vec<f64>] {
        self.fitted.as_ref().map(|m| m.points.as_slice()).unwrap_or_default()
    }

    /// The retained training labels, in input order.
    pub fn training_labels(&self) -> &[Label] {
        self.fitted.as_ref().map(|m| m.labels.as_slice()).unwrap_or_default()
    }

    /// The fitted index, if any.
    pub fn index(&self) -> Option<&KdTree> {
        self.fitted.as_ref().map(|m| &m.tree)
    }

    fn model(&self) -> Result<&FittedModel, KnnError> {
        self.fitted.as_deref().ok_or(KnnError::NotFitted)
    }
}

/// Most frequent label; ties go to the lowest label. `None` for no labels.
fn majority_vote(labels: impl IntoIterator<Item = Label>) -> Option<Label> {
    let mut counts: BTreeMap<Label, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut winner: Option<(Label, usize)> = None;
    // Ascending label order, so only a strictly larger count replaces the winner.
    for (label, count) in counts {
        if winner.map_or(true, |(_, best)| count > best) {
            winner = Some((label, count));
        }
    }
    winner.map(|(label, _)| label)
}
