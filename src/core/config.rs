// src/core/config.rs

use crate::core::common::KnnError;
use crate::core::distance::DistanceMetric;
use crate::core::indexing::kdtree::PruningStrategy;
use serde::{Deserialize, Serialize};
use std::fs; // For reading file
use std::path::Path;

/// Configuration for a [`KnnClassifier`](crate::KnnClassifier).
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// k = 5
/// metric = "manhattan"      # euclidean | l2 | manhattan | l1 | chebyshev | linf
/// pruning = "kth_best"      # kth_best | running_minimum
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Requested neighbour count. Clamped to the training set size at fit time.
    pub k: usize,
    pub metric: DistanceMetric,
    pub pruning: PruningStrategy,
}

/// Builder for `ClassifierConfig`.
#[derive(Debug, Clone, Default)]
pub struct ClassifierConfigBuilder {
    k: Option<usize>,
    metric: Option<DistanceMetric>,
    pruning: Option<PruningStrategy>,
}

impl ClassifierConfigBuilder {
    /// Creates a new ClassifierConfigBuilder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the neighbour count
    pub fn k(mut self, k: usize) -> Self {
        self.k = Some(k);
        self
    }

    /// Sets the distance metric
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = Some(metric);
        self
    }

    /// Sets the pruning strategy
    pub fn pruning(mut self, pruning: PruningStrategy) -> Self {
        self.pruning = Some(pruning);
        self
    }

    /// Builds the ClassifierConfig instance with validation
    pub fn build(self) -> Result<ClassifierConfig, KnnError> {
        let defaults = ClassifierConfig::default();
        let config = ClassifierConfig {
            k: self.k.unwrap_or(defaults.k),
            metric: self.metric.unwrap_or(defaults.metric),
            pruning: self.pruning.unwrap_or(defaults.pruning),
        };

        config.validate()?;
        Ok(config)
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            k: 1,
            metric: DistanceMetric::Euclidean,
            pruning: PruningStrategy::KthBest,
        }
    }
}

impl ClassifierConfig {
    /// Creates a new ClassifierConfigBuilder for fluent configuration
    pub fn builder() -> ClassifierConfigBuilder {
        ClassifierConfigBuilder::new()
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), KnnError> {
        if self.k == 0 {
            return Err(KnnError::DegenerateConfiguration(
                "k must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `KnnError::Configuration` if parsing fails, `KnnError::Io` if the
    /// file exists but cannot be read, and `KnnError::DegenerateConfiguration`
    /// if the parsed configuration is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, KnnError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config: Self = toml::from_str(&contents).map_err(|e| {
                    KnnError::Configuration(format!(
                        "Failed to parse config file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;

                // Validate the loaded configuration
                config.validate()?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(KnnError::Io(e)),
        }
    }

    /// Loads configuration from an optional TOML file path.
    ///
    /// If `optional_path` is `None`, it returns the default configuration.
    pub fn load_or_default(optional_path: Option<&Path>) -> Result<Self, KnnError> {
        match optional_path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Serializes this configuration back to TOML.
    pub fn to_toml_string(&self) -> Result<String, KnnError> {
        toml::to_string(self)
            .map_err(|e| KnnError::Configuration(format!("Failed to serialize config: {}", e)))
    }
}
