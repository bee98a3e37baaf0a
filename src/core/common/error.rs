use std::fmt;

use crate::core::indexing::kdtree::KdTreeError;

/// Errors surfaced by the classifier, its configuration and the index beneath it.
///
/// Every failure is reported synchronously to the caller; nothing is coerced.
#[derive(Debug)]
pub enum KnnError {
    /// Malformed training or query data: length mismatch, empty training set,
    /// zero-dimensional or non-finite points.
    InvalidInput { message: String },
    /// A point's dimensionality does not match the fitted dimensionality.
    DimensionMismatch { expected: usize, found: usize },
    /// A neighbour count of zero was requested.
    DegenerateConfiguration(String),
    /// `predict` or `kneighbors` was called before `fit`.
    NotFitted,
    /// A configuration file or builder produced an invalid configuration.
    Configuration(String),
    /// A configuration file exists but could not be read.
    Io(std::io::Error),
}

impl fmt::Display for KnnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { message } => write!(f, "Invalid input: {}", message),
            Self::DimensionMismatch { expected, found } => {
                write!(f, "Dimension mismatch: expected {}, found {}", expected, found)
            }
            Self::DegenerateConfiguration(s) => write!(f, "Degenerate configuration: {}", s),
            Self::NotFitted => write!(f, "Classifier has not been fitted"),
            Self::Configuration(s) => write!(f, "Configuration error: {}", s),
            Self::Io(e) => write!(f, "IO Error: {}", e),
        }
    }
}

impl std::error::Error for KnnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

// Manual From implementations
impl From<std::io::Error> for KnnError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<KdTreeError> for KnnError {
    fn from(err: KdTreeError) -> Self {
        match err {
            KdTreeError::DimensionMismatch { expected, found } => {
                Self::DimensionMismatch { expected, found }
            }
            KdTreeError::InvalidPoint(message) => Self::InvalidInput { message },
            KdTreeError::LengthMismatch { points, labels } => Self::InvalidInput {
                message: format!("{} points but {} labels", points, labels),
            },
            KdTreeError::InvalidK(s) => Self::DegenerateConfiguration(s),
        }
    }
}

impl KnnError {
    /// Shorthand for an [`KnnError::InvalidInput`] with the given message.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput { message: message.into() }
    }
}
