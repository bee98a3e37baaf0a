pub mod error;
pub use error::KnnError;

/// Class label attached to every training point.
///
/// Labels are non-negative integers so that votes can be counted directly.
pub type Label = u32;
