pub mod classifier;
pub mod common;
pub mod config;
pub mod distance;
pub mod indexing;
pub use self::config::ClassifierConfig;
