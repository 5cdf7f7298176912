pub mod k_nearest;

// Re-export public types and functions
pub use k_nearest::{DistanceStrategy, KNNClassifier, KNNConfig, Label};
