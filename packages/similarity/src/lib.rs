#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Weighted Jaccard similarity between city profiles.
//!
//! Each profile feature is turned into a set of `(key, value)` entries and
//! compared with [`jaccard`]. Two entries only overlap when both the key and
//! the count (or neighbor name) match exactly. The per-feature scores are
//! then combined with [`FeatureWeights`] into a single score in `[0, 1]`.

pub mod entries;
pub mod jaccard;
pub mod weighted;

pub use entries::{FeatureEntry, feature_entries};
pub use jaccard::jaccard;
pub use weighted::{FeatureWeights, SimilarityConfig, WeightedSimilarity};

use crime_link_profile_models::CityProfile;
use thiserror::Error;

/// Scores how alike two city profiles are.
///
/// Implementations must be symmetric and return values in `[0, 1]`.
pub trait ProfileSimilarity {
    /// Returns the similarity between `a` and `b`.
    fn similarity(&self, a: &CityProfile, b: &CityProfile) -> f64;
}

/// Errors that can occur when configuring a similarity scorer.
#[derive(Debug, Error)]
pub enum SimilarityError {
    /// No features were configured.
    #[error("At least one feature must be configured")]
    NoFeatures,

    /// The weight vector length differs from the feature list length.
    #[error("Expected {expected} weights (one per feature), got {actual}")]
    WeightCount {
        /// Number of configured features.
        expected: usize,
        /// Number of weights supplied.
        actual: usize,
    },

    /// A weight is negative or not finite.
    #[error("Invalid weight {weight}: weights must be finite and non-negative")]
    InvalidWeight {
        /// The offending weight.
        weight: f64,
    },

    /// The weights do not sum to 1.
    #[error("Weights sum to {sum}, expected 1")]
    WeightSum {
        /// The actual sum.
        sum: f64,
    },
}
