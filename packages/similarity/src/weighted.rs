//! Weighted combination of per-feature Jaccard scores.

use crime_link_profile_models::{CityProfile, ProfileFeature};
use serde::{Deserialize, Serialize};

use crate::entries::feature_entries;
use crate::jaccard::jaccard;
use crate::{ProfileSimilarity, SimilarityError};

/// Tolerance for an explicit weight vector's sum.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Which features to compare and, optionally, how to weight them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Features compared, in order.
    pub features: Vec<ProfileFeature>,
    /// One weight per feature. Equal weights are used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            features: ProfileFeature::all().to_vec(),
            weights: None,
        }
    }
}

/// A feature list paired with one weight per feature.
///
/// Weights are fixed at construction and sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureWeights {
    pairs: Vec<(ProfileFeature, f64)>,
}

impl FeatureWeights {
    /// Equal weights of `1/n` for `n` features.
    ///
    /// The last weight absorbs rounding so the weights sum to exactly 1.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::NoFeatures`] if `features` is empty.
    pub fn uniform(features: &[ProfileFeature]) -> Result<Self, SimilarityError> {
        if features.is_empty() {
            return Err(SimilarityError::NoFeatures);
        }

        Ok(Self::equal_split(features))
    }

    #[allow(clippy::cast_precision_loss)]
    fn equal_split(features: &[ProfileFeature]) -> Self {
        let weight = 1.0 / features.len() as f64;
        let mut pairs: Vec<(ProfileFeature, f64)> =
            features.iter().map(|feature| (*feature, weight)).collect();

        if let Some(((_, last), rest)) = pairs.split_last_mut() {
            let assigned: f64 = rest.iter().map(|(_, w)| w).sum();
            *last = 1.0 - assigned;
        }

        Self { pairs }
    }

    /// Explicit weights, one per feature.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError`] if there are no features, the lengths
    /// differ, a weight is negative or not finite, or the weights do not
    /// sum to 1.
    pub fn explicit(features: &[ProfileFeature], weights: &[f64]) -> Result<Self, SimilarityError> {
        if features.is_empty() {
            return Err(SimilarityError::NoFeatures);
        }
        if features.len() != weights.len() {
            return Err(SimilarityError::WeightCount {
                expected: features.len(),
                actual: weights.len(),
            });
        }
        if let Some(&weight) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(SimilarityError::InvalidWeight { weight });
        }

        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(SimilarityError::WeightSum { sum });
        }

        Ok(Self {
            pairs: features.iter().copied().zip(weights.iter().copied()).collect(),
        })
    }

    /// Builds weights from a [`SimilarityConfig`].
    ///
    /// # Errors
    ///
    /// See [`Self::uniform`] and [`Self::explicit`].
    pub fn from_config(config: &SimilarityConfig) -> Result<Self, SimilarityError> {
        match &config.weights {
            Some(weights) => Self::explicit(&config.features, weights),
            None => Self::uniform(&config.features),
        }
    }

    /// The `(feature, weight)` pairs in order.
    #[must_use]
    pub fn pairs(&self) -> &[(ProfileFeature, f64)] {
        &self.pairs
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.pairs.iter().map(|(_, w)| w).sum()
    }
}

/// Weighted Jaccard similarity across a fixed set of profile features.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSimilarity {
    weights: FeatureWeights,
}

impl WeightedSimilarity {
    /// Creates a scorer from precomputed weights.
    #[must_use]
    pub const fn new(weights: FeatureWeights) -> Self {
        Self { weights }
    }

    /// Creates a scorer from a [`SimilarityConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError`] if the configured weights are invalid.
    pub fn from_config(config: &SimilarityConfig) -> Result<Self, SimilarityError> {
        let weights = FeatureWeights::from_config(config)?;
        log::debug!(
            "Similarity weights: {}",
            weights
                .pairs()
                .iter()
                .map(|(feature, weight)| format!("{feature}={weight:.4}"))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(Self::new(weights))
    }

    /// The weights this scorer uses.
    #[must_use]
    pub const fn weights(&self) -> &FeatureWeights {
        &self.weights
    }

    /// Per-feature Jaccard scores between `a` and `b`, unweighted.
    #[must_use]
    pub fn feature_scores(&self, a: &CityProfile, b: &CityProfile) -> Vec<(ProfileFeature, f64)> {
        self.weights
            .pairs()
            .iter()
            .map(|(feature, _)| {
                let score = jaccard(&feature_entries(a, *feature), &feature_entries(b, *feature));
                (*feature, score)
            })
            .collect()
    }
}

impl Default for WeightedSimilarity {
    fn default() -> Self {
        Self::new(FeatureWeights::equal_split(ProfileFeature::all()))
    }
}

impl ProfileSimilarity for WeightedSimilarity {
    fn similarity(&self, a: &CityProfile, b: &CityProfile) -> f64 {
        self.weights
            .pairs()
            .iter()
            .map(|(feature, weight)| {
                weight * jaccard(&feature_entries(a, *feature), &feature_entries(b, *feature))
            })
            .sum()
    }
}
