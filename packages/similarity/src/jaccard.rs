//! Jaccard set similarity.

use std::collections::BTreeSet;

/// Returns `|a ∩ b| / |a ∪ b|`, or `0.0` when both sets are empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn jaccard<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;

    if union == 0 {
        return 0.0;
    }

    intersection as f64 / union as f64
}
