#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-city profile aggregation.
//!
//! Folds a stream of cleaned [`IncidentRecord`]s into one [`CityProfile`]
//! per city: quarterly counts over the full observed year range, victim
//! demographic distributions over closed label sets, and the nearest other
//! cities by great-circle distance.
//!
//! [`IncidentRecord`]: crime_link_profile_models::IncidentRecord
//! [`CityProfile`]: crime_link_profile_models::CityProfile

pub mod aggregate;
pub mod dominant;

pub use aggregate::build_profiles;
pub use dominant::{DominantAttribute, dominant_attributes};

use crime_link_profile_models::ProfileFeature;
use thiserror::Error;

/// Errors that can occur while building profiles.
///
/// All of these indicate input that violates the configured schema; the
/// aggregator refuses to silently miscount.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// A record references a city with no known coordinate.
    #[error("Record {uid} references unknown city '{city}'")]
    UnknownCity {
        /// Offending record identifier.
        uid: String,
        /// City name from the record.
        city: String,
    },

    /// A record carries a label outside the configured label set.
    #[error("Record {uid} has {feature} label '{label}' outside the configured set")]
    UnknownLabel {
        /// Offending record identifier.
        uid: String,
        /// Feature the label belongs to.
        feature: ProfileFeature,
        /// The unrecognized label.
        label: String,
    },

    /// No configured age bin covers the record's age.
    #[error("Record {uid} has age {age} not covered by any age bin")]
    UnbinnedAge {
        /// Offending record identifier.
        uid: String,
        /// The uncovered age.
        age: u32,
    },

    /// The location set lists the same city more than once.
    #[error("City '{city}' appears more than once in the location set")]
    DuplicateCity {
        /// The repeated city name.
        city: String,
    },
}
