//! Conversion of profile features into comparable entry sets.

use std::collections::{BTreeMap, BTreeSet};

use crime_link_profile_models::{CityProfile, PeriodKey, ProfileFeature};

/// One `(key, value)` pair of a profile feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureEntry<'a> {
    /// A quarter and its incident count.
    Period(PeriodKey, u64),
    /// A demographic label and its count.
    Label(&'a str, u64),
    /// A neighbor rank and the city at that rank.
    Rank(usize, &'a str),
}

/// Returns the entry set of `feature` in `profile`.
#[must_use]
pub fn feature_entries(
    profile: &CityProfile,
    feature: ProfileFeature,
) -> BTreeSet<FeatureEntry<'_>> {
    match feature {
        ProfileFeature::QuarterlyCounts => profile
            .quarterly_counts
            .iter()
            .map(|(key, count)| FeatureEntry::Period(*key, *count))
            .collect(),
        ProfileFeature::VictimRace => labels(&profile.victim_race),
        ProfileFeature::VictimSex => labels(&profile.victim_sex),
        ProfileFeature::VictimAgeGroup => labels(&profile.victim_age_group),
        ProfileFeature::NearestCities => profile
            .nearest_cities
            .iter()
            .map(|(rank, name)| FeatureEntry::Rank(*rank, name.as_str()))
            .collect(),
    }
}

fn labels(counts: &BTreeMap<String, u64>) -> BTreeSet<FeatureEntry<'_>> {
    counts
        .iter()
        .map(|(label, count)| FeatureEntry::Label(label.as_str(), *count))
        .collect()
}
