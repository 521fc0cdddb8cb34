//! Dominant attribute per city and feature.

use std::collections::BTreeMap;

use crime_link_profile_models::{CityProfile, ProfileConfig, ProfileFeature};
use serde::{Deserialize, Serialize};

/// The most frequent label of one feature in one city's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DominantAttribute {
    /// City the attribute belongs to.
    pub city: String,
    /// Feature the label was taken from.
    pub feature: ProfileFeature,
    /// Label with the highest count.
    pub label: String,
    /// The label's count.
    pub count: u64,
}

/// Returns, for every city, the highest-count label of each count feature.
///
/// Labels are visited in configured order (periods chronologically) and a
/// later label only wins with a strictly greater count, so ties go to the
/// label listed first in `config`. Features with no labels produce no entry.
#[must_use]
pub fn dominant_attributes(
    profiles: &BTreeMap<String, CityProfile>,
    config: &ProfileConfig,
) -> Vec<DominantAttribute> {
    let mut rows = Vec::new();

    for (city, profile) in profiles {
        let quarterly = profile
            .quarterly_counts
            .iter()
            .map(|(key, count)| (key.to_string(), *count));
        push_max(&mut rows, city, ProfileFeature::QuarterlyCounts, quarterly);

        let races = config.races.iter().map(String::as_str);
        push_max(
            &mut rows,
            city,
            ProfileFeature::VictimRace,
            configured(&profile.victim_race, races),
        );

        let sexes = config.sexes.iter().map(String::as_str);
        push_max(
            &mut rows,
            city,
            ProfileFeature::VictimSex,
            configured(&profile.victim_sex, sexes),
        );

        push_max(
            &mut rows,
            city,
            ProfileFeature::VictimAgeGroup,
            configured(&profile.victim_age_group, config.age_group_labels()),
        );
    }

    rows
}

/// Counts for `labels` in the given order, skipping labels absent from `counts`.
fn configured<'a>(
    counts: &'a BTreeMap<String, u64>,
    labels: impl Iterator<Item = &'a str> + 'a,
) -> impl Iterator<Item = (String, u64)> + 'a {
    labels.filter_map(|label| counts.get(label).map(|count| (label.to_string(), *count)))
}

fn push_max(
    rows: &mut Vec<DominantAttribute>,
    city: &str,
    feature: ProfileFeature,
    entries: impl Iterator<Item = (String, u64)>,
) {
    let best = entries.reduce(|best, entry| if entry.1 > best.1 { entry } else { best });

    if let Some((label, count)) = best {
        rows.push(DominantAttribute {
            city: city.to_string(),
            feature,
            label,
            count,
        });
    }
}
