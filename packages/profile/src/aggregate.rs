//! Record-to-profile aggregation.
//!
//! Aggregation is a fold: [`zeroed_profiles`] builds the initial mapping
//! with every label and period present at zero, and each record then
//! increments exactly one key per feature. Because the starting mapping is
//! already total, the final profiles are total over their label sets and
//! year range regardless of which records were seen.

use std::collections::{BTreeMap, BTreeSet};

use crime_link_geography::nearest_cities;
use crime_link_profile_models::{
    CityLocation, CityProfile, IncidentRecord, PeriodKey, ProfileConfig, ProfileFeature,
};

use crate::ProfileError;

/// Builds one profile per city in `locations` from `records`.
///
/// Cities with no records still receive a profile with all counts at zero.
/// The quarterly range spans the minimum to maximum report year across all
/// records; with no records it is empty.
///
/// # Errors
///
/// Returns [`ProfileError`] if a record references a city not in
/// `locations`, carries a label outside the configured sets, or has an age
/// no bin covers, or if `locations` repeats a city.
pub fn build_profiles(
    records: &[IncidentRecord],
    locations: &[CityLocation],
    config: &ProfileConfig,
) -> Result<BTreeMap<String, CityProfile>, ProfileError> {
    let periods = match year_range(records) {
        Some((first, last)) => PeriodKey::span(first, last),
        None => Vec::new(),
    };

    let initial = zeroed_profiles(locations, &periods, config)?;

    let profiles = records.iter().try_fold(initial, |mut profiles, record| {
        count_record(&mut profiles, record, config)?;
        Ok::<_, ProfileError>(profiles)
    })?;

    log::info!(
        "Built {} city profiles from {} records across {} quarters",
        profiles.len(),
        records.len(),
        periods.len()
    );

    Ok(profiles)
}

/// Returns the minimum and maximum report year, or `None` with no records.
#[must_use]
pub fn year_range(records: &[IncidentRecord]) -> Option<(i32, i32)> {
    records
        .iter()
        .map(|record| record.period().year)
        .fold(None, |range, year| match range {
            None => Some((year, year)),
            Some((first, last)) => Some((first.min(year), last.max(year))),
        })
}

/// Builds the zero-filled starting profiles, including nearest cities.
///
/// # Errors
///
/// Returns [`ProfileError::DuplicateCity`] if `locations` repeats a name.
pub fn zeroed_profiles(
    locations: &[CityLocation],
    periods: &[PeriodKey],
    config: &ProfileConfig,
) -> Result<BTreeMap<String, CityProfile>, ProfileError> {
    let mut seen = BTreeSet::new();
    for location in locations {
        if !seen.insert(location.name.as_str()) {
            return Err(ProfileError::DuplicateCity {
                city: location.name.clone(),
            });
        }
    }

    Ok(locations
        .iter()
        .map(|location| {
            let profile = CityProfile {
                quarterly_counts: periods.iter().map(|key| (*key, 0)).collect(),
                victim_race: zeroed(config.races.iter().map(String::as_str)),
                victim_sex: zeroed(config.sexes.iter().map(String::as_str)),
                victim_age_group: zeroed(config.age_group_labels()),
                nearest_cities: nearest_cities(location, locations, config.neighbor_count),
                lat: location.lat,
                lon: location.lon,
            };
            (location.name.clone(), profile)
        })
        .collect())
}

fn zeroed<'a>(labels: impl Iterator<Item = &'a str>) -> BTreeMap<String, u64> {
    labels.map(|label| (label.to_string(), 0)).collect()
}

fn count_record(
    profiles: &mut BTreeMap<String, CityProfile>,
    record: &IncidentRecord,
    config: &ProfileConfig,
) -> Result<(), ProfileError> {
    let profile = profiles
        .get_mut(&record.city)
        .ok_or_else(|| ProfileError::UnknownCity {
            uid: record.uid.clone(),
            city: record.city.clone(),
        })?;

    let age_group = config
        .age_group(record.victim_age)
        .ok_or_else(|| ProfileError::UnbinnedAge {
            uid: record.uid.clone(),
            age: record.victim_age,
        })?;

    increment_label(
        &mut profile.victim_race,
        &record.victim_race,
        ProfileFeature::VictimRace,
        &record.uid,
    )?;
    increment_label(
        &mut profile.victim_sex,
        &record.victim_sex,
        ProfileFeature::VictimSex,
        &record.uid,
    )?;
    increment_label(
        &mut profile.victim_age_group,
        age_group,
        ProfileFeature::VictimAgeGroup,
        &record.uid,
    )?;

    // The period span is derived from these same records, so the key exists.
    *profile.quarterly_counts.entry(record.period()).or_insert(0) += 1;

    Ok(())
}

fn increment_label(
    counts: &mut BTreeMap<String, u64>,
    label: &str,
    feature: ProfileFeature,
    uid: &str,
) -> Result<(), ProfileError> {
    let count = counts
        .get_mut(label)
        .ok_or_else(|| ProfileError::UnknownLabel {
            uid: uid.to_string(),
            feature,
            label: label.to_string(),
        })?;
    *count += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crime_link_profile_models::AgeBin;

    use super::*;

    fn record(
        uid: &str,
        city: &str,
        date: (i32, u32, u32),
        race: &str,
        sex: &str,
        age: u32,
    ) -> IncidentRecord {
        IncidentRecord {
            uid: uid.to_string(),
            city: city.to_string(),
            reported_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            victim_race: race.to_string(),
            victim_sex: sex.to_string(),
            victim_age: age,
        }
    }

    fn cities() -> Vec<CityLocation> {
        vec![
            CityLocation::new("Atlanta", 33.7490, -84.3880),
            CityLocation::new("Birmingham", 33.5207, -86.8025),
            CityLocation::new("Charlotte", 35.2271, -80.8431),
        ]
    }

    fn period(year: i32, quarter: u8) -> PeriodKey {
        PeriodKey::new(year, quarter).unwrap()
    }

    #[test]
    fn counts_demographics_and_quarters() {
        let records = vec![
            record("a1", "Atlanta", (2010, 2, 14), "Black", "Male", 19),
            record("a2", "Atlanta", (2010, 5, 1), "Black", "Female", 33),
            record("a3", "Atlanta", (2012, 11, 30), "White", "Male", 70),
            record("b1", "Birmingham", (2011, 7, 4), "Hispanic", "Unknown", 45),
        ];
        let profiles = build_profiles(&records, &cities(), &ProfileConfig::default()).unwrap();

        let atlanta = &profiles["Atlanta"];
        assert_eq!(atlanta.victim_race["Black"], 2);
        assert_eq!(atlanta.victim_race["White"], 1);
        assert_eq!(atlanta.victim_race["Asian"], 0);
        assert_eq!(atlanta.victim_sex["Male"], 2);
        assert_eq!(atlanta.victim_sex["Female"], 1);
        assert_eq!(atlanta.victim_age_group["0-20"], 1);
        assert_eq!(atlanta.victim_age_group["21-40"], 1);
        assert_eq!(atlanta.victim_age_group["61+"], 1);
        assert_eq!(atlanta.quarterly_counts[&period(2010, 1)], 1);
        assert_eq!(atlanta.quarterly_counts[&period(2010, 2)], 1);
        assert_eq!(atlanta.quarterly_counts[&period(2012, 4)], 1);
        assert_eq!(atlanta.total_incidents(), 3);

        let birmingham = &profiles["Birmingham"];
        assert_eq!(birmingham.victim_age_group["41-60"], 1);
        assert_eq!(birmingham.quarterly_counts[&period(2011, 3)], 1);
    }

    #[test]
    fn quarterly_counts_cover_full_year_range() {
        let records = vec![
            record("a1", "Atlanta", (2008, 6, 1), "Black", "Male", 25),
            record("b1", "Birmingham", (2011, 1, 1), "White", "Male", 25),
        ];
        let profiles = build_profiles(&records, &cities(), &ProfileConfig::default()).unwrap();
        let expected: Vec<PeriodKey> = PeriodKey::span(2008, 2011);

        for profile in profiles.values() {
            let keys: Vec<PeriodKey> = profile.quarterly_counts.keys().copied().collect();
            assert_eq!(keys, expected);
        }
        assert_eq!(profiles["Charlotte"].total_incidents(), 0);
    }

    #[test]
    fn city_without_records_is_zero_filled() {
        let records = vec![record("a1", "Atlanta", (2010, 1, 1), "Asian", "Female", 5)];
        let profiles = build_profiles(&records, &cities(), &ProfileConfig::default()).unwrap();
        let charlotte = &profiles["Charlotte"];

        assert_eq!(charlotte.victim_race.len(), 6);
        assert!(charlotte.victim_race.values().all(|&c| c == 0));
        assert_eq!(charlotte.victim_sex.len(), 3);
        assert_eq!(charlotte.victim_age_group.len(), 4);
        assert_eq!(charlotte.quarterly_counts.len(), 4);
    }

    #[test]
    fn no_records_yields_empty_quarters() {
        let profiles = build_profiles(&[], &cities(), &ProfileConfig::default()).unwrap();
        assert_eq!(profiles.len(), 3);
        assert!(profiles.values().all(|p| p.quarterly_counts.is_empty()));
    }

    #[test]
    fn nearest_cities_populated_and_truncated() {
        let profiles = build_profiles(&[], &cities(), &ProfileConfig::default()).unwrap();
        for (name, profile) in &profiles {
            assert_eq!(profile.nearest_cities.len(), 2);
            assert!(!profile.nearest_cities.values().any(|n| n == name));
        }
        assert_eq!(profiles["Atlanta"].nearest_cities[&1], "Birmingham");
    }

    #[test]
    fn unknown_race_fails_loudly() {
        let records = vec![record("x9", "Atlanta", (2010, 1, 1), "Martian", "Male", 30)];
        let err = build_profiles(&records, &cities(), &ProfileConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::UnknownLabel {
                feature: ProfileFeature::VictimRace,
                ..
            }
        ));
    }

    #[test]
    fn unknown_sex_fails_loudly() {
        let records = vec![record("x9", "Atlanta", (2010, 1, 1), "White", "M", 30)];
        let err = build_profiles(&records, &cities(), &ProfileConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::UnknownLabel {
                feature: ProfileFeature::VictimSex,
                ..
            }
        ));
    }

    #[test]
    fn unknown_city_fails() {
        let records = vec![record("x9", "Gotham", (2010, 1, 1), "White", "Male", 30)];
        let err = build_profiles(&records, &cities(), &ProfileConfig::default()).unwrap_err();
        assert!(matches!(err, ProfileError::UnknownCity { ref city, .. } if city == "Gotham"));
    }

    #[test]
    fn duplicate_city_fails() {
        let mut locations = cities();
        locations.push(CityLocation::new("Atlanta", 0.0, 0.0));
        let err = build_profiles(&[], &locations, &ProfileConfig::default()).unwrap_err();
        assert!(matches!(err, ProfileError::DuplicateCity { .. }));
    }

    #[test]
    fn smaller_fixture_config() {
        let config = ProfileConfig {
            races: vec!["A".to_string(), "B".to_string()],
            sexes: vec!["X".to_string()],
            age_groups: vec![AgeBin::new("minor", Some(17)), AgeBin::new("adult", Some(200))],
            neighbor_count: 1,
        };
        let records = vec![
            record("1", "Atlanta", (2020, 1, 1), "A", "X", 12),
            record("2", "Atlanta", (2020, 1, 2), "B", "X", 40),
        ];
        let profiles = build_profiles(&records, &cities(), &config).unwrap();
        let atlanta = &profiles["Atlanta"];

        assert_eq!(atlanta.victim_race.len(), 2);
        assert_eq!(atlanta.victim_age_group["minor"], 1);
        assert_eq!(atlanta.victim_age_group["adult"], 1);
        assert_eq!(atlanta.nearest_cities.len(), 1);
    }

    #[test]
    fn unbinned_age_fails() {
        let config = ProfileConfig {
            age_groups: vec![AgeBin::new("young", Some(30))],
            ..ProfileConfig::default()
        };
        let records = vec![record("old", "Atlanta", (2020, 1, 1), "White", "Male", 90)];
        let err = build_profiles(&records, &cities(), &config).unwrap_err();
        assert!(matches!(err, ProfileError::UnbinnedAge { age: 90, .. }));
    }

    #[test]
    fn year_range_spans_records() {
        assert_eq!(year_range(&[]), None);
        let records = vec![
            record("1", "Atlanta", (2014, 1, 1), "A", "X", 1),
            record("2", "Atlanta", (2009, 1, 1), "A", "X", 1),
            record("3", "Atlanta", (2011, 1, 1), "A", "X", 1),
        ];
        assert_eq!(year_range(&records), Some((2009, 2014)));
    }
}
