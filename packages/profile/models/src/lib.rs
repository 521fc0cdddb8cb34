#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! City profile types and the closed demographic label sets.
//!
//! A [`CityProfile`] bundles every count-based feature tracked for one city:
//! quarterly incident counts, victim race/sex/age-group distributions, and
//! the ranked list of geographically nearest cities. Profiles are built by
//! `crime_link_profile` and compared by `crime_link_similarity`.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Default victim race labels.
pub const VICTIM_RACES: &[&str] = &["Asian", "Black", "Hispanic", "White", "Other", "Unknown"];

/// Default victim sex labels.
pub const VICTIM_SEXES: &[&str] = &["Male", "Female", "Unknown"];

/// Default number of nearest cities recorded per profile.
pub const DEFAULT_NEIGHBOR_COUNT: usize = 5;

/// A city name paired with its (externally geocoded) coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CityLocation {
    /// City name, as it appears in incident records.
    #[serde(alias = "city")]
    pub name: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl CityLocation {
    /// Creates a location from a name and a `(lat, lon)` pair.
    #[must_use]
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }
}

/// One cleaned incident record.
///
/// Records reach this crate already validated: the date parsed, the age
/// imputed, and race/sex normalized to the configured label sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IncidentRecord {
    /// Source record identifier.
    pub uid: String,
    /// City the incident was reported in.
    pub city: String,
    /// Date the incident was reported.
    pub reported_date: NaiveDate,
    /// Victim race label.
    pub victim_race: String,
    /// Victim sex label.
    pub victim_sex: String,
    /// Victim age in years.
    pub victim_age: u32,
}

impl IncidentRecord {
    /// Returns the year/quarter bucket this record's report date falls in.
    #[must_use]
    pub fn period(&self) -> PeriodKey {
        PeriodKey::from_date(self.reported_date)
    }
}

/// A year + quarter bucket, rendered as `"{year}_Q{quarter}"` (e.g. `2015_Q3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PeriodKey {
    /// Calendar year.
    pub year: i32,
    /// Quarter number, 1-4.
    pub quarter: u8,
}

impl PeriodKey {
    /// Creates a period key.
    ///
    /// # Errors
    ///
    /// Returns an error if `quarter` is not in `1..=4`.
    pub const fn new(year: i32, quarter: u8) -> Result<Self, InvalidPeriodError> {
        if quarter >= 1 && quarter <= 4 {
            Ok(Self { year, quarter })
        } else {
            Err(InvalidPeriodError::Quarter(quarter))
        }
    }

    /// Buckets a calendar date into its quarter: `((month - 1) / 3) + 1`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: (date.month0() / 3 + 1) as u8,
        }
    }

    /// Every quarter of every year in `first_year..=last_year`, in order.
    #[must_use]
    pub fn span(first_year: i32, last_year: i32) -> Vec<Self> {
        (first_year..=last_year)
            .flat_map(|year| (1..=4).map(move |quarter| Self { year, quarter }))
            .collect()
    }
}

impl std::fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_Q{}", self.year, self.quarter)
    }
}

impl FromStr for PeriodKey {
    type Err = InvalidPeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, quarter) = s
            .split_once("_Q")
            .ok_or_else(|| InvalidPeriodError::Format(s.to_string()))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| InvalidPeriodError::Format(s.to_string()))?;
        let quarter = quarter
            .parse::<u8>()
            .map_err(|_| InvalidPeriodError::Format(s.to_string()))?;
        Self::new(year, quarter)
    }
}

impl From<PeriodKey> for String {
    fn from(key: PeriodKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = InvalidPeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Error returned when a [`PeriodKey`] cannot be built or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidPeriodError {
    /// Quarter outside `1..=4`.
    Quarter(u8),
    /// String not of the form `YYYY_QN`.
    Format(String),
}

impl std::fmt::Display for InvalidPeriodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quarter(q) => write!(f, "invalid quarter {q}: expected 1-4"),
            Self::Format(s) => write!(f, "invalid period key '{s}': expected YYYY_QN"),
        }
    }
}

impl std::error::Error for InvalidPeriodError {}

/// The features a [`CityProfile`] carries, in their canonical order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProfileFeature {
    /// Incident counts per year/quarter.
    QuarterlyCounts,
    /// Victim race distribution.
    VictimRace,
    /// Victim sex distribution.
    VictimSex,
    /// Victim age-group distribution.
    VictimAgeGroup,
    /// Rank -> name of the nearest other cities.
    NearestCities,
}

impl ProfileFeature {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::QuarterlyCounts,
            Self::VictimRace,
            Self::VictimSex,
            Self::VictimAgeGroup,
            Self::NearestCities,
        ]
    }
}

/// The aggregated feature profile of one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CityProfile {
    /// Incident count for every quarter in the observed year range.
    pub quarterly_counts: BTreeMap<PeriodKey, u64>,
    /// Count per victim race label.
    pub victim_race: BTreeMap<String, u64>,
    /// Count per victim sex label.
    pub victim_sex: BTreeMap<String, u64>,
    /// Count per victim age-group label.
    pub victim_age_group: BTreeMap<String, u64>,
    /// Rank (1-based) -> name of the nearest other city.
    pub nearest_cities: BTreeMap<usize, String>,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl CityProfile {
    /// Total number of incidents counted in this profile.
    #[must_use]
    pub fn total_incidents(&self) -> u64 {
        self.quarterly_counts.values().sum()
    }
}

/// An age range that maps onto an age-group label.
///
/// `max_age` is inclusive; `None` makes the bin open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBin {
    /// Label recorded in [`CityProfile::victim_age_group`].
    pub label: String,
    /// Inclusive upper bound, or `None` for the last bucket.
    #[serde(default)]
    pub max_age: Option<u32>,
}

impl AgeBin {
    /// Creates an age bin.
    #[must_use]
    pub fn new(label: impl Into<String>, max_age: Option<u32>) -> Self {
        Self {
            label: label.into(),
            max_age,
        }
    }
}

/// Label sets and parameters used when building profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Closed set of victim race labels.
    pub races: Vec<String>,
    /// Closed set of victim sex labels.
    pub sexes: Vec<String>,
    /// Age bins, checked in order; the first bin whose bound covers the age wins.
    pub age_groups: Vec<AgeBin>,
    /// Number of nearest cities recorded per profile.
    pub neighbor_count: usize,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            races: VICTIM_RACES.iter().map(ToString::to_string).collect(),
            sexes: VICTIM_SEXES.iter().map(ToString::to_string).collect(),
            age_groups: vec![
                AgeBin::new("0-20", Some(20)),
                AgeBin::new("21-40", Some(40)),
                AgeBin::new("41-60", Some(60)),
                AgeBin::new("61+", None),
            ],
            neighbor_count: DEFAULT_NEIGHBOR_COUNT,
        }
    }
}

impl ProfileConfig {
    /// Returns the label of the first age bin covering `age`.
    #[must_use]
    pub fn age_group(&self, age: u32) -> Option<&str> {
        self.age_groups
            .iter()
            .find(|bin| bin.max_age.is_none_or(|max| age <= max))
            .map(|bin| bin.label.as_str())
    }

    /// Age-group labels in configured order.
    pub fn age_group_labels(&self) -> impl Iterator<Item = &str> {
        self.age_groups.iter().map(|bin| bin.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn quarter_boundaries() {
        assert_eq!(PeriodKey::from_date(date(2015, 1, 1)).quarter, 1);
        assert_eq!(PeriodKey::from_date(date(2015, 3, 31)).quarter, 1);
        assert_eq!(PeriodKey::from_date(date(2015, 4, 1)).quarter, 2);
        assert_eq!(PeriodKey::from_date(date(2015, 9, 30)).quarter, 3);
        assert_eq!(PeriodKey::from_date(date(2015, 12, 31)).quarter, 4);
    }

    #[test]
    fn period_key_display_parse() {
        let key = PeriodKey::new(2016, 3).unwrap();
        assert_eq!(key.to_string(), "2016_Q3");
        assert_eq!("2016_Q3".parse::<PeriodKey>().unwrap(), key);
        assert!("2016-Q3".parse::<PeriodKey>().is_err());
        assert!("2016_Q5".parse::<PeriodKey>().is_err());
        assert!(PeriodKey::new(2016, 0).is_err());
    }

    #[test]
    fn period_span_covers_every_quarter() {
        let span = PeriodKey::span(2010, 2012);
        assert_eq!(span.len(), 12);
        assert_eq!(span[0].to_string(), "2010_Q1");
        assert_eq!(span[11].to_string(), "2012_Q4");
        assert!(PeriodKey::span(2012, 2010).is_empty());
    }

    #[test]
    fn default_age_bins() {
        let config = ProfileConfig::default();
        assert_eq!(config.age_group(0), Some("0-20"));
        assert_eq!(config.age_group(20), Some("0-20"));
        assert_eq!(config.age_group(21), Some("21-40"));
        assert_eq!(config.age_group(40), Some("21-40"));
        assert_eq!(config.age_group(60), Some("41-60"));
        assert_eq!(config.age_group(61), Some("61+"));
        assert_eq!(config.age_group(102), Some("61+"));
    }

    #[test]
    fn bounded_bins_leave_gaps() {
        let config = ProfileConfig {
            age_groups: vec![AgeBin::new("young", Some(30))],
            ..ProfileConfig::default()
        };
        assert_eq!(config.age_group(31), None);
    }

    #[test]
    fn profile_serializes_period_keys_as_strings() {
        let profile = CityProfile {
            quarterly_counts: BTreeMap::from([(PeriodKey::new(2017, 2).unwrap(), 4)]),
            victim_race: BTreeMap::new(),
            victim_sex: BTreeMap::new(),
            victim_age_group: BTreeMap::new(),
            nearest_cities: BTreeMap::from([(1, "Boston".to_string())]),
            lat: 1.0,
            lon: 2.0,
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["quarterly_counts"]["2017_Q2"], 4);
        assert_eq!(json["nearest_cities"]["1"], "Boston");

        let back: CityProfile = serde_json::from_value(json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn feature_names_are_snake_case() {
        assert_eq!(ProfileFeature::VictimAgeGroup.as_ref(), "victim_age_group");
        assert_eq!(
            "nearest_cities".parse::<ProfileFeature>().unwrap(),
            ProfileFeature::NearestCities
        );
        assert_eq!(ProfileFeature::all().len(), 5);
    }
}
