#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pairwise similarity and threshold graph construction.
//!
//! Every ordered pair of distinct cities is scored, both directions
//! independently, and an edge `a -> b` is added whenever the score meets the
//! threshold. The entity count is small (tens of cities), so the full
//! `O(n²)` pass is done without pruning.

use std::collections::BTreeMap;

use crime_link_graph_models::{SimilarityGraph, SimilarityMatrix, SimilarityReport};
use crime_link_profile_models::CityProfile;
use crime_link_similarity::ProfileSimilarity;

/// Scores every pair of `profiles` with `scorer` and builds the graph.
#[must_use]
pub fn build_similarity_graph<S: ProfileSimilarity + ?Sized>(
    profiles: &BTreeMap<String, CityProfile>,
    scorer: &S,
    threshold: f64,
) -> SimilarityReport {
    let cities: Vec<&str> = profiles.keys().map(String::as_str).collect();

    let report = build_graph(&cities, threshold, |from, to| {
        scorer.similarity(&profiles[from], &profiles[to])
    });

    log::info!(
        "Scored {} city pairs; {} edges at threshold {threshold}",
        report.similarity.len(),
        report.graph.edge_count()
    );

    report
}

/// Builds the matrix and graph for `cities` from an arbitrary pair scorer.
///
/// `score` is called once per ordered pair of distinct cities, in the order
/// the cities are given. Every city gets an adjacency entry, possibly empty.
pub fn build_graph<F>(cities: &[&str], threshold: f64, mut score: F) -> SimilarityReport
where
    F: FnMut(&str, &str) -> f64,
{
    let mut similarity = SimilarityMatrix::new();
    let mut graph = SimilarityGraph::new();

    for &from in cities {
        similarity.add_city(from);
        graph.add_node(from);

        for &to in cities {
            if from == to {
                continue;
            }

            let value = score(from, to);
            similarity.insert(from, to, value);

            if value >= threshold {
                graph.add_edge(from, to);
            }
        }
    }

    SimilarityReport {
        threshold,
        similarity,
        graph,
    }
}

/// Like [`build_graph`] but scores each unordered pair once and mirrors it.
///
/// Produces the same report as [`build_graph`] for any symmetric scorer,
/// with half the scoring calls.
pub fn build_graph_mirrored<F>(cities: &[&str], threshold: f64, mut score: F) -> SimilarityReport
where
    F: FnMut(&str, &str) -> f64,
{
    let mut scores: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    for (i, &a) in cities.iter().enumerate() {
        for (j, &b) in cities.iter().enumerate().skip(i + 1) {
            if a != b {
                scores.insert((i, j), score(a, b));
            }
        }
    }

    let index: BTreeMap<&str, usize> = cities.iter().enumerate().map(|(i, c)| (*c, i)).collect();

    build_graph(cities, threshold, |from, to| {
        let (i, j) = (index[from], index[to]);
        let key = if i < j { (i, j) } else { (j, i) };
        scores.get(&key).copied().unwrap_or_default()
    })
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use crime_link_profile_models::PeriodKey;
    use crime_link_similarity::WeightedSimilarity;

    use super::*;

    fn table_scorer<'a>(table: &'a [(&'a str, &'a str, f64)]) -> impl Fn(&str, &str) -> f64 + 'a {
        move |a, b| {
            table
                .iter()
                .find(|(x, y, _)| (*x == a && *y == b) || (*x == b && *y == a))
                .map_or(0.0, |(_, _, s)| *s)
        }
    }

    fn profile(count: u64, neighbors: &[&str]) -> CityProfile {
        CityProfile {
            quarterly_counts: BTreeMap::from([(PeriodKey::new(2016, 1).unwrap(), count)]),
            victim_race: BTreeMap::from([("Black".to_string(), count)]),
            victim_sex: BTreeMap::from([("Male".to_string(), count)]),
            victim_age_group: BTreeMap::from([("21-40".to_string(), count)]),
            nearest_cities: neighbors
                .iter()
                .enumerate()
                .map(|(i, n)| (i + 1, (*n).to_string()))
                .collect(),
            lat: 0.0,
            lon: 0.0,
        }
    }

    #[test]
    fn threshold_edges_from_pair_scores() {
        let table = [("A", "B", 0.15), ("A", "C", 0.05), ("B", "C", 0.12)];
        let report = build_graph(&["A", "B", "C"], 0.1, table_scorer(&table));
        let graph = &report.graph;

        assert!(graph.has_edge("A", "B"));
        assert!(graph.has_edge("B", "A"));
        assert!(graph.has_edge("B", "C"));
        assert!(graph.has_edge("C", "B"));
        assert!(!graph.has_edge("A", "C"));
        assert!(!graph.has_edge("C", "A"));
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.neighbors("B"), ["A".to_string(), "C".to_string()]);
    }

    #[test]
    fn score_equal_to_threshold_creates_edge() {
        let table = [("A", "B", 0.1)];
        let report = build_graph(&["A", "B"], 0.1, table_scorer(&table));
        assert!(report.graph.has_edge("A", "B"));
    }

    #[test]
    fn matrix_covers_all_ordered_pairs() {
        let cities = ["A", "B", "C", "D"];
        let report = build_graph(&cities, 0.5, |_, _| 0.3);
        assert_eq!(report.similarity.len(), 12);
        assert_eq!(report.graph.edge_count(), 0);
        for city in cities {
            assert!(report.similarity.get(city, city).is_none());
            assert!(report.graph.neighbors(city).is_empty());
        }
        assert_eq!(report.graph.nodes().count(), 4);
    }

    #[test]
    fn never_self_loops() {
        let report = build_graph(&["A", "B", "C"], 0.0, |_, _| 1.0);
        for city in report.graph.nodes() {
            assert!(!report.graph.has_edge(city, city));
        }
        assert_eq!(report.graph.edge_count(), 6);
    }

    #[test]
    fn identical_profiles_score_one() {
        let profiles = BTreeMap::from([
            ("X".to_string(), profile(4, &["Z"])),
            ("Y".to_string(), profile(4, &["Z"])),
        ]);
        let report = build_similarity_graph(&profiles, &WeightedSimilarity::default(), 0.1);
        assert_eq!(report.similarity.get("X", "Y"), Some(1.0));
        assert!(report.graph.has_edge("X", "Y"));
    }

    #[test]
    fn disjoint_profiles_never_connect() {
        let profiles = BTreeMap::from([
            ("X".to_string(), profile(1, &["Q"])),
            ("Y".to_string(), profile(2, &["R"])),
        ]);
        let scorer = WeightedSimilarity::default();
        for threshold in [1e-12, 0.01, 0.1, 0.5, 1.0] {
            let report = build_similarity_graph(&profiles, &scorer, threshold);
            assert_eq!(report.similarity.get("X", "Y"), Some(0.0));
            assert_eq!(report.graph.edge_count(), 0);
        }
    }

    #[test]
    fn weighted_matrix_is_symmetric() {
        let profiles = BTreeMap::from([
            ("A".to_string(), profile(1, &["B", "C"])),
            ("B".to_string(), profile(1, &["A", "C"])),
            ("C".to_string(), profile(3, &["B", "A"])),
        ]);
        let report = build_similarity_graph(&profiles, &WeightedSimilarity::default(), 0.1);
        assert!(report.similarity.is_symmetric(0.0));
        assert!(report.graph.is_symmetric());
    }

    #[test]
    fn mirrored_matches_naive() {
        let profiles = BTreeMap::from([
            ("A".to_string(), profile(1, &["B", "C"])),
            ("B".to_string(), profile(1, &["C", "A"])),
            ("C".to_string(), profile(3, &["B", "A"])),
            ("D".to_string(), profile(3, &["C", "B"])),
        ]);
        let scorer = WeightedSimilarity::default();
        let cities: Vec<&str> = profiles.keys().map(String::as_str).collect();
        let score = |a: &str, b: &str| scorer.similarity(&profiles[a], &profiles[b]);

        let naive = build_graph(&cities, 0.3, score);
        let mirrored = build_graph_mirrored(&cities, 0.3, score);
        assert_eq!(naive, mirrored);
    }
}
