#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Similarity matrix and threshold graph types.
//!
//! Both serialize as plain nested mappings so rendering layers can consume
//! them without depending on this crate:
//!
//! - [`SimilarityMatrix`]: `{"Boston": {"Chicago": 0.24, ...}, ...}`
//! - [`SimilarityGraph`]: `{"Boston": ["Chicago", ...], ...}`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default similarity cutoff for creating an edge.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Similarity score for every ordered pair of distinct cities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityMatrix {
    scores: BTreeMap<String, BTreeMap<String, f64>>,
}

impl SimilarityMatrix {
    /// Creates an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the score for the ordered pair `(from, to)`.
    pub fn insert(&mut self, from: &str, to: &str, score: f64) {
        self.scores
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string(), score);
    }

    /// Ensures `city` has a row, even if it has no pairs.
    pub fn add_city(&mut self, city: &str) {
        self.scores.entry(city.to_string()).or_default();
    }

    /// Returns the score for `(from, to)`, if computed.
    #[must_use]
    pub fn get(&self, from: &str, to: &str) -> Option<f64> {
        self.scores.get(from)?.get(to).copied()
    }

    /// Scores from `city` to every other city.
    #[must_use]
    pub fn row(&self, city: &str) -> Option<&BTreeMap<String, f64>> {
        self.scores.get(city)
    }

    /// Iterates over all `(from, to, score)` triples.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.scores.iter().flat_map(|(from, row)| {
            row.iter()
                .map(move |(to, score)| (from.as_str(), to.as_str(), *score))
        })
    }

    /// Number of ordered pairs recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.values().map(BTreeMap::len).sum()
    }

    /// Whether no pairs are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether every `(a, b)` has a matching `(b, a)` within `tolerance`.
    #[must_use]
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        self.pairs().all(|(from, to, score)| {
            self.get(to, from)
                .is_some_and(|reverse| (reverse - score).abs() <= tolerance)
        })
    }
}

/// Adjacency lists of cities whose similarity meets the threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityGraph {
    adjacency: BTreeMap<String, Vec<String>>,
}

impl SimilarityGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `city` with no neighbors if it is not present yet.
    pub fn add_node(&mut self, city: &str) {
        self.adjacency.entry(city.to_string()).or_default();
    }

    /// Appends a directed edge `from -> to`. Self-loops are ignored.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        self.adjacency
            .entry(from.to_string())
            .or_default()
            .push(to.to_string());
    }

    /// Neighbors of `city`, in insertion order.
    #[must_use]
    pub fn neighbors(&self, city: &str) -> &[String] {
        self.adjacency
            .get(city)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether the directed edge `from -> to` exists.
    #[must_use]
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.neighbors(from).iter().any(|n| n == to)
    }

    /// All cities in the graph.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    /// Number of directed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Whether every edge `a -> b` has a reverse edge `b -> a`.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.adjacency
            .iter()
            .all(|(from, tos)| tos.iter().all(|to| self.has_edge(to, from)))
    }
}

/// The matrix and graph produced by one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SimilarityReport {
    /// Cutoff used to build the graph.
    pub threshold: f64,
    /// All pairwise scores.
    pub similarity: SimilarityMatrix,
    /// Edges meeting the threshold.
    pub graph: SimilarityGraph,
}
