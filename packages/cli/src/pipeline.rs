//! End-to-end pipeline: records and coordinates in, similarity report out.
//!
//! Chains profile aggregation -> weighted similarity -> threshold graph ->
//! dominant attributes, then bundles everything the rendering side needs
//! into one serializable [`PipelineReport`].

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use crime_link_graph::build_similarity_graph;
use crime_link_graph_models::{SimilarityGraph, SimilarityMatrix};
use crime_link_ingest::{IngestError, read_city_locations_path, read_incidents_path};
use crime_link_profile::{DominantAttribute, ProfileError, build_profiles, dominant_attributes};
use crime_link_profile_models::{CityLocation, CityProfile, IncidentRecord};
use crime_link_similarity::{SimilarityError, WeightedSimilarity};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, PipelineConfig};

/// Errors from any pipeline stage.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Reading an input file failed.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Profile aggregation rejected the records.
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// Similarity weights are invalid.
    #[error(transparent)]
    Similarity(#[from] SimilarityError),

    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A city's map position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PipelineReport {
    /// Edge cutoff used.
    pub threshold: f64,
    /// Pairwise scores, both directions.
    pub similarity: SimilarityMatrix,
    /// Threshold graph.
    pub graph: SimilarityGraph,
    /// Position of every city in the graph.
    pub coordinates: BTreeMap<String, Coordinate>,
    /// Highest-count label per feature per city.
    pub dominant: Vec<DominantAttribute>,
}

/// Reads the records and coordinate CSVs.
///
/// # Errors
///
/// Returns [`PipelineError::Ingest`] if either file cannot be read.
pub fn load_inputs(
    records: &Path,
    coordinates: &Path,
) -> Result<(Vec<IncidentRecord>, Vec<CityLocation>), PipelineError> {
    let locations = read_city_locations_path(coordinates)?;
    let records = read_incidents_path(records)?;
    Ok((records, locations))
}

/// Builds profiles only.
///
/// # Errors
///
/// Returns [`PipelineError::Profile`] if a record does not fit the
/// configured label sets or references an unknown city.
pub fn profiles(
    records: &[IncidentRecord],
    locations: &[CityLocation],
    config: &PipelineConfig,
) -> Result<BTreeMap<String, CityProfile>, PipelineError> {
    Ok(build_profiles(records, locations, &config.profile)?)
}

/// Runs the full pipeline over in-memory inputs.
///
/// # Errors
///
/// Returns [`PipelineError`] if profile aggregation fails or the similarity
/// weights are invalid.
pub fn run(
    records: &[IncidentRecord],
    locations: &[CityLocation],
    config: &PipelineConfig,
) -> Result<PipelineReport, PipelineError> {
    let start = Instant::now();

    let scorer = WeightedSimilarity::from_config(&config.similarity)?;
    let profiles = profiles(records, locations, config)?;
    let report = build_similarity_graph(&profiles, &scorer, config.graph.threshold);

    let coordinates = profiles
        .iter()
        .map(|(city, profile)| {
            (
                city.clone(),
                Coordinate {
                    lat: profile.lat,
                    lon: profile.lon,
                },
            )
        })
        .collect();

    log::info!(
        "Pipeline finished in {:.2}s: {} cities, {} edges",
        start.elapsed().as_secs_f64(),
        profiles.len(),
        report.graph.edge_count()
    );

    Ok(PipelineReport {
        threshold: report.threshold,
        similarity: report.similarity,
        graph: report.graph,
        coordinates,
        dominant: dominant_attributes(&profiles, &config.profile),
    })
}

/// Writes `value` as pretty JSON to `output`, or stdout when `None`.
///
/// # Errors
///
/// Returns [`PipelineError`] if serialization or the write fails.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<(), PipelineError> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
