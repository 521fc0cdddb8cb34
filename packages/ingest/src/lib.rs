#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CSV readers for the pipeline's two inputs.
//!
//! - [`records`]: cleaned incident records (one row per victim).
//! - [`locations`]: the cached `city,lat,lon` geocode file.
//!
//! Both expect data that has already been cleaned and geocoded upstream.
//! Rows that fail to parse are reported with their line number rather than
//! skipped.

pub mod locations;
pub mod parsing;
pub mod records;

pub use locations::{read_city_locations, read_city_locations_path};
pub use records::{read_incidents, read_incidents_path};

/// Errors that can occur while reading input files.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// I/O error (file open/read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV framing or deserialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row parsed as CSV but a field value is invalid.
    #[error("Malformed record on line {line}: {message}")]
    MalformedRecord {
        /// 1-based line number in the input.
        line: u64,
        /// Description of what went wrong.
        message: String,
    },
}
