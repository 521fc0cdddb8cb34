#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Great-circle distance and nearest-city ranking.
//!
//! Coordinates cross this crate's boundary as [`geo::Point`] values with
//! `x = longitude` and `y = latitude`, matching the convention used by the
//! rest of the `geo` ecosystem.

pub mod distance;
pub mod nearest;

pub use distance::{EARTH_RADIUS_KM, great_circle_km};
pub use nearest::nearest_cities;
