//! Ranks the other cities by distance from a target city.

use std::collections::BTreeMap;

use crime_link_profile_models::CityLocation;

use crate::distance::{great_circle_km, location_point};

/// Returns the `k` cities closest to `target`, keyed by rank starting at 1.
///
/// The target itself (matched by name) is skipped. Equal distances keep the
/// order in which the cities appear in `locations`. When fewer than `k`
/// other cities exist the result is truncated to all of them.
#[must_use]
pub fn nearest_cities(
    target: &CityLocation,
    locations: &[CityLocation],
    k: usize,
) -> BTreeMap<usize, String> {
    let origin = location_point(target);

    let mut distances: Vec<(&str, f64)> = locations
        .iter()
        .filter(|other| other.name != target.name)
        .map(|other| {
            (
                other.name.as_str(),
                great_circle_km(origin, location_point(other)),
            )
        })
        .collect();

    // `sort_by` is stable, so ties keep encounter order.
    distances.sort_by(|a, b| a.1.total_cmp(&b.1));

    if distances.len() < k {
        log::debug!(
            "Only {} neighbors available for {} (requested {k})",
            distances.len(),
            target.name
        );
    }

    distances
        .into_iter()
        .take(k)
        .enumerate()
        .map(|(i, (name, _))| (i + 1, name.to_string()))
        .collect()
}
