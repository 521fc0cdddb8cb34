//! Haversine distance on a spherical Earth.

use crime_link_profile_models::CityLocation;
use geo::Point;

/// Sphere radius used for all distances, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers.
///
/// Points are `(lon, lat)` in degrees. `NaN` coordinates produce `NaN`.
#[must_use]
pub fn great_circle_km(a: Point<f64>, b: Point<f64>) -> f64 {
    let lat1 = a.y().to_radians();
    let lat2 = b.y().to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.x() - a.x()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * h.sqrt().asin() * EARTH_RADIUS_KM
}

/// Converts a city location into a `geo` point.
#[must_use]
pub fn location_point(location: &CityLocation) -> Point<f64> {
    Point::new(location.lon, location.lat)
}
