//! Distance helpers for pairing network stations with locations

/// Mean earth radius in meters
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Haversine distance between two points given in degrees, in meters.
///
/// ```
/// # use evmap_core::geo::distance_between;
/// assert_eq!(distance_between(50.0, 8.0, 50.0, 8.0), 0.0);
/// ```
pub fn distance_between(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lng2 - lng1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}
