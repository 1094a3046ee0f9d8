//! Charge location models

use serde::{Deserialize, Serialize};

use super::Chargepoint;
use crate::geo;

/// WGS84 coordinates in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to another coordinate in meters
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        geo::distance_between(self.lat, self.lng, other.lat, other.lng)
    }
}

/// A charging location as described by the aggregator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeLocation {
    /// Aggregator-assigned identifier
    pub id: i64,
    /// Human-readable name
    pub name: String,
    /// Position of the location
    pub coordinates: Coordinate,
    /// Canonical chargepoints, in aggregator order
    pub chargepoints: Vec<Chargepoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_from_json() {
        let json = r#"{
            "id": 40315,
            "name": "Rathausplatz",
            "coordinates": {"lat": 50.1, "lng": 8.6},
            "chargepoints": [
                {"type": "Typ2", "power": 22.0, "count": 2},
                {"type": "CCS", "power": 50.0, "count": 1}
            ]
        }"#;
        let location: ChargeLocation = serde_json::from_str(json).unwrap();
        assert_eq!(location.id, 40315);
        assert_eq!(location.chargepoints.len(), 2);
        assert_eq!(location.chargepoints[1].plug_type, "CCS");
    }
}
