//! NewMotion (Shell Recharge) availability detector
//!
//! The map API is queried in two steps: markers in a small bounding box
//! around the location, then the details of every marker close to the
//! nearest one. Sites are sometimes split into several markers a few
//! meters apart, so all of them are combined before matching.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use evmap_core::{
    match_chargepoints, plug, resolve_statuses, AvailabilityDetector, ChargeLocation,
    ChargeLocationStatus, ChargepointStatus, Coordinate, DetectorError, DetectorResult,
    RawConnector, SEARCH_RADIUS_M,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::http::{endpoint, HttpClient};

pub const SOURCE: &str = "newmotion";

/// Half edge length of the marker bounding box, in degrees
const COORD_RADIUS_DEG: f64 = 0.005;
/// Zoom level passed to the marker endpoint (no clustering)
const MARKER_ZOOM: u32 = 22;
/// Markers this close to the nearest one belong to the same site
const COMBINE_RADIUS_M: f64 = 60.0;

// =========================================================================
// Wire format
// =========================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NmMarker {
    location_uid: i64,
    coordinates: NmCoordinates,
}

#[derive(Debug, Deserialize)]
struct NmCoordinates {
    latitude: f64,
    longitude: f64,
}

impl NmMarker {
    fn position(&self) -> Coordinate {
        Coordinate::new(self.coordinates.latitude, self.coordinates.longitude)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NmLocation {
    evses: Vec<NmEvse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NmEvse {
    status: String,
    connectors: Vec<NmConnector>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NmConnector {
    uid: i64,
    connector_type: String,
    electrical_properties: NmElectricalProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NmElectricalProperties {
    power_type: String,
    voltage: f64,
    amperage: f64,
    /// kW, not always present
    #[serde(default)]
    max_electric_power: Option<f64>,
}

impl NmElectricalProperties {
    /// Power in kW
    fn power(&self) -> f64 {
        if let Some(power) = self.max_electric_power.filter(|p| *p > 0.0) {
            return power;
        }
        // 277 V is the US phase voltage, reported for European 3-phase sites
        let voltage = if self.voltage == 277.0 {
            230.0
        } else {
            self.voltage
        };
        let phases = if self.power_type == "AC3Phase" { 3.0 } else { 1.0 };
        (voltage * self.amperage * phases / 1000.0).round()
    }
}

fn plug_type(connector_type: &str) -> DetectorResult<&'static str> {
    Ok(match connector_type {
        "Type1" => plug::TYPE_1,
        "Type2" => plug::TYPE_2,
        "Type3" => plug::TYPE_3,
        "Domestic" => plug::SCHUKO,
        "Type2Combo" => plug::CCS,
        "TepcoCHAdeMO" => plug::CHADEMO,
        "Tesla" => plug::SUPERCHARGER,
        other => {
            return Err(DetectorError::protocol(format!(
                "unrecognized connector type {}",
                other
            )))
        }
    })
}

fn connector_status(status: &str) -> ChargepointStatus {
    match status {
        "Available" => ChargepointStatus::Available,
        "Occupied" => ChargepointStatus::Charging,
        "Unavailable" => ChargepointStatus::Faulted,
        _ => ChargepointStatus::Unknown,
    }
}

// =========================================================================
// Detector
// =========================================================================

/// Availability from the NewMotion / Shell Recharge map API
pub struct NewMotionDetector {
    http: HttpClient,
    base_url: String,
}

impl NewMotionDetector {
    pub fn new(http: HttpClient, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }

    async fn markers(&self, around: &Coordinate) -> DetectorResult<Vec<NmMarker>> {
        let path = format!(
            "markers/{}/{}/{}/{}/{}",
            around.lng - COORD_RADIUS_DEG,
            around.lng + COORD_RADIUS_DEG,
            around.lat - COORD_RADIUS_DEG,
            around.lat + COORD_RADIUS_DEG,
            MARKER_ZOOM
        );
        self.http.get_json(endpoint(&self.base_url, &path)?).await
    }

    async fn location(&self, uid: i64) -> DetectorResult<NmLocation> {
        let path = format!("locations/{}", uid);
        self.http.get_json(endpoint(&self.base_url, &path)?).await
    }
}

#[async_trait]
impl AvailabilityDetector for NewMotionDetector {
    fn name(&self) -> &str {
        SOURCE
    }

    async fn get_availability(
        &self,
        location: &ChargeLocation,
    ) -> DetectorResult<ChargeLocationStatus> {
        let target = location.coordinates;
        let markers = self.markers(&target).await?;

        let nearest = markers
            .iter()
            .map(|m| m.position())
            .min_by(|a, b| a.distance_to(&target).total_cmp(&b.distance_to(&target)))
            .ok_or_else(|| DetectorError::protocol("no candidates found"))?;
        if nearest.distance_to(&target) > SEARCH_RADIUS_M {
            return Err(DetectorError::protocol("no candidates found"));
        }

        let mut connectors = BTreeMap::new();
        let mut states = BTreeMap::new();

        let uids: BTreeSet<i64> = markers
            .iter()
            .filter(|m| m.position().distance_to(&nearest) < COMBINE_RADIUS_M)
            .map(|m| m.location_uid)
            .collect();

        for uid in uids {
            debug!(location_uid = uid, "Fetching NewMotion location");
            let details = self.location(uid).await?;
            for evse in &details.evses {
                let state = connector_status(&evse.status);
                for connector in &evse.connectors {
                    let kind = plug_type(&connector.connector_type)?;
                    let power = connector.electrical_properties.power();
                    if connectors
                        .insert(connector.uid, RawConnector::new(power, kind))
                        .is_some()
                    {
                        return Err(DetectorError::protocol(format!(
                            "duplicate connector uid {}",
                            connector.uid
                        )));
                    }
                    states.insert(connector.uid, state);
                }
            }
        }

        let matched = match_chargepoints(&connectors, &location.chargepoints)?;
        info!(
            location_id = location.id,
            connectors = connectors.len(),
            "Matched NewMotion connectors"
        );

        Ok(ChargeLocationStatus::new(
            resolve_statuses(matched, &states),
            SOURCE,
        ))
    }
}
