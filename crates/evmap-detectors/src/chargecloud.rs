//! Chargecloud availability detector
//!
//! Chargecloud hosts an OCPI-like app API per operator (municipal utilities
//! and similar). One detector instance serves one operator id.

use std::collections::BTreeMap;

use async_trait::async_trait;
use evmap_core::{
    match_chargepoints, plug, resolve_statuses, AvailabilityDetector, ChargeLocation,
    ChargeLocationStatus, ChargepointStatus, Coordinate, DetectorError, DetectorResult,
    RawConnector, SEARCH_RADIUS_M,
};
use serde::Deserialize;
use tracing::info;
use url::Url;

use crate::http::{endpoint, HttpClient};

#[derive(Debug, Deserialize)]
struct CcResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Vec<CcLocation>,
}

#[derive(Debug, Deserialize)]
struct CcLocation {
    id: String,
    coordinates: CcCoordinates,
    evses: Vec<CcEvse>,
}

#[derive(Debug, Deserialize)]
struct CcCoordinates {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct CcEvse {
    id: String,
    status: String,
    connectors: Vec<CcConnector>,
}

#[derive(Debug, Deserialize)]
struct CcConnector {
    id: String,
    standard: String,
    /// kW
    max_power: f64,
}

impl CcLocation {
    fn position(&self) -> Coordinate {
        Coordinate::new(self.coordinates.latitude, self.coordinates.longitude)
    }
}

fn plug_type(standard: &str) -> DetectorResult<&'static str> {
    Ok(match standard {
        "IEC_62196_T1" => plug::TYPE_1,
        "IEC_62196_T2" => plug::TYPE_2,
        "IEC_62196_T1_COMBO" | "IEC_62196_T2_COMBO" => plug::CCS,
        "DOMESTIC_F" => plug::SCHUKO,
        "CHADEMO" => plug::CHADEMO,
        other => {
            return Err(DetectorError::protocol(format!(
                "unrecognized connector standard {}",
                other
            )))
        }
    })
}

fn evse_status(status: &str) -> ChargepointStatus {
    match status {
        "AVAILABLE" => ChargepointStatus::Available,
        "BLOCKED" | "RESERVED" => ChargepointStatus::Occupied,
        "CHARGING" => ChargepointStatus::Charging,
        "INOPERATIVE" | "OUTOFORDER" | "REMOVED" => ChargepointStatus::Faulted,
        _ => ChargepointStatus::Unknown,
    }
}

/// Availability from one Chargecloud operator
pub struct ChargecloudDetector {
    http: HttpClient,
    name: String,
    base_url: String,
    operator_id: String,
}

impl ChargecloudDetector {
    pub fn new(http: HttpClient, name: &str, base_url: &str, operator_id: &str) -> Self {
        Self {
            http,
            name: name.to_string(),
            base_url: base_url.to_string(),
            operator_id: operator_id.to_string(),
        }
    }

    fn locations_url(&self, around: &Coordinate) -> DetectorResult<Url> {
        let mut url = endpoint(
            &self.base_url,
            &format!("{}/app/2.0/locations", self.operator_id),
        )?;
        url.query_pairs_mut()
            .append_pair("latitude", &around.lat.to_string())
            .append_pair("longitude", &around.lng.to_string())
            .append_pair("radius", &SEARCH_RADIUS_M.to_string());
        Ok(url)
    }
}

#[async_trait]
impl AvailabilityDetector for ChargecloudDetector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_availability(
        &self,
        location: &ChargeLocation,
    ) -> DetectorResult<ChargeLocationStatus> {
        let target = location.coordinates;
        let response: CcResponse = self.http.get_json(self.locations_url(&target)?).await?;

        if response.status != "SUCCESS" {
            return Err(DetectorError::protocol(format!(
                "invalid status {}: {}",
                response.status,
                response.message.unwrap_or_default()
            )));
        }

        let site = response
            .data
            .iter()
            .min_by(|a, b| {
                a.position()
                    .distance_to(&target)
                    .total_cmp(&b.position().distance_to(&target))
            })
            .ok_or_else(|| DetectorError::protocol("no candidates found"))?;
        if site.position().distance_to(&target) > SEARCH_RADIUS_M {
            return Err(DetectorError::protocol("no candidates found"));
        }

        // Connector ids are only unique within their EVSE
        let mut connectors = BTreeMap::new();
        let mut states = BTreeMap::new();
        for evse in &site.evses {
            let state = evse_status(&evse.status);
            for connector in &evse.connectors {
                let id = format!("{}/{}", evse.id, connector.id);
                let kind = plug_type(&connector.standard)?;
                connectors.insert(id.clone(), RawConnector::new(connector.max_power, kind));
                states.insert(id, state);
            }
        }

        let matched = match_chargepoints(&connectors, &location.chargepoints)?;
        info!(
            detector = %self.name,
            location_id = location.id,
            site = %site.id,
            "Matched Chargecloud connectors"
        );

        Ok(ChargeLocationStatus::new(
            resolve_statuses(matched, &states),
            self.name.as_str(),
        ))
    }
}
