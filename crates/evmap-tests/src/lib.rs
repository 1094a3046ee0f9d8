//! End-to-end tests for availability detection
//!
//! The tests in `tests/` run the real detectors and orchestrator against
//! mock NewMotion and Chargecloud servers served by
//! [`evmap_detectors::testing::TestServer`]. No network access is needed.
//!
//! # Test Structure
//!
//! - `availability_e2e_test.rs` - fallback chain across both networks
//! - `newmotion_e2e_test.rs` - marker search, site combining, power derivation
//! - `chargecloud_e2e_test.rs` - nearest site selection and search radius
//!
//! This library holds the mock network APIs shared by those tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use evmap_core::Coordinate;
use serde_json::{json, Value};

/// Request counter shared between a mock router and the test
#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Router that answers every request with `status`
pub fn failing_router(status: StatusCode) -> Router {
    Router::new().fallback(move || async move { status })
}

// =============================================================================
// NewMotion
// =============================================================================

/// Mock NewMotion map API
#[derive(Clone, Default)]
pub struct MockNewMotion {
    markers: Vec<Value>,
    locations: HashMap<i64, Value>,
    hits: Hits,
}

impl MockNewMotion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a marker at `at` whose location details hold `evses`
    pub fn with_site(mut self, uid: i64, at: Coordinate, evses: Vec<Value>) -> Self {
        self.markers.push(json!({
            "locationUid": uid,
            "coordinates": {"latitude": at.lat, "longitude": at.lng}
        }));
        self.locations
            .insert(uid, json!({"uid": uid, "evses": evses}));
        self
    }

    pub fn hits(&self) -> Hits {
        self.hits.clone()
    }

    pub fn router(self) -> Router {
        Router::new()
            .route(
                "/markers/{lng_min}/{lng_max}/{lat_min}/{lat_max}/{zoom}",
                get(nm_markers),
            )
            .route("/locations/{uid}", get(nm_location))
            .with_state(Arc::new(self))
    }
}

async fn nm_markers(State(mock): State<Arc<MockNewMotion>>) -> Json<Value> {
    mock.hits.record();
    Json(Value::Array(mock.markers.clone()))
}

async fn nm_location(
    State(mock): State<Arc<MockNewMotion>>,
    Path(uid): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    mock.hits.record();
    mock.locations
        .get(&uid)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// A NewMotion connector with explicit electrical properties
pub fn nm_connector(
    uid: i64,
    connector_type: &str,
    power_type: &str,
    voltage: f64,
    amperage: f64,
) -> Value {
    json!({
        "uid": uid,
        "connectorType": connector_type,
        "electricalProperties": {
            "powerType": power_type,
            "voltage": voltage,
            "amperage": amperage
        }
    })
}

/// A NewMotion DC connector that reports its maximum power in kW
pub fn nm_dc_connector(uid: i64, connector_type: &str, max_power: f64) -> Value {
    json!({
        "uid": uid,
        "connectorType": connector_type,
        "electricalProperties": {
            "powerType": "DC",
            "voltage": 400,
            "amperage": 125,
            "maxElectricPower": max_power
        }
    })
}

pub fn nm_evse(status: &str, connectors: Vec<Value>) -> Value {
    json!({"status": status, "connectors": connectors})
}

// =============================================================================
// Chargecloud
// =============================================================================

/// Mock Chargecloud app API for a single operator
#[derive(Clone)]
pub struct MockChargecloud {
    operator_id: String,
    sites: Vec<Value>,
    hits: Hits,
}

impl MockChargecloud {
    pub fn new(operator_id: &str) -> Self {
        Self {
            operator_id: operator_id.to_string(),
            sites: Vec::new(),
            hits: Hits::default(),
        }
    }

    pub fn with_site(mut self, id: &str, at: Coordinate, evses: Vec<Value>) -> Self {
        self.sites.push(json!({
            "id": id,
            "coordinates": {"latitude": at.lat, "longitude": at.lng},
            "evses": evses
        }));
        self
    }

    pub fn hits(&self) -> Hits {
        self.hits.clone()
    }

    pub fn router(self) -> Router {
        Router::new()
            .route("/{operator}/app/2.0/locations", get(cc_locations))
            .with_state(Arc::new(self))
    }
}

async fn cc_locations(
    State(mock): State<Arc<MockChargecloud>>,
    Path(operator): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    mock.hits.record();
    if operator != mock.operator_id {
        return Json(json!({"status": "ERROR", "message": "unknown operator"}));
    }
    if !["latitude", "longitude", "radius"]
        .iter()
        .all(|k| query.contains_key(*k))
    {
        return Json(json!({"status": "ERROR", "message": "missing position"}));
    }
    Json(json!({"status": "SUCCESS", "data": mock.sites}))
}

pub fn cc_connector(id: &str, standard: &str, max_power: f64) -> Value {
    json!({"id": id, "standard": standard, "max_power": max_power})
}

pub fn cc_evse(id: &str, status: &str, connectors: Vec<Value>) -> Value {
    json!({"id": id, "status": status, "connectors": connectors})
}
