//! End-to-end tests for the availability fallback chain
//!
//! Detectors are built from a `DetectorsConfig` pointing at mock servers,
//! then driven through the `Orchestrator` exactly as the CLI does.

use std::collections::BTreeSet;

use axum::http::StatusCode;
use evmap_availability::{LookupError, Orchestrator};
use evmap_core::{ChargeLocation, Chargepoint, ChargepointStatus, Coordinate, DetectorError};
use evmap_detectors::testing::TestServer;
use evmap_detectors::{build_detectors, ChargecloudConfig, DetectorsConfig};
use evmap_tests::{
    cc_connector, cc_evse, failing_router, nm_connector, nm_dc_connector, nm_evse,
    MockChargecloud, MockNewMotion,
};
use pretty_assertions::assert_eq;

const OPERATOR: &str = "606a0da0dfdd338ee4134605653d4fd8";

fn site() -> Coordinate {
    Coordinate::new(50.1109, 8.6821)
}

fn location() -> ChargeLocation {
    ChargeLocation {
        id: 4711,
        name: "Parkhaus Mitte".to_string(),
        coordinates: site(),
        chargepoints: vec![
            Chargepoint::new("CCS", 50.0, 2),
            Chargepoint::new("Typ2", 22.0, 2),
        ],
    }
}

fn newmotion_site() -> MockNewMotion {
    MockNewMotion::new().with_site(
        1001,
        site(),
        vec![
            nm_evse("Available", vec![nm_dc_connector(1, "Type2Combo", 50.0)]),
            nm_evse("Occupied", vec![nm_dc_connector(2, "Type2Combo", 50.0)]),
            nm_evse(
                "Available",
                vec![nm_connector(3, "Type2", "AC3Phase", 230.0, 32.0)],
            ),
            nm_evse(
                "Unavailable",
                vec![nm_connector(4, "Type2", "AC3Phase", 230.0, 32.0)],
            ),
        ],
    )
}

fn chargecloud_site() -> MockChargecloud {
    MockChargecloud::new(OPERATOR).with_site(
        "DE*MAI*1",
        site(),
        vec![
            cc_evse(
                "E1",
                "CHARGING",
                vec![cc_connector("1", "IEC_62196_T2_COMBO", 50.0)],
            ),
            cc_evse(
                "E2",
                "CHARGING",
                vec![cc_connector("1", "IEC_62196_T2_COMBO", 50.0)],
            ),
            cc_evse("E3", "AVAILABLE", vec![cc_connector("1", "IEC_62196_T2", 22.0)]),
            cc_evse("E4", "RESERVED", vec![cc_connector("1", "IEC_62196_T2", 22.0)]),
        ],
    )
}

fn config(newmotion: Option<&TestServer>, chargecloud: Option<&TestServer>) -> DetectorsConfig {
    let mut config = DetectorsConfig::default();
    match newmotion {
        Some(server) => config.newmotion.base_url = server.base_url(),
        None => config.newmotion.enabled = false,
    }
    if let Some(server) = chargecloud {
        config.chargecloud.push(ChargecloudConfig {
            name: "Maingau".to_string(),
            operator_id: OPERATOR.to_string(),
            base_url: server.base_url(),
        });
    }
    config
}

fn orchestrator(config: &DetectorsConfig) -> Orchestrator {
    Orchestrator::new(build_detectors(config).unwrap())
}

fn sorted(states: &[ChargepointStatus]) -> Vec<String> {
    let mut states: Vec<String> = states.iter().map(|s| s.to_string()).collect();
    states.sort();
    states
}

#[tokio::test]
async fn test_newmotion_answers_first() {
    let nm = newmotion_site();
    let nm_hits = nm.hits();
    let cc = chargecloud_site();
    let cc_hits = cc.hits();
    let nm_server = TestServer::start(nm.router()).await.unwrap();
    let cc_server = TestServer::start(cc.router()).await.unwrap();

    let orchestrator = orchestrator(&config(Some(&nm_server), Some(&cc_server)));
    let status = orchestrator.get_availability(&location()).await.unwrap();

    assert_eq!(status.source, "newmotion");
    assert_eq!(status.total_chargepoints(), 4);

    let ccs = &status.status[&Chargepoint::new("CCS", 50.0, 2)];
    assert_eq!(sorted(ccs), vec!["available", "charging"]);
    let typ2 = &status.status[&Chargepoint::new("Typ2", 22.0, 2)];
    assert_eq!(sorted(typ2), vec!["available", "faulted"]);

    // markers + one location lookup, Chargecloud never contacted
    assert_eq!(nm_hits.count(), 2);
    assert_eq!(cc_hits.count(), 0);
}

#[tokio::test]
async fn test_falls_back_when_newmotion_is_down() {
    let cc = chargecloud_site();
    let nm_server = TestServer::start(failing_router(StatusCode::SERVICE_UNAVAILABLE))
        .await
        .unwrap();
    let cc_server = TestServer::start(cc.router()).await.unwrap();

    let orchestrator = orchestrator(&config(Some(&nm_server), Some(&cc_server)));
    let status = orchestrator.get_availability(&location()).await.unwrap();

    assert_eq!(status.source, "Maingau");
    assert_eq!(status.count_by_status(ChargepointStatus::Charging), 2);
    assert_eq!(status.count_by_status(ChargepointStatus::Available), 1);
    assert_eq!(status.count_by_status(ChargepointStatus::Occupied), 1);
}

#[tokio::test]
async fn test_falls_back_on_mismatch() {
    // NewMotion lists a CHAdeMO socket where the location has CCS
    let nm = MockNewMotion::new().with_site(
        1001,
        site(),
        vec![
            nm_evse("Available", vec![nm_dc_connector(1, "TepcoCHAdeMO", 50.0)]),
            nm_evse("Available", vec![nm_dc_connector(2, "TepcoCHAdeMO", 50.0)]),
            nm_evse(
                "Available",
                vec![nm_connector(3, "Type2", "AC3Phase", 230.0, 32.0)],
            ),
            nm_evse(
                "Available",
                vec![nm_connector(4, "Type2", "AC3Phase", 230.0, 32.0)],
            ),
        ],
    );
    let nm_server = TestServer::start(nm.router()).await.unwrap();
    let cc_server = TestServer::start(chargecloud_site().router()).await.unwrap();

    let orchestrator = orchestrator(&config(Some(&nm_server), Some(&cc_server)));
    let status = orchestrator.get_availability(&location()).await.unwrap();

    assert_eq!(status.source, "Maingau");
}

#[tokio::test]
async fn test_all_detectors_fail() {
    let nm_server = TestServer::start(MockNewMotion::new().router()).await.unwrap();
    // Configured operator id is unknown to this server
    let cc_server = TestServer::start(MockChargecloud::new("other").router())
        .await
        .unwrap();

    let orchestrator = orchestrator(&config(Some(&nm_server), Some(&cc_server)));
    let err = orchestrator.get_availability(&location()).await.unwrap_err();

    match &err {
        LookupError::AllFailed(DetectorError::Protocol(msg)) => {
            assert!(msg.contains("invalid status ERROR"), "{}", msg);
            assert!(msg.contains("unknown operator"), "{}", msg);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.message().is_some());
}

#[tokio::test]
async fn test_no_detectors_configured() {
    let orchestrator = orchestrator(&config(None, None));

    let err = orchestrator.get_availability(&location()).await.unwrap_err();

    assert!(matches!(err, LookupError::NoDetectors));
    assert_eq!(err.message(), None);
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let nm_server = TestServer::start(MockNewMotion::new().router()).await.unwrap();
    let config = config(Some(&nm_server), None);
    nm_server.shutdown().await;

    let err = orchestrator(&config)
        .get_availability(&location())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LookupError::AllFailed(DetectorError::Transport(_))
    ));
}

#[tokio::test]
async fn test_spawned_lookup_and_filters() {
    let nm_server = TestServer::start(newmotion_site().router()).await.unwrap();
    let orchestrator = orchestrator(&config(Some(&nm_server), None));

    let status = orchestrator
        .spawn_lookup(location())
        .await
        .unwrap()
        .unwrap();

    let type2 = BTreeSet::from(["Type 2".to_string()]);
    let filtered = status.apply_filters(Some(&type2), None);
    assert_eq!(filtered.total_chargepoints(), 2);
    assert!(filtered
        .status
        .keys()
        .all(|cp| cp.plug_type == "Typ2"));

    let fast = status.apply_filters(None, Some(22.0));
    assert_eq!(
        fast.status.keys().cloned().collect::<Vec<_>>(),
        vec![Chargepoint::new("CCS", 50.0, 2)]
    );

    assert_eq!(status.apply_filters(None, None), status);
}
