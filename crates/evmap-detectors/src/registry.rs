//! Detector registry - builds the priority-ordered detector list

use std::sync::Arc;

use evmap_core::{AvailabilityDetector, DetectorResult};
use tracing::info;

use crate::chargecloud::ChargecloudDetector;
use crate::config::DetectorsConfig;
use crate::http::HttpClient;
use crate::newmotion::NewMotionDetector;

/// Build all configured detectors, highest priority first.
///
/// NewMotion comes first when enabled, followed by the Chargecloud
/// operators in configuration order. A single HTTP client is created here
/// and shared by every detector for the life of the process.
pub fn build_detectors(
    config: &DetectorsConfig,
) -> DetectorResult<Vec<Arc<dyn AvailabilityDetector>>> {
    let http = HttpClient::new(&config.http)?;
    Ok(build_detectors_with_client(config, &http))
}

/// Same as [`build_detectors`] with an existing client
pub fn build_detectors_with_client(
    config: &DetectorsConfig,
    http: &HttpClient,
) -> Vec<Arc<dyn AvailabilityDetector>> {
    let mut detectors: Vec<Arc<dyn AvailabilityDetector>> = Vec::new();

    if config.newmotion.enabled {
        detectors.push(Arc::new(NewMotionDetector::new(
            http.clone(),
            &config.newmotion.base_url,
        )));
    }

    for operator in &config.chargecloud {
        detectors.push(Arc::new(ChargecloudDetector::new(
            http.clone(),
            &operator.name,
            &operator.base_url,
            &operator.operator_id,
        )));
    }

    info!(
        detectors = ?detectors.iter().map(|d| d.name()).collect::<Vec<_>>(),
        "Registered availability detectors"
    );
    detectors
}
