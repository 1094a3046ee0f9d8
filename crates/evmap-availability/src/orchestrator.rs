//! Orchestrator - walks the detector list until one succeeds

use std::sync::Arc;

use evmap_core::{AvailabilityDetector, ChargeLocation, ChargeLocationStatus, DetectorError};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Why no availability could be determined
#[derive(Debug, Error)]
pub enum LookupError {
    /// The detector list is empty
    #[error("No availability detectors configured")]
    NoDetectors,

    /// Every detector failed; carries the last failure
    #[error("All availability detectors failed, last error: {0}")]
    AllFailed(#[source] DetectorError),
}

impl LookupError {
    /// Diagnostic message for the caller, if any detector ran
    pub fn message(&self) -> Option<String> {
        match self {
            LookupError::NoDetectors => None,
            LookupError::AllFailed(e) => Some(e.to_string()),
        }
    }
}

/// Fallback chain over availability detectors.
///
/// Detectors run strictly one after another, in the order they were
/// registered. The first success wins; the rest are never contacted.
#[derive(Clone, Default)]
pub struct Orchestrator {
    detectors: Vec<Arc<dyn AvailabilityDetector>>,
}

impl Orchestrator {
    /// Create an orchestrator over `detectors`, highest priority first
    pub fn new(detectors: Vec<Arc<dyn AvailabilityDetector>>) -> Self {
        Self { detectors }
    }

    /// Append a detector with the lowest priority so far
    pub fn register_detector(&mut self, detector: Arc<dyn AvailabilityDetector>) {
        info!(detector = %detector.name(), "Registering availability detector");
        self.detectors.push(detector);
    }

    /// Detector names in priority order
    pub fn detector_names(&self) -> Vec<String> {
        self.detectors.iter().map(|d| d.name().to_string()).collect()
    }

    /// Get live availability for `location` from the first detector that
    /// can provide it.
    pub async fn get_availability(
        &self,
        location: &ChargeLocation,
    ) -> Result<ChargeLocationStatus, LookupError> {
        let mut last_error = None;

        for detector in &self.detectors {
            debug!(detector = %detector.name(), location_id = location.id, "Trying detector");
            match detector.get_availability(location).await {
                Ok(status) => {
                    info!(
                        detector = %detector.name(),
                        location_id = location.id,
                        sockets = status.total_chargepoints(),
                        "Availability found"
                    );
                    return Ok(status);
                }
                Err(e) => {
                    warn!(
                        detector = %detector.name(),
                        location_id = location.id,
                        kind = e.kind(),
                        error = %e,
                        "Detector failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.map_or(LookupError::NoDetectors, LookupError::AllFailed))
    }

    /// Run a lookup as its own task on the current runtime.
    ///
    /// Aborting the handle cancels any request in flight.
    pub fn spawn_lookup(
        &self,
        location: ChargeLocation,
    ) -> JoinHandle<Result<ChargeLocationStatus, LookupError>> {
        let orchestrator = self.clone();
        tokio::spawn(async move { orchestrator.get_availability(&location).await })
    }
}
