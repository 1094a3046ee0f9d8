//! Availability detectors for external charger networks
//!
//! Each detector implements [`AvailabilityDetector`] for one network:
//!
//! - [`NewMotionDetector`] - NewMotion / Shell Recharge map API
//! - [`ChargecloudDetector`] - Chargecloud app API, one instance per operator
//!
//! [`build_detectors`] turns a [`DetectorsConfig`] into the priority-ordered
//! list the orchestrator walks through.
//!
//! # Testing
//!
//! The `testing` module serves a mock network API for integration tests:
//!
//! ```rust,ignore
//! use evmap_detectors::testing::TestServer;
//!
//! let server = TestServer::start(router).await?;
//! let detector = NewMotionDetector::new(server.http().clone(), &server.base_url());
//! ```

pub mod chargecloud;
pub mod config;
mod http;
pub mod newmotion;
mod registry;
pub mod testing;

pub use chargecloud::ChargecloudDetector;
pub use config::{ChargecloudConfig, DetectorsConfig, HttpConfig, NewMotionConfig};
pub use http::HttpClient;
pub use newmotion::NewMotionDetector;
pub use registry::{build_detectors, build_detectors_with_client};

// Re-export core types for convenience
pub use evmap_core::{AvailabilityDetector, DetectorError, DetectorResult};
