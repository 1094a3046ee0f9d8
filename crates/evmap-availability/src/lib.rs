//! evmap-availability - Live availability for a charge location
//!
//! This crate provides the [`Orchestrator`] that walks a priority-ordered
//! list of availability detectors and returns the first status any of them
//! can produce.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       Orchestrator                         │
//! │  - Tries detectors one after another                       │
//! │  - First success wins, later detectors are not contacted   │
//! │  - Reports the last failure when nothing matched           │
//! └─────────────────────────────┬──────────────────────────────┘
//!                               │
//!              ┌────────────────┼────────────────┐
//!              ▼                ▼                ▼
//!   ┌──────────────────┐ ┌──────────────┐ ┌──────────────┐
//!   │ NewMotionDetector│ │ Chargecloud  │ │ Chargecloud  │
//!   │                  │ │ (Maingau)    │ │ (SW Kiel)    │
//!   └──────────────────┘ └──────────────┘ └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use evmap_availability::Orchestrator;
//! use evmap_detectors::{build_detectors, DetectorsConfig};
//!
//! let orchestrator = Orchestrator::new(build_detectors(&DetectorsConfig::default())?);
//!
//! match orchestrator.get_availability(&location).await {
//!     Ok(status) => println!("{} sockets via {}", status.total_chargepoints(), status.source),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

mod orchestrator;

pub use orchestrator::{LookupError, Orchestrator};

// Re-export core types for convenience
pub use evmap_core::{
    AvailabilityDetector, ChargeLocation, ChargeLocationStatus, ChargepointStatus, DetectorError,
};
