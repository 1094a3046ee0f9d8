//! Chargepoint and connector models

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A group of identical sockets at a location, as reported by the aggregator.
///
/// Equality and hashing use the bit pattern of `power`, so a chargepoint
/// can key a map the same way it is compared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chargepoint {
    /// Plug type in the aggregator's vocabulary (e.g. "Typ2", "CCS")
    #[serde(rename = "type")]
    pub plug_type: String,
    /// Maximum power in kW
    pub power: f64,
    /// Number of physical sockets of this type and power
    pub count: u32,
}

impl Chargepoint {
    pub fn new(plug_type: impl Into<String>, power: f64, count: u32) -> Self {
        Self {
            plug_type: plug_type.into(),
            power,
            count,
        }
    }
}

impl PartialEq for Chargepoint {
    fn eq(&self, other: &Self) -> bool {
        self.plug_type == other.plug_type
            && self.power.to_bits() == other.power.to_bits()
            && self.count == other.count
    }
}

impl Eq for Chargepoint {}

impl Hash for Chargepoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.plug_type.hash(state);
        self.power.to_bits().hash(state);
        self.count.hash(state);
    }
}

impl std::fmt::Display for Chargepoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} kW x{}", self.plug_type, self.power, self.count)
    }
}

/// A single live connector as reported by an external network.
///
/// `plug_type` has already been translated by the detector, but may still
/// be any member of an equivalence class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawConnector {
    /// Power in kW
    pub power: f64,
    /// Plug type
    #[serde(rename = "type")]
    pub plug_type: String,
}

impl RawConnector {
    pub fn new(power: f64, plug_type: impl Into<String>) -> Self {
        Self {
            power,
            plug_type: plug_type.into(),
        }
    }
}
