//! Live status models

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::Chargepoint;
use crate::plug;

/// State of a single physical socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargepointStatus {
    Available,
    Unknown,
    Charging,
    Occupied,
    Faulted,
}

impl ChargepointStatus {
    /// All states, in display order
    pub const ALL: [ChargepointStatus; 5] = [
        ChargepointStatus::Available,
        ChargepointStatus::Unknown,
        ChargepointStatus::Charging,
        ChargepointStatus::Occupied,
        ChargepointStatus::Faulted,
    ];
}

impl std::fmt::Display for ChargepointStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChargepointStatus::Available => "available",
            ChargepointStatus::Unknown => "unknown",
            ChargepointStatus::Charging => "charging",
            ChargepointStatus::Occupied => "occupied",
            ChargepointStatus::Faulted => "faulted",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ChargepointStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "available" => Ok(ChargepointStatus::Available),
            "unknown" => Ok(ChargepointStatus::Unknown),
            "charging" => Ok(ChargepointStatus::Charging),
            "occupied" => Ok(ChargepointStatus::Occupied),
            "faulted" => Ok(ChargepointStatus::Faulted),
            _ => Err(format!("Unknown chargepoint status: '{}'", s)),
        }
    }
}

/// Live status of a location, one entry per canonical chargepoint.
///
/// Each status sequence holds one value per socket; its length should
/// equal the chargepoint's `count` but is not re-validated here.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeLocationStatus {
    pub status: HashMap<Chargepoint, Vec<ChargepointStatus>>,
    /// Name of the detector that produced this status
    pub source: String,
}

impl ChargeLocationStatus {
    pub fn new(
        status: HashMap<Chargepoint, Vec<ChargepointStatus>>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            status,
            source: source.into(),
        }
    }

    /// Keep only chargepoints matching the given plug types and minimum power.
    ///
    /// `connectors` is expanded to the equivalence classes of its members.
    /// `min_power` is exclusive. `None` leaves that axis unrestricted.
    pub fn apply_filters(
        &self,
        connectors: Option<&BTreeSet<String>>,
        min_power: Option<f64>,
    ) -> ChargeLocationStatus {
        let allowed: Option<BTreeSet<String>> = connectors.map(|types| {
            types
                .iter()
                .flat_map(|t| plug::equivalent_plug_types(t))
                .collect()
        });

        let status = self
            .status
            .iter()
            .filter(|(cp, _)| {
                allowed
                    .as_ref()
                    .map_or(true, |types| types.contains(&cp.plug_type))
                    && min_power.map_or(true, |min| cp.power > min)
            })
            .map(|(cp, s)| (cp.clone(), s.clone()))
            .collect();

        ChargeLocationStatus {
            status,
            source: self.source.clone(),
        }
    }

    /// Total number of sockets across all chargepoints
    pub fn total_chargepoints(&self) -> u32 {
        self.status.keys().map(|cp| cp.count).sum()
    }

    /// Number of sockets currently in `state`
    pub fn count_by_status(&self, state: ChargepointStatus) -> usize {
        self.status
            .values()
            .flatten()
            .filter(|s| **s == state)
            .count()
    }

    /// Entries ordered by plug type, then power
    pub fn entries(&self) -> Vec<(&Chargepoint, &[ChargepointStatus])> {
        let mut entries: Vec<_> = self
            .status
            .iter()
            .map(|(cp, s)| (cp, s.as_slice()))
            .collect();
        entries.sort_by(|a, b| {
            a.0.plug_type
                .cmp(&b.0.plug_type)
                .then(a.0.power.total_cmp(&b.0.power))
        });
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ChargepointStatus::*;

    fn sample() -> ChargeLocationStatus {
        let mut status = HashMap::new();
        status.insert(Chargepoint::new("Type2", 22.0, 2), vec![Available, Charging]);
        status.insert(Chargepoint::new("CCS", 50.0, 1), vec![Faulted]);
        status.insert(Chargepoint::new("CCS", 150.0, 2), vec![Available, Available]);
        ChargeLocationStatus::new(status, "test")
    }

    #[test]
    fn test_no_filters_is_identity() {
        let status = sample();
        assert_eq!(status.apply_filters(None, None), status);
    }

    #[test]
    fn test_filter_by_type() {
        let types: BTreeSet<String> = ["Type2".to_string()].into();
        let filtered = sample().apply_filters(Some(&types), None);
        assert_eq!(filtered.status.len(), 1);
        assert!(filtered.status.keys().all(|cp| cp.plug_type == "Type2"));
        assert_eq!(filtered.source, "test");
    }

    #[test]
    fn test_filter_by_equivalent_type() {
        let types: BTreeSet<String> = ["Typ2".to_string()].into();
        let filtered = sample().apply_filters(Some(&types), None);
        assert_eq!(filtered.total_chargepoints(), 2);
    }

    #[test]
    fn test_min_power_is_exclusive() {
        let filtered = sample().apply_filters(None, Some(50.0));
        assert_eq!(filtered.status.len(), 1);
        assert!(filtered.status.contains_key(&Chargepoint::new("CCS", 150.0, 2)));
    }

    #[test]
    fn test_empty_type_filter_removes_all() {
        let types = BTreeSet::new();
        let filtered = sample().apply_filters(Some(&types), None);
        assert!(filtered.status.is_empty());
        assert_eq!(filtered.total_chargepoints(), 0);
    }

    #[test]
    fn test_totals() {
        let status = sample();
        assert_eq!(status.total_chargepoints(), 5);
        assert_eq!(status.count_by_status(Available), 3);
        assert_eq!(status.count_by_status(Occupied), 0);
    }

    #[test]
    fn test_entries_sorted() {
        let status = sample();
        let order: Vec<String> = status.entries().iter().map(|(cp, _)| cp.to_string()).collect();
        assert_eq!(
            order,
            vec!["CCS 50 kW x1", "CCS 150 kW x2", "Type2 22 kW x2"]
        );
    }

    #[test]
    fn test_status_roundtrip_names() {
        for state in ChargepointStatus::ALL {
            assert_eq!(state.to_string().parse::<ChargepointStatus>(), Ok(state));
        }
        assert_eq!(
            serde_json::to_string(&Available).unwrap(),
            "\"AVAILABLE\""
        );
    }
}
