//! AvailabilityDetector trait - the abstraction over external charger networks

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;

use crate::error::DetectorResult;
use crate::matcher::ChargepointMatch;
use crate::models::{ChargeLocation, ChargeLocationStatus, Chargepoint, ChargepointStatus};

/// Maximum distance in meters between a location and a network's station
/// for the two to be treated as the same site.
pub const SEARCH_RADIUS_M: f64 = 150.0;

/// Fetches live status for a location from one external network.
///
/// Implementations fetch raw data in their network's wire format,
/// translate each connector's power and plug type, run the matcher and
/// map the network's connector states onto [`ChargepointStatus`].
/// A failed attempt is final for that call; fallback across networks
/// is the orchestrator's job.
///
/// [`ChargepointStatus`]: crate::models::ChargepointStatus
#[async_trait]
pub trait AvailabilityDetector: Send + Sync {
    /// Source tag reported in [`ChargeLocationStatus::source`]
    fn name(&self) -> &str;

    /// Get live availability for a location
    async fn get_availability(&self, location: &ChargeLocation)
        -> DetectorResult<ChargeLocationStatus>;
}

/// Pick the chargepoint of `plug_type` that matches `power`.
///
/// With a single chargepoint of that type it is returned as is. With
/// several, only those with exactly `power` are considered, unless
/// `power` is not positive. There is no nearest-power fallback.
pub fn corresponding_chargepoint<'a>(
    chargepoints: impl IntoIterator<Item = &'a Chargepoint>,
    plug_type: &str,
    power: f64,
) -> Option<&'a Chargepoint> {
    let of_type: Vec<&Chargepoint> = chargepoints
        .into_iter()
        .filter(|cp| cp.plug_type == plug_type)
        .collect();

    if of_type.len() > 1 && power > 0.0 {
        of_type.into_iter().find(|cp| cp.power == power)
    } else {
        of_type.into_iter().next()
    }
}

/// Translate a matcher result into per-socket states.
///
/// Ids are visited in ascending order; an id without a reported state
/// becomes `Unknown`.
pub fn resolve_statuses<K: Ord>(
    matched: ChargepointMatch<K>,
    states: &BTreeMap<K, ChargepointStatus>,
) -> HashMap<Chargepoint, Vec<ChargepointStatus>> {
    matched
        .into_iter()
        .map(|(cp, ids)| {
            let sockets = ids
                .iter()
                .map(|id| states.get(id).copied().unwrap_or(ChargepointStatus::Unknown))
                .collect();
            (cp, sockets)
        })
        .collect()
}
