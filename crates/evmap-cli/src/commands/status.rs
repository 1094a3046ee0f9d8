//! Status command - live availability for one charge location

use anyhow::{Context, Result};
use evmap_availability::Orchestrator;
use evmap_core::{ChargeLocation, ChargeLocationStatus, ChargepointStatus};
use evmap_detectors::{build_detectors, DetectorsConfig};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

use super::read_json;
use crate::output::{ChargepointRow, OutputContext};

/// Look up and print the live status of a location
pub async fn status(
    config: &DetectorsConfig,
    location_file: &Path,
    types: &[String],
    min_power: Option<f64>,
    ctx: &OutputContext,
) -> Result<()> {
    let location: ChargeLocation = read_json(location_file)?;
    debug!(location_id = location.id, name = %location.name, "Loaded location");

    let detectors = build_detectors(config).context("Failed to set up availability detectors")?;
    let orchestrator = Orchestrator::new(detectors);

    let status = orchestrator
        .get_availability(&location)
        .await
        .with_context(|| {
            format!(
                "No availability for location {} ({})",
                location.id, location.name
            )
        })?;

    let filter: BTreeSet<String> = types.iter().cloned().collect();
    let status = status.apply_filters((!filter.is_empty()).then_some(&filter), min_power);

    if status.status.is_empty() {
        ctx.info("No chargepoints match the filter");
        return Ok(());
    }

    ctx.print(&chargepoint_rows(&status));
    ctx.summary(&format!(
        "{} of {} sockets available (source: {})",
        status.count_by_status(ChargepointStatus::Available),
        status.total_chargepoints(),
        status.source
    ));
    Ok(())
}

fn chargepoint_rows(status: &ChargeLocationStatus) -> Vec<ChargepointRow> {
    status
        .entries()
        .into_iter()
        .map(|(cp, states)| {
            let count = |state: ChargepointStatus| states.iter().filter(|s| **s == state).count();
            ChargepointRow {
                plug_type: cp.plug_type.clone(),
                power: cp.power,
                count: cp.count,
                available: count(ChargepointStatus::Available),
                charging: count(ChargepointStatus::Charging),
                occupied: count(ChargepointStatus::Occupied),
                faulted: count(ChargepointStatus::Faulted),
                unknown: count(ChargepointStatus::Unknown),
            }
        })
        .collect()
}
