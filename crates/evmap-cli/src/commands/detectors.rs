//! Detectors command - show the configured fallback chain

use anyhow::{Context, Result};
use evmap_availability::Orchestrator;
use evmap_detectors::{build_detectors, DetectorsConfig};

use crate::output::{DetectorRow, OutputContext};

/// List detectors in the order they are tried
pub fn detectors(config: &DetectorsConfig, ctx: &OutputContext) -> Result<()> {
    let orchestrator = Orchestrator::new(
        build_detectors(config).context("Failed to set up availability detectors")?,
    );

    let names = orchestrator.detector_names();
    if names.is_empty() {
        ctx.warn("No availability detectors configured");
        return Ok(());
    }

    let rows: Vec<DetectorRow> = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| DetectorRow {
            priority: i + 1,
            name,
        })
        .collect();

    ctx.print(&rows);
    Ok(())
}
