//! Match command - run the chargepoint matcher on a local file

use anyhow::{Context, Result};
use evmap_core::{match_chargepoints, Chargepoint, ChargepointMatch, RawConnector};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::read_json;
use crate::output::{MatchRow, OutputContext};

/// Canonical chargepoints plus a network's raw connectors keyed by id
#[derive(Debug, Deserialize)]
pub struct MatchInput {
    pub chargepoints: Vec<Chargepoint>,
    pub connectors: BTreeMap<String, RawConnector>,
}

/// Match the connectors in `input_file` and print the assignment
pub fn match_connectors(input_file: &Path, ctx: &OutputContext) -> Result<()> {
    let input: MatchInput = read_json(input_file)?;

    let matched = match_chargepoints(&input.connectors, &input.chargepoints)
        .context("Connectors do not match the chargepoints")?;

    ctx.print(&match_rows(&input.chargepoints, &matched));
    Ok(())
}

/// One row per canonical chargepoint, in input order
fn match_rows(chargepoints: &[Chargepoint], matched: &ChargepointMatch<String>) -> Vec<MatchRow> {
    chargepoints
        .iter()
        .map(|cp| MatchRow {
            chargepoint: cp.to_string(),
            connectors: matched
                .get(cp)
                .map(|ids| ids.iter().cloned().collect::<Vec<_>>().join(" "))
                .unwrap_or_default(),
        })
        .collect()
}
