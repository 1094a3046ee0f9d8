//! Chargepoint matcher.
//!
//! Reconciles a network's live connector list with the aggregator's
//! canonical chargepoint list. The result assigns every raw connector id
//! to exactly one chargepoint, and each chargepoint receives exactly
//! `count` ids. Anything short of that is rejected.
//!
//! Per raw plug type, the distinct powers on both sides are sorted and
//! compared:
//!
//! - same number of distinct powers: pair them by rank (the values need
//!   not be equal) and require the socket counts to agree;
//! - one raw power against two canonical powers: load-balanced dual
//!   chargers. The aggregator lists both power tiers while the network
//!   reports identical connectors, so the ordered ids are sliced by each
//!   chargepoint's `count`. Which tier receives which physical connector
//!   is not guaranteed.
//! - anything else is a mismatch.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::error::{MatchError, MatchResult};
use crate::models::{Chargepoint, RawConnector};
use crate::plug;

/// Connector ids assigned to each canonical chargepoint
pub type ChargepointMatch<K> = HashMap<Chargepoint, BTreeSet<K>>;

/// Match raw connectors (ordered by id) against canonical chargepoints.
///
/// ```
/// # use std::collections::BTreeMap;
/// # use evmap_core::{match_chargepoints, Chargepoint, RawConnector};
/// let chargepoints = vec![Chargepoint::new("CCS", 50.0, 2)];
/// let connectors = BTreeMap::from([
///     (1, RawConnector::new(50.0, "CCS")),
///     (2, RawConnector::new(50.0, "CCS")),
/// ]);
/// let result = match_chargepoints(&connectors, &chargepoints).unwrap();
/// assert_eq!(result[&chargepoints[0]].len(), 2);
/// ```
pub fn match_chargepoints<K>(
    connectors: &BTreeMap<K, RawConnector>,
    chargepoints: &[Chargepoint],
) -> MatchResult<ChargepointMatch<K>>
where
    K: Ord + Clone,
{
    let raw_types: BTreeSet<&str> = connectors
        .values()
        .map(|c| c.plug_type.as_str())
        .collect();
    let canonical_types: BTreeSet<&str> = chargepoints
        .iter()
        .map(|cp| cp.plug_type.as_str())
        .collect();

    if !types_reconcile(&raw_types, &canonical_types) {
        debug!(?raw_types, ?canonical_types, "Plug types cannot be reconciled");
        return Err(MatchError::chargepoints_do_not_match());
    }

    let total_count: usize = chargepoints.iter().map(|cp| cp.count as usize).sum();
    let mut result: ChargepointMatch<K> = HashMap::new();

    for raw_type in raw_types {
        let of_type: Vec<(&K, &RawConnector)> = connectors
            .iter()
            .filter(|(_, c)| c.plug_type == raw_type)
            .collect();
        let candidates: Vec<&Chargepoint> = chargepoints
            .iter()
            .filter(|cp| plug::is_equivalent(&cp.plug_type, raw_type))
            .collect();

        let raw_powers = distinct_sorted(of_type.iter().map(|(_, c)| c.power));
        let canonical_powers = distinct_sorted(candidates.iter().map(|cp| cp.power));

        if raw_powers.len() == canonical_powers.len() {
            for (&canonical_power, &raw_power) in canonical_powers.iter().zip(&raw_powers) {
                let chargepoint = with_power(&candidates, canonical_power)?;
                let ids: BTreeSet<K> = of_type
                    .iter()
                    .filter(|(_, c)| c.power == raw_power)
                    .map(|(id, _)| (*id).clone())
                    .collect();
                if chargepoint.count as usize != ids.len() {
                    debug!(
                        chargepoint = %chargepoint,
                        raw_power,
                        connectors = ids.len(),
                        "Socket count differs"
                    );
                    return Err(MatchError::chargepoints_do_not_match());
                }
                assign(&mut result, chargepoint, ids)?;
            }
        } else if raw_powers.len() == 1
            && canonical_powers.len() == 2
            && total_count == of_type.len()
        {
            let mut ids = of_type.iter().map(|(id, _)| (*id).clone());
            for &canonical_power in &canonical_powers {
                let chargepoint = with_power(&candidates, canonical_power)?;
                let slice: BTreeSet<K> = ids.by_ref().take(chargepoint.count as usize).collect();
                if slice.len() != chargepoint.count as usize {
                    return Err(MatchError::chargepoints_do_not_match());
                }
                assign(&mut result, chargepoint, slice)?;
            }
            if ids.next().is_some() {
                return Err(MatchError::chargepoints_do_not_match());
            }
        } else {
            debug!(
                raw_type,
                ?raw_powers,
                ?canonical_powers,
                "Power tiers cannot be paired"
            );
            return Err(MatchError::chargepoints_do_not_match());
        }
    }

    Ok(result)
}

/// Whether some choice of one equivalent label per raw type yields exactly
/// the canonical type set.
fn types_reconcile(raw_types: &BTreeSet<&str>, canonical_types: &BTreeSet<&str>) -> bool {
    // A label outside the canonical set can never be part of a matching
    // combination, so each class is narrowed up front.
    let classes: Vec<Vec<String>> = raw_types
        .iter()
        .map(|t| {
            plug::equivalent_plug_types(t)
                .into_iter()
                .filter(|e| canonical_types.contains(e.as_str()))
                .collect()
        })
        .collect();

    let mut chosen = Vec::with_capacity(classes.len());
    any_combination(&classes, &mut chosen, canonical_types)
}

fn any_combination<'a>(
    classes: &'a [Vec<String>],
    chosen: &mut Vec<&'a str>,
    target: &BTreeSet<&str>,
) -> bool {
    match classes.split_first() {
        None => chosen.iter().copied().collect::<BTreeSet<&str>>() == *target,
        Some((class, rest)) => class.iter().any(|label| {
            chosen.push(label);
            let found = any_combination(rest, chosen, target);
            chosen.pop();
            found
        }),
    }
}

fn distinct_sorted(powers: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut powers: Vec<f64> = powers.collect();
    powers.sort_by(f64::total_cmp);
    powers.dedup();
    powers
}

fn with_power<'a>(candidates: &[&'a Chargepoint], power: f64) -> MatchResult<&'a Chargepoint> {
    candidates
        .iter()
        .copied()
        .find(|cp| cp.power == power)
        .ok_or_else(MatchError::chargepoints_do_not_match)
}

/// Two equivalent raw labels must not claim the same chargepoint.
fn assign<K>(
    result: &mut ChargepointMatch<K>,
    chargepoint: &Chargepoint,
    ids: BTreeSet<K>,
) -> MatchResult<()> {
    if result.insert(chargepoint.clone(), ids).is_some() {
        return Err(MatchError::chargepoints_do_not_match());
    }
    Ok(())
}
