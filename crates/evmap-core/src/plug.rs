//! Plug-type canonicalization.
//!
//! Networks and the aggregator label the same physical plug differently
//! ("Typ2" vs "Type 2"). Labels that name the same plug form an
//! equivalence class; every lookup returns the whole class, including the
//! label that was asked for.

use std::collections::BTreeSet;

pub const TYPE_1: &str = "Typ1";
pub const TYPE_2: &str = "Typ2";
pub const TYPE_3: &str = "Typ3";
pub const CCS: &str = "CCS";
pub const SCHUKO: &str = "Schuko";
pub const CHADEMO: &str = "CHAdeMO";
pub const SUPERCHARGER: &str = "Tesla Supercharger";

const EQUIVALENCE_CLASSES: &[&[&str]] = &[
    &[TYPE_1, "Type 1", "Type1"],
    &[TYPE_2, "Type 2", "Type2"],
    &[TYPE_3, "Type 3", "Type3"],
    &[CCS, "CCS Typ2", "CCS Type 2"],
    &[SCHUKO, "Domestic"],
    &[SUPERCHARGER, "Tesla"],
];

fn class_of(plug_type: &str) -> Option<&'static [&'static str]> {
    EQUIVALENCE_CLASSES
        .iter()
        .copied()
        .find(|class| class.contains(&plug_type))
}

/// All labels equivalent to `plug_type`, including `plug_type` itself.
///
/// ```
/// # use evmap_core::plug::equivalent_plug_types;
/// assert!(equivalent_plug_types("Type 2").contains("Typ2"));
/// assert_eq!(equivalent_plug_types("Unknown").len(), 1);
/// ```
pub fn equivalent_plug_types(plug_type: &str) -> BTreeSet<String> {
    let mut types: BTreeSet<String> = class_of(plug_type)
        .map(|class| class.iter().map(|t| t.to_string()).collect())
        .unwrap_or_default();
    types.insert(plug_type.to_string());
    types
}

/// Whether two labels name the same physical plug
pub fn is_equivalent(a: &str, b: &str) -> bool {
    a == b || class_of(a).is_some_and(|class| class.contains(&b))
}
