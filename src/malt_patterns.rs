//! # Malt Patterns Module
//!
//! This module contains the keyword tables used to classify malts by name.
//! Tables are scanned top to bottom and the first category with a matching
//! keyword wins, so the order of `MALT_KEYWORDS` is significant: roasted and
//! acidulated malts are checked before crystal malts ("cara" would otherwise
//! swallow "Carafa"), and base malts come last.

use crate::brewing_types::MaltCategory;

pub const ROASTED_KEYWORDS: &[&str] = &[
    "roast",
    "black",
    "chocolate",
    "chocolat",
    "carafa",
    "sinamar",
    "de-husked",
    "dehusked",
    "midnight",
    "stout",
    "torréfié",
    "patent",
];

pub const SPECIALTY_ACIDIC_KEYWORDS: &[&str] = &["acid", "acidulated", "sauermalz"];

pub const CRYSTAL_KEYWORDS: &[&str] = &["crystal", "caramel", "cara", "dextrin"];

pub const SPECIALTY_OTHER_KEYWORDS: &[&str] = &[
    "biscuit",
    "victory",
    "melanoidin",
    "aromatic",
    "brumalt",
    "honey",
    "smoked",
    "rauchmalz",
    "special b",
    "special w",
];

pub const BASE_KEYWORDS: &[&str] = &[
    "pilsner",
    "pilsen",
    "pale",
    "lager",
    "vienna",
    "munich",
    "maris otter",
    "golden promise",
    "wheat",
    "blé",
    "weizen",
    "spelt",
    "épeautre",
    "rye",
    "seigle",
    "oat",
    "avoine",
    "2-row",
    "6-row",
];

/// Ordered classification rules, evaluated top-down
pub const MALT_KEYWORDS: &[(MaltCategory, &[&str])] = &[
    (MaltCategory::Roasted, ROASTED_KEYWORDS),
    (MaltCategory::SpecialtyAcidic, SPECIALTY_ACIDIC_KEYWORDS),
    (MaltCategory::Crystal, CRYSTAL_KEYWORDS),
    (MaltCategory::SpecialtyOther, SPECIALTY_OTHER_KEYWORDS),
    (MaltCategory::Base, BASE_KEYWORDS),
];
