//! # Malt Classifier Module
//!
//! Maps free-text malt names to a [`MaltCategory`] and accumulates the malt
//! composition of a grain bill.
//!
//! ## Usage
//!
//! ```rust
//! use brewmate::brewing_types::MaltCategory;
//! use brewmate::malt_classifier::classify;
//!
//! assert_eq!(classify("Carafa III"), MaltCategory::Roasted);
//! assert_eq!(classify("Acidulated Malt"), MaltCategory::SpecialtyAcidic);
//! assert_eq!(classify("Pale Ale Malt"), MaltCategory::Base);
//! ```

use log::{debug, trace};

use crate::brewing_types::{MaltCategory, MaltComposition, MaltRecord};
use crate::malt_patterns::MALT_KEYWORDS;

/// Classify a malt by name using the ordered keyword tables.
///
/// Matching is a case-insensitive substring test. A blank name, or a name
/// that matches no table, is [`MaltCategory::Unknown`].
pub fn classify(name: &str) -> MaltCategory {
    let lower_case_name = name.trim().to_lowercase();
    if lower_case_name.is_empty() {
        return MaltCategory::Unknown;
    }

    for (category, keywords) in MALT_KEYWORDS {
        if let Some(keyword) = keywords.iter().find(|k| lower_case_name.contains(*k)) {
            trace!("Malt '{}' matched keyword '{}' -> {}", name, keyword, category);
            return *category;
        }
    }

    debug!("Malt '{}' did not match any category", name);
    MaltCategory::Unknown
}

/// Grain bill summary produced by [`compose`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GrainBill {
    /// Weight per malt category
    pub composition: MaltComposition,
    /// Total weight of mashable records
    pub total_grain_kg: f64,
    /// Weight of acidulated malt, already included in `composition`
    pub acid_malt_kg: f64,
}

/// Accumulate the mashable records (grains and adjuncts) of a recipe.
///
/// Records with a negative or non-numeric weight are skipped.
pub fn compose(records: &[MaltRecord]) -> GrainBill {
    let mut bill = GrainBill::default();

    for record in records.iter().filter(|r| r.kind.is_mashable()) {
        if !record.weight_kg.is_finite() || record.weight_kg < 0.0 {
            debug!(
                "Skipping '{}' with invalid weight {}",
                record.name, record.weight_kg
            );
            continue;
        }

        let category = classify(&record.name);
        bill.total_grain_kg += record.weight_kg;
        bill.composition.add(category, record.weight_kg);
        if category == MaltCategory::SpecialtyAcidic {
            bill.acid_malt_kg += record.weight_kg;
        }
    }

    debug!(
        "Grain bill: {:.3} kg total, {:.3} kg acid malt",
        bill.total_grain_kg, bill.acid_malt_kg
    );
    bill
}
