//! # BrewMate
//!
//! Brewing calculators: mash and pre-boil pH correction, pre-boil and
//! post-boil gravity correction, refractometer alcohol correction and
//! kombucha recipe scaling. Every calculator is a pure function returning a
//! result value, with failures reported in its `error` field.

pub mod beerxml;
pub mod brewing_types;
pub mod config;
pub mod density_calculator;
pub mod errors;
pub mod gravity;
pub mod kombucha;
pub mod kombucha_data;
pub mod localization;
pub mod malt_classifier;
pub mod malt_patterns;
pub mod numeric;
pub mod ph_calculator;
pub mod refractometer;
pub mod report;
