//! # Kombucha Data Module
//!
//! Static lookup tables for the kombucha recipe generator: tea and sugar rates
//! per aromatic profile, and steeping time per tea type. Display names and
//! taste descriptions live in the message catalogs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Share of the batch made of starter liquid from a previous brew
pub const STARTER_RATIO: f64 = 0.15;

/// Share of the water heated for the infusion, the rest is added cold
pub const HOT_WATER_RATIO: f64 = 0.4;

/// Temperature range at which the culture can be added
pub const INOCULATION_TEMPERATURE: &str = "20-30°C";

/// Tea and sugar rates of an aromatic profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KombuchaProfile {
    pub tea_grams_per_liter: f64,
    pub sugar_grams_per_liter: f64,
}

const LIGHT_GENTLE: KombuchaProfile = KombuchaProfile {
    tea_grams_per_liter: 5.0,
    sugar_grams_per_liter: 60.0,
};

const CLASSIC_BALANCED: KombuchaProfile = KombuchaProfile {
    tea_grams_per_liter: 7.0,
    sugar_grams_per_liter: 70.0,
};

const INTENSE_VINEGARY: KombuchaProfile = KombuchaProfile {
    tea_grams_per_liter: 9.0,
    sugar_grams_per_liter: 80.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AromaticProfile {
    LightGentle,
    ClassicBalanced,
    IntenseVinegary,
}

impl AromaticProfile {
    pub const ALL: [AromaticProfile; 3] = [
        AromaticProfile::LightGentle,
        AromaticProfile::ClassicBalanced,
        AromaticProfile::IntenseVinegary,
    ];

    pub fn key(self) -> &'static str {
        match self {
            AromaticProfile::LightGentle => "LIGHT_GENTLE",
            AromaticProfile::ClassicBalanced => "CLASSIC_BALANCED",
            AromaticProfile::IntenseVinegary => "INTENSE_VINEGARY",
        }
    }

    /// Resolve a profile key, case-insensitively ("classic-balanced" works too)
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized = normalize_key(key);
        Self::ALL.into_iter().find(|p| p.key() == normalized)
    }

    pub fn rates(self) -> &'static KombuchaProfile {
        match self {
            AromaticProfile::LightGentle => &LIGHT_GENTLE,
            AromaticProfile::ClassicBalanced => &CLASSIC_BALANCED,
            AromaticProfile::IntenseVinegary => &INTENSE_VINEGARY,
        }
    }

    /// Message key of the display name
    pub fn name_key(self) -> &'static str {
        match self {
            AromaticProfile::LightGentle => "profile-light-gentle",
            AromaticProfile::ClassicBalanced => "profile-classic-balanced",
            AromaticProfile::IntenseVinegary => "profile-intense-vinegary",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            AromaticProfile::LightGentle => "light-gentle",
            AromaticProfile::ClassicBalanced => "classic-balanced",
            AromaticProfile::IntenseVinegary => "intense-vinegary",
        }
    }
}

impl fmt::Display for AromaticProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeaType {
    BlackTea,
    GreenTea,
    MixedTea,
}

impl TeaType {
    pub const ALL: [TeaType; 3] = [TeaType::BlackTea, TeaType::GreenTea, TeaType::MixedTea];

    pub fn key(self) -> &'static str {
        match self {
            TeaType::BlackTea => "BLACK_TEA",
            TeaType::GreenTea => "GREEN_TEA",
            TeaType::MixedTea => "MIXED_TEA",
        }
    }

    /// Resolve a tea key. Short names (`BLACK`, `green`) are accepted.
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized = normalize_key(key);
        let short = normalized.strip_suffix("_TEA").unwrap_or(normalized.as_str());
        match short {
            "BLACK" => Some(TeaType::BlackTea),
            "GREEN" => Some(TeaType::GreenTea),
            "MIXED" => Some(TeaType::MixedTea),
            _ => None,
        }
    }

    /// Steeping time in minutes
    pub fn infusion_minutes(self) -> u32 {
        match self {
            TeaType::BlackTea => 10,
            TeaType::GreenTea => 7,
            TeaType::MixedTea => 8,
        }
    }

    pub fn name_key(self) -> &'static str {
        match self {
            TeaType::BlackTea => "tea-black",
            TeaType::GreenTea => "tea-green",
            TeaType::MixedTea => "tea-mixed",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            TeaType::BlackTea => "black",
            TeaType::GreenTea => "green",
            TeaType::MixedTea => "mixed",
        }
    }
}

impl fmt::Display for TeaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Message key of the expected taste for a profile and tea combination
pub fn taste_key(profile: AromaticProfile, tea: TeaType) -> String {
    format!("taste-{}-{}", profile.slug(), tea.slug())
}

fn normalize_key(key: &str) -> String {
    key.trim().to_uppercase().replace(['-', ' '], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_keys() {
        assert_eq!(
            AromaticProfile::from_key("CLASSIC_BALANCED"),
            Some(AromaticProfile::ClassicBalanced)
        );
        assert_eq!(
            AromaticProfile::from_key("light-gentle"),
            Some(AromaticProfile::LightGentle)
        );
        assert_eq!(AromaticProfile::from_key("SWEET"), None);
    }

    #[test]
    fn test_tea_keys() {
        assert_eq!(TeaType::from_key("BLACK_TEA"), Some(TeaType::BlackTea));
        assert_eq!(TeaType::from_key("green"), Some(TeaType::GreenTea));
        assert_eq!(TeaType::from_key("Mixed"), Some(TeaType::MixedTea));
        assert_eq!(TeaType::from_key("WHITE_TEA"), None);
        assert_eq!(TeaType::from_key("_TEA"), None);
    }

    #[test]
    fn test_rates_and_times() {
        assert_eq!(AromaticProfile::LightGentle.rates().tea_grams_per_liter, 5.0);
        assert_eq!(AromaticProfile::IntenseVinegary.rates().sugar_grams_per_liter, 80.0);
        assert_eq!(TeaType::GreenTea.infusion_minutes(), 7);
        assert_eq!(
            taste_key(AromaticProfile::ClassicBalanced, TeaType::MixedTea),
            "taste-classic-balanced-mixed"
        );
    }
}
