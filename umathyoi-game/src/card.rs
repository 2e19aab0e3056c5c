//! Support card definitions as loaded from card data.
use serde::{Deserialize, Serialize};

use crate::constants::{LEVELS_PER_LIMIT_BREAK, MAX_LIMIT_BREAK, MIN_CARD_LEVEL};
use crate::effect::EffectKind;
use crate::scenario::FacilityType;

/// Card rarity tier, bounding the reachable level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rarity {
    R,
    SR,
    SSR,
}

impl Rarity {
    /// Max level with no limit breaks.
    #[must_use]
    pub const fn base_max_level(self) -> u32 {
        match self {
            Self::R => 20,
            Self::SR => 25,
            Self::SSR => 30,
        }
    }

    /// Max level after `limit_break` upgrades (clamped to the game cap).
    #[must_use]
    pub fn max_level(self, limit_break: u8) -> u32 {
        let breaks = u32::from(limit_break.min(MAX_LIMIT_BREAK));
        self.base_max_level() + breaks * LEVELS_PER_LIMIT_BREAK
    }
}

impl TryFrom<u8> for Rarity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::R),
            2 => Ok(Self::SR),
            3 => Ok(Self::SSR),
            other => Err(format!("unknown rarity {other}")),
        }
    }
}

impl From<Rarity> for u8 {
    fn from(value: Rarity) -> Self {
        match value {
            Rarity::R => 1,
            Rarity::SR => 2,
            Rarity::SSR => 3,
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rarity::R => write!(f, "R"),
            Rarity::SR => write!(f, "SR"),
            Rarity::SSR => write!(f, "SSR"),
        }
    }
}

/// Training affinity of a card. Pal cards have no preferred facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Speed,
    Stamina,
    Power,
    Guts,
    Wit,
    Pal,
}

impl CardType {
    pub const ALL: [Self; 6] = [
        Self::Speed,
        Self::Stamina,
        Self::Power,
        Self::Guts,
        Self::Wit,
        Self::Pal,
    ];

    #[must_use]
    pub const fn preferred_facility(self) -> Option<FacilityType> {
        match self {
            Self::Speed => Some(FacilityType::Speed),
            Self::Stamina => Some(FacilityType::Stamina),
            Self::Power => Some(FacilityType::Power),
            Self::Guts => Some(FacilityType::Guts),
            Self::Wit => Some(FacilityType::Wit),
            Self::Pal => None,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Speed => 0,
            Self::Stamina => 1,
            Self::Power => 2,
            Self::Guts => 3,
            Self::Wit => 4,
            Self::Pal => 5,
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "speed" => Some(Self::Speed),
            "stamina" => Some(Self::Stamina),
            "power" => Some(Self::Power),
            "guts" => Some(Self::Guts),
            "wit" | "intelligence" => Some(Self::Wit),
            "pal" | "friend" => Some(Self::Pal),
            _ => None,
        }
    }
}

/// A support card. Immutable once loaded; levels and bonds are run inputs.
///
/// `effects` rows are `[effect_id, value@L1, value@L5, ... value@L50]` with
/// [`crate::constants::NO_MILESTONE`] marking levels without a value.
/// `unique_effects` rows are `[unique_id, params...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(alias = "support_id")]
    pub id: u32,
    #[serde(alias = "char_name")]
    pub name: String,
    pub rarity: Rarity,
    #[serde(rename = "type")]
    pub card_type: CardType,
    #[serde(default)]
    pub effects: Vec<Vec<i32>>,
    #[serde(default)]
    pub unique_effects: Vec<Vec<i32>>,
    #[serde(default = "default_unlock_level")]
    pub unique_unlock_level: u32,
}

const fn default_unlock_level() -> u32 {
    MIN_CARD_LEVEL
}

impl Card {
    #[must_use]
    pub const fn min_level(&self) -> u32 {
        MIN_CARD_LEVEL
    }

    /// Highest level reachable at full limit break.
    #[must_use]
    pub fn max_level(&self) -> u32 {
        self.rarity.max_level(MAX_LIMIT_BREAK)
    }

    #[must_use]
    pub fn max_level_at(&self, limit_break: u8) -> u32 {
        self.rarity.max_level(limit_break)
    }

    #[must_use]
    pub const fn preferred_facility(&self) -> Option<FacilityType> {
        self.card_type.preferred_facility()
    }

    #[must_use]
    pub fn is_preferred_facility(&self, facility: FacilityType) -> bool {
        self.preferred_facility() == Some(facility)
    }

    /// Raw effect rows for `kind`. Data may repeat a kind across rows.
    pub fn effect_rows(&self, kind: EffectKind) -> impl Iterator<Item = &[i32]> + '_ {
        self.effects
            .iter()
            .filter(move |row| row.first() == Some(&kind.id()))
            .map(Vec::as_slice)
    }

    #[must_use]
    pub fn has_unique_effects(&self) -> bool {
        !self.unique_effects.is_empty()
    }

    #[must_use]
    pub const fn unique_unlocked(&self, level: u32) -> bool {
        level >= self.unique_unlock_level
    }
}
