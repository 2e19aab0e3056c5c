//! Turn configuration supplied by the caller for each run.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::card::CardType;
use crate::constants::{
    DEFAULT_BOND, DEFAULT_ENERGY, DEFAULT_FACILITY_LEVEL, DEFAULT_FAN_COUNT, DEFAULT_MAX_ENERGY,
    MAX_BOND, MAX_FACILITY_LEVEL, MAX_TOTAL_STAT_GROWTH, MIN_CARD_LEVEL, MIN_FACILITY_LEVEL,
};
use crate::deck::{Deck, DeckSlot};
use crate::scenario::FacilityType;
use crate::trainee::{Mood, Skill, StatGrowth};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TurnConfigError {
    #[error("energy {energy} exceeds max energy {max_energy}")]
    EnergyAboveMax { energy: u32, max_energy: u32 },
    #[error(
        "{facility} facility level {level} outside {}..={}",
        MIN_FACILITY_LEVEL,
        MAX_FACILITY_LEVEL
    )]
    FacilityLevelOutOfRange { facility: FacilityType, level: u8 },
    #[error("card {card} bond {bond} above {}", MAX_BOND)]
    BondOutOfRange { card: u32, bond: u8 },
    #[error("card {card} level {level} outside {min}..={max}")]
    CardLevelOutOfRange {
        card: u32,
        level: u32,
        min: u32,
        max: u32,
    },
    #[error("stat growth totals {total}%, limit is {}%", MAX_TOTAL_STAT_GROWTH)]
    StatGrowthOutOfRange { total: u32 },
}

/// Everything about the trainee's situation that a run holds fixed.
///
/// Bonds and card levels are per-card overrides on top of [`TurnConfig::default_bond`]
/// and the slot's max level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnConfig {
    pub fan_count: u32,
    pub mood: Mood,
    pub energy: u32,
    pub max_energy: u32,
    pub facility_levels: BTreeMap<FacilityType, u8>,
    pub default_bond: u8,
    pub card_bonds: BTreeMap<u32, u8>,
    pub card_levels: BTreeMap<u32, u32>,
    pub skills: Vec<Skill>,
    pub stat_growth: StatGrowth,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            fan_count: DEFAULT_FAN_COUNT,
            mood: Mood::default(),
            energy: DEFAULT_ENERGY,
            max_energy: DEFAULT_MAX_ENERGY,
            facility_levels: FacilityType::ALL
                .iter()
                .map(|kind| (*kind, DEFAULT_FACILITY_LEVEL))
                .collect(),
            default_bond: DEFAULT_BOND,
            card_bonds: BTreeMap::new(),
            card_levels: BTreeMap::new(),
            skills: Vec::new(),
            stat_growth: StatGrowth::default(),
        }
    }
}

impl TurnConfig {
    #[must_use]
    pub fn facility_level(&self, facility: FacilityType) -> u8 {
        self.facility_levels
            .get(&facility)
            .copied()
            .unwrap_or(DEFAULT_FACILITY_LEVEL)
    }

    pub fn set_facility_level(&mut self, facility: FacilityType, level: u8) {
        self.facility_levels.insert(facility, level);
    }

    /// Sum of the five facility levels.
    #[must_use]
    pub fn combined_facility_levels(&self) -> u32 {
        FacilityType::ALL
            .iter()
            .map(|kind| u32::from(self.facility_level(*kind)))
            .sum()
    }

    #[must_use]
    pub fn bond(&self, card_id: u32) -> u8 {
        self.card_bonds
            .get(&card_id)
            .copied()
            .unwrap_or(self.default_bond)
    }

    pub fn set_bond(&mut self, card_id: u32, bond: u8) {
        self.card_bonds.insert(card_id, bond);
    }

    /// Level the slot's card trains at: the override, else the slot's max.
    #[must_use]
    pub fn card_level(&self, slot: &DeckSlot) -> u32 {
        self.card_levels
            .get(&slot.card.id)
            .copied()
            .unwrap_or_else(|| slot.max_level())
    }

    pub fn set_card_level(&mut self, card_id: u32, level: u32) {
        self.card_levels.insert(card_id, level);
    }

    /// Owned skills whose effect type matches.
    #[must_use]
    pub fn skill_count(&self, effect_type: i32) -> usize {
        self.skills
            .iter()
            .filter(|skill| skill.effect_type == effect_type)
            .count()
    }

    /// Check caller-supplied bounds against the deck about to run.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range value found.
    pub fn validate(&self, deck: &Deck) -> Result<(), TurnConfigError> {
        if self.energy > self.max_energy {
            return Err(TurnConfigError::EnergyAboveMax {
                energy: self.energy,
                max_energy: self.max_energy,
            });
        }
        for facility in FacilityType::ALL {
            let level = self.facility_level(facility);
            if !(MIN_FACILITY_LEVEL..=MAX_FACILITY_LEVEL).contains(&level) {
                return Err(TurnConfigError::FacilityLevelOutOfRange { facility, level });
            }
        }
        if !self.stat_growth.within_limit() {
            return Err(TurnConfigError::StatGrowthOutOfRange {
                total: self.stat_growth.total(),
            });
        }
        for slot in deck.cards() {
            let bond = self.bond(slot.card.id);
            if bond > MAX_BOND {
                return Err(TurnConfigError::BondOutOfRange {
                    card: slot.card.id,
                    bond,
                });
            }
            let level = self.card_level(slot);
            let max = slot.max_level();
            if !(MIN_CARD_LEVEL..=max).contains(&level) {
                return Err(TurnConfigError::CardLevelOutOfRange {
                    card: slot.card.id,
                    level,
                    min: MIN_CARD_LEVEL,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// Deck-wide counts that unique formulas read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeckComposition {
    type_counts: [usize; 6],
    combined_bond: u32,
}

impl DeckComposition {
    #[must_use]
    pub fn new(deck: &Deck, config: &TurnConfig) -> Self {
        let mut composition = Self::default();
        for slot in deck.cards() {
            composition.type_counts[slot.card.card_type.index()] += 1;
            composition.combined_bond += u32::from(config.bond(slot.card.id));
        }
        composition
    }

    #[must_use]
    pub const fn count(&self, card_type: CardType) -> usize {
        self.type_counts[card_type.index()]
    }

    #[must_use]
    pub fn distinct_types(&self) -> usize {
        self.type_counts.iter().filter(|count| **count > 0).count()
    }

    /// Sum of every deck card's bond gauge.
    #[must_use]
    pub const fn combined_bond(&self) -> u32 {
        self.combined_bond
    }
}
