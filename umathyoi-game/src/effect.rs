//! Effect kinds carried by support cards and the additive map they flatten into.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::COMPLEX_UNIQUE_EFFECT_THRESHOLD;
use crate::trainee::StatType;

/// Normal training effect categories, keyed by their data id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    FriendshipEffectiveness,
    MoodEffect,
    SpeedBonus,
    StaminaBonus,
    PowerBonus,
    GutsBonus,
    WitBonus,
    TrainingEffectiveness,
    InitialSpeed,
    InitialStamina,
    InitialPower,
    InitialGuts,
    InitialWit,
    InitialBond,
    RaceBonus,
    FanBonus,
    HintLevels,
    HintFrequency,
    SpecialtyPriority,
    EventRecovery,
    EventEffectiveness,
    FailureProtection,
    EnergyCostReduction,
    SkillPointBonus,
    WitFriendshipRecovery,
}

impl EffectKind {
    pub const ALL: [Self; 25] = [
        Self::FriendshipEffectiveness,
        Self::MoodEffect,
        Self::SpeedBonus,
        Self::StaminaBonus,
        Self::PowerBonus,
        Self::GutsBonus,
        Self::WitBonus,
        Self::TrainingEffectiveness,
        Self::InitialSpeed,
        Self::InitialStamina,
        Self::InitialPower,
        Self::InitialGuts,
        Self::InitialWit,
        Self::InitialBond,
        Self::RaceBonus,
        Self::FanBonus,
        Self::HintLevels,
        Self::HintFrequency,
        Self::SpecialtyPriority,
        Self::EventRecovery,
        Self::EventEffectiveness,
        Self::FailureProtection,
        Self::EnergyCostReduction,
        Self::SkillPointBonus,
        Self::WitFriendshipRecovery,
    ];

    /// Numeric id used by card effect tables.
    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::FriendshipEffectiveness => 1,
            Self::MoodEffect => 2,
            Self::SpeedBonus => 3,
            Self::StaminaBonus => 4,
            Self::PowerBonus => 5,
            Self::GutsBonus => 6,
            Self::WitBonus => 7,
            Self::TrainingEffectiveness => 8,
            Self::InitialSpeed => 9,
            Self::InitialStamina => 10,
            Self::InitialPower => 11,
            Self::InitialGuts => 12,
            Self::InitialWit => 13,
            Self::InitialBond => 14,
            Self::RaceBonus => 15,
            Self::FanBonus => 16,
            Self::HintLevels => 17,
            Self::HintFrequency => 18,
            Self::SpecialtyPriority => 19,
            Self::EventRecovery => 25,
            Self::EventEffectiveness => 26,
            Self::FailureProtection => 27,
            Self::EnergyCostReduction => 28,
            Self::SkillPointBonus => 30,
            Self::WitFriendshipRecovery => 31,
        }
    }

    #[must_use]
    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Flat stat bonus kind for a stat.
    #[must_use]
    pub const fn stat_bonus(stat: StatType) -> Self {
        match stat {
            StatType::Speed => Self::SpeedBonus,
            StatType::Stamina => Self::StaminaBonus,
            StatType::Power => Self::PowerBonus,
            StatType::Guts => Self::GutsBonus,
            StatType::Wit => Self::WitBonus,
        }
    }
}

/// Bespoke unique-effect formulas, keyed by their data id.
///
/// Ids below [`COMPLEX_UNIQUE_EFFECT_THRESHOLD`] are plain aliases of an
/// [`EffectKind`] and never appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniqueEffectKind {
    BonusIfMinBond,
    TrainingEffectivenessIfMinBondNotPreferred,
    TrainingEffectivenessIfMinCardTypes,
    TrainingEffectivenessForFans,
    StartingStatsPerCardType,
    BonusPerFriendshipTrainings,
    BonusOnLessEnergy,
    BonusOnMoreMaxEnergy,
    BonusPerCombinedBond,
    BonusPerCardOnFacility,
    BonusPerFacilityLevel,
    ChanceForNoFailure,
    BonusIfFriendshipTraining,
    BonusOnMoreEnergy,
    AllCardsGainEffectBonus,
    BonusPerSkillType,
    BonusPerCombinedFacilityLevel,
    ExtraAppearanceIfMinBond,
    CardsAppearMoreIfMinBond,
    TypeBasedMultiStatBonus,
    AllCardsGainBondPerTraining,
    NextTurnBonusAfterTrainedWith,
}

impl UniqueEffectKind {
    pub const ALL: [Self; 22] = [
        Self::BonusIfMinBond,
        Self::TrainingEffectivenessIfMinBondNotPreferred,
        Self::TrainingEffectivenessIfMinCardTypes,
        Self::TrainingEffectivenessForFans,
        Self::StartingStatsPerCardType,
        Self::BonusPerFriendshipTrainings,
        Self::BonusOnLessEnergy,
        Self::BonusOnMoreMaxEnergy,
        Self::BonusPerCombinedBond,
        Self::BonusPerCardOnFacility,
        Self::BonusPerFacilityLevel,
        Self::ChanceForNoFailure,
        Self::BonusIfFriendshipTraining,
        Self::BonusOnMoreEnergy,
        Self::AllCardsGainEffectBonus,
        Self::BonusPerSkillType,
        Self::BonusPerCombinedFacilityLevel,
        Self::ExtraAppearanceIfMinBond,
        Self::CardsAppearMoreIfMinBond,
        Self::TypeBasedMultiStatBonus,
        Self::AllCardsGainBondPerTraining,
        Self::NextTurnBonusAfterTrainedWith,
    ];

    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::BonusIfMinBond => 101,
            Self::TrainingEffectivenessIfMinBondNotPreferred => 102,
            Self::TrainingEffectivenessIfMinCardTypes => 103,
            Self::TrainingEffectivenessForFans => 104,
            Self::StartingStatsPerCardType => 105,
            Self::BonusPerFriendshipTrainings => 106,
            Self::BonusOnLessEnergy => 107,
            Self::BonusOnMoreMaxEnergy => 108,
            Self::BonusPerCombinedBond => 109,
            Self::BonusPerCardOnFacility => 110,
            Self::BonusPerFacilityLevel => 111,
            Self::ChanceForNoFailure => 112,
            Self::BonusIfFriendshipTraining => 113,
            Self::BonusOnMoreEnergy => 114,
            Self::AllCardsGainEffectBonus => 115,
            Self::BonusPerSkillType => 116,
            Self::BonusPerCombinedFacilityLevel => 117,
            Self::ExtraAppearanceIfMinBond => 118,
            Self::CardsAppearMoreIfMinBond => 119,
            Self::TypeBasedMultiStatBonus => 120,
            Self::AllCardsGainBondPerTraining => 121,
            Self::NextTurnBonusAfterTrainedWith => 122,
        }
    }

    #[must_use]
    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// True when the formula reads the facility the card was assigned to this turn.
    #[must_use]
    pub const fn depends_on_placement(self) -> bool {
        matches!(
            self,
            Self::TrainingEffectivenessIfMinBondNotPreferred
                | Self::TrainingEffectivenessIfMinCardTypes
                | Self::BonusPerCardOnFacility
                | Self::BonusPerFacilityLevel
                | Self::BonusIfFriendshipTraining
        )
    }
}

/// Whether a unique-effect id is a direct alias of a normal effect.
#[must_use]
pub const fn is_simple_unique(id: i32) -> bool {
    id < COMPLEX_UNIQUE_EFFECT_THRESHOLD
}

/// Additive effect totals in normal-effect units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectMap {
    values: BTreeMap<EffectKind, i32>,
}

impl EffectMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta` to `kind`. Zero deltas leave the map untouched.
    pub fn add(&mut self, kind: EffectKind, delta: i32) {
        if delta == 0 {
            return;
        }
        let slot = self.values.entry(kind).or_insert(0);
        *slot = slot.saturating_add(delta);
    }

    pub fn merge(&mut self, other: &Self) {
        for (kind, value) in other.iter() {
            self.add(kind, value);
        }
    }

    #[must_use]
    pub fn get(&self, kind: EffectKind) -> i32 {
        self.values.get(&kind).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn contains(&self, kind: EffectKind) -> bool {
        self.values.contains_key(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EffectKind, i32)> + '_ {
        self.values.iter().map(|(kind, value)| (*kind, *value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Extend<(EffectKind, i32)> for EffectMap {
    fn extend<I: IntoIterator<Item = (EffectKind, i32)>>(&mut self, iter: I) {
        for (kind, delta) in iter {
            self.add(kind, delta);
        }
    }
}

impl FromIterator<(EffectKind, i32)> for EffectMap {
    fn from_iter<I: IntoIterator<Item = (EffectKind, i32)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}
