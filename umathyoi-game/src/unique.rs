//! Unique effect formulas.
//!
//! Every id at or above the complexity threshold maps to one
//! [`UniqueEffectKind`]. Each formula reads an explicit [`UniqueContext`]
//! and returns the normal-effect deltas it contributes. Kinds the simulator
//! does not model are registered no-ops that return an empty contribution.
//!
//! Integer math follows the game's floor division and saturates into `i32`.
use log::warn;
use smallvec::SmallVec;
use thiserror::Error;

use crate::card::{Card, CardType};
use crate::constants::{COMBINED_BOND_BASE_BONUS, FRIENDSHIP_BOND_THRESHOLD, LOW_ENERGY_CEILING};
use crate::effect::{EffectKind, UniqueEffectKind};
use crate::numbers::{saturate_i64_to_i32, usize_to_i64};
use crate::scenario::FacilityType;
use crate::trainee::StatType;
use crate::turn::{DeckComposition, TurnConfig};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UniqueEffectError {
    #[error("unsupported unique effect {kind}")]
    Unsupported { kind: i32 },
    #[error("unique effect {kind:?} takes {expected} parameters, got {found:?}")]
    Arity {
        kind: UniqueEffectKind,
        expected: usize,
        found: Vec<i32>,
    },
    #[error("unique effect {kind:?} targets unknown effect {effect}")]
    UnknownTargetEffect { kind: UniqueEffectKind, effect: i32 },
    #[error("unique effect {kind:?} parameter {index} must be positive, got {value}")]
    InvalidParameter {
        kind: UniqueEffectKind,
        index: usize,
        value: i32,
    },
    #[error("unique effect {kind:?} needs the card's facility for this turn")]
    MissingPlacement { kind: UniqueEffectKind },
}

/// Where a card trains this turn and who trains next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub facility: FacilityType,
    /// Cards on the facility this turn, the evaluated card included.
    pub card_count: usize,
    /// Distinct card types on the facility this turn.
    pub distinct_types: usize,
}

/// Read-only inputs a formula may consult.
#[derive(Debug, Clone, Copy)]
pub struct UniqueContext<'a> {
    pub card: &'a Card,
    pub bond: u8,
    pub config: &'a TurnConfig,
    pub composition: &'a DeckComposition,
    pub placement: Option<Placement>,
}

impl<'a> UniqueContext<'a> {
    #[must_use]
    pub const fn new(
        card: &'a Card,
        bond: u8,
        config: &'a TurnConfig,
        composition: &'a DeckComposition,
    ) -> Self {
        Self {
            card,
            bond,
            config,
            composition,
            placement: None,
        }
    }

    #[must_use]
    pub const fn placed(mut self, placement: Placement) -> Self {
        self.placement = Some(placement);
        self
    }
}

/// How much a returned contribution can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaStatus {
    Modeled,
    /// Registered, but the mechanic is outside the simulation.
    NotModeled,
    /// Placeholder value; the real formula is unknown.
    Unverified,
}

pub type Deltas = SmallVec<[(EffectKind, i32); 6]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub deltas: Deltas,
    pub status: FormulaStatus,
}

impl Contribution {
    #[must_use]
    pub fn not_modeled() -> Self {
        Self {
            deltas: Deltas::new(),
            status: FormulaStatus::NotModeled,
        }
    }

    fn single(kind: EffectKind, value: i64) -> Self {
        let mut deltas = Deltas::new();
        deltas.push((kind, saturate_i64_to_i32(value)));
        Self {
            deltas,
            status: FormulaStatus::Modeled,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}

/// Evaluate a raw unique-effect row.
///
/// # Errors
///
/// Unknown ids fail with [`UniqueEffectError::Unsupported`]; see
/// [`UniqueEffectKind::evaluate`] for the rest.
pub fn evaluate(
    kind_id: i32,
    params: &[i32],
    ctx: &UniqueContext<'_>,
) -> Result<Contribution, UniqueEffectError> {
    UniqueEffectKind::from_id(kind_id)
        .ok_or(UniqueEffectError::Unsupported { kind: kind_id })?
        .evaluate(params, ctx)
}

impl UniqueEffectKind {
    /// Parameter count the formula reads. `None` for unmodeled kinds.
    #[must_use]
    pub const fn expected_arity(self) -> Option<usize> {
        match self {
            Self::TrainingEffectivenessIfMinBondNotPreferred
            | Self::TrainingEffectivenessIfMinCardTypes
            | Self::TrainingEffectivenessForFans
            | Self::BonusPerCombinedBond
            | Self::BonusPerCardOnFacility
            | Self::BonusPerFacilityLevel
            | Self::BonusIfFriendshipTraining => Some(2),
            Self::BonusIfMinBond
            | Self::BonusPerFriendshipTrainings
            | Self::BonusOnMoreEnergy
            | Self::BonusPerCombinedFacilityLevel => Some(3),
            Self::BonusPerSkillType | Self::TypeBasedMultiStatBonus => Some(4),
            Self::BonusOnLessEnergy | Self::BonusOnMoreMaxEnergy => Some(5),
            Self::StartingStatsPerCardType
            | Self::ChanceForNoFailure
            | Self::AllCardsGainEffectBonus
            | Self::ExtraAppearanceIfMinBond
            | Self::CardsAppearMoreIfMinBond
            | Self::AllCardsGainBondPerTraining
            | Self::NextTurnBonusAfterTrainedWith => None,
        }
    }

    /// Run the formula against `params` in data order.
    ///
    /// Rows may be zero-padded past the formula's arity; anything else past
    /// it is an arity error.
    ///
    /// # Errors
    ///
    /// Wrong arity, unknown target effects, non-positive divisors and
    /// placement-dependent formulas evaluated without a placement.
    pub fn evaluate(
        self,
        params: &[i32],
        ctx: &UniqueContext<'_>,
    ) -> Result<Contribution, UniqueEffectError> {
        let Some(arity) = self.expected_arity() else {
            return Ok(Contribution::not_modeled());
        };
        if params.len() < arity || params[arity..].iter().any(|extra| *extra != 0) {
            return Err(UniqueEffectError::Arity {
                kind: self,
                expected: arity,
                found: params.to_vec(),
            });
        }
        let p = |index: usize| i64::from(params[index]);
        let bond = i64::from(ctx.bond);
        let config = ctx.config;

        let contribution = match self {
            Self::BonusIfMinBond => Contribution::single(
                self.target(params, 1)?,
                if bond >= p(0) { p(2) } else { 0 },
            ),
            Self::TrainingEffectivenessIfMinBondNotPreferred => {
                let placement = self.placement(ctx)?;
                let active = bond >= p(0) && !ctx.card.is_preferred_facility(placement.facility);
                Contribution::single(
                    EffectKind::TrainingEffectiveness,
                    if active { p(1) } else { 0 },
                )
            }
            Self::TrainingEffectivenessIfMinCardTypes => {
                let placement = self.placement(ctx)?;
                let active = usize_to_i64(placement.distinct_types) >= p(0);
                Contribution::single(
                    EffectKind::TrainingEffectiveness,
                    if active { p(1) } else { 0 },
                )
            }
            Self::TrainingEffectivenessForFans => {
                let per_point = self.divisor(params, 0)?;
                Contribution::single(
                    EffectKind::TrainingEffectiveness,
                    (i64::from(config.fan_count) / per_point).min(p(1)),
                )
            }
            Self::BonusPerFriendshipTrainings => {
                // Assumes every allowed friendship training happened.
                let active = ctx.bond >= FRIENDSHIP_BOND_THRESHOLD;
                Contribution::single(
                    self.target(params, 1)?,
                    if active { p(2).saturating_mul(p(0)) } else { 0 },
                )
            }
            Self::BonusOnLessEnergy => {
                let target = self.target(params, 0)?;
                let per_point = self.divisor(params, 1)?;
                let energy = i64::from(config.energy);
                let value = if energy <= LOW_ENERGY_CEILING {
                    let missing = i64::from(config.max_energy) - energy.max(p(2));
                    p(3).min(p(4) + missing.div_euclid(per_point))
                } else {
                    0
                };
                Contribution::single(target, value)
            }
            Self::BonusOnMoreMaxEnergy => {
                let target = self.target(params, 0)?;
                warn!(
                    "card {} uses unique effect {} with an unverified formula, using max bonus {}",
                    ctx.card.id,
                    self.id(),
                    params[4]
                );
                Contribution {
                    status: FormulaStatus::Unverified,
                    ..Contribution::single(target, p(4))
                }
            }
            Self::BonusPerCombinedBond => {
                let target = self.target(params, 0)?;
                let divisor = self.divisor(params, 1)?;
                let combined = i64::from(ctx.composition.combined_bond());
                Contribution::single(target, COMBINED_BOND_BASE_BONUS + combined / divisor)
            }
            Self::BonusPerCardOnFacility => {
                let target = self.target(params, 0)?;
                let placement = self.placement(ctx)?;
                let others = usize_to_i64(placement.card_count.saturating_sub(1));
                Contribution::single(target, others.saturating_mul(p(1)))
            }
            Self::BonusPerFacilityLevel => {
                let target = self.target(params, 0)?;
                let placement = self.placement(ctx)?;
                let level = i64::from(config.facility_level(placement.facility));
                Contribution::single(target, level * p(1))
            }
            Self::BonusIfFriendshipTraining => {
                let target = self.target(params, 0)?;
                let placement = self.placement(ctx)?;
                let active = ctx.card.is_preferred_facility(placement.facility);
                Contribution::single(target, if active { p(1) } else { 0 })
            }
            Self::BonusOnMoreEnergy => {
                let target = self.target(params, 0)?;
                let per_point = self.divisor(params, 1)?;
                Contribution::single(target, (i64::from(config.energy) / per_point).min(p(2)))
            }
            Self::BonusPerSkillType => {
                let target = self.target(params, 1)?;
                let owned = usize_to_i64(config.skill_count(params[0]));
                Contribution::single(target, owned.min(p(3)).saturating_mul(p(2)))
            }
            Self::BonusPerCombinedFacilityLevel => {
                let target = self.target(params, 0)?;
                let divisor = self.divisor(params, 1)?;
                let combined = i64::from(config.combined_facility_levels());
                Contribution::single(target, p(2).saturating_mul(combined).div_euclid(divisor))
            }
            Self::TypeBasedMultiStatBonus => {
                let active = bond >= p(1);
                let mut deltas = Deltas::new();
                for (stat, card_type) in StatType::ALL.into_iter().zip(CardType::ALL) {
                    let count = usize_to_i64(ctx.composition.count(card_type));
                    let value = if active { count.min(p(3)) * p(2) } else { 0 };
                    deltas.push((EffectKind::stat_bonus(stat), saturate_i64_to_i32(value)));
                }
                let pals = usize_to_i64(ctx.composition.count(CardType::Pal));
                let skill_points = if active { pals * p(0) } else { 0 };
                deltas.push((EffectKind::SkillPointBonus, saturate_i64_to_i32(skill_points)));
                Contribution {
                    deltas,
                    status: FormulaStatus::Modeled,
                }
            }
            Self::StartingStatsPerCardType
            | Self::ChanceForNoFailure
            | Self::AllCardsGainEffectBonus
            | Self::ExtraAppearanceIfMinBond
            | Self::CardsAppearMoreIfMinBond
            | Self::AllCardsGainBondPerTraining
            | Self::NextTurnBonusAfterTrainedWith => Contribution::not_modeled(),
        };
        Ok(contribution)
    }

    fn target(self, params: &[i32], index: usize) -> Result<EffectKind, UniqueEffectError> {
        EffectKind::from_id(params[index]).ok_or(UniqueEffectError::UnknownTargetEffect {
            kind: self,
            effect: params[index],
        })
    }

    fn divisor(self, params: &[i32], index: usize) -> Result<i64, UniqueEffectError> {
        let value = params[index];
        if value <= 0 {
            return Err(UniqueEffectError::InvalidParameter {
                kind: self,
                index,
                value,
            });
        }
        Ok(i64::from(value))
    }

    fn placement(self, ctx: &UniqueContext<'_>) -> Result<Placement, UniqueEffectError> {
        ctx.placement
            .ok_or(UniqueEffectError::MissingPlacement { kind: self })
    }
}
