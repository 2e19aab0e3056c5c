//! Per-turn facility assignment draws.
use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::constants::{FACILITY_BASE_WEIGHT, NON_APPEARANCE_BASE_WEIGHT};
use crate::effect::EffectKind;
use crate::resolver::ResolverCache;
use crate::scenario::FacilityType;

/// Where a card shows up on a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Assignment {
    Facility(FacilityType),
    Absent,
}

impl Assignment {
    /// Draw order: the five facilities, then no appearance.
    pub const ALL: [Self; 6] = [
        Self::Facility(FacilityType::Speed),
        Self::Facility(FacilityType::Stamina),
        Self::Facility(FacilityType::Power),
        Self::Facility(FacilityType::Guts),
        Self::Facility(FacilityType::Wit),
        Self::Absent,
    ];

    #[must_use]
    pub const fn facility(self) -> Option<FacilityType> {
        match self {
            Self::Facility(kind) => Some(kind),
            Self::Absent => None,
        }
    }
}

/// Weighted categorical distribution over [`Assignment::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityDistribution {
    weights: [u32; 6],
    total: u32,
}

impl FacilityDistribution {
    /// Base weight everywhere, plus `specialty_bonus` on the preferred facility.
    #[must_use]
    pub fn new(preferred: Option<FacilityType>, specialty_bonus: i32) -> Self {
        let bonus = u32::try_from(specialty_bonus).unwrap_or(0);
        let weights = Assignment::ALL.map(|assignment| match assignment {
            Assignment::Facility(kind) if Some(kind) == preferred => {
                FACILITY_BASE_WEIGHT.saturating_add(bonus)
            }
            Assignment::Facility(_) => FACILITY_BASE_WEIGHT,
            Assignment::Absent => NON_APPEARANCE_BASE_WEIGHT,
        });
        let total = weights.iter().fold(0_u32, |sum, w| sum.saturating_add(*w));
        Self { weights, total }
    }

    /// Distribution for `card` trained at `level`.
    pub fn for_card(card: &Card, level: u32, cache: &mut ResolverCache) -> Self {
        let bonus = cache.resolve(card, EffectKind::SpecialtyPriority, level);
        let distribution = Self::new(card.preferred_facility(), bonus);
        trace!(
            "card {} level {level} specialty {bonus}: weights {:?} of {}",
            card.id,
            distribution.weights,
            distribution.total
        );
        distribution
    }

    #[must_use]
    pub fn weight(&self, assignment: Assignment) -> u32 {
        Assignment::ALL
            .iter()
            .position(|candidate| *candidate == assignment)
            .map_or(0, |index| self.weights[index])
    }

    #[must_use]
    pub const fn total_weight(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn probability(&self, assignment: Assignment) -> f64 {
        f64::from(self.weight(assignment)) / f64::from(self.total)
    }

    /// One uniform draw in `[0, total)` mapped onto cumulative weights.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Assignment {
        let roll = rng.gen_range(0..self.total);
        let mut cumulative = 0_u32;
        for (assignment, weight) in Assignment::ALL.iter().zip(self.weights) {
            cumulative = cumulative.saturating_add(weight);
            if roll < cumulative {
                return *assignment;
            }
        }
        Assignment::Absent
    }
}
