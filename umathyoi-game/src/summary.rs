//! Summary statistics over finished runs.
use serde::{Deserialize, Serialize};

use crate::aggregate::{FacilitySamples, SimulationSamples};
use crate::numbers::{i64_to_f64, usize_to_f64};
use crate::scenario::FacilityType;
use crate::trainee::StatType;

/// Mean and extrema of one sample collection. Empty collections report zeros.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatSummary {
    pub mean: f64,
    pub min: i32,
    pub max: i32,
    pub total: i64,
    pub count: usize,
}

impl StatSummary {
    #[must_use]
    pub fn from_samples(samples: &[i32]) -> Self {
        let (Some(min), Some(max)) = (samples.iter().min(), samples.iter().max()) else {
            return Self::default();
        };
        let total: i64 = samples.iter().map(|value| i64::from(*value)).sum();
        Self {
            mean: i64_to_f64(total) / usize_to_f64(samples.len()),
            min: *min,
            max: *max,
            total,
            count: samples.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilitySummary {
    pub facility: FacilityType,
    pub turns_trained: usize,
    pub stats: [StatSummary; 5],
    pub skill_points: StatSummary,
    pub energy: StatSummary,
}

impl FacilitySummary {
    #[must_use]
    pub fn new(facility: FacilityType, samples: &FacilitySamples) -> Self {
        Self {
            facility,
            turns_trained: samples.turns_trained(),
            stats: StatType::ALL.map(|stat| StatSummary::from_samples(samples.stat(stat))),
            skill_points: StatSummary::from_samples(&samples.skill_points),
            energy: StatSummary::from_samples(&samples.energy),
        }
    }

    #[must_use]
    pub const fn stat(&self, stat: StatType) -> &StatSummary {
        &self.stats[stat.index()]
    }
}

/// Grand totals per stat across every facility.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatTotal {
    pub total: i64,
    /// Mean gain per trained facility-turn.
    pub mean: f64,
}

impl StatTotal {
    fn from_summaries<'a>(summaries: impl Iterator<Item = &'a StatSummary>) -> Self {
        let (total, count) = summaries.fold((0_i64, 0_usize), |(total, count), summary| {
            (total.saturating_add(summary.total), count + summary.count)
        });
        let mean = if count == 0 {
            0.0
        } else {
            i64_to_f64(total) / usize_to_f64(count)
        };
        Self { total, mean }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub turn_count: u32,
    pub seed: u64,
    pub facilities: Vec<FacilitySummary>,
    pub stat_totals: [StatTotal; 5],
    pub skill_points: StatTotal,
    pub energy: StatTotal,
}

impl SimulationSummary {
    #[must_use]
    pub fn new(samples: &SimulationSamples) -> Self {
        let facilities: Vec<FacilitySummary> = FacilityType::ALL
            .iter()
            .map(|kind| FacilitySummary::new(*kind, samples.facility(*kind)))
            .collect();
        let stat_totals = StatType::ALL.map(|stat| {
            StatTotal::from_summaries(facilities.iter().map(|summary| summary.stat(stat)))
        });
        let skill_points =
            StatTotal::from_summaries(facilities.iter().map(|summary| &summary.skill_points));
        let energy = StatTotal::from_summaries(facilities.iter().map(|summary| &summary.energy));
        Self {
            turn_count: samples.turn_count,
            seed: samples.seed,
            facilities,
            stat_totals,
            skill_points,
            energy,
        }
    }

    #[must_use]
    pub fn facility(&self, facility: FacilityType) -> Option<&FacilitySummary> {
        self.facilities
            .iter()
            .find(|summary| summary.facility == facility)
    }

    #[must_use]
    pub const fn stat_total(&self, stat: StatType) -> &StatTotal {
        &self.stat_totals[stat.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarizes_known_collection() {
        let summary = StatSummary::from_samples(&[10, 20, 30]);
        assert!((summary.mean - 20.0).abs() < f64::EPSILON);
        assert_eq!(summary.min, 10);
        assert_eq!(summary.max, 30);
        assert_eq!(summary.total, 60);
    }

    #[test]
    fn empty_collection_reports_zeros() {
        let summary = StatSummary::from_samples(&[]);
        assert!(summary.mean.abs() < f64::EPSILON);
        assert_eq!(summary.min, 0);
        assert_eq!(summary.max, 0);
        assert_eq!(summary.count, 0);
    }

    #[test]
    fn totals_span_facilities() {
        let mut samples = SimulationSamples {
            turn_count: 4,
            ..SimulationSamples::default()
        };
        let speed = &mut samples.facilities[FacilityType::Speed.index()];
        speed.stats[StatType::Speed.index()] = vec![10, 20];
        speed.stats[StatType::Power.index()] = vec![5, 5];
        speed.skill_points = vec![2, 2];
        speed.energy = vec![-20, -20];
        let wit = &mut samples.facilities[FacilityType::Wit.index()];
        wit.stats[StatType::Speed.index()] = vec![3];
        wit.stats[StatType::Wit.index()] = vec![9];
        wit.skill_points = vec![4];
        wit.energy = vec![5];

        let summary = SimulationSummary::new(&samples);
        let speed_total = summary.stat_total(StatType::Speed);
        assert_eq!(speed_total.total, 33);
        assert!((speed_total.mean - 11.0).abs() < 1e-12);
        assert_eq!(summary.skill_points.total, 8);
        assert_eq!(summary.energy.total, -35);
        assert_eq!(
            summary
                .facility(FacilityType::Speed)
                .map(|facility| facility.turns_trained),
            Some(2)
        );
        let guts = summary.facility(FacilityType::Guts).unwrap();
        assert_eq!(guts.turns_trained, 0);
        assert_eq!(guts.stat(StatType::Guts), &StatSummary::default());
    }
}
