//! Turn aggregation: the Monte Carlo training loop.
//!
//! Per-card work that does not depend on the turn (level, bond, flattened
//! static effects, assignment distribution) is computed once when a
//! [`Simulation`] is built. Each turn then draws one assignment per card in
//! deck order, groups cards by facility and trains every facility that has
//! at least one card on it.
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::card::Card;
use crate::constants::{ASSIGNMENT_STREAM_TAG, PERCENTAGE_BASE, PROGRESS_STEPS, SUPPORT_BONUS_PER_CARD};
use crate::deck::Deck;
use crate::effect::{EffectKind, EffectMap};
use crate::flatten::{EffectWarning, Flattened, PlacementRow, UniqueScope, add_unique_effects};
use crate::numbers::{truncate_f64_to_i32, usize_to_f64};
use crate::resolver::ResolverCache;
use crate::sampler::{Assignment, FacilityDistribution};
use crate::scenario::{FacilityLevel, FacilityType, Scenario, ScenarioError};
use crate::seed::CountingRng;
use crate::trainee::StatType;
use crate::turn::{DeckComposition, TurnConfig, TurnConfigError};
use crate::unique::{Placement, UniqueContext};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] TurnConfigError),
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error("run cancelled after {completed} of {total} turns")]
    Cancelled { completed: u32, total: u32 },
}

/// What an observer wants after a progress notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunControl {
    #[default]
    Continue,
    Cancel,
}

/// Run lifecycle notifications. Observers never touch the random stream.
pub trait SimulationObserver {
    fn on_started(&mut self, _total_turns: u32) {}

    /// Called about every 1% of turns and once at the end.
    fn on_progress(&mut self, _completed: u32, _total: u32) -> RunControl {
        RunControl::Continue
    }

    fn on_finished(&mut self, _samples: &SimulationSamples) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SimulationObserver for NoopObserver {}

/// Gains of one facility on one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityOutcome {
    pub facility: FacilityType,
    pub stats: [i32; 5],
    pub skill_points: i32,
    pub energy: i32,
    pub card_count: usize,
}

impl FacilityOutcome {
    #[must_use]
    pub const fn stat(&self, stat: StatType) -> i32 {
        self.stats[stat.index()]
    }
}

/// Ordered samples of every turn a facility was trained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilitySamples {
    pub stats: [Vec<i32>; 5],
    pub skill_points: Vec<i32>,
    pub energy: Vec<i32>,
}

impl FacilitySamples {
    #[must_use]
    pub fn stat(&self, stat: StatType) -> &[i32] {
        &self.stats[stat.index()]
    }

    #[must_use]
    pub fn turns_trained(&self) -> usize {
        self.skill_points.len()
    }

    fn record(&mut self, outcome: &FacilityOutcome) {
        for (samples, gain) in self.stats.iter_mut().zip(outcome.stats) {
            samples.push(gain);
        }
        self.skill_points.push(outcome.skill_points);
        self.energy.push(outcome.energy);
    }
}

/// Everything a finished run collected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSamples {
    pub turn_count: u32,
    pub seed: u64,
    pub facilities: [FacilitySamples; 5],
    /// Per card, how often each [`Assignment::ALL`] entry was drawn.
    pub appearances: BTreeMap<u32, [u64; 6]>,
    pub draws: u64,
}

impl SimulationSamples {
    #[must_use]
    pub fn facility(&self, facility: FacilityType) -> &FacilitySamples {
        &self.facilities[facility.index()]
    }

    #[must_use]
    pub fn appearance_count(&self, card_id: u32, assignment: Assignment) -> u64 {
        let Some(index) = Assignment::ALL.iter().position(|a| *a == assignment) else {
            return 0;
        };
        self.appearances
            .get(&card_id)
            .map_or(0, |counts| counts[index])
    }

    fn record_assignment(&mut self, card_id: u32, assignment: Assignment) {
        if let Some(index) = Assignment::ALL.iter().position(|a| *a == assignment) {
            let counts = self.appearances.entry(card_id).or_insert([0; 6]);
            counts[index] = counts[index].saturating_add(1);
        }
    }
}

#[derive(Debug, Clone)]
struct CardPlan<'a> {
    card: &'a Card,
    level: u32,
    bond: u8,
    bonus: TrainingBonus,
    placement_rows: Vec<PlacementRow>,
    distribution: FacilityDistribution,
}

/// Effect sums the training formula reads, in fixed slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TrainingBonus {
    stats: [i32; 5],
    skill_points: i32,
    training: i32,
    mood: i32,
    friendship: i32,
}

impl TrainingBonus {
    fn from_effects(effects: &EffectMap) -> Self {
        let mut bonus = Self::default();
        for (kind, value) in effects.iter() {
            bonus.add(kind, value);
        }
        bonus
    }

    /// Kinds the formula never reads are dropped.
    fn add(&mut self, kind: EffectKind, delta: i32) {
        let slot = match kind {
            EffectKind::FriendshipEffectiveness => &mut self.friendship,
            EffectKind::MoodEffect => &mut self.mood,
            EffectKind::TrainingEffectiveness => &mut self.training,
            EffectKind::SkillPointBonus => &mut self.skill_points,
            EffectKind::SpeedBonus => &mut self.stats[StatType::Speed.index()],
            EffectKind::StaminaBonus => &mut self.stats[StatType::Stamina.index()],
            EffectKind::PowerBonus => &mut self.stats[StatType::Power.index()],
            EffectKind::GutsBonus => &mut self.stats[StatType::Guts.index()],
            EffectKind::WitBonus => &mut self.stats[StatType::Wit.index()],
            _ => return,
        };
        *slot = slot.saturating_add(delta);
    }

    fn merge(&mut self, other: &Self) {
        for (slot, value) in self.stats.iter_mut().zip(other.stats) {
            *slot = slot.saturating_add(value);
        }
        self.skill_points = self.skill_points.saturating_add(other.skill_points);
        self.training = self.training.saturating_add(other.training);
        self.mood = self.mood.saturating_add(other.mood);
        self.friendship = self.friendship.saturating_add(other.friendship);
    }
}

/// A validated, precomputed run setup.
#[derive(Debug, Clone)]
pub struct Simulation<'a> {
    config: &'a TurnConfig,
    yields: Vec<FacilityLevel>,
    composition: DeckComposition,
    plans: Vec<CardPlan<'a>>,
    warnings: Vec<EffectWarning>,
}

impl<'a> Simulation<'a> {
    /// Validate inputs and precompute every card's static contribution.
    ///
    /// # Errors
    ///
    /// Fails on configuration bounds or a scenario without a row for a
    /// configured facility level.
    pub fn new(
        config: &'a TurnConfig,
        deck: &'a Deck,
        scenario: &Scenario,
        cache: &mut ResolverCache,
    ) -> Result<Self, SimulationError> {
        config.validate(deck)?;
        let mut yields = Vec::with_capacity(FacilityType::ALL.len());
        for kind in FacilityType::ALL {
            let facility = scenario.facility(kind).ok_or(ScenarioError::MissingFacility {
                scenario: scenario.id,
                facility: kind,
            })?;
            let level = config.facility_level(kind);
            let row = facility.at_level(level).ok_or(ScenarioError::MissingLevel {
                scenario: scenario.id,
                facility: kind,
                level,
            })?;
            yields.push(row.clone());
        }

        let composition = DeckComposition::new(deck, config);
        let mut warnings = Vec::new();
        let mut plans = Vec::with_capacity(deck.len());
        for slot in deck.cards() {
            let card = &slot.card;
            let level = config.card_level(slot);
            let bond = config.bond(card.id);
            let ctx = UniqueContext::new(card, bond, config, &composition);

            let mut flattened = Flattened::from_effects(cache.resolve_all(card, level));
            add_unique_effects(card, level, &ctx, UniqueScope::Static, &mut flattened);
            warnings.append(&mut flattened.warnings);

            // Placement only changes values, so one trial placement finds every bad row.
            let trial = ctx.placed(Placement {
                facility: card.preferred_facility().unwrap_or(FacilityType::Speed),
                card_count: 1,
                distinct_types: 1,
            });
            let mut placement_rows = Vec::new();
            for row in PlacementRow::collect(card, level) {
                match row.kind.evaluate(&row.params, &trial) {
                    Ok(_) => placement_rows.push(row),
                    Err(error) => {
                        let warning = EffectWarning::Skipped {
                            card: card.id,
                            error,
                        };
                        warn!("{warning}");
                        warnings.push(warning);
                    }
                }
            }

            plans.push(CardPlan {
                card,
                level,
                bond,
                bonus: TrainingBonus::from_effects(&flattened.effects),
                placement_rows,
                distribution: FacilityDistribution::for_card(card, level, cache),
            });
        }

        Ok(Self {
            config,
            yields,
            composition,
            plans,
            warnings,
        })
    }

    /// Data problems found while precomputing card effects.
    #[must_use]
    pub fn warnings(&self) -> &[EffectWarning] {
        &self.warnings
    }

    /// Level each deck card trains at, in deck order.
    pub fn card_levels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.plans.iter().map(|plan| (plan.card.id, plan.level))
    }

    #[must_use]
    pub fn distribution(&self, card_id: u32) -> Option<&FacilityDistribution> {
        self.plans
            .iter()
            .find(|plan| plan.card.id == card_id)
            .map(|plan| &plan.distribution)
    }

    /// Train `facility` with the given deck cards on it.
    ///
    /// Ids not in the deck are ignored. Returns `None` when no card trains.
    #[must_use]
    pub fn train_with(&self, facility: FacilityType, card_ids: &[u32]) -> Option<FacilityOutcome> {
        let members: SmallVec<[usize; 6]> = card_ids
            .iter()
            .filter_map(|id| self.plans.iter().position(|plan| plan.card.id == *id))
            .collect();
        self.train_group(facility, &members)
    }

    fn train_group(&self, facility: FacilityType, members: &[usize]) -> Option<FacilityOutcome> {
        if members.is_empty() {
            return None;
        }
        let yields = &self.yields[facility.index()];
        let mut types_present = [false; 6];
        for index in members {
            types_present[self.plans[*index].card.card_type.index()] = true;
        }
        let placement = Placement {
            facility,
            card_count: members.len(),
            distinct_types: types_present.iter().filter(|present| **present).count(),
        };

        let mut totals = TrainingBonus::default();
        let mut friendship = 1.0;
        for index in members {
            let plan = &self.plans[*index];
            let mut own = plan.bonus;
            if !plan.placement_rows.is_empty() {
                let ctx = UniqueContext::new(plan.card, plan.bond, self.config, &self.composition)
                    .placed(placement);
                for row in &plan.placement_rows {
                    // Rows were checked at build time.
                    if let Ok(contribution) = row.kind.evaluate(&row.params, &ctx) {
                        for (kind, delta) in contribution.deltas {
                            own.add(kind, delta);
                        }
                    }
                }
            }
            if plan.card.is_preferred_facility(facility) {
                friendship *= 1.0 + f64::from(own.friendship) / PERCENTAGE_BASE;
            }
            totals.merge(&own);
        }

        let mood_effect = f64::from(totals.mood) / PERCENTAGE_BASE;
        let mood = 1.0 + (self.config.mood.multiplier() - 1.0) * (1.0 + mood_effect);
        let training = 1.0 + f64::from(totals.training) / PERCENTAGE_BASE;
        let support = 1.0 + SUPPORT_BONUS_PER_CARD * usize_to_f64(members.len());
        let shared = friendship * mood * training * support;

        let mut stats = [0; 5];
        for stat in StatType::ALL {
            let base = yields.stats.get(stat);
            if base <= 0 {
                continue;
            }
            let raw = f64::from(base.saturating_add(totals.stats[stat.index()]));
            let growth = self.config.stat_growth.multiplier(stat);
            stats[stat.index()] = truncate_f64_to_i32(raw * shared * growth);
        }

        Some(FacilityOutcome {
            facility,
            stats,
            skill_points: yields
                .skill_points
                .saturating_add(totals.skill_points),
            energy: yields.energy,
            card_count: members.len(),
        })
    }

    /// Run `turn_count` turns seeded by `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Cancelled`] when the observer asks to stop.
    pub fn run(
        &self,
        turn_count: u32,
        seed: u64,
        observer: &mut dyn SimulationObserver,
    ) -> Result<SimulationSamples, SimulationError> {
        let mut rng = CountingRng::for_stream(seed, ASSIGNMENT_STREAM_TAG);
        let mut samples = SimulationSamples {
            turn_count,
            seed,
            ..SimulationSamples::default()
        };
        let interval = (turn_count / PROGRESS_STEPS).max(1);
        debug!(
            "simulation started: {} cards, {turn_count} turns, seed {seed}",
            self.plans.len()
        );
        observer.on_started(turn_count);

        let mut groups: [SmallVec<[usize; 6]>; 5] = Default::default();
        for turn in 0..turn_count {
            groups.iter_mut().for_each(SmallVec::clear);
            for (index, plan) in self.plans.iter().enumerate() {
                let assignment = plan.distribution.draw(&mut rng);
                samples.record_assignment(plan.card.id, assignment);
                if let Some(facility) = assignment.facility() {
                    groups[facility.index()].push(index);
                }
            }
            for facility in FacilityType::ALL {
                if let Some(outcome) = self.train_group(facility, &groups[facility.index()]) {
                    samples.facilities[facility.index()].record(&outcome);
                }
            }

            let completed = turn + 1;
            if (completed % interval == 0 || completed == turn_count)
                && observer.on_progress(completed, turn_count) == RunControl::Cancel
            {
                debug!("simulation cancelled after {completed} of {turn_count} turns");
                return Err(SimulationError::Cancelled {
                    completed,
                    total: turn_count,
                });
            }
        }

        samples.draws = rng.draws();
        debug!("simulation finished: {} draws", samples.draws);
        observer.on_finished(&samples);
        Ok(samples)
    }
}

/// Build a fresh [`Simulation`] and run it once.
///
/// # Errors
///
/// See [`Simulation::new`] and [`Simulation::run`].
pub fn run(
    turn_count: u32,
    config: &TurnConfig,
    deck: &Deck,
    scenario: &Scenario,
    seed: u64,
    observer: &mut dyn SimulationObserver,
) -> Result<SimulationSamples, SimulationError> {
    let mut cache = ResolverCache::new();
    Simulation::new(config, deck, scenario, &mut cache)?.run(turn_count, seed, observer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardType, Rarity};
    use crate::constants::NO_MILESTONE;
    use crate::scenario::{Facility, StatLine};
    use crate::trainee::Mood;

    const U: i32 = NO_MILESTONE;

    fn row(id: i32, value: i32) -> Vec<i32> {
        vec![id, value, U, U, U, U, U, U, U, U, U, value]
    }

    fn card(id: u32, card_type: CardType, effects: Vec<Vec<i32>>) -> Card {
        Card {
            id,
            name: format!("Card {id}"),
            rarity: Rarity::SSR,
            card_type,
            effects,
            unique_effects: Vec::new(),
            unique_unlock_level: 1,
        }
    }

    fn scenario() -> Scenario {
        let stats = |kind: FacilityType| match kind {
            FacilityType::Speed => StatLine {
                speed: 10,
                power: 5,
                ..StatLine::default()
            },
            FacilityType::Stamina => StatLine {
                stamina: 9,
                guts: 4,
                ..StatLine::default()
            },
            FacilityType::Power => StatLine {
                stamina: 5,
                power: 8,
                ..StatLine::default()
            },
            FacilityType::Guts => StatLine {
                speed: 4,
                power: 4,
                guts: 8,
                ..StatLine::default()
            },
            FacilityType::Wit => StatLine {
                speed: 2,
                wit: 9,
                ..StatLine::default()
            },
        };
        Scenario {
            id: 1,
            name: String::from("Test"),
            facilities: FacilityType::ALL
                .iter()
                .map(|kind| Facility {
                    kind: *kind,
                    levels: (1..=5)
                        .map(|level| FacilityLevel {
                            level,
                            stats: stats(*kind),
                            skill_points: if *kind == FacilityType::Wit { 4 } else { 2 },
                            energy: if *kind == FacilityType::Wit { 5 } else { -20 },
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    fn level_one_config() -> TurnConfig {
        let mut config = TurnConfig::default();
        for kind in FacilityType::ALL {
            config.set_facility_level(kind, 1);
        }
        config
    }

    #[test]
    fn worked_example_truncates_each_stat() {
        let card = card(
            1,
            CardType::Speed,
            vec![row(3, 2), row(1, 25), row(8, 10)],
        );
        let deck = Deck::from_cards([(card, 4)]).unwrap();
        let config = level_one_config();
        let scenario = scenario();
        let mut cache = ResolverCache::new();
        let simulation = Simulation::new(&config, &deck, &scenario, &mut cache).unwrap();

        let outcome = simulation.train_with(FacilityType::Speed, &[1]).unwrap();
        // (10 + 2) * 1.25 * 1.1 * 1.1 * 1.05 = 19.06, 5 * same = 7.94
        assert_eq!(outcome.stat(StatType::Speed), 19);
        assert_eq!(outcome.stat(StatType::Power), 7);
        assert_eq!(outcome.stat(StatType::Stamina), 0);
        assert_eq!(outcome.skill_points, 2);
        assert_eq!(outcome.energy, -20);

        // Off its preferred facility the card loses the friendship multiplier.
        let off = simulation.train_with(FacilityType::Guts, &[1]).unwrap();
        // (4 + 2) * 1.1 * 1.1 * 1.05 = 7.62
        assert_eq!(off.stat(StatType::Speed), 7);
        assert!(simulation.train_with(FacilityType::Guts, &[]).is_none());
    }

    #[test]
    fn stat_bonus_only_applies_to_yielded_stats() {
        let card = card(2, CardType::Wit, vec![row(4, 3), row(7, 1)]);
        let deck = Deck::from_cards([(card, 4)]).unwrap();
        let config = TurnConfig {
            mood: Mood::Normal,
            ..level_one_config()
        };
        let scenario = scenario();
        let mut cache = ResolverCache::new();
        let simulation = Simulation::new(&config, &deck, &scenario, &mut cache).unwrap();

        let outcome = simulation.train_with(FacilityType::Wit, &[2]).unwrap();
        // (9 + 1) * 1.05 and 2 * 1.05 with normal mood
        assert_eq!(outcome.stat(StatType::Wit), 10);
        assert_eq!(outcome.stat(StatType::Speed), 2);
        assert_eq!(outcome.stat(StatType::Stamina), 0);
        assert_eq!(outcome.skill_points, 4);
        assert_eq!(outcome.energy, 5);
    }

    #[test]
    fn mood_effect_scales_mood_bonus_and_skill_points_add() {
        let card = card(3, CardType::Pal, vec![row(2, 100), row(30, 3)]);
        let deck = Deck::from_cards([(card, 4)]).unwrap();
        let config = TurnConfig {
            mood: Mood::Great,
            ..level_one_config()
        };
        let scenario = scenario();
        let mut cache = ResolverCache::new();
        let simulation = Simulation::new(&config, &deck, &scenario, &mut cache).unwrap();

        let outcome = simulation.train_with(FacilityType::Speed, &[3]).unwrap();
        // mood 1 + 0.2 * 2 = 1.4, support 1.05: 10 * 1.47 = 14.7
        assert_eq!(outcome.stat(StatType::Speed), 14);
        assert_eq!(outcome.skill_points, 5);
    }

    #[test]
    fn preferred_friendship_multiplies_and_bad_mood_grows_with_mood_effect() {
        let first = card(7, CardType::Speed, vec![row(1, 50), row(2, 50)]);
        let second = card(8, CardType::Speed, vec![row(1, 50)]);
        let deck = Deck::from_cards([(first, 4), (second, 4)]).unwrap();
        let config = TurnConfig {
            mood: Mood::Bad,
            ..level_one_config()
        };
        let scenario = scenario();
        let mut cache = ResolverCache::new();
        let simulation = Simulation::new(&config, &deck, &scenario, &mut cache).unwrap();

        let outcome = simulation.train_with(FacilityType::Speed, &[7, 8]).unwrap();
        // friendship 1.5 * 1.5, mood 1 - 0.1 * 1.5 = 0.85, support 1.1
        // speed 10 * 2.25 * 0.85 * 1.1 = 21.04, power 5 * same = 10.52
        assert_eq!(outcome.stat(StatType::Speed), 21);
        assert_eq!(outcome.stat(StatType::Power), 10);

        // Off facility neither friendship applies: 4 * 0.85 * 1.1 = 3.74
        let off = simulation.train_with(FacilityType::Guts, &[7, 8]).unwrap();
        assert_eq!(off.stat(StatType::Speed), 3);
    }

    #[test]
    fn training_bonus_keeps_only_formula_inputs() {
        let effects: EffectMap = [
            (EffectKind::SpeedBonus, 2),
            (EffectKind::WitBonus, 1),
            (EffectKind::MoodEffect, 30),
            (EffectKind::SkillPointBonus, 4),
            (EffectKind::RaceBonus, 10),
        ]
        .into_iter()
        .collect();
        let mut bonus = TrainingBonus::from_effects(&effects);
        bonus.add(EffectKind::SpeedBonus, 3);
        bonus.add(EffectKind::HintLevels, 2);
        bonus.merge(&TrainingBonus::from_effects(&effects));
        assert_eq!(bonus.stats, [7, 0, 0, 0, 2]);
        assert_eq!(bonus.mood, 60);
        assert_eq!(bonus.skill_points, 8);
        assert_eq!(bonus.training, 0);
        assert_eq!(bonus.friendship, 0);
    }

    #[test]
    fn placement_rows_see_facility_neighbours() {
        let mut speed = card(4, CardType::Speed, Vec::new());
        speed.unique_effects = vec![vec![110, 3, 2]];
        let power = card(5, CardType::Power, Vec::new());
        let deck = Deck::from_cards([(speed, 4), (power, 4)]).unwrap();
        let config = TurnConfig {
            mood: Mood::Normal,
            ..level_one_config()
        };
        let scenario = scenario();
        let mut cache = ResolverCache::new();
        let simulation = Simulation::new(&config, &deck, &scenario, &mut cache).unwrap();

        let alone = simulation.train_with(FacilityType::Speed, &[4]).unwrap();
        // 10 * 1.05
        assert_eq!(alone.stat(StatType::Speed), 10);
        let together = simulation.train_with(FacilityType::Speed, &[4, 5]).unwrap();
        // (10 + 2) * 1.1
        assert_eq!(together.stat(StatType::Speed), 13);
        assert_eq!(together.card_count, 2);
    }

    #[test]
    fn broken_placement_rows_are_dropped_up_front() {
        let mut speed = card(6, CardType::Speed, Vec::new());
        speed.unique_effects = vec![vec![110, 99, 2]];
        let deck = Deck::from_cards([(speed, 4)]).unwrap();
        let config = level_one_config();
        let scenario = scenario();
        let mut cache = ResolverCache::new();
        let simulation = Simulation::new(&config, &deck, &scenario, &mut cache).unwrap();
        assert_eq!(simulation.warnings().len(), 1);
    }

    #[test]
    fn missing_scenario_level_fails_fast() {
        let deck = Deck::new();
        let mut scenario = scenario();
        scenario.facilities[4].levels.retain(|row| row.level != 3);
        let config = TurnConfig::default();
        assert_eq!(
            run(10, &config, &deck, &scenario, 1, &mut NoopObserver),
            Err(SimulationError::Scenario(ScenarioError::MissingLevel {
                scenario: 1,
                facility: FacilityType::Wit,
                level: 3
            }))
        );
    }

    #[derive(Default)]
    struct Recorder {
        started: Option<u32>,
        progress: Vec<u32>,
        finished: bool,
        cancel_at: Option<u32>,
    }

    impl SimulationObserver for Recorder {
        fn on_started(&mut self, total_turns: u32) {
            self.started = Some(total_turns);
        }

        fn on_progress(&mut self, completed: u32, _total: u32) -> RunControl {
            self.progress.push(completed);
            if self.cancel_at == Some(completed) {
                RunControl::Cancel
            } else {
                RunControl::Continue
            }
        }

        fn on_finished(&mut self, _samples: &SimulationSamples) {
            self.finished = true;
        }
    }

    fn busy_deck() -> Deck {
        Deck::from_cards((1..=6).map(|id| {
            let card_type = CardType::ALL[(id as usize - 1) % 6];
            (card(id, card_type, vec![row(3, 1), row(19, 30)]), 4)
        }))
        .unwrap()
    }

    #[test]
    fn run_reports_progress_and_counts_draws() {
        let deck = busy_deck();
        let config = TurnConfig::default();
        let scenario = scenario();
        let mut recorder = Recorder::default();
        let samples = run(250, &config, &deck, &scenario, 9, &mut recorder).unwrap();

        assert_eq!(recorder.started, Some(250));
        assert_eq!(recorder.progress.len(), 125);
        assert_eq!(recorder.progress.last(), Some(&250));
        assert!(recorder.finished);
        assert!(samples.draws >= 250 * 6);

        let appearances: u64 = samples.appearances.values().flatten().sum();
        assert_eq!(appearances, 250 * 6);
        for facility in FacilityType::ALL {
            let trained = samples.facility(facility);
            assert!(trained.turns_trained() <= 250);
            for stat in StatType::ALL {
                assert_eq!(trained.stat(stat).len(), trained.turns_trained());
            }
        }
    }

    #[test]
    fn cancelled_runs_publish_nothing() {
        let deck = busy_deck();
        let config = TurnConfig::default();
        let scenario = scenario();
        let mut recorder = Recorder {
            cancel_at: Some(40),
            ..Recorder::default()
        };
        let result = run(400, &config, &deck, &scenario, 9, &mut recorder);
        assert_eq!(
            result,
            Err(SimulationError::Cancelled {
                completed: 40,
                total: 400
            })
        );
        assert!(!recorder.finished);
    }

    #[test]
    fn identical_seeds_replay_identically() {
        let deck = busy_deck();
        let config = TurnConfig::default();
        let scenario = scenario();
        let first = run(300, &config, &deck, &scenario, 77, &mut NoopObserver).unwrap();
        let second = run(300, &config, &deck, &scenario, 77, &mut NoopObserver).unwrap();
        let other = run(300, &config, &deck, &scenario, 78, &mut NoopObserver).unwrap();
        assert_eq!(first, second);
        assert_ne!(first.appearances, other.appearances);
    }
}
