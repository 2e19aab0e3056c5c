//! A training session: validated inputs plus the last finished run.
use log::debug;

use crate::aggregate::{Simulation, SimulationError, SimulationObserver, SimulationSamples};
use crate::constants::DEFAULT_TURN_COUNT;
use crate::deck::Deck;
use crate::flatten::EffectWarning;
use crate::resolver::ResolverCache;
use crate::scenario::Scenario;
use crate::summary::SimulationSummary;
use crate::turn::TurnConfig;

/// Owns one scenario, deck and turn configuration and reruns on demand.
///
/// Inputs are only replaced once they validate, and a run only replaces the
/// stored samples when it finishes, so a rejected change or a cancelled run
/// leaves the previous state intact.
#[derive(Debug, Clone)]
pub struct TrainingSession {
    scenario: Scenario,
    deck: Deck,
    config: TurnConfig,
    turn_count: u32,
    seed: u64,
    cache: ResolverCache,
    last: Option<SimulationSamples>,
    warnings: Vec<EffectWarning>,
}

impl TrainingSession {
    /// # Errors
    ///
    /// Returns a configuration error when `config` does not fit `deck`.
    pub fn new(
        scenario: Scenario,
        deck: Deck,
        config: TurnConfig,
        seed: u64,
    ) -> Result<Self, SimulationError> {
        config.validate(&deck)?;
        Ok(Self {
            scenario,
            deck,
            config,
            turn_count: DEFAULT_TURN_COUNT,
            seed,
            cache: ResolverCache::new(),
            last: None,
            warnings: Vec::new(),
        })
    }

    #[must_use]
    pub const fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub const fn config(&self) -> &TurnConfig {
        &self.config
    }

    #[must_use]
    pub const fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    #[must_use]
    pub const fn turn_count(&self) -> u32 {
        self.turn_count
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    pub const fn set_turn_count(&mut self, turn_count: u32) {
        self.turn_count = turn_count;
    }

    pub const fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// # Errors
    ///
    /// Rejects a deck the current configuration does not fit.
    pub fn set_deck(&mut self, deck: Deck) -> Result<(), SimulationError> {
        self.config.validate(&deck)?;
        self.deck = deck;
        Ok(())
    }

    /// # Errors
    ///
    /// Rejects a configuration that does not fit the current deck.
    pub fn set_config(&mut self, config: TurnConfig) -> Result<(), SimulationError> {
        config.validate(&self.deck)?;
        self.config = config;
        Ok(())
    }

    pub fn set_scenario(&mut self, scenario: Scenario) {
        self.scenario = scenario;
    }

    /// Run the simulation with the current inputs.
    ///
    /// # Errors
    ///
    /// Returns scenario errors and cancellation; the stored samples are kept.
    pub fn recalc(
        &mut self,
        observer: &mut dyn SimulationObserver,
    ) -> Result<&SimulationSamples, SimulationError> {
        let simulation = Simulation::new(&self.config, &self.deck, &self.scenario, &mut self.cache)?;
        let warnings = simulation.warnings().to_vec();
        let samples = simulation.run(self.turn_count, self.seed, observer)?;
        debug!(
            "session recalculated: {} turns, {} cached effect values",
            self.turn_count,
            self.cache.len()
        );
        self.warnings = warnings;
        Ok(self.last.insert(samples))
    }

    /// Samples of the last finished run.
    #[must_use]
    pub const fn samples(&self) -> Option<&SimulationSamples> {
        self.last.as_ref()
    }

    /// Summary of the last finished run.
    #[must_use]
    pub fn summary(&self) -> Option<SimulationSummary> {
        self.last.as_ref().map(SimulationSummary::new)
    }

    /// Data warnings raised by the last finished run.
    #[must_use]
    pub fn warnings(&self) -> &[EffectWarning] {
        &self.warnings
    }

    #[must_use]
    pub const fn cache(&self) -> &ResolverCache {
        &self.cache
    }
}
