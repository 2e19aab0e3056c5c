//! Umathyoi Training Engine
//!
//! Platform-agnostic support-card training simulation. Resolves card effects
//! at a level, flattens unique effects into normal effects, samples facility
//! assignments per turn and aggregates stat gains into summary statistics.
//! No UI, file or platform dependencies live here.

pub mod aggregate;
pub mod card;
pub mod constants;
pub mod data;
pub mod deck;
pub mod effect;
pub mod flatten;
pub mod numbers;
pub mod resolver;
pub mod sampler;
pub mod scenario;
pub mod seed;
pub mod session;
pub mod summary;
pub mod trainee;
pub mod turn;
pub mod unique;

use thiserror::Error;

// Re-export commonly used types
pub use aggregate::{
    FacilityOutcome, FacilitySamples, NoopObserver, RunControl, Simulation, SimulationError,
    SimulationObserver, SimulationSamples, run,
};
pub use card::{Card, CardType, Rarity};
pub use data::{CardCatalog, ScenarioCatalog};
pub use deck::{Deck, DeckError, DeckSlot};
pub use effect::{EffectKind, EffectMap, UniqueEffectKind};
pub use flatten::{EffectWarning, Flattened, flatten};
pub use resolver::{ResolverCache, resolve, resolve_all};
pub use sampler::{Assignment, FacilityDistribution};
pub use scenario::{Facility, FacilityLevel, FacilityType, Scenario, ScenarioError, StatLine};
pub use session::TrainingSession;
pub use summary::{FacilitySummary, SimulationSummary, StatSummary, StatTotal};
pub use trainee::{Mood, Skill, StatGrowth, StatType};
pub use turn::{DeckComposition, TurnConfig, TurnConfigError};
pub use unique::{Contribution, FormulaStatus, Placement, UniqueContext, UniqueEffectError};

/// Trait for abstracting data loading operations
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the support card catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the card data cannot be loaded.
    fn load_cards(&self) -> Result<CardCatalog, Self::Error>;

    /// Load the scenario facility tables
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario data cannot be loaded.
    fn load_scenarios(&self) -> Result<ScenarioCatalog, Self::Error>;
}

/// Loader over the data bundled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticDataLoader;

impl DataLoader for StaticDataLoader {
    type Error = serde_json::Error;

    fn load_cards(&self) -> Result<CardCatalog, Self::Error> {
        CardCatalog::load_from_static()
    }

    fn load_scenarios(&self) -> Result<ScenarioCatalog, Self::Error> {
        ScenarioCatalog::load_from_static()
    }
}

#[derive(Debug, Error)]
pub enum EngineError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[error("failed to load data")]
    Load(#[source] E),
    #[error("unknown scenario {0}")]
    UnknownScenario(u32),
    #[error("unknown card {0}")]
    UnknownCard(u32),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

/// Main engine for building training sessions from loaded data
pub struct TrainingEngine<L>
where
    L: DataLoader,
{
    data_loader: L,
}

impl<L> TrainingEngine<L>
where
    L: DataLoader,
{
    /// Create a new engine with the provided data loader
    pub const fn new(data_loader: L) -> Self {
        Self { data_loader }
    }

    /// Build a deck from `(card id, limit break)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown cards, bad limit breaks, duplicates or
    /// a deck past capacity.
    pub fn build_deck(&self, cards: &[(u32, u8)]) -> Result<Deck, EngineError<L::Error>> {
        let catalog = self.data_loader.load_cards().map_err(EngineError::Load)?;
        let mut deck = Deck::new();
        for (id, limit_break) in cards {
            let card = catalog.get(*id).ok_or(EngineError::UnknownCard(*id))?;
            deck.add(card.clone(), *limit_break)?;
        }
        Ok(deck)
    }

    /// Create a session on scenario `scenario_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if data cannot be loaded, an id is unknown, or the
    /// configuration does not fit the deck.
    pub fn create_session(
        &self,
        scenario_id: u32,
        cards: &[(u32, u8)],
        config: TurnConfig,
        seed: u64,
    ) -> Result<TrainingSession, EngineError<L::Error>> {
        let scenarios = self
            .data_loader
            .load_scenarios()
            .map_err(EngineError::Load)?;
        let scenario = scenarios
            .get(scenario_id)
            .cloned()
            .ok_or(EngineError::UnknownScenario(scenario_id))?;
        let deck = self.build_deck(cards)?;
        Ok(TrainingSession::new(scenario, deck, config, seed)?)
    }
}
