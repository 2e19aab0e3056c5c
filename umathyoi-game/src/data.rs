//! Card and scenario catalogs, parsed from JSON.
use serde::{Deserialize, Serialize};

use crate::card::{Card, CardType, Rarity};
use crate::scenario::{Scenario, ScenarioError};

const DEFAULT_CARD_DATA: &str = include_str!("../assets/data/cards.json");
const DEFAULT_SCENARIO_DATA: &str = include_str!("../assets/data/scenarios.json");

/// Every support card known to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CardCatalog {
    pub cards: Vec<Card>,
}

impl CardCatalog {
    /// Load card data from JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid card data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Bundled sample cards.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON is malformed.
    pub fn load_from_static() -> Result<Self, serde_json::Error> {
        Self::from_json(DEFAULT_CARD_DATA)
    }

    #[must_use]
    pub fn get(&self, id: u32) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn by_rarity(&self, rarity: Rarity) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter().filter(move |card| card.rarity == rarity)
    }

    pub fn by_type(&self, card_type: CardType) -> impl Iterator<Item = &Card> + '_ {
        self.cards
            .iter()
            .filter(move |card| card.card_type == card_type)
    }

    /// Cards matching every given filter. Names match case-insensitively on substrings.
    pub fn search<'a>(
        &'a self,
        name: Option<&'a str>,
        rarity: Option<Rarity>,
        card_type: Option<CardType>,
    ) -> impl Iterator<Item = &'a Card> + 'a {
        let needle = name.map(str::to_lowercase);
        self.cards.iter().filter(move |card| {
            needle
                .as_deref()
                .is_none_or(|needle| card.name.to_lowercase().contains(needle))
                && rarity.is_none_or(|rarity| card.rarity == rarity)
                && card_type.is_none_or(|card_type| card.card_type == card_type)
        })
    }
}

/// Scenario facility tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScenarioCatalog {
    pub scenarios: Vec<Scenario>,
}

impl ScenarioCatalog {
    /// Load scenario data from JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid scenario data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Bundled scenario tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON is malformed.
    pub fn load_from_static() -> Result<Self, serde_json::Error> {
        Self::from_json(DEFAULT_SCENARIO_DATA)
    }

    #[must_use]
    pub fn get(&self, id: u32) -> Option<&Scenario> {
        self.scenarios.iter().find(|scenario| scenario.id == id)
    }

    #[must_use]
    pub fn first(&self) -> Option<&Scenario> {
        self.scenarios.first()
    }

    /// # Errors
    ///
    /// Returns the first scenario table with a missing facility or level row.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        self.scenarios.iter().try_for_each(Scenario::validate)
    }
}
