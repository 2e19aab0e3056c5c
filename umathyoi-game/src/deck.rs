//! Deck slots: which cards train with the trainee and at what limit break.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::card::Card;
use crate::constants::{DEFAULT_DECK_SIZE, MAX_LIMIT_BREAK, MIN_LIMIT_BREAK};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error("deck capacity must be at least one slot")]
    ZeroCapacity,
    #[error("slot {slot} is outside the deck (capacity {capacity})")]
    SlotOutOfRange { slot: usize, capacity: usize },
    #[error("slot {slot} is empty")]
    EmptySlot { slot: usize },
    #[error(
        "limit break {limit_break} outside {}..={}",
        MIN_LIMIT_BREAK,
        MAX_LIMIT_BREAK
    )]
    LimitBreakOutOfRange { limit_break: u8 },
    #[error("deck is full ({capacity} slots)")]
    DeckFull { capacity: usize },
    #[error("card {card} is already in the deck")]
    DuplicateCard { card: u32 },
}

/// A filled slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSlot {
    pub card: Card,
    pub limit_break: u8,
}

impl DeckSlot {
    /// Highest level the card can reach at this slot's limit break.
    #[must_use]
    pub fn max_level(&self) -> u32 {
        self.card.max_level_at(self.limit_break)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    slots: Vec<Option<DeckSlot>>,
}

impl Default for Deck {
    fn default() -> Self {
        Self {
            slots: vec![None; DEFAULT_DECK_SIZE],
        }
    }
}

impl Deck {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns [`DeckError::ZeroCapacity`] for an empty deck.
    pub fn with_capacity(capacity: usize) -> Result<Self, DeckError> {
        if capacity == 0 {
            return Err(DeckError::ZeroCapacity);
        }
        Ok(Self {
            slots: vec![None; capacity],
        })
    }

    /// Build a deck by filling slots in order.
    ///
    /// # Errors
    ///
    /// Fails on the first card that [`Deck::add`] rejects.
    pub fn from_cards<I>(cards: I) -> Result<Self, DeckError>
    where
        I: IntoIterator<Item = (Card, u8)>,
    {
        let mut deck = Self::new();
        for (card, limit_break) in cards {
            deck.add(card, limit_break)?;
        }
        Ok(deck)
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of filled slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    #[must_use]
    pub fn contains(&self, card_id: u32) -> bool {
        self.cards().any(|slot| slot.card.id == card_id)
    }

    #[must_use]
    pub fn slot(&self, slot: usize) -> Option<&DeckSlot> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Filled slots in slot order. This is the order draws are made in.
    pub fn cards(&self) -> impl Iterator<Item = &DeckSlot> + '_ {
        self.slots.iter().flatten()
    }

    /// Put a card in the first empty slot and return that slot's index.
    ///
    /// # Errors
    ///
    /// Rejects bad limit breaks, duplicates and full decks.
    pub fn add(&mut self, card: Card, limit_break: u8) -> Result<usize, DeckError> {
        check_limit_break(limit_break)?;
        if self.contains(card.id) {
            return Err(DeckError::DuplicateCard { card: card.id });
        }
        let index = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(DeckError::DeckFull {
                capacity: self.capacity(),
            })?;
        self.slots[index] = Some(DeckSlot { card, limit_break });
        Ok(index)
    }

    /// Put a card in a specific slot, returning whatever was there.
    ///
    /// # Errors
    ///
    /// Rejects out-of-range slots, bad limit breaks and cards already held
    /// by another slot.
    pub fn set(
        &mut self,
        slot: usize,
        card: Card,
        limit_break: u8,
    ) -> Result<Option<DeckSlot>, DeckError> {
        self.check_slot(slot)?;
        check_limit_break(limit_break)?;
        let duplicate = self
            .slots
            .iter()
            .enumerate()
            .any(|(index, held)| index != slot && held.as_ref().is_some_and(|s| s.card.id == card.id));
        if duplicate {
            return Err(DeckError::DuplicateCard { card: card.id });
        }
        Ok(self.slots[slot].replace(DeckSlot { card, limit_break }))
    }

    /// # Errors
    ///
    /// Fails for slots outside the deck or slots already empty.
    pub fn remove(&mut self, slot: usize) -> Result<DeckSlot, DeckError> {
        self.check_slot(slot)?;
        self.slots[slot].take().ok_or(DeckError::EmptySlot { slot })
    }

    /// # Errors
    ///
    /// Fails for bad slots, empty slots and limit breaks past the cap.
    pub fn set_limit_break(&mut self, slot: usize, limit_break: u8) -> Result<(), DeckError> {
        self.check_slot(slot)?;
        check_limit_break(limit_break)?;
        let held = self.slots[slot]
            .as_mut()
            .ok_or(DeckError::EmptySlot { slot })?;
        held.limit_break = limit_break;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    fn check_slot(&self, slot: usize) -> Result<(), DeckError> {
        if slot >= self.capacity() {
            return Err(DeckError::SlotOutOfRange {
                slot,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }
}

const fn check_limit_break(limit_break: u8) -> Result<(), DeckError> {
    if limit_break > MAX_LIMIT_BREAK {
        return Err(DeckError::LimitBreakOutOfRange { limit_break });
    }
    Ok(())
}
