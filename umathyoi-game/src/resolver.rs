//! Effect value resolution: milestone interpolation over a card's effect table.
use log::{debug, warn};
use smallvec::SmallVec;
use std::collections::HashMap;

use crate::card::Card;
use crate::constants::{MILESTONE_LEVELS, NO_MILESTONE};
use crate::effect::{EffectKind, EffectMap};
use crate::numbers::round_f64_to_i32;

type Milestones = SmallVec<[(u32, i32); 11]>;

/// Value of `kind` on `card` at `level`.
///
/// Rows repeating `kind` are summed, matching [`resolve_all`]. Returns 0 (and
/// logs) when the level is outside the card's range or the card has no row
/// for `kind`. A malformed row contributes 0.
#[must_use]
pub fn resolve(card: &Card, kind: EffectKind, level: u32) -> i32 {
    if level < card.min_level() || level > card.max_level() {
        warn!(
            "card {} level {level} outside {}..={}, {kind:?} resolves to 0",
            card.id,
            card.min_level(),
            card.max_level()
        );
        return 0;
    }
    let mut rows = card.effect_rows(kind).peekable();
    if rows.peek().is_none() {
        debug!("card {} has no {kind:?} row", card.id);
        return 0;
    }
    rows.fold(0_i32, |total, row| {
        total.saturating_add(resolve_row(card.id, kind, row, level))
    })
}

/// Every effect on `card` at `level` with a nonzero value.
#[must_use]
pub fn resolve_all(card: &Card, level: u32) -> EffectMap {
    let mut resolved = EffectMap::new();
    if level < card.min_level() || level > card.max_level() {
        warn!(
            "card {} level {level} outside {}..={}, no effects resolved",
            card.id,
            card.min_level(),
            card.max_level()
        );
        return resolved;
    }
    for row in &card.effects {
        let Some(&id) = row.first() else {
            warn!("card {} has an empty effect row", card.id);
            continue;
        };
        let Some(kind) = EffectKind::from_id(id) else {
            warn!("card {} has unknown effect id {id}", card.id);
            continue;
        };
        resolved.add(kind, resolve_row(card.id, kind, row, level));
    }
    resolved
}

fn resolve_row(card_id: u32, kind: EffectKind, row: &[i32], level: u32) -> i32 {
    let values = row.get(1..).unwrap_or_default();
    if values.len() != MILESTONE_LEVELS.len() {
        warn!(
            "card {card_id} {kind:?} row carries {} values, expected {}",
            values.len(),
            MILESTONE_LEVELS.len()
        );
        return 0;
    }
    let milestones: Milestones = MILESTONE_LEVELS
        .iter()
        .zip(values)
        .filter(|(_, value)| **value != NO_MILESTONE)
        .map(|(level, value)| (*level, *value))
        .collect();
    interpolate(&milestones, level)
}

/// Interpolate between ascending `(level, value)` anchors.
///
/// Exact anchors are returned verbatim, levels outside the anchors clamp to
/// the nearest end, and in-between levels round half away from zero.
#[must_use]
pub fn interpolate(milestones: &[(u32, i32)], level: u32) -> i32 {
    let (Some(&(first_level, first_value)), Some(&(last_level, last_value))) =
        (milestones.first(), milestones.last())
    else {
        return 0;
    };
    if level <= first_level {
        return first_value;
    }
    if level >= last_level {
        return last_value;
    }
    for pair in milestones.windows(2) {
        let (low_level, low_value) = pair[0];
        let (high_level, high_value) = pair[1];
        if level == low_level {
            return low_value;
        }
        if level == high_level {
            return high_value;
        }
        if level > low_level && level < high_level {
            let span = f64::from(high_level - low_level);
            let offset = f64::from(level - low_level);
            let delta = f64::from(high_value) - f64::from(low_value);
            return round_f64_to_i32(f64::from(low_value) + delta * offset / span);
        }
    }
    last_value
}

/// Memoized resolver keyed by `(card, effect, level)` for single effects and
/// `(card, level)` for whole cards.
#[derive(Debug, Clone, Default)]
pub struct ResolverCache {
    entries: HashMap<(u32, EffectKind, u32), i32>,
    maps: HashMap<(u32, u32), EffectMap>,
    hits: u64,
    misses: u64,
}

impl ResolverCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, card: &Card, kind: EffectKind, level: u32) -> i32 {
        if let Some(value) = self.entries.get(&(card.id, kind, level)) {
            self.hits = self.hits.saturating_add(1);
            return *value;
        }
        self.misses = self.misses.saturating_add(1);
        let value = resolve(card, kind, level);
        self.entries.insert((card.id, kind, level), value);
        value
    }

    pub fn resolve_all(&mut self, card: &Card, level: u32) -> EffectMap {
        if let Some(map) = self.maps.get(&(card.id, level)) {
            self.hits = self.hits.saturating_add(1);
            return map.clone();
        }
        self.misses = self.misses.saturating_add(1);
        let map = resolve_all(card, level);
        self.maps.insert((card.id, level), map.clone());
        map
    }

    #[must_use]
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    #[must_use]
    pub const fn misses(&self) -> u64 {
        self.misses
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len() + self.maps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.maps.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.maps.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
