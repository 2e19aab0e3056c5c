//! Flattening a card's normal and unique effects into one additive map.
use log::warn;
use smallvec::SmallVec;
use thiserror::Error;

use crate::card::Card;
use crate::effect::{EffectKind, EffectMap, UniqueEffectKind, is_simple_unique};
use crate::resolver::resolve_all;
use crate::unique::{self, FormulaStatus, UniqueContext, UniqueEffectError};

/// A data problem met while flattening. Also logged when raised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EffectWarning {
    /// Row carried no id at all.
    #[error("card {card} has an empty unique effect row")]
    EmptyUniqueRow { card: u32 },
    /// An alias row without exactly one value. The first value is used if present.
    #[error("card {card} unique effect {kind} aliases a normal effect but carries {values} values")]
    AliasShape { card: u32, kind: i32, values: usize },
    /// The row could not be evaluated and was skipped.
    #[error("card {card} skipped: {error}")]
    Skipped { card: u32, error: UniqueEffectError },
    /// The row used a placeholder formula.
    #[error("card {card} unique effect {} used an unverified formula", .kind.id())]
    Unverified { card: u32, kind: UniqueEffectKind },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flattened {
    pub effects: EffectMap,
    pub warnings: Vec<EffectWarning>,
}

impl Flattened {
    #[must_use]
    pub fn from_effects(effects: EffectMap) -> Self {
        Self {
            effects,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, warning: EffectWarning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }
}

/// Which unique rows to fold in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueScope {
    All,
    /// Everything except rows that read the turn's facility placement.
    Static,
}

/// Total additive contribution of `card` at `level`.
#[must_use]
pub fn flatten(card: &Card, level: u32, ctx: &UniqueContext<'_>) -> Flattened {
    let mut flattened = Flattened::from_effects(resolve_all(card, level));
    add_unique_effects(card, level, ctx, UniqueScope::All, &mut flattened);
    flattened
}

/// Fold the card's unique rows into `out`, if unlocked at `level`.
pub fn add_unique_effects(
    card: &Card,
    level: u32,
    ctx: &UniqueContext<'_>,
    scope: UniqueScope,
    out: &mut Flattened,
) {
    if !card.unique_unlocked(level) {
        return;
    }
    for row in &card.unique_effects {
        let Some((&id, params)) = row.split_first() else {
            out.warn(EffectWarning::EmptyUniqueRow { card: card.id });
            continue;
        };
        if is_simple_unique(id) {
            add_alias_row(card.id, id, params, out);
            continue;
        }
        if scope == UniqueScope::Static
            && UniqueEffectKind::from_id(id).is_some_and(UniqueEffectKind::depends_on_placement)
        {
            continue;
        }
        match unique::evaluate(id, params, ctx) {
            Ok(contribution) => {
                if let (FormulaStatus::Unverified, Some(kind)) =
                    (contribution.status, UniqueEffectKind::from_id(id))
                {
                    out.warnings
                        .push(EffectWarning::Unverified { card: card.id, kind });
                }
                for (kind, delta) in contribution.deltas {
                    out.effects.add(kind, delta);
                }
            }
            Err(error) => out.warn(EffectWarning::Skipped {
                card: card.id,
                error,
            }),
        }
    }
}

fn add_alias_row(card: u32, id: i32, params: &[i32], out: &mut Flattened) {
    let Some(kind) = EffectKind::from_id(id) else {
        out.warn(EffectWarning::Skipped {
            card,
            error: UniqueEffectError::Unsupported { kind: id },
        });
        return;
    };
    let meaningful = params.iter().rposition(|value| *value != 0).map_or(1, |i| i + 1);
    if params.is_empty() || meaningful > 1 {
        out.warn(EffectWarning::AliasShape {
            card,
            kind: id,
            values: params.len(),
        });
    }
    if let Some(delta) = params.first() {
        out.effects.add(kind, *delta);
    }
}

/// A unique row whose value depends on where the card trains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementRow {
    pub kind: UniqueEffectKind,
    pub params: SmallVec<[i32; 5]>,
}

impl PlacementRow {
    /// Placement-dependent rows active at `level`.
    #[must_use]
    pub fn collect(card: &Card, level: u32) -> Vec<Self> {
        if !card.unique_unlocked(level) {
            return Vec::new();
        }
        card.unique_effects
            .iter()
            .filter_map(|row| {
                let (&id, params) = row.split_first()?;
                let kind = UniqueEffectKind::from_id(id)?;
                kind.depends_on_placement().then(|| Self {
                    kind,
                    params: SmallVec::from_slice(params),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardType, Rarity};
    use crate::constants::NO_MILESTONE;
    use crate::deck::Deck;
    use crate::scenario::FacilityType;
    use crate::turn::{DeckComposition, TurnConfig};
    use crate::unique::Placement;

    const U: i32 = NO_MILESTONE;

    fn card(unique_effects: Vec<Vec<i32>>) -> Card {
        Card {
            id: 30_189,
            name: String::from("Test"),
            rarity: Rarity::SSR,
            card_type: CardType::Speed,
            effects: vec![
                vec![1, 10, U, U, U, U, U, 25, U, U, U, 35],
                vec![3, 1, U, U, U, U, U, U, U, U, U, 2],
            ],
            unique_effects,
            unique_unlock_level: 25,
        }
    }

    fn with_ctx<R>(card: &Card, f: impl FnOnce(&UniqueContext<'_>) -> R) -> R {
        let config = TurnConfig::default();
        let deck = Deck::from_cards([(card.clone(), 4)]).unwrap();
        let composition = DeckComposition::new(&deck, &config);
        let ctx = UniqueContext::new(card, config.bond(card.id), &config, &composition);
        f(&ctx)
    }

    #[test]
    fn alias_rows_add_to_resolved_value() {
        let card = card(vec![vec![1, 10]]);
        let flattened = with_ctx(&card, |ctx| flatten(&card, 50, ctx));
        assert_eq!(flattened.effects.get(EffectKind::FriendshipEffectiveness), 45);
        assert_eq!(flattened.effects.get(EffectKind::SpeedBonus), 2);
        assert!(flattened.warnings.is_empty());
    }

    #[test]
    fn locked_unique_effects_are_ignored() {
        let card = card(vec![vec![1, 10], vec![101, 80, 3, 10]]);
        let flattened = with_ctx(&card, |ctx| flatten(&card, 24, ctx));
        // 10 + 15 * 23/29 rounds to 22; the alias row would have added 10.
        assert_eq!(flattened.effects.get(EffectKind::FriendshipEffectiveness), 22);
        assert_eq!(flattened.effects.get(EffectKind::SpeedBonus), 1);
    }

    #[test]
    fn formula_rows_accumulate_with_normal_effects() {
        let card = card(vec![vec![101, 80, 3, 10], vec![113, 3, 2]]);
        let placed = with_ctx(&card, |ctx| {
            let ctx = ctx.placed(Placement {
                facility: FacilityType::Speed,
                card_count: 1,
                distinct_types: 1,
            });
            flatten(&card, 50, &ctx)
        });
        assert_eq!(placed.effects.get(EffectKind::SpeedBonus), 14);
        assert!(placed.warnings.is_empty());

        let unplaced = with_ctx(&card, |ctx| flatten(&card, 50, ctx));
        assert_eq!(unplaced.effects.get(EffectKind::SpeedBonus), 12);
        assert_eq!(unplaced.warnings.len(), 1);
    }

    #[test]
    fn static_scope_skips_placement_rows() {
        let card = card(vec![vec![101, 80, 3, 10], vec![113, 3, 2]]);
        let flattened = with_ctx(&card, |ctx| {
            let mut out = Flattened::from_effects(resolve_all(&card, 50));
            add_unique_effects(&card, 50, ctx, UniqueScope::Static, &mut out);
            out
        });
        assert_eq!(flattened.effects.get(EffectKind::SpeedBonus), 12);
        assert!(flattened.warnings.is_empty());

        let rows = PlacementRow::collect(&card, 50);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, UniqueEffectKind::BonusIfFriendshipTraining);
        assert!(PlacementRow::collect(&card, 20).is_empty());
    }

    #[test]
    fn bad_rows_are_skipped_with_warnings() {
        let card = card(vec![
            vec![199, 1],
            vec![],
            vec![101, 80, 3],
            vec![3, 2, 5],
            vec![108, 1, 0, 0, 5, 20],
        ]);
        let flattened = with_ctx(&card, |ctx| flatten(&card, 50, ctx));
        assert!(flattened.warnings.contains(&EffectWarning::Skipped {
            card: 30_189,
            error: UniqueEffectError::Unsupported { kind: 199 }
        }));
        assert!(flattened.warnings.contains(&EffectWarning::EmptyUniqueRow { card: 30_189 }));
        assert!(flattened.warnings.contains(&EffectWarning::AliasShape {
            card: 30_189,
            kind: 3,
            values: 2
        }));
        assert!(flattened.warnings.contains(&EffectWarning::Unverified {
            card: 30_189,
            kind: UniqueEffectKind::BonusOnMoreMaxEnergy
        }));
        // Alias uses its first value, the placeholder adds its max bonus.
        assert_eq!(flattened.effects.get(EffectKind::SpeedBonus), 4);
        assert_eq!(flattened.effects.get(EffectKind::FriendshipEffectiveness), 55);
    }

    #[test]
    fn warnings_render_card_and_row() {
        let skipped = EffectWarning::Skipped {
            card: 7,
            error: UniqueEffectError::Unsupported { kind: 199 },
        };
        assert_eq!(skipped.to_string(), "card 7 skipped: unsupported unique effect 199");
        assert_eq!(
            EffectWarning::AliasShape {
                card: 7,
                kind: 3,
                values: 2
            }
            .to_string(),
            "card 7 unique effect 3 aliases a normal effect but carries 2 values"
        );
        assert_eq!(
            EffectWarning::Unverified {
                card: 7,
                kind: UniqueEffectKind::BonusOnMoreMaxEnergy
            }
            .to_string(),
            "card 7 unique effect 108 used an unverified formula"
        );
        assert_eq!(
            EffectWarning::EmptyUniqueRow { card: 7 }.to_string(),
            "card 7 has an empty unique effect row"
        );
    }
}
