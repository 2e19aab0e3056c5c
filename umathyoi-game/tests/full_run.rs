use umathyoi_game::constants::NO_MILESTONE;
use umathyoi_game::{
    Card, CardType, Deck, DeckComposition, EffectKind, FacilityType, Mood, NoopObserver, Rarity,
    ResolverCache, ScenarioCatalog, Simulation, SimulationSummary, StatType, StaticDataLoader,
    TrainingEngine, TurnConfig, UniqueContext, flatten, resolve, run,
};

const U: i32 = NO_MILESTONE;

fn flat_row(id: i32, value: i32) -> Vec<i32> {
    vec![id, value, U, U, U, U, U, U, U, U, U, value]
}

fn card(id: u32, card_type: CardType, effects: Vec<Vec<i32>>, unique: Vec<Vec<i32>>) -> Card {
    Card {
        id,
        name: format!("Card {id}"),
        rarity: Rarity::SSR,
        card_type,
        effects,
        unique_effects: unique,
        unique_unlock_level: 25,
    }
}

fn level_one(mood: Mood) -> TurnConfig {
    let mut config = TurnConfig {
        mood,
        ..TurnConfig::default()
    };
    for facility in FacilityType::ALL {
        config.set_facility_level(facility, 1);
    }
    config
}

fn ura() -> umathyoi_game::Scenario {
    ScenarioCatalog::load_from_static()
        .unwrap()
        .get(1)
        .cloned()
        .unwrap()
}

#[test]
fn fans_bonus_raises_training_multiplier() {
    let fans = card(1, CardType::Pal, Vec::new(), vec![vec![104, 10_000, 20]]);
    let deck = Deck::from_cards([(fans, 4)]).unwrap();
    let config = TurnConfig {
        fan_count: 150_000,
        ..level_one(Mood::Normal)
    };
    let scenario = ura();
    let mut cache = ResolverCache::new();
    let simulation = Simulation::new(&config, &deck, &scenario, &mut cache).unwrap();

    let outcome = simulation.train_with(FacilityType::Speed, &[1]).unwrap();
    // 10 * 1.15 * 1.05 = 12.07 and 5 * 1.2075 = 6.03
    assert_eq!(outcome.stat(StatType::Speed), 12);
    assert_eq!(outcome.stat(StatType::Power), 6);

    let slot = deck.cards().next().unwrap();
    let composition = DeckComposition::new(&deck, &config);
    let ctx = UniqueContext::new(&slot.card, 80, &config, &composition);
    let flattened = flatten(&slot.card, 50, &ctx);
    assert_eq!(flattened.effects.get(EffectKind::TrainingEffectiveness), 15);
}

#[test]
fn bond_gate_switches_speed_bonus() {
    let gated = card(2, CardType::Speed, Vec::new(), vec![vec![101, 80, 3, 10]]);
    let deck = Deck::from_cards([(gated.clone(), 4)]).unwrap();
    let mut config = TurnConfig::default();
    let composition = DeckComposition::new(&deck, &config);

    let at_80 = UniqueContext::new(&gated, 80, &config, &composition);
    assert_eq!(
        flatten(&gated, 50, &at_80).effects.get(EffectKind::SpeedBonus),
        10
    );
    let at_79 = UniqueContext::new(&gated, 79, &config, &composition);
    assert_eq!(
        flatten(&gated, 50, &at_79).effects.get(EffectKind::SpeedBonus),
        0
    );

    // The same gate, driven through the per-card bond of a configured run.
    let scenario = ura();
    let mut cache = ResolverCache::new();
    config.set_bond(2, 79);
    let low_speed = Simulation::new(&config, &deck, &scenario, &mut cache)
        .unwrap()
        .train_with(FacilityType::Speed, &[2])
        .unwrap();
    config.set_bond(2, 80);
    let high_speed = Simulation::new(&config, &deck, &scenario, &mut cache)
        .unwrap()
        .train_with(FacilityType::Speed, &[2])
        .unwrap();
    assert!(high_speed.stat(StatType::Speed) > low_speed.stat(StatType::Speed));
}

#[test]
fn worked_example_on_bundled_scenario() {
    let speed = card(
        3,
        CardType::Speed,
        vec![flat_row(3, 2), flat_row(1, 25), flat_row(8, 10)],
        Vec::new(),
    );
    let deck = Deck::from_cards([(speed, 4)]).unwrap();
    let config = level_one(Mood::Good);
    let scenario = ura();
    let mut cache = ResolverCache::new();
    let simulation = Simulation::new(&config, &deck, &scenario, &mut cache).unwrap();
    let outcome = simulation.train_with(FacilityType::Speed, &[3]).unwrap();
    assert_eq!(outcome.stat(StatType::Speed), 19);
    assert_eq!(outcome.stat(StatType::Power), 7);
    assert_eq!(outcome.skill_points, 2);
}

#[test]
fn alias_unique_adds_exactly_to_resolved_value() {
    let engine_cards = umathyoi_game::CardCatalog::load_from_static().unwrap();
    let king_halo = engine_cards.get(20_031).unwrap();
    let deck = Deck::from_cards([(king_halo.clone(), 4)]).unwrap();
    let config = TurnConfig::default();
    let composition = DeckComposition::new(&deck, &config);
    let level = king_halo.max_level();
    let ctx = UniqueContext::new(king_halo, 80, &config, &composition);

    let resolved = resolve(king_halo, EffectKind::FriendshipEffectiveness, level);
    let delta = king_halo.unique_effects[0][1];
    assert_eq!(
        flatten(king_halo, level, &ctx)
            .effects
            .get(EffectKind::FriendshipEffectiveness),
        resolved + delta
    );
}

#[test]
fn bundled_run_summary_is_consistent() {
    let engine = TrainingEngine::new(StaticDataLoader);
    let mut session = engine
        .create_session(
            1,
            &[
                (30_189, 4),
                (30_208, 4),
                (30_107, 4),
                (30_095, 4),
                (30_187, 4),
                (30_207, 4),
            ],
            TurnConfig::default(),
            42,
        )
        .unwrap();
    session.set_turn_count(1_000);
    session.recalc(&mut NoopObserver).unwrap();
    let summary: SimulationSummary = session.summary().unwrap();

    assert_eq!(summary.turn_count, 1_000);
    let mut trained_total = 0;
    for facility in &summary.facilities {
        assert!(facility.turns_trained <= 1_000);
        trained_total += facility.turns_trained;
        for stat in StatType::ALL {
            let stat_summary = facility.stat(stat);
            assert_eq!(stat_summary.count, facility.turns_trained);
            if stat_summary.count > 0 {
                assert!(f64::from(stat_summary.min) <= stat_summary.mean);
                assert!(stat_summary.mean <= f64::from(stat_summary.max));
            }
        }
    }
    assert!(trained_total > 0);
    assert!(summary.stat_total(StatType::Speed).total > 0);
    // The placeholder formula on Seeking the Pearl is reported.
    assert!(
        session
            .warnings()
            .iter()
            .any(|warning| warning.to_string().contains("unverified"))
    );
}

#[test]
fn deck_free_run_collects_nothing() {
    let config = TurnConfig::default();
    let samples = run(100, &config, &Deck::new(), &ura(), 1, &mut NoopObserver).unwrap();
    let summary = SimulationSummary::new(&samples);
    for facility in &summary.facilities {
        assert_eq!(facility.turns_trained, 0);
        assert_eq!(facility.stat(StatType::Speed).max, 0);
    }
    assert_eq!(samples.draws, 0);
}
