use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;
use std::time::Instant;
use umathyoi_game::{
    DataLoader, RunControl, SimulationObserver, SimulationSamples, SimulationSummary,
    TrainingEngine, TrainingSession, TurnConfig,
};

use super::seeds::SeedInfo;

/// One card of the simulated deck as echoed in reports.
#[derive(Debug, Clone, Serialize)]
pub struct DeckEntry {
    pub id: u32,
    pub name: String,
    pub limit_break: u8,
    pub level: u32,
}

/// Outcome of one seeded run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_label: Option<String>,
    pub scenario: String,
    pub deck: Vec<DeckEntry>,
    pub summary: SimulationSummary,
    pub draws: u64,
    pub warnings: Vec<String>,
    pub elapsed_ms: u64,
}

/// What to simulate; one report is produced per seed.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub scenario_id: u32,
    pub deck: Vec<(u32, u8)>,
    pub config: TurnConfig,
    pub turns: u32,
}

/// Logs progress at every tenth of the run.
struct ProgressLog {
    seed: u64,
    next_tenth: u32,
}

impl SimulationObserver for ProgressLog {
    fn on_started(&mut self, total_turns: u32) {
        debug!("seed {}: starting {total_turns} turns", self.seed);
    }

    fn on_progress(&mut self, completed: u32, total: u32) -> RunControl {
        let tenths = u64::from(completed) * 10 / u64::from(total.max(1));
        if tenths >= u64::from(self.next_tenth) {
            info!("seed {}: {completed}/{total} turns", self.seed);
            self.next_tenth = u32::try_from(tenths).unwrap_or(u32::MAX).saturating_add(1);
        }
        RunControl::Continue
    }

    fn on_finished(&mut self, samples: &SimulationSamples) {
        debug!("seed {}: finished after {} draws", self.seed, samples.draws);
    }
}

/// Build one session for `plan` and rerun it for every seed.
///
/// # Errors
///
/// Returns data loading, deck and configuration errors, which abort before
/// any turn runs.
pub fn run_seeds<L>(engine: &TrainingEngine<L>, plan: &RunPlan, seeds: &[SeedInfo]) -> Result<Vec<RunReport>>
where
    L: DataLoader,
{
    let first_seed = seeds.first().map_or(0, |info| info.seed);
    let mut session = engine
        .create_session(plan.scenario_id, &plan.deck, plan.config.clone(), first_seed)
        .context("failed to build training session")?;
    session.set_turn_count(plan.turns);

    seeds
        .iter()
        .map(|info| run_one(&mut session, info))
        .collect()
}

fn run_one(session: &mut TrainingSession, info: &SeedInfo) -> Result<RunReport> {
    session.set_seed(info.seed);
    let started = Instant::now();
    let mut progress = ProgressLog {
        seed: info.seed,
        next_tenth: 1,
    };
    let draws = session
        .recalc(&mut progress)
        .with_context(|| format!("simulation failed for seed {}", info.seed))?
        .draws;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let summary = session
        .summary()
        .context("finished run did not store samples")?;

    let deck = session
        .deck()
        .cards()
        .map(|slot| DeckEntry {
            id: slot.card.id,
            name: slot.card.name.clone(),
            limit_break: slot.limit_break,
            level: session.config().card_level(slot),
        })
        .collect();

    Ok(RunReport {
        seed: info.seed,
        seed_label: info.label.clone(),
        scenario: session.scenario().name.clone(),
        deck,
        summary,
        draws,
        warnings: session
            .warnings()
            .iter()
            .map(ToString::to_string)
            .collect(),
        elapsed_ms,
    })
}
