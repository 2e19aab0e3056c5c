mod common;
mod logic;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use umathyoi_game::constants::{
    DEFAULT_BOND, DEFAULT_ENERGY, DEFAULT_FAN_COUNT, DEFAULT_MAX_ENERGY, DEFAULT_TURN_COUNT,
};
use umathyoi_game::{DataLoader, Mood, TrainingEngine, TurnConfig};

use common::split_csv;
use logic::{
    FileDataLoader, RunPlan, RunReport, parse_deck_list, parse_facility_levels,
    resolve_seed_inputs, run_seeds,
};

const DEFAULT_DECK: &str = "30189:4,30208:4,30107:4,30086:4,30102:4,30207:4";

#[derive(Debug, Parser)]
#[command(name = "umathyoi-tester", version = "0.1.0")]
#[command(about = "Monte Carlo deck efficiency runs for umathyoi support card decks")]
struct Args {
    /// Card catalog JSON (defaults to the bundled sample cards)
    #[arg(long)]
    cards: Option<PathBuf>,

    /// Scenario catalog JSON (defaults to the bundled scenarios)
    #[arg(long)]
    scenarios: Option<PathBuf>,

    /// Scenario id to train in
    #[arg(long, default_value_t = 1)]
    scenario: u32,

    /// Deck as comma-separated `card_id[:limit_break]` entries
    #[arg(long, default_value = DEFAULT_DECK)]
    deck: String,

    /// List the loaded cards and exit
    #[arg(long)]
    list_cards: bool,

    /// Turns to simulate per seed
    #[arg(long, default_value_t = DEFAULT_TURN_COUNT)]
    turns: u32,

    /// Seeds to run (comma-separated integers, 0x hex, or words)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Trainee mood: awful, bad, normal, good or great
    #[arg(long, default_value = "good", value_parser = parse_mood)]
    mood: Mood,

    #[arg(long, default_value_t = DEFAULT_ENERGY)]
    energy: u32,

    #[arg(long, default_value_t = DEFAULT_MAX_ENERGY)]
    max_energy: u32,

    /// Current fan count
    #[arg(long, default_value_t = DEFAULT_FAN_COUNT)]
    fans: u32,

    /// Bond gauge applied to every card
    #[arg(long, default_value_t = DEFAULT_BOND)]
    bond: u8,

    /// Facility level overrides, e.g. `speed:5,wit:2`
    #[arg(long)]
    facility_levels: Option<String>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn parse_mood(value: &str) -> Result<Mood, String> {
    Mood::parse(value).ok_or_else(|| format!("unknown mood {value}"))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let loader = FileDataLoader::new(args.cards.clone(), args.scenarios.clone());
    if maybe_list_cards(&args, &loader)? {
        return Ok(());
    }

    let start_time = Instant::now();
    let plan = build_plan(&args)?;
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    if args.verbose {
        announce_banner(&plan, seeds.len());
    }

    let engine = TrainingEngine::new(loader);
    let reports = run_seeds(&engine, &plan, &seeds)?;
    write_reports(&args, &reports, start_time)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn maybe_list_cards(args: &Args, loader: &FileDataLoader) -> Result<bool> {
    if !args.list_cards {
        return Ok(false);
    }
    let catalog = loader.load_cards().context("failed to load cards")?;
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available cards:")?;
    for card in catalog.iter() {
        writeln!(
            output_target.writer(),
            "  {:>6} {:<3} {:<7} - {}",
            card.id,
            card.rarity.to_string(),
            format!("{:?}", card.card_type).to_lowercase(),
            card.name
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn build_plan(args: &Args) -> Result<RunPlan> {
    let deck = parse_deck_list(&args.deck)?;
    let mut config = TurnConfig {
        fan_count: args.fans,
        mood: args.mood,
        energy: args.energy,
        max_energy: args.max_energy,
        default_bond: args.bond,
        ..TurnConfig::default()
    };
    if let Some(levels) = &args.facility_levels {
        for (facility, level) in parse_facility_levels(levels)? {
            config.set_facility_level(facility, level);
        }
    }
    Ok(RunPlan {
        scenario_id: args.scenario,
        deck,
        config,
        turns: args.turns,
    })
}

fn announce_banner(plan: &RunPlan, seed_count: usize) {
    println!("{}", "🏇 Umathyoi Deck Tester".bright_cyan().bold());
    println!("{}", "=======================".cyan());
    println!(
        "{} cards, {} turns x {} seeds",
        plan.deck.len(),
        plan.turns,
        seed_count
    );
}

fn write_reports(args: &Args, reports: &[RunReport], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, reports)?,
        "markdown" => logic::reports::generate_markdown_report(&mut output_target, reports)?,
        _ => {
            let duration = start_time.elapsed();
            logic::reports::generate_console_report(&mut output_target, reports, duration)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
