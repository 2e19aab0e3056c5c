pub mod data;
pub mod deck;
pub mod reports;
pub mod runner;
pub mod seeds;

pub use data::FileDataLoader;
pub use deck::{parse_deck_list, parse_facility_levels};
pub use runner::{RunPlan, RunReport, run_seeds};
pub use seeds::resolve_seed_inputs;
