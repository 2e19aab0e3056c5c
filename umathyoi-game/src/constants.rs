//! Centralized game constants for the training simulation.
//!
//! These values pin down the deterministic math of the engine. Keeping them
//! together means balance can only drift through reviewed code changes,
//! never through the JSON data handed in by the loader.

// Card effect tables ---------------------------------------------------------
/// Card levels at which effect tables carry a value, in row order.
pub const MILESTONE_LEVELS: [u32; 11] = [1, 5, 10, 15, 20, 25, 30, 35, 40, 45, 50];
/// Marker for "no milestone at this level" inside an effect row.
pub const NO_MILESTONE: i32 = -1;
/// First unique-effect id that needs a formula instead of a 1:1 alias.
pub const COMPLEX_UNIQUE_EFFECT_THRESHOLD: i32 = 101;
pub const MIN_CARD_LEVEL: u32 = 1;
pub const MIN_LIMIT_BREAK: u8 = 0;
pub const MAX_LIMIT_BREAK: u8 = 4;
pub const LEVELS_PER_LIMIT_BREAK: u32 = 5;

// Deck ----------------------------------------------------------------------
pub const DEFAULT_DECK_SIZE: usize = 6;

// Facilities ----------------------------------------------------------------
pub const MIN_FACILITY_LEVEL: u8 = 1;
pub const MAX_FACILITY_LEVEL: u8 = 5;
pub const DEFAULT_FACILITY_LEVEL: u8 = 3;

// Facility assignment -------------------------------------------------------
pub const FACILITY_BASE_WEIGHT: u32 = 100;
pub const NON_APPEARANCE_BASE_WEIGHT: u32 = 50;

// Bond gauge ----------------------------------------------------------------
pub const MIN_BOND: u8 = 0;
pub const MAX_BOND: u8 = 100;
pub const DEFAULT_BOND: u8 = 80;
pub const FRIENDSHIP_BOND_THRESHOLD: u8 = 80;

// Turn state ----------------------------------------------------------------
pub const DEFAULT_FAN_COUNT: u32 = 100_000;
pub const DEFAULT_ENERGY: u32 = 70;
pub const DEFAULT_MAX_ENERGY: u32 = 104;
/// Energy at or below which "less energy" bonuses are active.
pub const LOW_ENERGY_CEILING: i64 = 100;
/// Flat base added by the combined-bond formula before the per-bond part.
pub const COMBINED_BOND_BASE_BONUS: i64 = 20;

// Training multipliers ------------------------------------------------------
pub const PERCENTAGE_BASE: f64 = 100.0;
pub const SUPPORT_BONUS_PER_CARD: f64 = 0.05;
pub const MOOD_MULTIPLIER_AWFUL: f64 = 0.8;
pub const MOOD_MULTIPLIER_BAD: f64 = 0.9;
pub const MOOD_MULTIPLIER_NORMAL: f64 = 1.0;
pub const MOOD_MULTIPLIER_GOOD: f64 = 1.1;
pub const MOOD_MULTIPLIER_GREAT: f64 = 1.2;

// Trainee -------------------------------------------------------------------
pub const MAX_TOTAL_STAT_GROWTH: u32 = 30;

// Simulation ----------------------------------------------------------------
pub const DEFAULT_TURN_COUNT: u32 = 1_000;
/// Progress notifications fire every this many hundredths of the run.
pub const PROGRESS_STEPS: u32 = 100;
pub(crate) const ASSIGNMENT_STREAM_TAG: &[u8] = b"umathyoi.facility-assignment";
