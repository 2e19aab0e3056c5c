//! Trainee-side inputs: core stats, mood, stat growth and owned skills.
use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_TOTAL_STAT_GROWTH, MOOD_MULTIPLIER_AWFUL, MOOD_MULTIPLIER_BAD, MOOD_MULTIPLIER_GOOD,
    MOOD_MULTIPLIER_GREAT, MOOD_MULTIPLIER_NORMAL, PERCENTAGE_BASE,
};

/// The five trainable stats, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatType {
    Speed,
    Stamina,
    Power,
    Guts,
    Wit,
}

impl StatType {
    pub const ALL: [Self; 5] = [
        Self::Speed,
        Self::Stamina,
        Self::Power,
        Self::Guts,
        Self::Wit,
    ];

    /// Position of the stat inside per-stat arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Speed => 0,
            Self::Stamina => 1,
            Self::Power => 2,
            Self::Guts => 3,
            Self::Wit => 4,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Speed => "speed",
            Self::Stamina => "stamina",
            Self::Power => "power",
            Self::Guts => "guts",
            Self::Wit => "wit",
        }
    }
}

impl std::fmt::Display for StatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trainee mood, scaling every stat gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Awful,
    Bad,
    Normal,
    #[default]
    Good,
    Great,
}

impl Mood {
    pub const ALL: [Self; 5] = [Self::Awful, Self::Bad, Self::Normal, Self::Good, Self::Great];

    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Awful => MOOD_MULTIPLIER_AWFUL,
            Self::Bad => MOOD_MULTIPLIER_BAD,
            Self::Normal => MOOD_MULTIPLIER_NORMAL,
            Self::Good => MOOD_MULTIPLIER_GOOD,
            Self::Great => MOOD_MULTIPLIER_GREAT,
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "awful" => Some(Self::Awful),
            "bad" => Some(Self::Bad),
            "normal" => Some(Self::Normal),
            "good" => Some(Self::Good),
            "great" => Some(Self::Great),
            _ => None,
        }
    }
}

/// Per-stat growth percentages of the trainee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatGrowth {
    #[serde(default)]
    pub speed: u32,
    #[serde(default)]
    pub stamina: u32,
    #[serde(default)]
    pub power: u32,
    #[serde(default)]
    pub guts: u32,
    #[serde(default)]
    pub wit: u32,
}

impl StatGrowth {
    #[must_use]
    pub const fn get(&self, stat: StatType) -> u32 {
        match stat {
            StatType::Speed => self.speed,
            StatType::Stamina => self.stamina,
            StatType::Power => self.power,
            StatType::Guts => self.guts,
            StatType::Wit => self.wit,
        }
    }

    pub fn set(&mut self, stat: StatType, value: u32) {
        match stat {
            StatType::Speed => self.speed = value,
            StatType::Stamina => self.stamina = value,
            StatType::Power => self.power = value,
            StatType::Guts => self.guts = value,
            StatType::Wit => self.wit = value,
        }
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        StatType::ALL
            .iter()
            .map(|stat| self.get(*stat))
            .fold(0_u32, u32::saturating_add)
    }

    #[must_use]
    pub fn within_limit(&self) -> bool {
        self.total() <= MAX_TOTAL_STAT_GROWTH
    }

    /// Character growth multiplier applied to one stat's gain.
    #[must_use]
    pub fn multiplier(&self, stat: StatType) -> f64 {
        (PERCENTAGE_BASE + f64::from(self.get(stat))) / PERCENTAGE_BASE
    }
}

/// An owned skill. Only the effect type matters to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub effect_type: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_multipliers_are_ordered() {
        let values: Vec<f64> = Mood::ALL.iter().map(|mood| mood.multiplier()).collect();
        assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
        assert!((Mood::Good.multiplier() - 1.1).abs() < f64::EPSILON);
        assert_eq!(Mood::parse(" GREAT "), Some(Mood::Great));
        assert_eq!(Mood::parse("sleepy"), None);
    }

    #[test]
    fn stat_growth_limits_and_multiplier() {
        let mut growth = StatGrowth::default();
        growth.set(StatType::Speed, 10);
        growth.set(StatType::Wit, 20);
        assert_eq!(growth.total(), 30);
        assert!(growth.within_limit());
        assert!((growth.multiplier(StatType::Speed) - 1.1).abs() < 1e-12);
        assert!((growth.multiplier(StatType::Guts) - 1.0).abs() < 1e-12);

        growth.set(StatType::Guts, 1);
        assert!(!growth.within_limit());
    }

    #[test]
    fn stat_indexes_follow_canonical_order() {
        for (position, stat) in StatType::ALL.iter().enumerate() {
            assert_eq!(stat.index(), position);
        }
        assert_eq!(StatType::Power.to_string(), "power");
    }
}
