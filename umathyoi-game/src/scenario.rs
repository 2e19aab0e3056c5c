//! Training facilities and the scenarios that define their yields.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{MAX_FACILITY_LEVEL, MIN_FACILITY_LEVEL};
use crate::trainee::StatType;

/// One of the five training locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityType {
    Speed,
    Stamina,
    Power,
    Guts,
    Wit,
}

impl FacilityType {
    /// Fixed enumeration order used by assignment draws and reports.
    pub const ALL: [Self; 5] = [
        Self::Speed,
        Self::Stamina,
        Self::Power,
        Self::Guts,
        Self::Wit,
    ];

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

impl std::fmt::Display for FacilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-stat integer amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatLine {
    #[serde(default)]
    pub speed: i32,
    #[serde(default)]
    pub stamina: i32,
    #[serde(default)]
    pub power: i32,
    #[serde(default)]
    pub guts: i32,
    #[serde(default)]
    pub wit: i32,
}

impl StatLine {
    #[must_use]
    pub const fn get(&self, stat: StatType) -> i32 {
        match stat {
            StatType::Speed => self.speed,
            StatType::Stamina => self.stamina,
            StatType::Power => self.power,
            StatType::Guts => self.guts,
            StatType::Wit => self.wit,
        }
    }
}

/// Yields of a facility at one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityLevel {
    pub level: u8,
    pub stats: StatLine,
    #[serde(default)]
    pub skill_points: i32,
    #[serde(default)]
    pub energy: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    #[serde(rename = "type")]
    pub kind: FacilityType,
    pub levels: Vec<FacilityLevel>,
}

impl Facility {
    #[must_use]
    pub fn at_level(&self, level: u8) -> Option<&FacilityLevel> {
        self.levels.iter().find(|entry| entry.level == level)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("scenario {scenario} has no {facility} facility")]
    MissingFacility {
        scenario: u32,
        facility: FacilityType,
    },
    #[error("scenario {scenario} {facility} facility has no level {level} row")]
    MissingLevel {
        scenario: u32,
        facility: FacilityType,
        level: u8,
    },
}

/// A career scenario: the facility tables that training runs against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: u32,
    pub name: String,
    pub facilities: Vec<Facility>,
}

impl Scenario {
    #[must_use]
    pub fn facility(&self, kind: FacilityType) -> Option<&Facility> {
        self.facilities.iter().find(|facility| facility.kind == kind)
    }

    /// Yields of `kind` at `level`, if the table carries that row.
    #[must_use]
    pub fn yields(&self, kind: FacilityType, level: u8) -> Option<&FacilityLevel> {
        self.facility(kind)?.at_level(level)
    }

    /// Check that every facility carries a row for every level.
    ///
    /// # Errors
    ///
    /// Returns the first missing facility or level row.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        for kind in FacilityType::ALL {
            let facility = self.facility(kind).ok_or(ScenarioError::MissingFacility {
                scenario: self.id,
                facility: kind,
            })?;
            for level in MIN_FACILITY_LEVEL..=MAX_FACILITY_LEVEL {
                if facility.at_level(level).is_none() {
                    return Err(ScenarioError::MissingLevel {
                        scenario: self.id,
                        facility: kind,
                        level,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_facility(kind: FacilityType, levels: u8) -> Facility {
        Facility {
            kind,
            levels: (1..=levels)
                .map(|level| FacilityLevel {
                    level,
                    stats: StatLine {
                        speed: i32::from(level) + 9,
                        ..StatLine::default()
                    },
                    skill_points: 2,
                    energy: -20,
                })
                .collect(),
        }
    }

    #[test]
    fn validate_reports_missing_rows() {
        let mut scenario = Scenario {
            id: 1,
            name: String::from("Test"),
            facilities: FacilityType::ALL
                .iter()
                .map(|kind| flat_facility(*kind, 5))
                .collect(),
        };
        assert!(scenario.validate().is_ok());
        assert_eq!(
            scenario.yields(FacilityType::Speed, 3).map(|row| row.stats.speed),
            Some(12)
        );

        scenario.facilities[2] = flat_facility(FacilityType::Power, 4);
        assert_eq!(
            scenario.validate(),
            Err(ScenarioError::MissingLevel {
                scenario: 1,
                facility: FacilityType::Power,
                level: 5
            })
        );

        scenario.facilities.remove(0);
        assert!(matches!(
            scenario.validate(),
            Err(ScenarioError::MissingFacility {
                facility: FacilityType::Speed,
                ..
            })
        ));
    }

    #[test]
    fn stat_line_reads_each_stat() {
        let line = StatLine {
            speed: 1,
            stamina: 2,
            power: 3,
            guts: 4,
            wit: 5,
        };
        let total: i32 = StatType::ALL.iter().map(|stat| line.get(*stat)).sum();
        assert_eq!(total, 15);
    }
}
