use anyhow::{Context, Result, bail};
use umathyoi_game::FacilityType;
use umathyoi_game::constants::{MAX_FACILITY_LEVEL, MAX_LIMIT_BREAK, MIN_FACILITY_LEVEL};

use crate::common::{split_csv, split_pair};

/// Parse `id[:limit_break],...`; a missing limit break means fully broken.
pub fn parse_deck_list(list: &str) -> Result<Vec<(u32, u8)>> {
    split_csv(list)
        .iter()
        .map(|token| {
            let (id, limit_break) = split_pair(token);
            let id = id
                .parse::<u32>()
                .with_context(|| format!("invalid card id in deck entry {token}"))?;
            let limit_break = match limit_break {
                Some(raw) => raw
                    .parse::<u8>()
                    .with_context(|| format!("invalid limit break in deck entry {token}"))?,
                None => MAX_LIMIT_BREAK,
            };
            Ok((id, limit_break))
        })
        .collect()
}

/// Parse `facility:level,...` overrides such as `speed:5,wit:2`.
pub fn parse_facility_levels(list: &str) -> Result<Vec<(FacilityType, u8)>> {
    split_csv(list)
        .iter()
        .map(|token| {
            let (name, level) = split_pair(token);
            let Some(facility) = FacilityType::ALL
                .into_iter()
                .find(|facility| facility.as_str().eq_ignore_ascii_case(name))
            else {
                bail!("unknown facility {name}");
            };
            let Some(level) = level else {
                bail!("missing level for facility {name}");
            };
            let level = level
                .parse::<u8>()
                .with_context(|| format!("invalid level for facility {name}"))?;
            if !(MIN_FACILITY_LEVEL..=MAX_FACILITY_LEVEL).contains(&level) {
                bail!(
                    "facility {name} level {level} outside {MIN_FACILITY_LEVEL}..={MAX_FACILITY_LEVEL}"
                );
            }
            Ok((facility, level))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_list_defaults_to_full_limit_break() {
        let deck = parse_deck_list("30189:2, 30208").unwrap();
        assert_eq!(deck, vec![(30_189, 2), (30_208, MAX_LIMIT_BREAK)]);
        assert!(parse_deck_list("").unwrap().is_empty());
    }

    #[test]
    fn deck_list_rejects_bad_numbers() {
        assert!(parse_deck_list("kitasan").is_err());
        assert!(parse_deck_list("30189:x").is_err());
    }

    #[test]
    fn facility_levels_parse_case_insensitively() {
        let levels = parse_facility_levels("Speed:5,wit:1").unwrap();
        assert_eq!(
            levels,
            vec![(FacilityType::Speed, 5), (FacilityType::Wit, 1)]
        );
    }

    #[test]
    fn facility_levels_reject_bad_entries() {
        assert!(parse_facility_levels("pool:3").is_err());
        assert!(parse_facility_levels("speed").is_err());
        assert!(parse_facility_levels("speed:9").is_err());
    }
}
