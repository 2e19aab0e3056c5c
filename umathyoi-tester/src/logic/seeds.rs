use anyhow::{Result, bail};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

pub const DEFAULT_SEED: u64 = 1337;

/// A run seed and the token it was derived from, when that was not a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub label: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self { seed, label: None }
    }

    /// Seed from free text, so runs can be named (`--seeds spring,summer`).
    #[must_use]
    pub fn from_phrase(phrase: &str) -> Self {
        let digest = Sha256::digest(phrase.as_bytes());
        let mut bytes = [0_u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        Self {
            seed: u64::from_be_bytes(bytes),
            label: Some(phrase.to_string()),
        }
    }
}

/// Resolve a list of CLI seed arguments into run seeds.
///
/// Accepts decimal integers (negative values use their magnitude), `0x` hex
/// literals and arbitrary words, which are hashed. Duplicates keep their
/// first occurrence and an empty list falls back to [`DEFAULT_SEED`].
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut resolved = Vec::new();
    let mut seen = HashSet::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let info = parse_seed_token(token)?;
        if seen.insert(info.seed) {
            resolved.push(info);
        }
    }

    if resolved.is_empty() {
        resolved.push(SeedInfo::from_numeric(DEFAULT_SEED));
    }
    Ok(resolved)
}

fn parse_seed_token(token: &str) -> Result<SeedInfo> {
    if let Ok(value) = token.parse::<i64>() {
        return Ok(SeedInfo::from_numeric(value.unsigned_abs()));
    }
    if let Ok(value) = token.parse::<u64>() {
        return Ok(SeedInfo::from_numeric(value));
    }
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        return match u64::from_str_radix(hex, 16) {
            Ok(value) => Ok(SeedInfo::from_numeric(value)),
            Err(err) => bail!("Unrecognized seed token {token}: {err}"),
        };
    }
    if token.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return Ok(SeedInfo::from_phrase(token));
    }
    bail!("Unrecognized seed token: {token}")
}
