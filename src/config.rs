//! Process defaults for the presentation, read from the environment once at startup.

use std::env;

use crate::{BenchError, sampler::MAX_REPEATS};

pub const REPEATS_VAR: &str = "PRIMEBENCH_REPEATS";
pub const INCREMENTAL_VAR: &str = "PRIMEBENCH_INCREMENTAL";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub repeats: u32,
    pub incremental: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            repeats: 3,
            incremental: true,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, BenchError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, BenchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(REPEATS_VAR) {
            config.repeats = parse_repeats(&raw)?;
        }
        if let Some(raw) = lookup(INCREMENTAL_VAR) {
            config.incremental = parse_flag(&raw);
        }
        Ok(config)
    }
}

/// Case-insensitive match against `true`; anything else is false.
pub fn parse_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

pub fn parse_repeats(raw: &str) -> Result<u32, BenchError> {
    let repeats: u32 = raw
        .trim()
        .parse()
        .map_err(|_| BenchError::invalid_input(format!("{REPEATS_VAR} must be an integer, got {raw:?}")))?;
    if !(1..=MAX_REPEATS).contains(&repeats) {
        return Err(BenchError::invalid_input(format!(
            "{REPEATS_VAR} must be within 1..={MAX_REPEATS}, got {repeats}"
        )));
    }
    Ok(repeats)
}
