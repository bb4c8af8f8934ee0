use tracing::{info, warn};

use crate::{BenchError, config::RuntimeConfig, sampler::MAX_REPEATS, series::SeriesStore};

#[derive(Clone, Debug, PartialEq)]
pub struct PresentationState {
    store: SeriesStore,
    incremental: bool,
    repeats: u32,
}

impl PresentationState {
    pub fn new(config: RuntimeConfig) -> Self {
        let mut state = Self {
            store: SeriesStore::new(),
            incremental: config.incremental,
            repeats: 1,
        };
        state.set_repeats(config.repeats);
        state
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut SeriesStore {
        &mut self.store
    }

    pub fn incremental(&self) -> bool {
        self.incremental
    }

    pub fn repeats(&self) -> u32 {
        self.repeats
    }

    pub fn clear_all(&mut self) {
        info!(series = self.store.len(), "clearing all series");
        self.store.clear();
    }

    pub fn set_incremental(&mut self, incremental: bool) {
        self.incremental = incremental;
    }

    pub fn set_repeats(&mut self, repeats: u32) {
        let clamped = repeats.clamp(1, MAX_REPEATS);
        if clamped != repeats {
            warn!(requested = repeats, used = clamped, "repeats clamped");
        }
        self.repeats = clamped;
    }
}

impl Default for PresentationState {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

/// Presentation controls routed into [`PresentationState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    ClearAll,
    SetIncremental(bool),
    SetRepeats(u32),
}

impl Control {
    pub fn apply(self, state: &mut PresentationState) {
        match self {
            Control::ClearAll => state.clear_all(),
            Control::SetIncremental(flag) => state.set_incremental(flag),
            Control::SetRepeats(repeats) => state.set_repeats(repeats),
        }
    }

    /// Reads `clear`, `incremental <flag>` and `repeats <n>`.
    pub fn parse(line: &str) -> Result<Self, BenchError> {
        let mut parts = line.split_whitespace();
        let command = parts
            .next()
            .ok_or_else(|| BenchError::invalid_input("empty control"))?;
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(BenchError::invalid_input(format!(
                "too many arguments for {command}"
            )));
        }
        match (command, arg) {
            ("clear", None) => Ok(Control::ClearAll),
            ("incremental", Some(raw)) => parse_toggle(raw).map(Control::SetIncremental),
            ("repeats", Some(raw)) => raw
                .parse()
                .map(Control::SetRepeats)
                .map_err(|_| BenchError::invalid_input(format!("repeats needs an integer, got {raw}"))),
            ("incremental" | "repeats", None) => Err(BenchError::invalid_input(format!(
                "{command} requires a value"
            ))),
            _ => Err(BenchError::invalid_input(format!("unknown control {line}"))),
        }
    }
}

fn parse_toggle(raw: &str) -> Result<bool, BenchError> {
    match raw.to_ascii_lowercase().as_str() {
        "on" | "true" => Ok(true),
        "off" | "false" => Ok(false),
        _ => Err(BenchError::invalid_input(format!(
            "incremental takes on, off, true or false, got {raw}"
        ))),
    }
}
