use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    BenchError,
    candidate::{Candidate, Verification, verify},
    chart::{ChartPlan, clear_views},
    config::RuntimeConfig,
    display::LiveDisplay,
    sampler::{Sampler, SamplerConfig, estimate_overhead},
    series::Series,
    state::{Control, PresentationState},
};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum BenchOutcome {
    Completed(Series),
    Skipped(Verification),
}

/// One presentation: state, measured overhead and chart directory.
pub struct Session {
    state: PresentationState,
    overhead: Duration,
    out_dir: PathBuf,
    time_budget: Duration,
    warmup_index: u64,
    last_plan: Option<ChartPlan>,
}

impl Session {
    pub fn new(config: RuntimeConfig, out_dir: &Path) -> Self {
        let overhead = estimate_overhead();
        info!(overhead_ns = overhead.as_nanos() as u64, "measured timing overhead");
        Self::with_overhead(config, out_dir, overhead)
    }

    pub fn with_overhead(config: RuntimeConfig, out_dir: &Path, overhead: Duration) -> Self {
        let defaults = SamplerConfig::default();
        Self {
            state: PresentationState::new(config),
            overhead,
            out_dir: out_dir.to_path_buf(),
            time_budget: defaults.time_budget,
            warmup_index: defaults.warmup_index,
            last_plan: None,
        }
    }

    pub fn set_time_budget(&mut self, budget: Duration) {
        self.time_budget = budget;
    }

    pub fn set_warmup_index(&mut self, index: u64) {
        self.warmup_index = index;
    }

    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    /// Lines drawn for the most recent completed benchmark.
    pub fn last_plan(&self) -> Option<&ChartPlan> {
        self.last_plan.as_ref()
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Applies a control; clearing also removes the rendered charts.
    pub fn control(&mut self, control: Control) -> Result<(), BenchError> {
        control.apply(&mut self.state);
        if control == Control::ClearAll {
            clear_views(&self.out_dir)?;
        }
        Ok(())
    }

    pub fn sampler_config(&self) -> SamplerConfig {
        SamplerConfig {
            repeats: self.state.repeats(),
            time_budget: self.time_budget,
            warmup_index: self.warmup_index,
        }
    }

    pub fn benchmark(&mut self, candidate: &Candidate) -> Result<BenchOutcome, BenchError> {
        let verification = verify(candidate);
        if !verification.is_accepted() {
            warn!(candidate = candidate.name(), %verification, "candidate skipped");
            return Ok(BenchOutcome::Skipped(verification));
        }
        let sampler = Sampler::new(self.sampler_config(), self.overhead)?;
        let plan = ChartPlan::build(self.state.store(), candidate.name());
        let mut display = LiveDisplay::new(plan, &self.out_dir, self.state.incremental());
        info!(
            candidate = candidate.name(),
            convention = %candidate.convention(),
            repeats = self.state.repeats(),
            incremental = self.state.incremental(),
            "benchmark started"
        );
        let mut series = sampler.run(candidate, &mut display)?;
        series.freeze();
        self.last_plan = Some(display.plan().clone());
        self.state.store_mut().insert(series.clone());
        Ok(BenchOutcome::Completed(series))
    }
}
