//! Best-of-N timing of prime generators over the 1-2-5 size sweep.
//!
//! Pass 0 discovers the sample sizes, stopping once the time budget is spent.
//! Later passes re-measure exactly those sizes and keep the smaller time.
//! Every measurement is pushed to a [`SampleObserver`] before the next one starts.

use std::{
    hint::black_box,
    time::{Duration, Instant},
};

use tracing::{debug, info};

use crate::{
    BenchError,
    candidate::{Candidate, CandidateFn, Sequence, advance_by},
    iterations::{approx_nth, iterations},
    series::{SamplePoint, Series},
};

pub const MAX_REPEATS: u32 = 10;
const OVERHEAD_RUNS: u32 = 1000;

#[derive(Clone, Debug, PartialEq)]
pub struct SamplerConfig {
    pub repeats: u32,
    pub time_budget: Duration,
    pub warmup_index: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            repeats: 3,
            time_budget: Duration::from_millis(1200),
            warmup_index: 1000,
        }
    }
}

impl SamplerConfig {
    pub fn validate(&self) -> Result<(), BenchError> {
        if !(1..=MAX_REPEATS).contains(&self.repeats) {
            return Err(BenchError::invalid_input(format!(
                "repeats must be within 1..={MAX_REPEATS}, got {}",
                self.repeats
            )));
        }
        if self.time_budget.is_zero() {
            return Err(BenchError::invalid_input("time budget must be positive"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateKind {
    Appended,
    Lowered,
    Kept,
}

pub struct SampleUpdate<'a> {
    pub pass: u32,
    pub index: usize,
    pub point: SamplePoint,
    pub kind: UpdateKind,
    pub series: &'a Series,
}

pub trait SampleObserver {
    fn on_sample(&mut self, update: &SampleUpdate<'_>) -> Result<(), BenchError>;

    fn on_finish(&mut self, _series: &Series) -> Result<(), BenchError> {
        Ok(())
    }
}

impl<F> SampleObserver for F
where
    F: FnMut(&SampleUpdate<'_>) -> Result<(), BenchError>,
{
    fn on_sample(&mut self, update: &SampleUpdate<'_>) -> Result<(), BenchError> {
        self(update)
    }
}

pub struct NoopObserver;

impl SampleObserver for NoopObserver {
    fn on_sample(&mut self, _update: &SampleUpdate<'_>) -> Result<(), BenchError> {
        Ok(())
    }
}

/// Mean cost of producing one value from a trivial sequence.
pub fn estimate_overhead() -> Duration {
    let start = Instant::now();
    for _ in 0..OVERHEAD_RUNS {
        let mut seq: Sequence = Box::new(std::iter::once(0u64));
        black_box(seq.next());
    }
    start.elapsed() / OVERHEAD_RUNS
}

pub struct Sampler {
    config: SamplerConfig,
    overhead: Duration,
}

impl Sampler {
    pub fn new(config: SamplerConfig, overhead: Duration) -> Result<Self, BenchError> {
        config.validate()?;
        Ok(Self { config, overhead })
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn overhead(&self) -> Duration {
        self.overhead
    }

    pub fn run(
        &self,
        candidate: &Candidate,
        observer: &mut dyn SampleObserver,
    ) -> Result<Series, BenchError> {
        let mut series = Series::new(candidate.name());
        self.warm_up(candidate)?;
        match candidate.func() {
            CandidateFn::Unbounded(f) => self.run_combined(f.as_ref(), &mut series, observer)?,
            CandidateFn::Sized(f) => self.run_separate(f.as_ref(), &mut series, observer)?,
        }
        observer.on_finish(&series)?;
        Ok(series)
    }

    fn warm_up(&self, candidate: &Candidate) -> Result<(), BenchError> {
        let index = self.config.warmup_index;
        if index == 0 {
            return Ok(());
        }
        let mut seq = candidate.sequence(approx_nth(index));
        black_box(advance_by(seq.as_mut(), index)?);
        debug!(candidate = candidate.name(), index, "warm-up done");
        Ok(())
    }

    fn run_combined(
        &self,
        f: &dyn Fn() -> Sequence,
        series: &mut Series,
        observer: &mut dyn SampleObserver,
    ) -> Result<(), BenchError> {
        let budget = self.config.time_budget.as_secs_f64();
        for pass in 0..self.config.repeats {
            let mut seq = f();
            let mut total = 0.0;
            let mut last_size = 0;
            if pass == 0 {
                for size in iterations() {
                    total += self.time(|| advance_by(seq.as_mut(), size - last_size))?;
                    series.push(SamplePoint {
                        size,
                        seconds: total,
                    })?;
                    self.notify(observer, series, pass, series.len() - 1, UpdateKind::Appended)?;
                    last_size = size;
                    if total > budget {
                        break;
                    }
                }
            } else {
                for (index, size) in series.sizes().into_iter().enumerate() {
                    total += self.time(|| advance_by(seq.as_mut(), size - last_size))?;
                    let recorded = series.points()[index].seconds;
                    let kind = if total < recorded {
                        series.lower_from(index, recorded - total)?;
                        UpdateKind::Lowered
                    } else {
                        total = recorded;
                        UpdateKind::Kept
                    };
                    self.notify(observer, series, pass, index, kind)?;
                    last_size = size;
                }
            }
            info!(series = %series.name, pass, points = series.len(), "pass complete");
        }
        Ok(())
    }

    fn run_separate(
        &self,
        f: &dyn Fn(u64) -> Sequence,
        series: &mut Series,
        observer: &mut dyn SampleObserver,
    ) -> Result<(), BenchError> {
        let budget = self.config.time_budget.as_secs_f64();
        let sample = |size: u64| {
            self.time(|| {
                let mut seq = f(approx_nth(size));
                advance_by(seq.as_mut(), size)
            })
        };
        for pass in 0..self.config.repeats {
            if pass == 0 {
                for size in iterations() {
                    let seconds = sample(size)?;
                    series.push(SamplePoint { size, seconds })?;
                    self.notify(observer, series, pass, series.len() - 1, UpdateKind::Appended)?;
                    if seconds >= budget {
                        break;
                    }
                }
            } else {
                for (index, size) in series.sizes().into_iter().enumerate() {
                    let seconds = sample(size)?;
                    let kind = if series.improve(index, seconds)? {
                        UpdateKind::Lowered
                    } else {
                        UpdateKind::Kept
                    };
                    self.notify(observer, series, pass, index, kind)?;
                }
            }
            info!(series = %series.name, pass, points = series.len(), "pass complete");
        }
        Ok(())
    }

    /// Net seconds spent in `op`, never below zero.
    fn time<F>(&self, op: F) -> Result<f64, BenchError>
    where
        F: FnOnce() -> Result<u64, BenchError>,
    {
        let start = Instant::now();
        let value = op()?;
        let elapsed = start.elapsed();
        black_box(value);
        Ok(elapsed.saturating_sub(self.overhead).as_secs_f64())
    }

    fn notify(
        &self,
        observer: &mut dyn SampleObserver,
        series: &Series,
        pass: u32,
        index: usize,
        kind: UpdateKind,
    ) -> Result<(), BenchError> {
        let point = series.points()[index];
        debug!(
            series = %series.name,
            pass,
            size = point.size,
            seconds = point.seconds,
            ?kind,
            "sample"
        );
        observer.on_sample(&SampleUpdate {
            pass,
            index,
            point,
            kind,
            series,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primes::{TrialDivision, eratosthenes};

    fn quick_config(repeats: u32) -> SamplerConfig {
        SamplerConfig {
            repeats,
            time_budget: Duration::from_millis(5),
            warmup_index: 100,
        }
    }

    #[test]
    fn test_config_rejects_out_of_range_repeats() {
        let mut config = SamplerConfig::default();
        config.repeats = 0;
        assert!(config.validate().is_err());
        config.repeats = MAX_REPEATS + 1;
        assert!(config.validate().is_err());
        config.repeats = MAX_REPEATS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overhead_is_small() {
        assert!(estimate_overhead() < Duration::from_millis(1));
    }

    #[test]
    fn test_refinement_revisits_discovered_sizes() {
        let sampler = Sampler::new(quick_config(3), Duration::ZERO).unwrap();
        let candidate = Candidate::sized("eratosthenes", eratosthenes);
        let mut visits: Vec<(u32, usize, UpdateKind)> = Vec::new();
        let mut observer = |update: &SampleUpdate<'_>| -> Result<(), BenchError> {
            visits.push((update.pass, update.index, update.kind));
            Ok(())
        };
        let series = sampler.run(&candidate, &mut observer).unwrap();
        let discovered = series.len();
        for pass in 1..3 {
            let indices: Vec<usize> = visits
                .iter()
                .filter(|(p, _, _)| *p == pass)
                .map(|(_, i, _)| *i)
                .collect();
            assert_eq!(indices, (0..discovered).collect::<Vec<_>>());
        }
        assert!(
            visits
                .iter()
                .filter(|(p, _, _)| *p == 0)
                .all(|(_, _, kind)| *kind == UpdateKind::Appended)
        );
    }

    #[test]
    fn test_exhausted_candidate_aborts_run() {
        let sampler = Sampler::new(quick_config(1), Duration::ZERO).unwrap();
        let candidate = Candidate::unbounded("short", || TrialDivision::new().take(150));
        let err = sampler.run(&candidate, &mut NoopObserver).unwrap_err();
        assert!(matches!(err, BenchError::Exhausted(_)));
    }
}
