//! Live timing charts for prime number generators.
//! Run Criterion benchmarks of the shipped generators with `cargo bench`.

pub mod candidate;
pub mod chart;
pub mod config;
pub mod display;
pub mod errors;
pub mod iterations;
pub mod primes;
pub mod sampler;
pub mod series;
pub mod session;
pub mod state;

pub use crate::candidate::{Candidate, Convention, FIRST_25_PRIMES, Verification, verify};
pub use crate::chart::{ChartPlan, ChartView};
pub use crate::config::RuntimeConfig;
pub use crate::errors::BenchError;
pub use crate::iterations::{approx_nth, iterations};
pub use crate::sampler::{SampleObserver, SampleUpdate, Sampler, SamplerConfig};
pub use crate::series::{SamplePoint, Series, SeriesStore};
pub use crate::session::{BenchOutcome, Session};
pub use crate::state::{Control, PresentationState};
