use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{BenchError, iterations::approx_nth};

pub type Sequence = Box<dyn Iterator<Item = u64>>;

pub const FIRST_25_PRIMES: [u64; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Calling convention of a benchmarked generator.
pub enum CandidateFn {
    /// One endless sequence, advanced across every sample of a pass.
    Unbounded(Box<dyn Fn() -> Sequence>),
    /// Produces every value up to `bound`; re-invoked for every sample.
    Sized(Box<dyn Fn(u64) -> Sequence>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Convention {
    Unbounded,
    Sized,
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Convention::Unbounded => f.write_str("unbounded"),
            Convention::Sized => f.write_str("sized"),
        }
    }
}

pub struct Candidate {
    name: String,
    func: CandidateFn,
}

impl Candidate {
    pub fn unbounded<N, F, I>(name: N, func: F) -> Self
    where
        N: Into<String>,
        F: Fn() -> I + 'static,
        I: Iterator<Item = u64> + 'static,
    {
        Self {
            name: name.into(),
            func: CandidateFn::Unbounded(Box::new(move || Box::new(func()) as Sequence)),
        }
    }

    pub fn sized<N, F, I>(name: N, func: F) -> Self
    where
        N: Into<String>,
        F: Fn(u64) -> I + 'static,
        I: Iterator<Item = u64> + 'static,
    {
        Self {
            name: name.into(),
            func: CandidateFn::Sized(Box::new(move |bound| Box::new(func(bound)) as Sequence)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn func(&self) -> &CandidateFn {
        &self.func
    }

    pub fn convention(&self) -> Convention {
        match self.func {
            CandidateFn::Unbounded(_) => Convention::Unbounded,
            CandidateFn::Sized(_) => Convention::Sized,
        }
    }

    /// Fresh sequence. Sized candidates are called with `bound`, the largest value needed.
    pub fn sequence(&self, bound: u64) -> Sequence {
        match &self.func {
            CandidateFn::Unbounded(f) => f(),
            CandidateFn::Sized(f) => f(bound),
        }
    }
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("name", &self.name)
            .field("convention", &self.convention())
            .finish()
    }
}

/// Advances `seq` by `n` values and returns the last one produced.
pub fn advance_by(seq: &mut dyn Iterator<Item = u64>, n: u64) -> Result<u64, BenchError> {
    if n == 0 {
        return Err(BenchError::invalid_input("cannot advance a sequence by zero"));
    }
    let skip = usize::try_from(n - 1)
        .map_err(|_| BenchError::invalid_input(format!("advance of {n} exceeds usize")))?;
    seq.nth(skip)
        .ok_or_else(|| BenchError::exhausted(format!("sequence ended before {n} more values")))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verification {
    Accepted,
    Rejected {
        position: usize,
        expected: u64,
        found: Option<u64>,
    },
}

impl Verification {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verification::Accepted)
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verification::Accepted => f.write_str("first 25 primes match"),
            Verification::Rejected {
                position,
                expected,
                found: Some(found),
            } => write!(f, "value {position} is {found}, expected {expected}"),
            Verification::Rejected {
                position,
                expected,
                found: None,
            } => write!(f, "sequence ended at value {position}, expected {expected}"),
        }
    }
}

/// Checks the first 25 values against the known primes. A mismatch is reported, never raised.
pub fn verify(candidate: &Candidate) -> Verification {
    let mut seq = candidate.sequence(approx_nth(FIRST_25_PRIMES.len() as u64));
    for (position, &expected) in FIRST_25_PRIMES.iter().enumerate() {
        match seq.next() {
            Some(found) if found == expected => continue,
            found => {
                return Verification::Rejected {
                    position,
                    expected,
                    found,
                };
            }
        }
    }
    Verification::Accepted
}
