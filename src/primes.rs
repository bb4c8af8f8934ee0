//! Prime generators shipped as benchmark candidates.

use ahash::AHashMap;

use crate::{BenchError, candidate::Candidate};

pub struct TrialDivision {
    found: Vec<u64>,
    next: u64,
}

impl TrialDivision {
    pub fn new() -> Self {
        Self {
            found: Vec::new(),
            next: 2,
        }
    }
}

impl Default for TrialDivision {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for TrialDivision {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        loop {
            let n = self.next;
            self.next = if n == 2 { 3 } else { n.checked_add(2)? };
            let is_prime = self
                .found
                .iter()
                .take_while(|&&p| p * p <= n)
                .all(|&p| n % p != 0);
            if is_prime {
                self.found.push(n);
                return Some(n);
            }
        }
    }
}

/// Unbounded sieve that keeps one pending multiple per prime seen so far.
pub struct IncrementalSieve {
    pending: AHashMap<u64, u64>,
    next: u64,
}

impl IncrementalSieve {
    pub fn new() -> Self {
        Self {
            pending: AHashMap::new(),
            next: 2,
        }
    }
}

impl Default for IncrementalSieve {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for IncrementalSieve {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.next == 2 {
            self.next = 3;
            return Some(2);
        }
        loop {
            let n = self.next;
            self.next = n.checked_add(2)?;
            match self.pending.remove(&n) {
                Some(step) => {
                    let mut multiple = n + step;
                    while self.pending.contains_key(&multiple) {
                        multiple += step;
                    }
                    self.pending.insert(multiple, step);
                }
                None => {
                    if let Some(square) = n.checked_mul(n) {
                        self.pending.insert(square, 2 * n);
                    }
                    return Some(n);
                }
            }
        }
    }
}

/// Primes up to and including `limit`, by a full sieve of Eratosthenes.
pub fn eratosthenes(limit: u64) -> impl Iterator<Item = u64> {
    let limit = limit as usize;
    let mut composite = vec![false; limit + 1];
    let mut i = 2;
    while i * i <= limit {
        if !composite[i] {
            let mut j = i * i;
            while j <= limit {
                composite[j] = true;
                j += i;
            }
        }
        i += 1;
    }
    (2..=limit)
        .filter(move |&n| !composite[n])
        .map(|n| n as u64)
}

/// Same bound as [`eratosthenes`], storing odd numbers only.
pub fn odd_sieve(limit: u64) -> impl Iterator<Item = u64> {
    let limit = limit as usize;
    let slots = if limit < 3 { 0 } else { (limit - 1) / 2 };
    // slot k holds 2k + 3
    let mut composite = vec![false; slots];
    let mut k = 0;
    while k < slots {
        let p = 2 * k + 3;
        if p * p > limit {
            break;
        }
        if !composite[k] {
            let mut j = (p * p - 3) / 2;
            while j < slots {
                composite[j] = true;
                j += p;
            }
        }
        k += 1;
    }
    let odds = (0..slots)
        .filter(move |&k| !composite[k])
        .map(|k| (2 * k + 3) as u64);
    (limit >= 2).then_some(2).into_iter().chain(odds)
}

pub fn catalog() -> Vec<Candidate> {
    vec![
        Candidate::unbounded("trial_division", TrialDivision::new),
        Candidate::unbounded("incremental_sieve", IncrementalSieve::new),
        Candidate::sized("eratosthenes", eratosthenes),
        Candidate::sized("odd_sieve", odd_sieve),
    ]
}

pub fn find(name: &str) -> Result<Candidate, BenchError> {
    catalog()
        .into_iter()
        .find(|c| c.name() == name)
        .ok_or_else(|| BenchError::unknown_candidate(name))
}
