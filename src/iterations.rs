//! Problem sizes for the timing sweep: 1, 2, 5, 10, 20, 50, 100, ...

const MANTISSAS: [u64; 3] = [1, 2, 5];

#[derive(Clone, Debug)]
pub struct Iterations {
    scale: Option<u64>,
    slot: usize,
}

impl Iterations {
    pub fn new() -> Self {
        Self {
            scale: Some(1),
            slot: 0,
        }
    }
}

impl Default for Iterations {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Iterations {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let scale = self.scale?;
        let value = MANTISSAS[self.slot].checked_mul(scale);
        self.slot += 1;
        if self.slot == MANTISSAS.len() {
            self.slot = 0;
            self.scale = scale.checked_mul(10);
        }
        if value.is_none() {
            self.scale = None;
        }
        value
    }
}

pub fn iterations() -> Iterations {
    Iterations::new()
}

/// Upper estimate of the n-th prime, used to size sieve style candidates.
pub fn approx_nth(n: u64) -> u64 {
    if n < 6 {
        return (2.2 * n as f64 + 1.0) as u64;
    }
    let n = n as f64;
    (n * (n.ln() + n.ln().ln())) as u64
}
