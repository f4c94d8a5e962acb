//! Random draws used to decide command outcomes

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws in `[0, 1)`
pub trait RandomSource: Send {
    fn next_f64(&mut self) -> f64;
}

/// Pseudo-random source backed by [`StdRng`]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Always returns the same draw
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn next_f64(&mut self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_draws_repeat() {
        let mut a = SeededRandom::from_seed(42);
        let mut b = SeededRandom::from_seed(42);

        for _ in 0..10 {
            let draw = a.next_f64();
            assert!((0.0..1.0).contains(&draw));
            assert_eq!(draw, b.next_f64());
        }
    }

    #[test]
    fn test_fixed_draw() {
        let mut fixed = FixedRandom(0.1);
        assert_eq!(fixed.next_f64(), 0.1);
        assert_eq!(fixed.next_f64(), 0.1);
    }
}
