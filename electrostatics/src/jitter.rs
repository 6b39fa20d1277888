//! Randomness for cosmetic scatter
//!
//! Paper wobble and droplet spray are decoration, so the scene builders take
//! their randomness through [`Jitter`]. Geometry can then be checked with a
//! fixed source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform samples in [0, 1)
pub trait Jitter {
    fn sample(&mut self) -> f32;

    /// Uniform sample in [-span/2, span/2)
    fn centered(&mut self, span: f32) -> f32 {
        (self.sample() - 0.5) * span
    }
}

/// Per-thread generator, used by the running app
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadJitter;

impl Jitter for ThreadJitter {
    fn sample(&mut self) -> f32 {
        rand::thread_rng().gen::<f32>()
    }
}

/// Reproducible generator
#[derive(Debug, Clone)]
pub struct SeededJitter {
    rng: StdRng,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Jitter for SeededJitter {
    fn sample(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// Always returns the same value; 0.5 means "no scatter"
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f32);

impl Default for FixedJitter {
    fn default() -> Self {
        Self(0.5)
    }
}

impl Jitter for FixedJitter {
    fn sample(&mut self) -> f32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_sources_repeat() {
        let mut a = SeededJitter::new(7);
        let mut b = SeededJitter::new(7);
        for _ in 0..16 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn samples_are_in_unit_range() {
        let mut thread = ThreadJitter;
        let mut seeded = SeededJitter::new(42);
        for _ in 0..256 {
            assert!((0.0..1.0).contains(&thread.sample()));
            assert!((0.0..1.0).contains(&seeded.sample()));
        }
    }

    #[test]
    fn centered_default_is_zero() {
        assert_eq!(FixedJitter::default().centered(10.0), 0.0);
        assert_eq!(FixedJitter(1.0).centered(10.0), 5.0);
    }
}
