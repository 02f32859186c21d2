//! Randomness collaborator.
//!
//! Every draw the widget makes goes through [`RandomSource`], so prompt
//! assignment and display sampling can be replayed deterministically.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Source of uniform draws.
pub trait RandomSource: Send + Sync {
    /// Uniform integer in `[0, len)`. Returns 0 when `len` is 0.
    fn index_below(&self, len: usize) -> usize;

    /// Uniform real in `[0, 100)`.
    fn percent(&self) -> f64;
}

/// Thread-local RNG; the production default.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn index_below(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }

    fn percent(&self) -> f64 {
        rand::thread_rng().gen_range(0.0..100.0)
    }
}

/// Reproducible RNG for demos and property-style tests.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn index_below(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(0..len)
    }

    fn percent(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(0.0..100.0)
    }
}

/// Replays fixed draws in order and counts how many were taken.
///
/// Once a queue runs dry it yields 0 (or 0.0).
#[derive(Default)]
pub struct ScriptedRandom {
    indices: Mutex<VecDeque<usize>>,
    percents: Mutex<VecDeque<f64>>,
    index_draws: AtomicUsize,
    percent_draws: AtomicUsize,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indices(self, values: impl IntoIterator<Item = usize>) -> Self {
        self.indices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(values);
        self
    }

    pub fn with_percents(self, values: impl IntoIterator<Item = f64>) -> Self {
        self.percents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(values);
        self
    }

    pub fn index_draws(&self) -> usize {
        self.index_draws.load(Ordering::Relaxed)
    }

    pub fn percent_draws(&self) -> usize {
        self.percent_draws.load(Ordering::Relaxed)
    }
}

impl RandomSource for ScriptedRandom {
    fn index_below(&self, len: usize) -> usize {
        self.index_draws.fetch_add(1, Ordering::Relaxed);
        let next = self
            .indices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(0);
        next.min(len.saturating_sub(1))
    }

    fn percent(&self) -> f64 {
        self.percent_draws.fetch_add(1, Ordering::Relaxed);
        self.percents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_random_ranges() {
        let random = ThreadRandom;
        for _ in 0..1000 {
            assert!(random.index_below(3) < 3);
            let p = random.percent();
            assert!((0.0..100.0).contains(&p));
        }
        assert_eq!(random.index_below(0), 0);
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);
        let left: Vec<usize> = (0..20).map(|_| a.index_below(10)).collect();
        let right: Vec<usize> = (0..20).map(|_| b.index_below(10)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_scripted_random_replays_and_counts() {
        let random = ScriptedRandom::new().with_indices([4, 1]).with_percents([12.5]);
        assert_eq!(random.index_below(3), 2);
        assert_eq!(random.index_below(3), 1);
        assert_eq!(random.index_below(3), 0);
        assert_eq!(random.percent(), 12.5);
        assert_eq!(random.index_draws(), 3);
        assert_eq!(random.percent_draws(), 1);
    }
}
