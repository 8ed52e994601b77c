//! Injectable random source for still and quote selection

use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Picks an index into a non-empty candidate list
pub trait RandomSource: Send + Sync {
    /// Returns a value in `0..len`. Callers never pass `len == 0`.
    fn pick_index(&self, len: usize) -> usize;
}

/// Uniform picks from the thread-local generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Deterministic source that replays a fixed index, clamped to the list
#[derive(Debug, Default)]
pub struct FixedRandom {
    index: AtomicUsize,
}

impl FixedRandom {
    pub fn new(index: usize) -> Self {
        Self {
            index: AtomicUsize::new(index),
        }
    }

    pub fn set(&self, index: usize) {
        self.index.store(index, Ordering::Relaxed);
    }
}

impl RandomSource for FixedRandom {
    fn pick_index(&self, len: usize) -> usize {
        self.index.load(Ordering::Relaxed).min(len.saturating_sub(1))
    }
}
