//! Weighted random sampling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks an item with probability proportional to its weight.
///
/// Holds a transient list that is rebuilt before every pick: call
/// [`reset`](Self::reset), [`add`](Self::add) each item, then
/// [`next`](Self::next).
#[derive(Debug)]
pub struct RandomWeighted<T> {
    items: Vec<T>,
    cumulative: Vec<u64>,
    total: u64,
    rng: StdRng,
}

impl<T: Clone> RandomWeighted<T> {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            items: Vec::new(),
            cumulative: Vec::new(),
            total: 0,
            rng,
        }
    }

    /// Append an item. Callers coerce non-positive weights to 1 beforehand;
    /// a zero weight here leaves the item unreachable.
    pub fn add(&mut self, item: T, weight: u32) {
        self.total += weight as u64;
        self.items.push(item);
        self.cumulative.push(self.total);
    }

    /// Draw one item. `None` when empty or every weight is zero.
    pub fn next(&mut self) -> Option<T> {
        if self.total == 0 {
            return None;
        }
        let draw = self.rng.gen_range(0..self.total);
        // first bucket whose cumulative weight exceeds the draw
        let index = self.cumulative.partition_point(|&c| c <= draw);
        self.items.get(index).cloned()
    }

    pub fn reset(&mut self) {
        self.items.clear();
        self.cumulative.clear();
        self.total = 0;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Clone> Default for RandomWeighted<T> {
    fn default() -> Self {
        Self::new()
    }
}
