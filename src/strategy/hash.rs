//! Source-hash selection strategy.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::selector::{SelectContext, Strategy};

/// Maps the routing hash of the context onto a candidate with CRC-32, so the
/// same source keeps landing on the same candidate while the list is stable.
/// Without a routing hash the pick is uniformly random.
#[derive(Debug)]
pub struct Hash {
    rng: Mutex<StdRng>,
}

impl Hash {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for Hash {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of `source` in a list of `len` candidates.
pub fn hash_index(source: &str, len: usize) -> usize {
    let value = crc32fast::hash(source.as_bytes()) as u64;
    tracing::trace!(source, value, "hash");
    (value % len as u64) as usize
}

impl<T: Clone + Send + Sync> Strategy<T> for Hash {
    fn apply(&self, ctx: &SelectContext, candidates: &[T]) -> Option<T> {
        if candidates.is_empty() {
            return None;
        }

        if let Some(hash) = ctx.hash() {
            return Some(candidates[hash_index(&hash.source, candidates.len())].clone());
        }

        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        Some(candidates[rng.gen_range(0..candidates.len())].clone())
    }

    fn name(&self) -> &'static str {
        "hash"
    }
}
