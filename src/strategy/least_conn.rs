//! Least connections selection strategy.

use std::cmp::Ordering;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::candidate::Candidate;
use crate::selector::{SelectContext, Strategy};

/// Least connections selector.
/// Selects the candidate with the minimum number of active connections;
/// candidates that do not report connections count as 0. Ties are broken
/// uniformly at random.
#[derive(Debug)]
pub struct LeastConn {
    rng: Mutex<StdRng>,
}

impl LeastConn {
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

impl Default for LeastConn {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Candidate + Clone> Strategy<T> for LeastConn {
    fn apply(&self, _ctx: &SelectContext, candidates: &[T]) -> Option<T> {
        let tied = min_tied(candidates, |c| {
            c.as_connectable().map(|c| c.active_conns()).unwrap_or(0)
        });
        pick_tied(&self.rng, tied)
    }

    fn name(&self) -> &'static str {
        "least_conn"
    }
}

/// All candidates sharing the minimum key, in list order.
pub(crate) fn min_tied<'a, T, K, F>(candidates: &'a [T], key: F) -> Vec<&'a T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut min: Option<K> = None;
    let mut tied = Vec::new();
    for candidate in candidates {
        let k = key(candidate);
        match min.as_ref().map(|m| k.cmp(m)) {
            Some(Ordering::Greater) => {}
            Some(Ordering::Equal) => tied.push(candidate),
            _ => {
                min = Some(k);
                tied.clear();
                tied.push(candidate);
            }
        }
    }
    tied
}

/// Uniform random pick among tied candidates; no lock taken for a single one.
pub(crate) fn pick_tied<T: Clone>(rng: &Mutex<StdRng>, tied: Vec<&T>) -> Option<T> {
    match tied.len() {
        0 => None,
        1 => Some(tied[0].clone()),
        n => {
            let mut rng = rng.lock().unwrap_or_else(|e| e.into_inner());
            Some(tied[rng.gen_range(0..n)].clone())
        }
    }
}
