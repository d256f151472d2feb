//! Rewards collected from spheres.

use std::collections::BTreeSet;

use tracing::info;

/// Spheres whose reward has been granted. Each sphere grants at most once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RewardLedger {
    granted: BTreeSet<String>,
}

impl RewardLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the reward of `sphere`. Returns `false` if it was already
    /// granted.
    pub fn grant(&mut self, sphere: &str) -> bool {
        let fresh = self.granted.insert(sphere.to_owned());
        if fresh {
            info!(sphere, total = self.granted.len(), "reward collected");
        }
        fresh
    }

    pub fn contains(&self, sphere: &str) -> bool {
        self.granted.contains(sphere)
    }

    pub fn count(&self) -> usize {
        self.granted.len()
    }

    pub fn is_complete(&self, required: usize) -> bool {
        self.count() >= required
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.granted.iter().map(String::as_str)
    }
}
