//! Named counters for lifecycle events

use std::collections::HashMap;

/// Monotonic named tallies. Names are static because the call sites are
/// fixed (lifecycle transitions), which keeps increments allocation-free.
pub struct Counter {
    totals: HashMap<&'static str, u64>,
}

impl Counter {
    pub fn new() -> Self {
        Self {
            totals: HashMap::new(),
        }
    }

    pub fn increment(&mut self, name: &'static str, value: u64) {
        *self.totals.entry(name).or_insert(0) += value;
    }

    pub fn get(&self, name: &str) -> u64 {
        self.totals.get(name).copied().unwrap_or(0)
    }

    pub fn reset_all(&mut self) {
        self.totals.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.totals.iter().map(|(name, value)| (*name, *value))
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}
