//! Helm Metrics - lifecycle tallies for the entity pools
//!
//! Named counters the entity managers bump on create/destroy/resurrect
//! transitions. Collection is behind the `metrics` feature; without it
//! every call compiles down to a no-op stub, so ship builds carry zero
//! overhead.

#[cfg(feature = "metrics")]
mod counter;

#[cfg(feature = "metrics")]
pub use counter::Counter;

// ============================================================================
// No-op stub when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
pub struct Counter;

#[cfg(not(feature = "metrics"))]
impl Counter {
    pub fn new() -> Self {
        Self
    }
    pub fn increment(&mut self, _name: &'static str, _value: u64) {}
    pub fn get(&self, _name: &str) -> u64 {
        0
    }
    pub fn reset_all(&mut self) {}
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> {
        std::iter::empty()
    }
}

#[cfg(not(feature = "metrics"))]
impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}
