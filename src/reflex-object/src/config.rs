/// Tuning knobs for a [`Scopes`](crate::Scopes) arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Number of hash buckets in every scope's name lookup
    /// table.
    pub lookup_buckets: usize,
    /// Number of arena slots to reserve up front.
    pub initial_slots: usize,
}

impl Config {
    /// Sets the number of lookup buckets per scope.
    pub const fn with_lookup_buckets(mut self, buckets: usize) -> Self {
        self.lookup_buckets = buckets;
        self
    }

    /// Sets the number of slots reserved in the arena.
    pub const fn with_initial_slots(mut self, slots: usize) -> Self {
        self.initial_slots = slots;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lookup_buckets: 11,
            initial_slots: 0,
        }
    }
}
