/// A growth policy for containers with explicit capacity.
///
/// When a container is full, its new capacity becomes
/// `capacity + max(1, increment(len, capacity))`, so every
/// policy is guaranteed to make progress.
pub trait Increment {
    /// Computes how many slots to add given the current
    /// length and capacity.
    fn increment(&self, len: usize, capacity: usize) -> usize;
}

/// Doubles the capacity; an empty container grows by one.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultIncrement;

impl Increment for DefaultIncrement {
    #[inline]
    fn increment(&self, _len: usize, capacity: usize) -> usize {
        capacity
    }
}

/// Grows by a fixed number of slots.
#[derive(Clone, Copy, Debug)]
pub struct Additive(pub usize);

impl Increment for Additive {
    #[inline]
    fn increment(&self, _len: usize, _capacity: usize) -> usize {
        self.0
    }
}

/// Grows by a fraction of the current capacity.
#[derive(Clone, Copy, Debug)]
pub struct Multiplicative(pub f32);

impl Increment for Multiplicative {
    #[inline]
    fn increment(&self, _len: usize, capacity: usize) -> usize {
        (capacity as f32 * self.0) as usize
    }
}

impl<F: Fn(usize, usize) -> usize> Increment for F {
    #[inline]
    fn increment(&self, len: usize, capacity: usize) -> usize {
        self(len, capacity)
    }
}

/// Computes the capacity after one growth step.
#[inline]
pub fn grow<I: Increment + ?Sized>(policy: &I, len: usize, capacity: usize) -> usize {
    capacity + policy.increment(len, capacity).max(1)
}
