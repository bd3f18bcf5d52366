//! Implementation of the string hash functions used by the
//! reflection containers.

use std::hash::{BuildHasher, Hasher};

/// Produces the additive hash of `data`.
///
/// Every byte contributes `33 * byte` to the sum. This is a
/// weak hash; it exists because scope lookup tables are small
/// and keyed by short attribute names where it performs well
/// enough and stays trivially reproducible.
#[inline(always)]
pub const fn additive_hash(data: &[u8]) -> u64 {
    AdditiveHasher::new().feed(data).state
}

/// A [`Hasher`] which accumulates the additive hash of all
/// the bytes it is fed.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdditiveHasher {
    state: u64,
}

impl AdditiveHasher {
    /// Creates a new hasher with an empty state.
    #[inline(always)]
    pub const fn new() -> Self {
        Self { state: 0 }
    }

    /// Consumes the hasher and returns a new one with `data`
    /// added to the state.
    pub const fn feed(mut self, data: &[u8]) -> Self {
        let mut i = 0;
        while i < data.len() {
            self.state = self.state.wrapping_add(33 * data[i] as u64);
            i += 1;
        }

        self
    }
}

impl Hasher for AdditiveHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        *self = self.feed(bytes);
    }
}

/// Builds [`AdditiveHasher`]s; the default hashing strategy
/// for the reflection containers.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuildAdditiveHasher;

impl BuildHasher for BuildAdditiveHasher {
    type Hasher = AdditiveHasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        AdditiveHasher::new()
    }
}
