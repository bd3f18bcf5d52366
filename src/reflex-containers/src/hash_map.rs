use std::{
    borrow::Borrow,
    fmt,
    hash::{BuildHasher, Hash, Hasher},
};

use reflex_utils::hash::BuildAdditiveHasher;

use crate::{Error, Result, SList, Vector};

const DEFAULT_BUCKETS: usize = 11;

/// A hash map which resolves collisions by chaining entries
/// in per-bucket [`SList`]s.
///
/// The bucket count is fixed unless explicitly changed with
/// [`HashMap::rehash`].
pub struct HashMap<K, V, S = BuildAdditiveHasher> {
    buckets: Vector<SList<(K, V)>>,
    len: usize,
    hasher: S,
}

impl<K, V, S: Default> HashMap<K, V, S> {
    /// Creates an empty map with the default bucket count.
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }

    /// Creates an empty map with `buckets` chains.
    pub fn with_buckets(buckets: usize) -> Self {
        Self::with_hasher(buckets, S::default())
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// Creates an empty map with `buckets` chains, hashing
    /// keys through `hasher`.
    ///
    /// At least one bucket is always allocated.
    pub fn with_hasher(buckets: usize, hasher: S) -> Self {
        let buckets = buckets.max(1);
        let mut chains = Vector::with_capacity(buckets);
        chains.resize_with(buckets, SList::new);

        Self {
            buckets: chains,
            len: 0,
            hasher,
        }
    }

    /// Gets the number of entries in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Indicates whether the map is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Gets the number of buckets.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Removes all entries, keeping the bucket count.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }

    /// Gets an iterator over all entries in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.iter().map(|(k, v)| (k, v)))
    }

    /// Gets an iterator over all entries with mutable values.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> + '_ {
        self.buckets
            .iter_mut()
            .flat_map(|bucket| bucket.iter_mut().map(|(k, v)| (&*k, v)))
    }

    /// Gets an iterator over all keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> HashMap<K, V, S> {
    fn bucket<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        let mut state = self.hasher.build_hasher();
        key.hash(&mut state);
        (state.finish() % self.buckets.len() as u64) as usize
    }

    /// Finds the entry for `key`.
    pub fn find<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.buckets[self.bucket(key)]
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(k, v)| (k, v))
    }

    /// Gets the value for `key`.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).map(|(_, v)| v)
    }

    /// Gets the value for `key` mutably.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = self.bucket(key);
        self.buckets[bucket]
            .iter_mut()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Gets the value for `key`, failing when it is absent.
    pub fn at<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Gets the value for `key` mutably, failing when it is
    /// absent.
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Checks whether an entry for `key` exists.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Inserts `value` under `key` unless the key is already
    /// present.
    ///
    /// Returns the value now stored under `key` and whether
    /// the insertion took place. An existing value is never
    /// overwritten.
    pub fn insert(&mut self, key: K, value: V) -> (&mut V, bool) {
        let bucket = self.bucket(&key);
        let chain = &mut self.buckets[bucket];

        match chain.iter().position(|(k, _)| *k == key) {
            Some(index) => {
                // The position was just found, so `nth` yields it.
                let (_, v) = chain.iter_mut().nth(index).unwrap_or_else(|| unreachable!());
                (v, false)
            }
            None => {
                self.len += 1;
                let (_, v) = chain.push_back((key, value));
                (v, true)
            }
        }
    }

    /// Inserts `value` under `key`, replacing and returning
    /// any previous value.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self.get_mut(&key) {
            return Some(std::mem::replace(slot, value));
        }

        self.insert(key, value);
        None
    }

    /// Removes the entry for `key` and returns its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = self.bucket(key);
        let (_, value) = self.buckets[bucket].remove_where(|(k, _)| k.borrow() == key)?;
        self.len -= 1;

        Some(value)
    }

    /// Redistributes all entries over `buckets` chains.
    pub fn rehash(&mut self, buckets: usize) {
        let buckets = buckets.max(1);

        let mut chains = Vector::with_capacity(buckets);
        chains.resize_with(buckets, SList::new);
        let old = std::mem::replace(&mut self.buckets, chains);

        for (key, value) in old.into_iter().flatten() {
            let bucket = self.bucket(&key);
            self.buckets[bucket].push_back((key, value));
        }
    }
}

impl<K, V, S: Default> Default for HashMap<K, V, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for HashMap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            len: self.len,
            hasher: self.hasher.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
