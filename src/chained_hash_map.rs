//! ChainedHashMap: separately chained buckets with load-factor growth.

use core::hash::{BuildHasher, Hasher};
use std::fmt;
use std::mem;

use crate::error::Error;
use crate::hash::Djb2BuildHasher;

/// Bucket count used by [`ChainedHashMap::new`].
pub const DEFAULT_CAPACITY: usize = 8;

/// Growth threshold used by [`ChainedHashMap::new`].
pub const DEFAULT_LOAD_FACTOR: f64 = 0.7;

// One chain node. The link is exclusively owned, so a bucket is a singly
// linked list of boxes headed in the bucket vector.
#[derive(Debug)]
struct Entry {
    key: String,
    value: i64,
    next: Option<Box<Entry>>,
}

type Chain = Option<Box<Entry>>;

/// A hash table mapping `String` keys to `i64` values, resolving
/// collisions by chaining and growing when the configured load factor is
/// exceeded.
///
/// Each bucket holds a singly linked chain of entries; a new key is
/// linked at the head of its chain, an existing key is overwritten in
/// place. Before an insert, if the ratio of stored entries to buckets
/// strictly exceeds the load factor, the bucket vector doubles (as many
/// times as needed to get back under the threshold) and every entry is
/// relinked under the new capacity.
///
/// The hasher is pluggable through `S` and defaults to unseeded djb2, so
/// bucket placement is deterministic for a given key and capacity.
#[derive(Debug)]
pub struct ChainedHashMap<S = Djb2BuildHasher> {
    buckets: Vec<Chain>,
    len: usize,
    load_factor: f64,
    hasher: S,
}

impl ChainedHashMap {
    /// Creates an empty table with [`DEFAULT_CAPACITY`] buckets and the
    /// [`DEFAULT_LOAD_FACTOR`] growth threshold.
    pub fn new() -> Self {
        Self::with_parts(DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, Djb2BuildHasher)
    }

    /// Creates an empty table with `initial_capacity` buckets and the
    /// default growth threshold.
    pub fn with_capacity(initial_capacity: usize) -> Result<Self, Error> {
        Self::with_capacity_and_load_factor(initial_capacity, DEFAULT_LOAD_FACTOR)
    }

    /// Creates an empty table with `initial_capacity` buckets that grows
    /// whenever occupancy exceeds `load_factor`.
    ///
    /// Rejects a zero capacity and load factors outside `(0, 1]`.
    pub fn with_capacity_and_load_factor(
        initial_capacity: usize,
        load_factor: f64,
    ) -> Result<Self, Error> {
        Self::with_hasher(initial_capacity, load_factor, Djb2BuildHasher)
    }
}

impl Default for ChainedHashMap {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> ChainedHashMap<S> {
    fn with_parts(capacity: usize, load_factor: f64, hasher: S) -> Self {
        let mut buckets = Vec::with_capacity(capacity);
        buckets.resize_with(capacity, || None);
        Self {
            buckets,
            len: 0,
            load_factor,
            hasher,
        }
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current bucket count. Grows by doubling; never shrinks.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// The growth threshold this table was configured with.
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Iterates over `(key, value)` pairs in table order: bucket index
    /// ascending, then chain head to tail. The order is an artifact of
    /// the internal layout, not a contract.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            buckets: self.buckets.iter(),
            chain: None,
        }
    }
}

impl<S: BuildHasher> ChainedHashMap<S> {
    /// Creates an empty table that hashes keys with `hasher` instead of
    /// the default djb2.
    ///
    /// Rejects a zero `initial_capacity` and load factors outside
    /// `(0, 1]` (NaN included).
    pub fn with_hasher(
        initial_capacity: usize,
        load_factor: f64,
        hasher: S,
    ) -> Result<Self, Error> {
        if initial_capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        if !(load_factor > 0.0 && load_factor <= 1.0) {
            return Err(Error::LoadFactorOutOfRange(load_factor));
        }
        Ok(Self::with_parts(initial_capacity, load_factor, hasher))
    }

    // Digest of the raw key bytes. Bytes are fed to the hasher directly
    // rather than through `str`'s `Hash` impl, which appends trait-level
    // framing; the digest must be exactly the hash of the key.
    fn hash_key(&self, key: &str) -> u64 {
        let mut hasher = self.hasher.build_hasher();
        hasher.write(key.as_bytes());
        hasher.finish()
    }

    fn bucket_index(&self, key: &str) -> usize {
        (self.hash_key(key) % self.buckets.len() as u64) as usize
    }

    fn find(&self, key: &str) -> Option<&Entry> {
        let mut cursor = self.buckets[self.bucket_index(key)].as_deref();
        while let Some(entry) = cursor {
            if entry.key == key {
                return Some(entry);
            }
            cursor = entry.next.as_deref();
        }
        None
    }

    /// Inserts `key` with `value`, returning the previous value if the
    /// key was already present.
    ///
    /// An existing key is overwritten in place without allocating; a new
    /// key is copied into a fresh entry linked at the head of its chain,
    /// so chains read most-recently-inserted-first. The growth check runs
    /// before anything else, against the pre-insert entry count.
    pub fn insert(&mut self, key: &str, value: i64) -> Option<i64> {
        if self.len as f64 / self.buckets.len() as f64 > self.load_factor {
            self.grow();
        }

        let index = self.bucket_index(key);
        let mut cursor = self.buckets[index].as_deref_mut();
        while let Some(entry) = cursor {
            if entry.key == key {
                return Some(mem::replace(&mut entry.value, value));
            }
            cursor = entry.next.as_deref_mut();
        }

        let next = self.buckets[index].take();
        self.buckets[index] = Some(Box::new(Entry {
            key: key.to_owned(),
            value,
            next,
        }));
        self.len += 1;
        None
    }

    // Doubles the bucket count until the current entry count is back
    // within the load factor, then relinks every node under the new
    // capacity in one pass. Nodes move between chains without being
    // reallocated, and `len` is untouched throughout, so the growth
    // check cannot re-trigger mid-rehash.
    fn grow(&mut self) {
        let mut new_capacity = self.buckets.len() * 2;
        while self.len as f64 / new_capacity as f64 > self.load_factor {
            new_capacity *= 2;
        }

        let old_buckets = mem::replace(&mut self.buckets, {
            let mut buckets = Vec::with_capacity(new_capacity);
            buckets.resize_with(new_capacity, || None);
            buckets
        });

        for mut chain in old_buckets {
            while let Some(mut entry) = chain {
                chain = entry.next.take();
                let index = self.bucket_index(&entry.key);
                entry.next = self.buckets[index].take();
                self.buckets[index] = Some(entry);
            }
        }
    }

    /// Looks up `key` and returns its value.
    ///
    /// A miss is reported as [`Error::KeyNotFound`] carrying the key,
    /// and leaves the table untouched.
    pub fn get(&self, key: &str) -> Result<i64, Error> {
        self.find(key)
            .map(|entry| entry.value)
            .ok_or_else(|| Error::KeyNotFound(key.to_owned()))
    }

    /// Membership test without the error path of [`ChainedHashMap::get`].
    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Removes `key`, returning the value it held.
    ///
    /// The matching entry is unlinked from its chain, relinking its
    /// predecessor (or the bucket head) to its successor. A miss is
    /// reported as [`Error::KeyNotFound`] and leaves the table unchanged.
    pub fn remove(&mut self, key: &str) -> Result<i64, Error> {
        let index = self.bucket_index(key);
        let mut link = &mut self.buckets[index];
        loop {
            match link {
                None => return Err(Error::KeyNotFound(key.to_owned())),
                Some(entry) if entry.key == key => {
                    let value = entry.value;
                    *link = entry.next.take();
                    self.len -= 1;
                    return Ok(value);
                }
                Some(entry) => link = &mut entry.next,
            }
        }
    }
}

// Chains are unlinked node by node here instead of recursing through the
// `Box` links, so a degenerate single-bucket table cannot overflow the
// stack on drop.
impl<S> Drop for ChainedHashMap<S> {
    fn drop(&mut self) {
        for bucket in &mut self.buckets {
            let mut chain = bucket.take();
            while let Some(mut entry) = chain {
                chain = entry.next.take();
            }
        }
    }
}

/// Iterator over `(key, value)` pairs, returned by
/// [`ChainedHashMap::iter`].
pub struct Iter<'a> {
    buckets: std::slice::Iter<'a, Chain>,
    chain: Option<&'a Entry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, i64);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain {
                self.chain = entry.next.as_deref();
                return Some((entry.key.as_str(), entry.value));
            }
            self.chain = self.buckets.next()?.as_deref();
        }
    }
}

/// Lists every `(key, value)` pair in table order, e.g.
/// `[(apple, 3), (banana, 2)]`.
impl<S> fmt::Display for ChainedHashMap<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "({}, {})", key, value)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::hash::BuildHasher;

    // Forces every key into bucket 0 to exercise chain traversal.
    #[derive(Clone, Default)]
    struct ConstBuildHasher;
    struct ConstHasher;
    impl BuildHasher for ConstBuildHasher {
        type Hasher = ConstHasher;
        fn build_hasher(&self) -> Self::Hasher {
            ConstHasher
        }
    }
    impl Hasher for ConstHasher {
        fn write(&mut self, _bytes: &[u8]) {}
        fn finish(&self) -> u64 {
            0
        }
    }

    /// Invariant: a fresh table is empty, with the configured capacity
    /// and threshold visible through the accessors.
    #[test]
    fn fresh_table_is_empty() {
        let map = ChainedHashMap::new();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert_eq!(map.capacity(), DEFAULT_CAPACITY);
        assert_eq!(map.load_factor(), DEFAULT_LOAD_FACTOR);
        assert_eq!(map.iter().count(), 0);
    }

    /// Invariant: a zero capacity is rejected at construction.
    #[test]
    fn zero_capacity_rejected() {
        assert_eq!(
            ChainedHashMap::with_capacity(0).unwrap_err(),
            Error::ZeroCapacity
        );
    }

    /// Invariant: load factors outside `(0, 1]` are rejected at
    /// construction, NaN included.
    #[test]
    fn out_of_range_load_factor_rejected() {
        for bad in [0.0, -0.5, 1.5] {
            assert_eq!(
                ChainedHashMap::with_capacity_and_load_factor(4, bad).unwrap_err(),
                Error::LoadFactorOutOfRange(bad)
            );
        }
        let nan = ChainedHashMap::with_capacity_and_load_factor(4, f64::NAN);
        assert!(matches!(
            nan,
            Err(Error::LoadFactorOutOfRange(lf)) if lf.is_nan()
        ));
    }

    /// Invariant: a load factor of exactly 1 is a legal configuration.
    #[test]
    fn full_load_factor_accepted() {
        let map = ChainedHashMap::with_capacity_and_load_factor(4, 1.0).unwrap();
        assert_eq!(map.capacity(), 4);
    }

    /// Invariant: after `insert(k, v)`, `get(k)` returns `v`.
    #[test]
    fn insert_then_get_round_trips() {
        let mut map = ChainedHashMap::new();
        assert_eq!(map.insert("apple", 3), None);
        assert_eq!(map.get("apple"), Ok(3));
        assert!(map.contains_key("apple"));
        assert_eq!(map.len(), 1);
    }

    /// Invariant: re-inserting an existing key overwrites in place,
    /// returns the previous value, and leaves `len` unchanged.
    #[test]
    fn overwrite_keeps_single_entry() {
        let mut map = ChainedHashMap::new();
        assert_eq!(map.insert("banana", 2), None);
        assert_eq!(map.insert("banana", 4), Some(2));
        assert_eq!(map.get("banana"), Ok(4));
        assert_eq!(map.len(), 1);
        assert_eq!(map.iter().count(), 1);
    }

    /// Invariant: removal returns the held value, decrements `len` by
    /// one, and later lookups of the key miss.
    #[test]
    fn remove_unlinks_and_decrements() {
        let mut map = ChainedHashMap::new();
        map.insert("apple", 3);
        map.insert("banana", 2);
        assert_eq!(map.remove("apple"), Ok(3));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("apple"), Err(Error::KeyNotFound("apple".into())));
        assert_eq!(map.get("banana"), Ok(2));
    }

    /// Invariant: a miss on `get` or `remove` is an error carrying the
    /// key, and the table keeps working afterwards.
    #[test]
    fn miss_is_recoverable() {
        let mut map = ChainedHashMap::new();
        assert_eq!(map.get("durian"), Err(Error::KeyNotFound("durian".into())));
        assert_eq!(
            map.remove("durian"),
            Err(Error::KeyNotFound("durian".into()))
        );
        assert_eq!(map.len(), 0);
        map.insert("durian", 9);
        assert_eq!(map.get("durian"), Ok(9));
    }

    /// Invariant: the growth check runs against the pre-insert count, so
    /// with capacity 4 and load factor 0.7 the fourth distinct insert is
    /// the one that doubles the table.
    #[test]
    fn growth_triggers_on_fourth_insert() {
        let mut map = ChainedHashMap::with_capacity_and_load_factor(4, 0.7).unwrap();
        map.insert("k0", 0);
        map.insert("k1", 1);
        map.insert("k2", 2);
        assert_eq!(map.capacity(), 4);
        map.insert("k3", 3);
        assert_eq!(map.capacity(), 8);
        assert_eq!(map.len(), 4);
    }

    /// Invariant: growth keeps doubling until the entry count is back
    /// within the threshold, so the post-resize occupancy always
    /// satisfies the configured load factor.
    #[test]
    fn growth_doubles_until_within_threshold() {
        let mut map = ChainedHashMap::with_capacity_and_load_factor(1, 0.25).unwrap();
        map.insert("a", 1);
        assert_eq!(map.capacity(), 1);
        // Pre-insert occupancy 1/1 exceeds 0.25; one doubling (1/2) is
        // still above it, so the table must reach 4 buckets.
        map.insert("b", 2);
        assert_eq!(map.capacity(), 4);
        assert_eq!(map.get("a"), Ok(1));
        assert_eq!(map.get("b"), Ok(2));
    }

    /// Invariant: growth preserves every mapping exactly; nothing is
    /// lost or duplicated across repeated rehashes.
    #[test]
    fn growth_preserves_mappings() {
        let mut map = ChainedHashMap::with_capacity_and_load_factor(4, 0.7).unwrap();
        for i in 0..64 {
            map.insert(&format!("key{}", i), i);
        }
        assert_eq!(map.len(), 64);
        assert!(map.capacity() >= 8);
        for i in 0..64 {
            assert_eq!(map.get(&format!("key{}", i)), Ok(i));
        }
        assert_eq!(map.iter().count(), 64);
    }

    /// Invariant: an overwrite can also trigger growth; the check runs
    /// before the key is known to be present.
    #[test]
    fn overwrite_can_trigger_growth() {
        let mut map = ChainedHashMap::with_capacity_and_load_factor(1, 0.5).unwrap();
        map.insert("a", 1);
        assert_eq!(map.capacity(), 1);
        // 1/1 > 0.5 before this overwrite, so the table grows even
        // though no new entry is created.
        assert_eq!(map.insert("a", 2), Some(1));
        assert_eq!(map.capacity(), 2);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a"), Ok(2));
    }

    /// Invariant: colliding keys chain in most-recently-inserted-first
    /// order; a new key becomes the head of its chain.
    #[test]
    fn chains_read_most_recent_first() {
        let mut map = ChainedHashMap::with_hasher(4, 1.0, ConstBuildHasher).unwrap();
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("c", 3);
        let order: Vec<_> = map.iter().map(|(k, v)| (k.to_owned(), v)).collect();
        assert_eq!(
            order,
            vec![("c".to_owned(), 3), ("b".to_owned(), 2), ("a".to_owned(), 1)]
        );
    }

    /// Invariant: unlinking works at every chain position: head, middle,
    /// and tail.
    #[test]
    fn collision_chain_unlinks_at_any_position() {
        for victim in ["a", "b", "c"] {
            let mut map = ChainedHashMap::with_hasher(4, 1.0, ConstBuildHasher).unwrap();
            map.insert("a", 1);
            map.insert("b", 2);
            map.insert("c", 3);
            // Chain is c -> b -> a, so "c" is the head, "b" the middle
            // and "a" the tail.
            assert!(map.remove(victim).is_ok());
            assert_eq!(map.len(), 2);
            assert!(!map.contains_key(victim));
            for survivor in ["a", "b", "c"] {
                if survivor != victim {
                    assert!(map.contains_key(survivor));
                }
            }
        }
    }

    /// Invariant: `iter` walks buckets in index order and each chain
    /// head to tail; placement under djb2 is deterministic.
    #[test]
    fn iter_walks_table_order() {
        // djb2 digests mod 4: blueberry -> 1, banana and cherry -> 2,
        // apple -> 3. Load factor 1.0 keeps the capacity at 4.
        let mut map = ChainedHashMap::with_capacity_and_load_factor(4, 1.0).unwrap();
        map.insert("apple", 3);
        map.insert("banana", 2);
        map.insert("cherry", 5);
        map.insert("blueberry", 5);
        let order: Vec<_> = map.iter().map(|(k, v)| (k.to_owned(), v)).collect();
        assert_eq!(
            order,
            vec![
                ("blueberry".to_owned(), 5),
                ("cherry".to_owned(), 5),
                ("banana".to_owned(), 2),
                ("apple".to_owned(), 3),
            ]
        );
    }

    /// Invariant: `Display` lists pairs in table order inside brackets.
    #[test]
    fn display_lists_pairs_in_table_order() {
        let empty = ChainedHashMap::new();
        assert_eq!(empty.to_string(), "[]");

        let mut map = ChainedHashMap::with_hasher(4, 1.0, ConstBuildHasher).unwrap();
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.to_string(), "[(b, 2), (a, 1)]");
    }

    /// Invariant: dropping a table with one long chain releases every
    /// node without recursing through the links.
    #[test]
    fn long_chain_drops_iteratively() {
        let mut map = ChainedHashMap::with_hasher(1, 1.0, ConstBuildHasher).unwrap();
        for i in 0..2_000 {
            map.insert(&format!("key{}", i), i);
        }
        assert_eq!(map.len(), 2_000);
        drop(map);
    }
}
