//! chained-hashmap: a hash table with string keys, integer values,
//! separate chaining, and explicit load-factor control.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the whole table readable as one structure: a bucket
//!   vector, an owned chain per bucket, and a growth rule.
//! - Layout:
//!   - `hash`: the djb2 digest behind the standard `Hasher` /
//!     `BuildHasher` traits. The table feeds raw key bytes, so the
//!     digest is exactly djb2 of the key.
//!   - `chained_hash_map`: `ChainedHashMap<S>`, a `Vec` of chain heads
//!     where each node exclusively owns its successor
//!     (`Option<Box<Entry>>`). New keys are linked at the chain head;
//!     existing keys are overwritten in place.
//!   - `error`: the recoverable error surface. A missing key is an
//!     ordinary `Err`, never a panic or a process exit.
//!
//! Growth
//! - Before each insert, if `len / capacity` strictly exceeds the
//!   configured load factor, the bucket vector doubles (repeatedly, if
//!   one doubling is not enough) and every node is relinked under the
//!   new capacity in a single pass. Rehashing never re-enters the
//!   growth check and never reallocates nodes, so the occupancy
//!   invariant holds as soon as the pass completes.
//!
//! Constraints
//! - Single-threaded use: no interior mutability and no internal
//!   locking; exclusive mutation is whatever `&mut` grants. Callers
//!   that need shared mutation serialize externally.
//! - No structural references escape: callers see keys as `&str` and
//!   values by value, never chain nodes.
//! - Deterministic placement: the default hasher is unseeded djb2, so a
//!   given key and capacity always produce the same bucket index.
//!
//! Notes and non-goals
//! - Keys are `String` and values are `i64`; the table is deliberately
//!   not generic over them. The hasher is generic so tests can force
//!   collisions.
//! - No iteration-order guarantee: `iter` and `Display` walk bucket
//!   order, an artifact of the layout.
//! - The table never shrinks; removal only unlinks.
//! - Allocation failure follows the global allocator's policy, as with
//!   the `std` collections.

mod chained_hash_map;
mod chained_hash_map_proptest;
mod error;
pub mod hash;

// Public surface
pub use chained_hash_map::{ChainedHashMap, Iter, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
pub use error::Error;
pub use hash::{Djb2BuildHasher, Djb2Hasher};
