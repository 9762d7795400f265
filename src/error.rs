//! Error types for the `chained-hashmap` crate

/// Errors applicable to constructing and operating on a
/// [`ChainedHashMap`].
///
/// [`ChainedHashMap`]: crate::ChainedHashMap
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Construction was requested with a capacity of zero.
    ///
    /// Bucket indices are computed modulo the capacity, so a table
    /// needs at least one bucket to place an entry.
    #[error("initial capacity must be at least 1")]
    ZeroCapacity,

    /// Construction was requested with a load factor outside `(0, 1]`.
    ///
    /// The load factor is the occupancy threshold that triggers growth.
    /// NaN fails the range check and is rejected like any other
    /// out-of-range value.
    #[error("load factor must be in (0, 1], got {0}")]
    LoadFactorOutOfRange(f64),

    /// A lookup or removal targeted a key that is not in the table.
    ///
    /// A miss is an ordinary, recoverable outcome. The table is left
    /// exactly as it was.
    #[error("key not found: {0:?}")]
    KeyNotFound(String),
}
