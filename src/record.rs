//! Summary: Key ordering requirement and the stored record variant.
//! Copyright (c) YOAB. All rights reserved.
//!
//! Both tree engines store `Record<K, V>` values: either a bare key (set
//! mode) or a key together with a value (map mode). A single accessor yields
//! the key in both modes, which is all the rebalancing code ever needs.

/// Requirement on tree keys: a total order plus cheap duplication.
///
/// Separator bookkeeping in the B+Tree copies keys into interior nodes, so
/// keys must be `Clone` in addition to `Ord`. Any type satisfying both
/// bounds is a valid key.
pub trait Key: Ord + Clone {}

impl<T: Ord + Clone> Key for T {}

/// A stored record: a bare key in set mode, or a key-value entry in map mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record<K, V> {
    /// Set mode: the key is the whole record.
    Key(K),
    /// Map mode: a key with an associated value.
    Entry(K, V),
}

impl<K, V> Record<K, V> {
    /// Returns the record's key.
    #[inline]
    pub fn key(&self) -> &K {
        match self {
            Record::Key(key) => key,
            Record::Entry(key, _) => key,
        }
    }

    /// Returns the associated value, or `None` for a set-mode record.
    #[inline]
    pub fn value(&self) -> Option<&V> {
        match self {
            Record::Key(_) => None,
            Record::Entry(_, value) => Some(value),
        }
    }

    /// Returns a mutable reference to the associated value, or `None` for a
    /// set-mode record.
    #[inline]
    pub fn value_mut(&mut self) -> Option<&mut V> {
        match self {
            Record::Key(_) => None,
            Record::Entry(_, value) => Some(value),
        }
    }

    /// Returns true if the record carries a value.
    #[inline]
    pub fn is_entry(&self) -> bool {
        matches!(self, Record::Entry(..))
    }

    /// Splits the record into its key and optional value.
    pub fn into_parts(self) -> (K, Option<V>) {
        match self {
            Record::Key(key) => (key, None),
            Record::Entry(key, value) => (key, Some(value)),
        }
    }
}

impl<K, V> From<(K, V)> for Record<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Record::Entry(key, value)
    }
}
