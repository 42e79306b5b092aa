//! Insertion-ordered key table for one capability kind

use mbk_domain::value_objects::ProviderKey;
use std::fmt;
use std::sync::Arc;

/// Outcome of inserting into a [`KindTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The key was new and was appended
    Added,
    /// The key existed and its implementation was replaced in place
    Replaced,
    /// The key existed and overwrites are not allowed; nothing changed
    Rejected,
}

/// Implementations of one capability kind keyed by [`ProviderKey`]
///
/// Iteration order is registration order. A replaced entry keeps the
/// position of the original registration, so the first registered key
/// stays first.
pub struct KindTable<T: ?Sized> {
    entries: Vec<(ProviderKey, Arc<T>)>,
}

impl<T: ?Sized> KindTable<T> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert an implementation under `key`
    pub fn insert(&mut self, key: ProviderKey, value: Arc<T>, allow_overwrite: bool) -> Insertion {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(_) if !allow_overwrite => Insertion::Rejected,
            Some((_, slot)) => {
                *slot = value;
                Insertion::Replaced
            }
            None => {
                self.entries.push((key, value));
                Insertion::Added
            }
        }
    }

    /// Look up the implementation registered under `key`
    pub fn get(&self, key: &ProviderKey) -> Option<&Arc<T>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Whether `key` is registered
    pub fn contains(&self, key: &ProviderKey) -> bool {
        self.get(key).is_some()
    }

    /// First registered entry
    pub fn first(&self) -> Option<(&ProviderKey, &Arc<T>)> {
        self.entries.first().map(|(key, value)| (key, value))
    }

    /// Registered keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = &ProviderKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Registered implementations in registration order
    pub fn values(&self) -> impl Iterator<Item = &Arc<T>> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Number of registered keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: ?Sized> Default for KindTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for KindTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}
