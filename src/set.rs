// ordered storage, so that insertion order defines iteration order
use indexmap::IndexMap;
use indexmap::map::{Entry, IntoIter, Iter, IterMut, Keys, Values, ValuesMut};

// the same fast hasher is used for every set
use core::hash::BuildHasherDefault;
use seahash::SeaHasher;

use std::fmt;
use std::hash::Hash;
use std::ops;

use crate::error::{RecordSetError, Result};

pub type KeyHasher = BuildHasherDefault<SeaHasher>;

// ------------- KeyedSet -------------

/// An ordered mapping from unique keys to values with set algebra.
///
/// Keys are unique and the order in which they were first inserted is the
/// order in which every traversal, `map`, `filter` and set operation visits
/// them. Lookups never fail: absence is represented by `None`.
pub struct KeyedSet<K, V> {
    entries: IndexMap<K, V, KeyHasher>,
}

impl<K: Hash + Eq, V> KeyedSet<K, V> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::default(),
        }
    }
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity_and_hasher(capacity, KeyHasher::default()),
        }
    }
    pub fn lookup(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }
    pub fn lookup_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }
    /// Inserts `value` at a key that must not already be occupied.
    ///
    /// On collision the stored value is left untouched and
    /// [`RecordSetError::DuplicateKey`] is returned.
    pub fn add(&mut self, key: K, value: V) -> Result<()>
    where
        K: fmt::Debug,
    {
        match self.entries.entry(key) {
            Entry::Occupied(e) => Err(RecordSetError::duplicate_key(e.key())),
            Entry::Vacant(e) => {
                e.insert(value);
                Ok(())
            }
        }
    }
    /// Inserts or overwrites, returning the previous value. An existing key
    /// keeps its position.
    pub fn replace(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.shift_remove(key)
    }
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }
    /// True iff every given key is present. An empty list is trivially contained.
    pub fn contains_all<'k, I>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = &'k K>,
        K: 'k,
    {
        keys.into_iter().all(|key| self.entries.contains_key(key))
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn count(&self) -> usize {
        self.entries.len()
    }
    pub fn keys(&self) -> Keys<'_, K, V> {
        self.entries.keys()
    }
    pub fn values(&self) -> Values<'_, K, V> {
        self.entries.values()
    }
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        self.entries.values_mut()
    }
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.entries.iter()
    }
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.entries.iter_mut()
    }
    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        self.entries.get_index(index)
    }
    /// Invokes `f(value, key)` once per entry, in iteration order.
    pub fn map<F>(&self, mut f: F)
    where
        F: FnMut(&V, &K),
    {
        for (key, value) in &self.entries {
            f(value, key);
        }
    }
    pub fn map_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut V, &K),
    {
        for (key, value) in self.entries.iter_mut() {
            f(value, key);
        }
    }
    /// Keeps only the entries satisfying the predicate, in place.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.entries.retain(|key, value| keep(value, key));
    }
    /// Applies every pair via `replace`, so later values win.
    pub fn merge_with<I>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.entries.insert(key, value);
        }
        self
    }
    pub fn clear(&mut self) {
        self.entries.clear();
    }
    /// Starts an independent traversal. Any number of cursors may be alive
    /// over the same set at once.
    pub fn cursor(&self) -> Cursor<'_, K, V> {
        Cursor {
            set: self,
            position: Position::BeforeStart,
        }
    }
}

// set algebra needs to copy entries into the new set
impl<K: Hash + Eq + Clone, V: Clone> KeyedSet<K, V> {
    pub fn filter<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.iter()
            .filter(|&(key, value)| keep(value, key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
    /// A copy of this set with every entry of `other` replaced into it; on a
    /// shared key the value of `other` wins.
    pub fn union(&self, other: &Self) -> Self {
        let mut union = self.clone();
        union.merge_with(other.iter().map(|(key, value)| (key.clone(), value.clone())));
        union
    }
    /// Keys present in both sets, valued (and ordered) as in `other`.
    pub fn intersect(&self, other: &Self) -> Self {
        other
            .iter()
            .filter(|&(key, _)| self.contains(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
    /// Symmetric difference: keys held by exactly one of the two sets.
    pub fn difference(&self, other: &Self) -> Self {
        let mut difference: Self = other
            .iter()
            .filter(|&(key, _)| !self.contains(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        difference.merge_with(
            self.iter()
                .filter(|&(key, _)| !other.contains(key))
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        difference
    }
    /// One-sided difference: keys of this set that `other` lacks.
    pub fn subtract(&self, other: &Self) -> Self {
        self.filter(|_, key| !other.contains(key))
    }
}

impl<K: Hash + Eq, V> Default for KeyedSet<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
impl<K: Clone, V: Clone> Clone for KeyedSet<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}
impl<K: Hash + Eq, V: PartialEq> PartialEq for KeyedSet<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}
impl<K: Hash + Eq, V: Eq> Eq for KeyedSet<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for KeyedSet<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for KeyedSet<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        set.merge_with(iter);
        set
    }
}
impl<K: Hash + Eq, V, const N: usize> From<[(K, V); N]> for KeyedSet<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}
impl<K: Hash + Eq, V> Extend<(K, V)> for KeyedSet<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.merge_with(iter);
    }
}

impl<K: Hash + Eq, V> ops::Index<&K> for KeyedSet<K, V> {
    type Output = V;
    fn index(&self, key: &K) -> &V {
        &self.entries[key]
    }
}

impl<K, V> IntoIterator for KeyedSet<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
impl<'a, K, V> IntoIterator for &'a KeyedSet<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
impl<'a, K, V> IntoIterator for &'a mut KeyedSet<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter_mut()
    }
}

// ------------- Cursor -------------

#[derive(Debug, PartialEq, Eq)]
pub enum CursorState<'a, K> {
    BeforeStart,
    Positioned(&'a K),
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    BeforeStart,
    At(usize),
    Exhausted,
}

/// A stateful traversal over a [`KeyedSet`], owned by whoever started it.
#[derive(Debug)]
pub struct Cursor<'a, K, V> {
    set: &'a KeyedSet<K, V>,
    position: Position,
}

impl<'a, K: Hash + Eq, V> Cursor<'a, K, V> {
    pub fn rewind(&mut self) {
        self.position = self.settle(0);
    }
    /// Moves to the following entry, or to `Exhausted` past the last one.
    /// A cursor that has not started yet moves to the first entry.
    pub fn advance(&mut self) {
        self.position = match self.position {
            Position::BeforeStart => self.settle(0),
            Position::At(i) => self.settle(i + 1),
            Position::Exhausted => Position::Exhausted,
        };
    }
    pub fn valid(&self) -> bool {
        matches!(self.position, Position::At(_))
    }
    pub fn key(&self) -> Option<&'a K> {
        self.entry().map(|(key, _)| key)
    }
    pub fn current(&self) -> Option<&'a V> {
        self.entry().map(|(_, value)| value)
    }
    pub fn state(&self) -> CursorState<'a, K> {
        match self.position {
            Position::BeforeStart => CursorState::BeforeStart,
            Position::Exhausted => CursorState::Exhausted,
            Position::At(_) => match self.key() {
                Some(key) => CursorState::Positioned(key),
                None => CursorState::Exhausted,
            },
        }
    }
    fn entry(&self) -> Option<(&'a K, &'a V)> {
        match self.position {
            Position::At(i) => self.set.get_index(i),
            _ => None,
        }
    }
    fn settle(&self, index: usize) -> Position {
        if index < self.set.len() {
            Position::At(index)
        } else {
            Position::Exhausted
        }
    }
}
