use std::hash::Hash;
use std::ops;

use serde_json::Value;

use crate::set::KeyedSet;

// ------------- Truthy -------------

/// Boolean interpretation of a per-member outcome.
///
/// `truthy` is the loose reading (zero, empty and null are false), while
/// `is_true`/`is_false` only accept an actual boolean.
pub trait Truthy {
    fn truthy(&self) -> bool;
    fn is_true(&self) -> bool {
        false
    }
    fn is_false(&self) -> bool {
        false
    }
}

impl Truthy for bool {
    fn truthy(&self) -> bool {
        *self
    }
    fn is_true(&self) -> bool {
        *self
    }
    fn is_false(&self) -> bool {
        !*self
    }
}

macro_rules! truthy_number {
    ($($t:ty),*) => {
        $(
            impl Truthy for $t {
                fn truthy(&self) -> bool {
                    *self != (0 as $t)
                }
            }
        )*
    };
}
truthy_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Truthy for str {
    fn truthy(&self) -> bool {
        !self.is_empty() && self != "0"
    }
}
impl Truthy for String {
    fn truthy(&self) -> bool {
        self.as_str().truthy()
    }
}
impl<T: Truthy> Truthy for Option<T> {
    fn truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::truthy)
    }
    fn is_true(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_true)
    }
    fn is_false(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_false)
    }
}
impl<T> Truthy for Vec<T> {
    fn truthy(&self) -> bool {
        !self.is_empty()
    }
}
impl Truthy for Value {
    fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => s.truthy(),
            Value::Array(a) => !a.is_empty(),
            Value::Object(o) => !o.is_empty(),
        }
    }
    fn is_true(&self) -> bool {
        matches!(self, Value::Bool(true))
    }
    fn is_false(&self) -> bool {
        matches!(self, Value::Bool(false))
    }
}

// ------------- BulkResult -------------

/// Per-member outcomes of one operation applied across a collection, keyed
/// like the collection it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkResult<K: Hash + Eq, V> {
    results: KeyedSet<K, V>,
}

impl<K: Hash + Eq, V> BulkResult<K, V> {
    pub fn new() -> Self {
        Self {
            results: KeyedSet::new(),
        }
    }
    pub fn record(&mut self, key: K, outcome: V) -> Option<V> {
        self.results.replace(key, outcome)
    }
    pub fn into_inner(self) -> KeyedSet<K, V> {
        self.results
    }
}

impl<K: Hash + Eq, V: Truthy> BulkResult<K, V> {
    /// True iff every outcome is truthy (exactly `true` when `strict`).
    /// Vacuously true when there are no outcomes.
    pub fn all_true(&self, strict: bool) -> bool {
        self.results.values().all(|v| if strict { v.is_true() } else { v.truthy() })
    }
    pub fn all_false(&self, strict: bool) -> bool {
        self.results.values().all(|v| if strict { v.is_false() } else { !v.truthy() })
    }
    pub fn any_true(&self, strict: bool) -> bool {
        self.results.values().any(|v| if strict { v.is_true() } else { v.truthy() })
    }
    pub fn any_false(&self, strict: bool) -> bool {
        self.results.values().any(|v| if strict { v.is_false() } else { !v.truthy() })
    }
}

// set algebra keeps results as results
impl<K: Hash + Eq + Clone, V: Clone> BulkResult<K, V> {
    pub fn filter<F>(&self, keep: F) -> Self
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.results.filter(keep).into()
    }
    pub fn union(&self, other: &Self) -> Self {
        self.results.union(&other.results).into()
    }
    pub fn intersect(&self, other: &Self) -> Self {
        self.results.intersect(&other.results).into()
    }
    pub fn difference(&self, other: &Self) -> Self {
        self.results.difference(&other.results).into()
    }
    pub fn subtract(&self, other: &Self) -> Self {
        self.results.subtract(&other.results).into()
    }
}

impl<K: Hash + Eq, V> Default for BulkResult<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
impl<K: Hash + Eq, V> From<KeyedSet<K, V>> for BulkResult<K, V> {
    fn from(results: KeyedSet<K, V>) -> Self {
        Self { results }
    }
}
impl<K: Hash + Eq, V> FromIterator<(K, V)> for BulkResult<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        KeyedSet::from_iter(iter).into()
    }
}
impl<K: Hash + Eq, V> ops::Deref for BulkResult<K, V> {
    type Target = KeyedSet<K, V>;
    fn deref(&self) -> &Self::Target {
        &self.results
    }
}
impl<K: Hash + Eq, V> ops::DerefMut for BulkResult<K, V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.results
    }
}
impl<K: Hash + Eq, V> IntoIterator for BulkResult<K, V> {
    type Item = (K, V);
    type IntoIter = indexmap::map::IntoIter<K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}
impl<'a, K: Hash + Eq, V> IntoIterator for &'a BulkResult<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = indexmap::map::Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
