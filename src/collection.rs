use serde_json::Value;
use tracing::{debug, trace, warn};

use std::collections::HashSet;
use std::ops;

use crate::bulk::BulkResult;
use crate::error::{RecordSetError, Result};
use crate::record::{Attributes, Errors, Index, Record, RecordKey};
use crate::set::{KeyHasher, KeyedSet};
use crate::settings::{DEFAULT_NEW_KEY_PREFIX, Settings};

// ------------- RecordCollection -------------

/// A keyed set of records of one type with operations that fan out over
/// every member.
///
/// Keys are derived from each record through the collection's [`Index`].
/// Records without a key (typically ones not persisted yet) are stored under
/// synthetic keys minted from the population counter, e.g. `new_0`, `new_1`.
/// The counter only ever grows until the collection is cleared.
///
/// Read access (`lookup`, `contains`, `iter`, `cursor`, `map`, ...) comes from
/// the underlying [`KeyedSet`]; every write goes through the collection so the
/// record type stays homogeneous.
#[derive(Debug, Clone)]
pub struct RecordCollection<R> {
    records: KeyedSet<RecordKey, R>,
    index: Index,
    record_type: Option<&'static str>,
    new_key_prefix: String,
    populated: u64,
}

impl<R: Record> RecordCollection<R> {
    pub fn new() -> Self {
        Self::with_index(Index::PrimaryKey)
    }
    pub fn with_index(index: Index) -> Self {
        Self {
            records: KeyedSet::new(),
            index,
            record_type: None,
            new_key_prefix: String::from(DEFAULT_NEW_KEY_PREFIX),
            populated: 0,
        }
    }
    pub fn with_settings(settings: &Settings) -> Self {
        let mut collection = Self::with_index(settings.index());
        collection.new_key_prefix = settings.new_key_prefix.clone();
        collection
    }
    /// An empty collection that only accepts records reporting `record_type`.
    pub fn of_type(record_type: &'static str) -> Self {
        let mut collection = Self::new();
        collection.record_type = Some(record_type);
        collection
    }
    pub fn from_record(record: R) -> Result<Self> {
        let mut collection = Self::new();
        collection.insert(record)?;
        Ok(collection)
    }
    /// The record type is taken from the first record.
    pub fn from_records<I: IntoIterator<Item = R>>(records: I) -> Result<Self> {
        let mut collection = Self::new();
        collection.insert_all(records)?;
        Ok(collection)
    }

    pub fn index(&self) -> &Index {
        &self.index
    }
    pub fn record_type(&self) -> Option<&'static str> {
        self.record_type
    }
    pub fn new_key_prefix(&self) -> &str {
        &self.new_key_prefix
    }
    /// Current value of the population counter.
    pub fn populated(&self) -> u64 {
        self.populated
    }
    pub fn key_of(&self, record: &R) -> Option<RecordKey> {
        self.index.key_of(record)
    }

    // ------------- membership -------------

    /// Stores a record under its derived key, or under a minted key when it
    /// has none, and returns that key.
    pub fn insert(&mut self, record: R) -> Result<RecordKey> {
        self.check_type(&record)?;
        let key = match self.index.key_of(&record) {
            Some(key) => key,
            None => self.mint_key(),
        };
        self.records.add(key.clone(), record)?;
        Ok(key)
    }
    pub fn insert_all<I: IntoIterator<Item = R>>(&mut self, records: I) -> Result<Vec<RecordKey>> {
        records.into_iter().map(|record| self.insert(record)).collect()
    }
    pub fn add(&mut self, key: RecordKey, record: R) -> Result<()> {
        self.check_type(&record)?;
        self.records.add(key, record)
    }
    pub fn replace(&mut self, key: RecordKey, record: R) -> Result<Option<R>> {
        self.check_type(&record)?;
        Ok(self.records.replace(key, record))
    }
    /// Indexed write. The key must agree with the key the record derives
    /// through the index, when it derives one.
    pub fn set(&mut self, key: RecordKey, record: R) -> Result<Option<R>> {
        match self.index.key_of(&record) {
            Some(derived) if derived != key => Err(RecordSetError::InvalidArgument(format!(
                "key `{}` does not match the record's {} `{}`",
                key, self.index, derived
            ))),
            _ => self.replace(key, record),
        }
    }
    pub fn get(&self, key: &RecordKey) -> Option<&R> {
        self.records.lookup(key)
    }
    pub fn lookup_mut(&mut self, key: &RecordKey) -> Option<&mut R> {
        self.records.lookup_mut(key)
    }
    pub fn remove(&mut self, key: &RecordKey) -> Option<R> {
        self.records.remove(key)
    }
    pub fn remove_record(&mut self, record: &R) -> Option<R> {
        let key = self.index.key_of(record)?;
        self.records.remove(&key)
    }
    pub fn contains_record(&self, record: &R) -> bool {
        self.index
            .key_of(record)
            .is_some_and(|key| self.records.contains(&key))
    }
    /// Empties the collection and resets the population counter.
    pub fn clear(&mut self) {
        self.records.clear();
        self.populated = 0;
    }

    // ------------- bulk operations -------------

    /// Attributes of every member, all of them or the given subset.
    pub fn attributes(&self, names: Option<&[&str]>) -> KeyedSet<RecordKey, Attributes> {
        self.records
            .iter()
            .map(|(key, record)| (key.clone(), record.attributes(names)))
            .collect()
    }
    /// Assigns each bundle in `indexed` to the member stored at the same key.
    /// Keys missing from the collection are ignored. Returns whether any
    /// member's attributes changed.
    pub fn load(&mut self, indexed: &KeyedSet<RecordKey, Attributes>, safe_only: bool) -> bool {
        let mut any_loaded = false;
        for (key, values) in indexed {
            if let Some(record) = self.records.lookup_mut(key) {
                any_loaded = load_record(record, values, safe_only) || any_loaded;
            }
        }
        debug!(bundles = indexed.len(), any_loaded, "loaded attributes by key");
        any_loaded
    }
    pub fn set_attributes(&mut self, indexed: &KeyedSet<RecordKey, Attributes>, safe_only: bool) -> bool {
        self.load(indexed, safe_only)
    }
    /// Assigns the same bundle to every member. Returns whether any
    /// member's attributes changed.
    pub fn load_each(&mut self, values: &Attributes, safe_only: bool) -> bool {
        !self.load_each_modified(values, safe_only).is_empty()
    }
    /// Like `load_each`, but returns the keys of the members that changed.
    pub fn load_each_modified(&mut self, values: &Attributes, safe_only: bool) -> Vec<RecordKey> {
        let mut modified = Vec::new();
        for (key, record) in self.records.iter_mut() {
            if load_record(record, values, safe_only) {
                modified.push(key.clone());
            }
        }
        debug!(members = self.records.len(), modified = modified.len(), "loaded attributes into every member");
        modified
    }
    /// Validates every member, even after one has failed, so that each
    /// member's errors are populated.
    pub fn validate(&mut self, names: Option<&[&str]>) -> bool {
        let mut all_valid = true;
        for (key, record) in self.records.iter_mut() {
            let valid = record.validate(names);
            if !valid {
                trace!(%key, "member failed validation");
            }
            all_valid = valid && all_valid;
        }
        debug!(members = self.records.len(), all_valid, "validated collection");
        all_valid
    }
    /// Saves every member. With `run_validation` the whole collection is
    /// validated first and nothing is saved unless every member is valid.
    pub fn save(&mut self, run_validation: bool, names: Option<&[&str]>) -> bool {
        if run_validation && !self.validate(names) {
            warn!(members = self.records.len(), "validation failed, nothing saved");
            return false;
        }
        let mut all_saved = true;
        for (key, record) in self.records.iter_mut() {
            let saved = record.save(false, names);
            if !saved {
                trace!(%key, "member failed to save");
            }
            all_saved = saved && all_saved;
        }
        debug!(members = self.records.len(), all_saved, "saved collection");
        all_saved
    }
    pub fn delete(&mut self) -> bool {
        let mut all_deleted = true;
        for record in self.records.values_mut() {
            all_deleted = record.delete() && all_deleted;
        }
        debug!(members = self.records.len(), all_deleted, "deleted collection");
        all_deleted
    }
    pub fn has_errors(&self, attribute: Option<&str>) -> bool {
        self.records.values().any(|record| record.has_errors(attribute))
    }
    /// Errors by member; members without errors are left out.
    pub fn errors(&self, attribute: Option<&str>) -> KeyedSet<RecordKey, Errors> {
        self.records
            .iter()
            .map(|(key, record)| (key, record.errors(attribute)))
            .filter(|(_, errors)| !errors.is_empty())
            .map(|(key, errors)| (key.clone(), errors))
            .collect()
    }

    // ------------- keys -------------

    /// Re-keys the collection in place under a new index. Members colliding
    /// on a key are resolved in favor of the later one. Returns whether the
    /// index changed.
    pub fn set_index(&mut self, index: Index) -> bool {
        if index == self.index {
            return false;
        }
        self.index = index;
        let records: Vec<R> = std::mem::take(&mut self.records)
            .into_iter()
            .map(|(_, record)| record)
            .collect();
        for (key, record) in self.placements(records) {
            if self.records.replace(key.clone(), record).is_some() {
                warn!(%key, index = %self.index, "member replaced while re-keying");
            }
        }
        true
    }
    /// Consumes the collection into one keyed by `attribute`. Members
    /// without a value for it get minted placeholder keys. On a shared key
    /// the later member wins with `replace`, otherwise this fails.
    pub fn into_reindexed(self, attribute: &str, replace: bool) -> Result<Self> {
        let mut reindexed = Self {
            records: KeyedSet::with_capacity(self.records.len()),
            index: Index::Attribute(attribute.to_owned()),
            record_type: self.record_type,
            new_key_prefix: self.new_key_prefix,
            populated: 0,
        };
        let records: Vec<R> = self.records.into_iter().map(|(_, record)| record).collect();
        for (key, record) in reindexed.placements(records) {
            if replace {
                reindexed.records.replace(key, record);
            } else {
                reindexed.records.add(key, record)?;
            }
        }
        debug!(attribute, members = reindexed.records.len(), replace, "reindexed collection");
        Ok(reindexed)
    }
    /// Creates `count` records from `factory` under freshly minted keys.
    /// Minted keys that are already taken are skipped. On a type mismatch
    /// the collection is left as it was.
    pub fn populate_with<F>(&mut self, count: usize, mut factory: F) -> Result<Vec<RecordKey>>
    where
        F: FnMut() -> R,
    {
        let records: Vec<R> = (0..count).map(|_| factory()).collect();
        // nothing is inserted unless every record has the collection's type
        let expected = self
            .record_type
            .or_else(|| records.first().map(|record| record.record_type()));
        if let Some(expected) = expected {
            if let Some(found) = records.iter().map(Record::record_type).find(|found| *found != expected) {
                return Err(RecordSetError::TypeMismatch {
                    expected: expected.to_owned(),
                    found: found.to_owned(),
                });
            }
        }
        self.record_type = expected;
        let mut keys = Vec::with_capacity(count);
        for record in records {
            let key = self.mint_key();
            self.records.add(key.clone(), record)?;
            keys.push(key);
        }
        debug!(count, populated = self.populated, "populated collection");
        Ok(keys)
    }

    // ------------- forwarding -------------

    /// Reads one attribute from every member; members without a value for
    /// it read as null.
    pub fn property(&self, name: &str) -> Result<BulkResult<RecordKey, Value>> {
        self.ensure_member(name, |record| record.exposes_attribute(name))?;
        let names = [name];
        Ok(self
            .records
            .iter()
            .map(|(key, record)| {
                let value = record
                    .attributes(Some(&names[..]))
                    .remove(name)
                    .unwrap_or(Value::Null);
                (key.clone(), value)
            })
            .collect())
    }
    /// Writes one attribute on every member, returning whether any changed.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<bool> {
        self.ensure_member(name, |record| record.exposes_attribute(name))?;
        let mut values = Attributes::new();
        values.insert(name.to_owned(), value);
        Ok(self.load_each(&values, false))
    }
    /// Invokes a named method on every member and collects what each returned.
    pub fn call(&mut self, method: &str, args: &[Value]) -> Result<BulkResult<RecordKey, Value>> {
        self.ensure_member(method, |record| record.has_method(method))?;
        let mut result = BulkResult::new();
        for (key, record) in self.records.iter_mut() {
            let returned = record.call(method, args).unwrap_or(Value::Null);
            result.record(key.clone(), returned);
        }
        debug!(method, members = result.len(), "forwarded call");
        Ok(result)
    }
    /// Runs `f` on every member and collects its outcomes.
    pub fn apply<T, F>(&mut self, mut f: F) -> BulkResult<RecordKey, T>
    where
        F: FnMut(&mut R, &RecordKey) -> T,
    {
        let mut result = BulkResult::new();
        for (key, record) in self.records.iter_mut() {
            result.record(key.clone(), f(record, key));
        }
        result
    }

    // A name belongs to the record type, so one member exposing it is
    // enough. Unknown names fail before any member has been touched.
    fn ensure_member<F>(&self, name: &str, exposes: F) -> Result<()>
    where
        F: Fn(&R) -> bool,
    {
        match self.records.values().next() {
            Some(first) if !self.records.values().any(|record| exposes(record)) => {
                Err(RecordSetError::UnknownMember {
                    name: name.to_owned(),
                    record_type: first.record_type().to_owned(),
                })
            }
            _ => Ok(()),
        }
    }
    fn check_type(&mut self, record: &R) -> Result<()> {
        let found = record.record_type();
        match self.record_type {
            Some(expected) if expected != found => Err(RecordSetError::TypeMismatch {
                expected: expected.to_owned(),
                found: found.to_owned(),
            }),
            Some(_) => Ok(()),
            None => {
                self.record_type = Some(found);
                Ok(())
            }
        }
    }
    fn mint_key(&mut self) -> RecordKey {
        self.mint_key_avoiding(&HashSet::default())
    }
    fn mint_key_avoiding(&mut self, reserved: &HashSet<RecordKey, KeyHasher>) -> RecordKey {
        loop {
            let key = RecordKey::Text(format!("{}{}", self.new_key_prefix, self.populated));
            self.populated += 1;
            if !self.records.contains(&key) && !reserved.contains(&key) {
                return key;
            }
        }
    }
    // Keys for every member in order. Placeholders are minted only once all
    // derived keys are known, so they never take a key a later member derives.
    fn placements(&mut self, records: Vec<R>) -> Vec<(RecordKey, R)> {
        let derived: Vec<Option<RecordKey>> =
            records.iter().map(|record| self.index.key_of(record)).collect();
        let reserved: HashSet<RecordKey, KeyHasher> = derived.iter().flatten().cloned().collect();
        derived
            .into_iter()
            .zip(records)
            .map(|(key, record)| match key {
                Some(key) => (key, record),
                None => (self.mint_key_avoiding(&reserved), record),
            })
            .collect()
    }
    // same configuration, no members
    fn empty_like(&self) -> Self {
        Self {
            records: KeyedSet::new(),
            index: self.index.clone(),
            record_type: self.record_type,
            new_key_prefix: self.new_key_prefix.clone(),
            populated: self.populated,
        }
    }
    fn adopt(&self, records: KeyedSet<RecordKey, R>) -> Result<Self> {
        let mut adopted = self.empty_like();
        for (key, record) in records {
            adopted.replace(key, record)?;
        }
        Ok(adopted)
    }
}

// copying members requires cloneable records
impl<R: Record + Clone> RecordCollection<R> {
    pub fn reindex(&self, attribute: &str, replace: bool) -> Result<Self> {
        self.clone().into_reindexed(attribute, replace)
    }
    pub fn filter<F>(&self, keep: F) -> Self
    where
        F: FnMut(&R, &RecordKey) -> bool,
    {
        let mut filtered = self.empty_like();
        filtered.records = self.records.filter(keep);
        filtered
    }
    pub fn union(&self, other: &Self) -> Result<Self> {
        self.adopt(self.records.union(&other.records))
    }
    pub fn intersect(&self, other: &Self) -> Result<Self> {
        self.adopt(self.records.intersect(&other.records))
    }
    pub fn difference(&self, other: &Self) -> Result<Self> {
        self.adopt(self.records.difference(&other.records))
    }
    pub fn subtract(&self, other: &Self) -> Self {
        let mut subtracted = self.empty_like();
        subtracted.records = self.records.subtract(&other.records);
        subtracted
    }
}

impl<R: Record + Default> RecordCollection<R> {
    /// Creates `count` default records under keys `new_<counter>`.
    pub fn populate(&mut self, count: usize) -> Result<Vec<RecordKey>> {
        self.populate_with(count, R::default)
    }
}

fn load_record<R: Record + ?Sized>(record: &mut R, values: &Attributes, safe_only: bool) -> bool {
    let before = record.attributes(None);
    record.set_attributes(values, safe_only);
    before != record.attributes(None)
}

impl<R: Record> Default for RecordCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}
impl<R> ops::Deref for RecordCollection<R> {
    type Target = KeyedSet<RecordKey, R>;
    fn deref(&self) -> &Self::Target {
        &self.records
    }
}
impl<R> IntoIterator for RecordCollection<R> {
    type Item = (RecordKey, R);
    type IntoIter = indexmap::map::IntoIter<RecordKey, R>;
    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
impl<'a, R> IntoIterator for &'a RecordCollection<R> {
    type Item = (&'a RecordKey, &'a R);
    type IntoIter = indexmap::map::Iter<'a, RecordKey, R>;
    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
