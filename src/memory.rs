//! A record that lives entirely in memory.
//!
//! [`MemoryRecord`] keeps its attributes in a JSON object and implements the
//! full [`Record`] capability set with simple rules: a list of required
//! attributes for validation, an optional list of safe attributes for
//! mass assignment, and a saved/deleted lifecycle. It is what the demo binary
//! collects, and a convenient stand-in wherever real records are not at hand.

use serde_json::Value;

use std::collections::BTreeSet;

use crate::record::{Attributes, Errors, Index, Record, RecordKey};

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRecord {
    attributes: Attributes,
    primary_key: Vec<String>,
    safe: Option<BTreeSet<String>>,
    required: Vec<String>,
    errors: Errors,
    new_record: bool,
    deleted: bool,
    saves: usize,
    validations: usize,
}

impl MemoryRecord {
    pub fn new(attributes: Attributes) -> Self {
        Self {
            attributes,
            primary_key: vec![String::from("id")],
            safe: None,
            required: Vec::new(),
            errors: Errors::new(),
            new_record: true,
            deleted: false,
            saves: 0,
            validations: 0,
        }
    }
    pub fn with_primary_key<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.primary_key = names.iter().map(|n| n.as_ref().to_owned()).collect();
        self
    }
    /// Restricts mass assignment with `safe_only` to the given attributes.
    pub fn with_safe<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.safe = Some(names.iter().map(|n| n.as_ref().to_owned()).collect());
        self
    }
    pub fn with_required<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.required = names.iter().map(|n| n.as_ref().to_owned()).collect();
        self
    }
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
    pub fn is_new_record(&self) -> bool {
        self.new_record
    }
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }
    /// Number of times validation ran.
    pub fn validations(&self) -> usize {
        self.validations
    }
    pub fn add_error(&mut self, attribute: &str, message: &str) {
        self.errors
            .entry(attribute.to_owned())
            .or_default()
            .push(message.to_owned());
    }
    fn is_safe(&self, name: &str) -> bool {
        self.safe.as_ref().is_none_or(|safe| safe.contains(name))
    }
}

impl Default for MemoryRecord {
    fn default() -> Self {
        Self::new(Attributes::new())
    }
}

// anything but a JSON object yields a record without attributes
impl From<Value> for MemoryRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(attributes) => Self::new(attributes),
            _ => Self::default(),
        }
    }
}

impl Record for MemoryRecord {
    fn attributes(&self, names: Option<&[&str]>) -> Attributes {
        match names {
            None => self.attributes.clone(),
            Some(names) => names
                .iter()
                .filter_map(|name| {
                    self.attributes
                        .get(*name)
                        .map(|value| ((*name).to_owned(), value.clone()))
                })
                .collect(),
        }
    }
    fn set_attributes(&mut self, values: &Attributes, safe_only: bool) {
        for (name, value) in values {
            if safe_only && !self.is_safe(name) {
                continue;
            }
            self.attributes.insert(name.clone(), value.clone());
        }
    }
    fn validate(&mut self, names: Option<&[&str]>) -> bool {
        self.validations += 1;
        let in_scope = |name: &str| names.is_none_or(|names| names.iter().any(|n| *n == name));
        self.errors.retain(|name, _| !in_scope(name.as_str()));
        let blank: Vec<String> = self
            .required
            .iter()
            .filter(|name| in_scope(name.as_str()))
            .filter(|name| match self.attributes.get(name.as_str()) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            })
            .cloned()
            .collect();
        for name in &blank {
            self.add_error(name, &format!("{} cannot be blank.", name));
        }
        blank.is_empty()
    }
    fn save(&mut self, run_validation: bool, names: Option<&[&str]>) -> bool {
        if self.deleted || (run_validation && !self.validate(names)) {
            return false;
        }
        self.new_record = false;
        self.saves += 1;
        true
    }
    fn delete(&mut self) -> bool {
        if self.new_record || self.deleted {
            return false;
        }
        self.deleted = true;
        true
    }
    fn errors(&self, attribute: Option<&str>) -> Errors {
        match attribute {
            None => self.errors.clone(),
            Some(attribute) => self
                .errors
                .get_key_value(attribute)
                .map(|(name, messages)| (name.clone(), messages.clone()))
                .into_iter()
                .collect(),
        }
    }
    // declared names count even before they hold a value
    fn exposes_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
            || self.primary_key.iter().chain(&self.required).any(|n| n == name)
            || self.safe.as_ref().is_some_and(|safe| safe.contains(name))
    }
    fn primary_key(&self) -> Option<RecordKey> {
        if self.primary_key.is_empty() {
            return None;
        }
        Index::from_names(&self.primary_key).key_of(self)
    }
    fn has_method(&self, method: &str) -> bool {
        matches!(
            method,
            "is_new_record" | "is_deleted" | "attribute_names" | "add_error"
        )
    }
    fn call(&mut self, method: &str, args: &[Value]) -> Option<Value> {
        match method {
            "is_new_record" => Some(Value::Bool(self.new_record)),
            "is_deleted" => Some(Value::Bool(self.deleted)),
            "attribute_names" => Some(Value::Array(
                self.attributes.keys().cloned().map(Value::String).collect(),
            )),
            "add_error" => {
                let attribute = args.first().and_then(Value::as_str).unwrap_or_default();
                let message = args.get(1).and_then(Value::as_str).unwrap_or_default();
                self.add_error(attribute, message);
                Some(Value::Null)
            }
            _ => None,
        }
    }
}
