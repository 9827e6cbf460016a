// attribute values are loosely typed, as they are in the records themselves
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use std::collections::BTreeMap;
use std::fmt;

pub type Attributes = Map<String, Value>;
pub type Errors = BTreeMap<String, Vec<String>>;

// ------------- Record -------------

/// The capabilities a collection needs from each of its members.
///
/// A record owns its persistence and validation; collections only ever
/// delegate to these methods and fold the answers together.
pub trait Record {
    /// Attribute values by name, either all of them or the given subset.
    fn attributes(&self, names: Option<&[&str]>) -> Attributes;
    fn set_attributes(&mut self, values: &Attributes, safe_only: bool);
    fn validate(&mut self, names: Option<&[&str]>) -> bool;
    fn save(&mut self, run_validation: bool, names: Option<&[&str]>) -> bool;
    fn delete(&mut self) -> bool;
    fn errors(&self, attribute: Option<&str>) -> Errors;
    fn has_errors(&self, attribute: Option<&str>) -> bool {
        !self.errors(attribute).is_empty()
    }
    /// The natural identity of the record, `None` while it has none.
    fn primary_key(&self) -> Option<RecordKey>;
    fn has_attribute(&self, name: &str) -> bool {
        self.attributes(None).contains_key(name)
    }
    /// Whether the record type knows the attribute, even when this record
    /// holds no value for it.
    fn exposes_attribute(&self, name: &str) -> bool {
        self.has_attribute(name)
    }
    /// Name of the concrete record type, used to keep dynamically typed
    /// collections homogeneous.
    fn record_type(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
    fn has_method(&self, _method: &str) -> bool {
        false
    }
    /// Invokes a named method; `None` when the record does not expose it.
    fn call(&mut self, _method: &str, _args: &[Value]) -> Option<Value> {
        None
    }
}

// Boxed records (including trait objects) forward to the record they hold.
impl<R: Record + ?Sized> Record for Box<R> {
    fn attributes(&self, names: Option<&[&str]>) -> Attributes {
        (**self).attributes(names)
    }
    fn set_attributes(&mut self, values: &Attributes, safe_only: bool) {
        (**self).set_attributes(values, safe_only)
    }
    fn validate(&mut self, names: Option<&[&str]>) -> bool {
        (**self).validate(names)
    }
    fn save(&mut self, run_validation: bool, names: Option<&[&str]>) -> bool {
        (**self).save(run_validation, names)
    }
    fn delete(&mut self) -> bool {
        (**self).delete()
    }
    fn errors(&self, attribute: Option<&str>) -> Errors {
        (**self).errors(attribute)
    }
    fn has_errors(&self, attribute: Option<&str>) -> bool {
        (**self).has_errors(attribute)
    }
    fn primary_key(&self) -> Option<RecordKey> {
        (**self).primary_key()
    }
    fn has_attribute(&self, name: &str) -> bool {
        (**self).has_attribute(name)
    }
    fn exposes_attribute(&self, name: &str) -> bool {
        (**self).exposes_attribute(name)
    }
    fn record_type(&self) -> &'static str {
        (**self).record_type()
    }
    fn has_method(&self, method: &str) -> bool {
        (**self).has_method(method)
    }
    fn call(&mut self, method: &str, args: &[Value]) -> Option<Value> {
        (**self).call(method, args)
    }
}

// ------------- RecordKey -------------

/// The key a record is stored under.
///
/// Composite identities keep their components apart instead of joining them
/// into one string, so a component containing a separator stays unambiguous.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordKey {
    Int(i64),
    Text(String),
    Composite(Vec<RecordKey>),
}

impl RecordKey {
    /// Derives a key from an attribute value. Null, empty strings and empty
    /// lists derive no key.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Self::Int(i64::from(*b))),
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Text(n.to_string()),
            }),
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Array(items) if items.is_empty() => None,
            Value::Array(items) => items
                .iter()
                .map(Self::from_value)
                .collect::<Option<Vec<_>>>()
                .map(Self::Composite),
            Value::Object(_) => Some(Self::Text(value.to_string())),
        }
    }
    pub fn composite<I: IntoIterator<Item = RecordKey>>(parts: I) -> Self {
        Self::Composite(parts.into_iter().collect())
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Text(s) => write!(f, "{}", s),
            Self::Composite(parts) => {
                let parts: Vec<String> = parts.iter().map(|p| p.to_string()).collect();
                write!(f, "({})", parts.join(", "))
            }
        }
    }
}
impl From<i64> for RecordKey {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}
impl From<&str> for RecordKey {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}
impl From<String> for RecordKey {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}
impl From<Vec<RecordKey>> for RecordKey {
    fn from(parts: Vec<RecordKey>) -> Self {
        Self::Composite(parts)
    }
}

// ------------- Index -------------

/// How a collection derives the key of each record it stores.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Index {
    #[default]
    PrimaryKey,
    Attribute(String),
    Composite(Vec<String>),
}

impl Index {
    /// No names means the primary key, one name a single attribute and
    /// several names a composite key.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        match names {
            [] => Self::PrimaryKey,
            [name] => Self::Attribute(name.as_ref().to_owned()),
            names => Self::Composite(names.iter().map(|n| n.as_ref().to_owned()).collect()),
        }
    }
    pub fn key_of<R: Record + ?Sized>(&self, record: &R) -> Option<RecordKey> {
        match self {
            Self::PrimaryKey => record.primary_key(),
            Self::Attribute(name) => {
                let names = [name.as_str()];
                record
                    .attributes(Some(&names[..]))
                    .get(name)
                    .and_then(RecordKey::from_value)
            }
            Self::Composite(names) => {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                let attributes = record.attributes(Some(&names[..]));
                names
                    .iter()
                    .map(|name| attributes.get(*name).and_then(RecordKey::from_value))
                    .collect::<Option<Vec<_>>>()
                    .map(RecordKey::Composite)
            }
        }
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::PrimaryKey => write!(f, "primary key"),
            Self::Attribute(name) => write!(f, "{}", name),
            Self::Composite(names) => write!(f, "({})", names.join(", ")),
        }
    }
}
