use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordSetError {
    #[error("Duplicate key: a value is already stored at `{key}`")]
    DuplicateKey { key: String },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
    #[error("Unknown member: `{name}` is not exposed by {record_type}")]
    UnknownMember { name: String, record_type: String },
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RecordSetError>;

impl RecordSetError {
    pub fn duplicate_key<K: std::fmt::Debug>(key: &K) -> Self {
        Self::DuplicateKey { key: format!("{key:?}") }
    }
}

// Helper conversions
impl From<config::ConfigError> for RecordSetError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
