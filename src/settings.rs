// config lets collection defaults live in a separate file or the environment
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::Index;

pub const DEFAULT_NEW_KEY_PREFIX: &str = "new_";

/// Defaults for newly constructed collections.
///
/// Layered from lowest to highest precedence: built-in defaults, an optional
/// `recordset.{toml,json,yaml,...}` file, and `RECORDSET_*` environment
/// variables (`RECORDSET_INDEX=tenant,id`, `RECORDSET_NEW_KEY_PREFIX=tmp_`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Attributes forming the key; empty means the primary key.
    pub index: Vec<String>,
    /// Prefix of synthetic keys minted for records without a key.
    pub new_key_prefix: String,
}

impl Settings {
    pub const ENV_PREFIX: &'static str = "RECORDSET";
    pub const DEFAULT_FILE: &'static str = "recordset";

    pub fn load() -> Result<Self> {
        Self::load_from(Self::DEFAULT_FILE)
    }
    /// Loads from `path` (extension optional, the file may be missing) with
    /// environment overrides on top.
    pub fn load_from(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(Self::ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("index"),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
    pub fn from_toml(source: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
    pub fn index(&self) -> Index {
        Index::from_names(&self.index)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            index: Vec::new(),
            new_key_prefix: String::from(DEFAULT_NEW_KEY_PREFIX),
        }
    }
}
