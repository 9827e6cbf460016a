//! Recordset – keyed sets and bulk operations over collections of records.
//!
//! Recordset centers on two containers:
//! * A [`set::KeyedSet`] is an ordered mapping with unique keys, set algebra
//!   (`union`, `intersect`, `difference`), filtering and traversal.
//! * A [`collection::RecordCollection`] is a keyed set of records of one type
//!   that fans operations out over every member: loading attributes,
//!   validating, saving, deleting, collecting errors, reindexing and
//!   populating new records.
//!
//! Records are anything implementing [`record::Record`]. The collection never
//! persists or validates anything itself; it delegates to each member and
//! folds the answers into a boolean, a keyed mapping, or a
//! [`bulk::BulkResult`] of per-member outcomes.
//!
//! ## Modules
//! * [`set`] – The ordered keyed set and its cursors.
//! * [`bulk`] – Per-member results with boolean reductions.
//! * [`record`] – The [`record::Record`] capability, keys and indexes.
//! * [`collection`] – Collections of records and their bulk operations.
//! * [`memory`] – An in-memory record implementation.
//! * [`settings`] – Collection defaults read from a file or the environment.
//!
//! ## Keys
//! A collection derives each key through its [`record::Index`]: the primary
//! key, one attribute, or several attributes forming a composite
//! [`record::RecordKey`]. Records without a key are stored under synthetic
//! keys (`new_0`, `new_1`, ...) minted from a counter that only `clear` resets.
//!
//! ## Bulk Semantics
//! Bulk operations never stop at the first failing member, so every member's
//! error state is available afterwards. `save(true, ..)` is the exception in
//! that it validates the whole collection first and persists nothing unless
//! every member is valid.
//!
//! ## Quick Start
//! ```
//! use recordset::{MemoryRecord, RecordCollection, RecordKey};
//! use serde_json::json;
//!
//! let mut widgets = RecordCollection::from_records([
//!     MemoryRecord::from(json!({"id": 1, "status": "draft"})),
//!     MemoryRecord::from(json!({"id": 2, "status": "draft"})),
//! ]).unwrap();
//! let active = json!({"status": "active"});
//! assert!(widgets.load_each(active.as_object().unwrap(), false));
//! assert!(widgets.save(true, None));
//! assert!(widgets.contains(&RecordKey::Int(2)));
//! ```

pub mod bulk;
pub mod collection;
pub mod error;
pub mod memory;
pub mod record;
pub mod set;
pub mod settings;

pub use bulk::{BulkResult, Truthy};
pub use collection::RecordCollection;
pub use error::{RecordSetError, Result};
pub use memory::MemoryRecord;
pub use record::{Attributes, Errors, Index, Record, RecordKey};
pub use set::{Cursor, CursorState, KeyedSet};
pub use settings::Settings;
