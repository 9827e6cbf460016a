//! Demonstrates a collection of in-memory records going through a typical
//! load / validate / save cycle. Collection defaults are read from an
//! optional `recordset.toml` and `RECORDSET_*` variables; log verbosity
//! follows `RUST_LOG`.

use recordset::{Attributes, KeyedSet, MemoryRecord, RecordCollection, RecordKey, Settings};
use serde_json::{Value, json};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    if let Err(e) = run() {
        error!(error = %e, "demo failed");
        std::process::exit(1);
    }
}

fn run() -> recordset::Result<()> {
    let settings = Settings::load()?;
    info!(index = ?settings.index, prefix = %settings.new_key_prefix, "settings loaded");

    let mut widgets = RecordCollection::with_settings(&settings);
    for attributes in [
        json!({"id": 1, "name": "sprocket", "status": "draft"}),
        json!({"id": 2, "name": "gear", "status": "draft"}),
        json!({"id": 3, "name": "", "status": "draft"}),
    ] {
        widgets.insert(MemoryRecord::from(attributes).with_required(&["name"]))?;
    }
    info!(members = widgets.count(), "collection assembled");

    widgets.assign("status", json!("active"))?;
    if !widgets.save(true, None) {
        for (key, errors) in &widgets.errors(None) {
            info!(%key, ?errors, "member is invalid");
        }
    }

    // fill in whatever is missing, addressed by key
    let mut fixes = KeyedSet::new();
    for key in widgets.keys() {
        let blank = widgets
            .get(key)
            .is_some_and(|widget| widget.get("name").is_none_or(|name| name == ""));
        if blank {
            let mut fix = Attributes::new();
            fix.insert(String::from("name"), Value::String(format!("widget {}", key)));
            fixes.replace(key.clone(), fix);
        }
    }
    widgets.load(&fixes, true);
    info!(saved = widgets.save(true, None), "saved after fixes");

    // records created here have no id yet
    let created: Vec<RecordKey> = widgets.populate(2)?;
    info!(?created, "populated");
    let fresh = widgets.call("is_new_record", &[])?;
    info!(any_new = fresh.any_true(true), all_new = fresh.all_true(true), "checked lifecycle");

    let by_name = widgets.reindex("name", true)?;
    for (key, _) in &by_name {
        info!(%key, "reindexed member");
    }
    Ok(())
}
