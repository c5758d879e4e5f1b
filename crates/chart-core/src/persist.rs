// File: crates/chart-core/src/persist.rs
// Summary: JSON persistence for datasets, renderers, axes, annotations and themes.
// Notes:
// - Notifiers are not persisted: a loaded object has a fresh id and no listeners.

use std::fs;
use std::path::Path;

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

pub fn save_json<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    debug!("saving {}", path.display());
    fs::write(path, to_json(value)?)?;
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    debug!("loading {}", path.display());
    from_json(&fs::read_to_string(path)?)
}
