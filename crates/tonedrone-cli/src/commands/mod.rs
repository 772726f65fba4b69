//! CLI command implementations.

pub mod migrate;
pub mod share;
pub mod store;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use tonedrone_preset::PresetStore;

/// Opens the preset store, honoring a `--store-dir` override.
pub(crate) fn open_store(store_dir: Option<&Path>) -> Result<PresetStore> {
    match store_dir {
        Some(dir) => PresetStore::open(dir)
            .with_context(|| format!("Failed to open preset store at {}", dir.display())),
        None => PresetStore::open_default().context("Failed to open the default preset store"),
    }
}
