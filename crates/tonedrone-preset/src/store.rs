//! Keyed preset persistence.
//!
//! Presets live as individual JSON records under a store directory, one
//! file per id, next to a summary index that makes listing cheap: the index
//! carries just enough metadata to render a preset browser without
//! deserializing every full record.
//!
//! Read failures on a single record degrade that preset to "not found"
//! (with a diagnostic on stderr) instead of failing the caller; write
//! failures always propagate.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::PresetError;
use crate::factory::is_factory_preset;
use crate::preset::Preset;
use crate::serializer::{deserialize_preset, serialize_preset};

/// File name of the summary index inside the store directory.
const INDEX_FILE: &str = "preset_index.json";

/// Errors raised by preset store writes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("preset store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The preset could not be serialized.
    #[error("preset store serialization error: {0}")]
    Preset(#[from] PresetError),

    /// Factory presets are read-only and never written to the store.
    #[error("factory preset '{0}' is read-only and cannot be stored")]
    FactoryPreset(String),

    /// No platform data directory could be determined.
    #[error("no data directory available for the preset store")]
    NoDataDir,
}

/// A summary index entry: the fields a preset browser needs, nothing more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetSummary {
    /// Preset id, matching the full record's `metadata.id`.
    pub id: String,

    /// Display name.
    pub name: String,

    /// RFC 3339 creation timestamp.
    pub created: String,

    /// RFC 3339 last-save timestamp, if the preset was ever re-saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

impl PresetSummary {
    fn of(preset: &Preset) -> Self {
        Self {
            id: preset.metadata.id.clone(),
            name: preset.metadata.name.clone(),
            created: preset.metadata.created.clone(),
            modified: preset.metadata.modified.clone(),
        }
    }
}

/// File-backed preset store.
pub struct PresetStore {
    root: PathBuf,
}

impl PresetStore {
    /// Opens a store rooted at the platform data directory
    /// (`<data>/tonedrone/presets`).
    pub fn open_default() -> Result<Self, StoreError> {
        let root = dirs::data_dir()
            .ok_or(StoreError::NoDataDir)?
            .join("tonedrone")
            .join("presets");
        Self::open(root)
    }

    /// Opens a store rooted at the given directory, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("preset_{}.json", id))
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    /// Writes the full preset record and upserts its index entry.
    ///
    /// An existing entry with the same id is replaced in place, without
    /// reordering the index. Factory presets are refused.
    pub fn save_preset(&self, preset: &Preset) -> Result<(), StoreError> {
        let id = &preset.metadata.id;
        if is_factory_preset(id) {
            return Err(StoreError::FactoryPreset(id.clone()));
        }

        let text = serialize_preset(preset)?;
        fs::write(self.record_path(id), text)?;

        let mut index = self.read_index();
        let entry = PresetSummary::of(preset);
        match index.iter().position(|existing| existing.id == *id) {
            Some(position) => index[position] = entry,
            None => index.push(entry),
        }
        self.write_index(&index)
    }

    /// Loads a preset by id.
    ///
    /// Returns `None` both when no record exists and when the stored
    /// content fails to deserialize or validate — a corrupt record must
    /// not crash the caller, only degrade that one preset to "not found."
    pub fn load_preset(&self, id: &str) -> Option<Preset> {
        let path = self.record_path(id);
        if !path.exists() {
            return None;
        }

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                eprintln!("tonedrone store: unreadable preset record '{}': {}", id, err);
                return None;
            }
        };

        match deserialize_preset(&text) {
            Ok(preset) => Some(preset),
            Err(err) => {
                eprintln!("tonedrone store: discarding corrupt preset '{}': {}", id, err);
                None
            }
        }
    }

    /// Removes the full record and its index entry. A no-op when the id
    /// does not exist.
    pub fn delete_preset(&self, id: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.record_path(id)) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        let mut index = self.read_index();
        let before = index.len();
        index.retain(|entry| entry.id != id);
        if index.len() != before {
            self.write_index(&index)?;
        }
        Ok(())
    }

    /// Returns index entries sorted by creation time, newest first. Never
    /// touches full preset records.
    pub fn list_presets(&self) -> Vec<PresetSummary> {
        let mut index = self.read_index();
        // RFC 3339 UTC timestamps sort chronologically as strings.
        index.sort_by(|a, b| b.created.cmp(&a.created));
        index
    }

    /// Key-presence check only.
    pub fn preset_exists(&self, id: &str) -> bool {
        self.record_path(id).exists()
    }

    /// Reads the index, self-healing to empty on a missing or unreadable
    /// file.
    fn read_index(&self) -> Vec<PresetSummary> {
        let path = self.index_path();
        if !path.exists() {
            return Vec::new();
        }

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                eprintln!("tonedrone store: unreadable preset index: {}", err);
                return Vec::new();
            }
        };

        match serde_json::from_str(&text) {
            Ok(index) => index,
            Err(err) => {
                eprintln!("tonedrone store: rebuilding corrupt preset index: {}", err);
                Vec::new()
            }
        }
    }

    fn write_index(&self, index: &[PresetSummary]) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(index).map_err(PresetError::from)?;
        fs::write(self.index_path(), text)?;
        Ok(())
    }
}
