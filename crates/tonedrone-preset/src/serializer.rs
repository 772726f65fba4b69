//! Preset serialization.
//!
//! The sole gateway between in-memory presets and their textual transport
//! form. Reading runs the full pipeline: parse, cheap structural preflight,
//! forward-compatibility gate, migration, full validation, typed decode.
//! The serializer never fills gaps itself — only the migration steps do,
//! and only with their named defaults.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{ErrorCode, PresetError, ValidationError};
use crate::migration::{document_version, migrate_document, needs_migration};
use crate::preset::{Preset, PresetMetadata, PresetState, PRESET_VERSION};
use crate::validation::validate_document;

/// Creates a new preset at the current schema version, wrapping the given
/// state verbatim.
///
/// Stamps a fresh UUID id and an RFC 3339 creation timestamp.
pub fn create_preset(name: &str, state: PresetState) -> Preset {
    Preset {
        version: PRESET_VERSION,
        metadata: PresetMetadata {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: None,
            created: chrono::Utc::now().to_rfc3339(),
            modified: None,
        },
        state,
    }
}

/// Serializes a preset to its JSON transport text.
///
/// Deterministic: identical presets produce identical text, and the output
/// round-trips exactly through [`deserialize_preset`].
pub fn serialize_preset(preset: &Preset) -> Result<String, PresetError> {
    Ok(serde_json::to_string(preset)?)
}

/// Parses, migrates, and validates a preset from its transport text.
///
/// Failure modes, in pipeline order:
/// - malformed JSON → [`PresetError::Json`]
/// - missing/mistyped `version`, `metadata` or `state` →
///   [`PresetError::InvalidStructure`]
/// - version newer than [`PRESET_VERSION`] →
///   [`PresetError::UnsupportedVersion`]
/// - structurally invalid once migration has run →
///   [`PresetError::InvalidAfterMigration`]
pub fn deserialize_preset(text: &str) -> Result<Preset, PresetError> {
    let doc: Value = serde_json::from_str(text)?;

    let version = preflight(&doc).map_err(PresetError::InvalidStructure)?;
    if version > u64::from(PRESET_VERSION) {
        return Err(PresetError::UnsupportedVersion {
            found: version,
            supported: PRESET_VERSION,
        });
    }

    let doc = if needs_migration(version as u32) {
        migrate_document(doc)?
    } else {
        doc
    };

    let report = validate_document(&doc);
    if !report.is_ok() {
        return Err(PresetError::InvalidAfterMigration(report.errors));
    }

    serde_json::from_value(doc).map_err(|err| {
        PresetError::InvalidAfterMigration(vec![ValidationError::new(
            ErrorCode::DecodeFailed,
            err.to_string(),
        )])
    })
}

/// Returns a copy of the preset with `metadata.modified` set to the current
/// instant. `version` and `state` are untouched.
pub fn update_preset_timestamp(preset: &Preset) -> Preset {
    let mut updated = preset.clone();
    updated.metadata.modified = Some(chrono::Utc::now().to_rfc3339());
    updated
}

/// Reads and deserializes a preset file (`.json` import flow).
pub fn read_preset_file(path: &Path) -> Result<Preset, PresetError> {
    let text = fs::read_to_string(path)?;
    deserialize_preset(&text)
}

/// Serializes a preset to a file (`.json` export flow).
pub fn write_preset_file(path: &Path, preset: &Preset, pretty: bool) -> Result<(), PresetError> {
    let text = if pretty {
        serde_json::to_string_pretty(preset)?
    } else {
        serialize_preset(preset)?
    };
    fs::write(path, text)?;
    Ok(())
}

/// Cheap pre-migration shape check: the three top-level fields migration
/// and validation rely on. Everything deeper is validated after migration.
fn preflight(doc: &Value) -> Result<u64, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let version = document_version(doc);
    if version.is_none() {
        errors.push(ValidationError::with_path(
            ErrorCode::InvalidVersion,
            "version must be a number",
            "version",
        ));
    }

    if !doc.get("metadata").map_or(false, Value::is_object) {
        errors.push(ValidationError::with_path(
            ErrorCode::InvalidMetadata,
            "metadata must be an object",
            "metadata",
        ));
    }

    if !doc.get("state").map_or(false, Value::is_object) {
        errors.push(ValidationError::with_path(
            ErrorCode::InvalidState,
            "state must be an object",
            "state",
        ));
    }

    match version {
        Some(version) if errors.is_empty() => Ok(version),
        _ => Err(errors),
    }
}
