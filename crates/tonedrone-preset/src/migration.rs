//! Sequential schema migration.
//!
//! Each version boundary gets one pure step function. A step only fills
//! gaps with named defaults; a field that is already present is never
//! overwritten, and cardinalities a step does not recognize are left alone.
//! Composing the steps in increasing order brings a document from any
//! historical version to [`PRESET_VERSION`].
//!
//! Migration operates on raw JSON documents: the typed [`crate::preset::Preset`]
//! only exists at the current version, so everything older lives as a
//! `serde_json::Value` until the chain has run.

use serde_json::{json, Map, Value};

use crate::error::{ErrorCode, PresetError, ValidationError};
use crate::preset::{PolySynthBankState, PolySynthParams, DEFAULT_BPM, PRESET_VERSION};

/// True iff a document at `version` is older than the current schema.
pub fn needs_migration(version: u32) -> bool {
    version < PRESET_VERSION
}

/// Source versions a document at `from_version` passes through on its way
/// to the current schema (e.g. `2` → `[2, 3, 4]`). Empty when already
/// current.
pub fn migration_path(from_version: u32) -> Vec<u32> {
    if from_version >= PRESET_VERSION {
        return Vec::new();
    }
    (from_version..PRESET_VERSION).collect()
}

/// Reads the embedded schema version of a raw document.
pub fn document_version(doc: &Value) -> Option<u64> {
    doc.get("version").and_then(Value::as_u64)
}

/// Migrates a raw preset document to the current schema version.
///
/// Applies each single-step migration in increasing order; every step both
/// transforms data and bumps the embedded `version`. A document already at
/// the current version passes through unchanged. Documents with a missing
/// version, or one newer than [`PRESET_VERSION`], are rejected — migration
/// only ever moves forward.
pub fn migrate_document(mut doc: Value) -> Result<Value, PresetError> {
    let version = document_version(&doc).ok_or_else(|| {
        PresetError::InvalidStructure(vec![ValidationError::with_path(
            ErrorCode::InvalidVersion,
            "version must be a number",
            "version",
        )])
    })?;

    if version > u64::from(PRESET_VERSION) {
        return Err(PresetError::UnsupportedVersion {
            found: version,
            supported: PRESET_VERSION,
        });
    }

    for from in (version as u32)..PRESET_VERSION {
        apply_step(&mut doc, from);
        set_version(&mut doc, from + 1);
    }

    Ok(doc)
}

fn apply_step(doc: &mut Value, from: u32) {
    match from {
        1 => v1_to_v2(doc),
        2 => v2_to_v3(doc),
        3 => v3_to_v4(doc),
        4 => v4_to_v5(doc),
        _ => {}
    }
}

fn set_version(doc: &mut Value, to: u32) {
    if let Some(root) = doc.as_object_mut() {
        root.insert("version".to_string(), json!(to));
    }
}

fn state_object(doc: &mut Value) -> Option<&mut Map<String, Value>> {
    doc.get_mut("state").and_then(Value::as_object_mut)
}

fn polysynth_list(doc: &mut Value) -> Option<&mut Vec<Value>> {
    state_object(doc)?
        .get_mut("polysynths")?
        .get_mut("polysynths")?
        .as_array_mut()
}

/// v1 → v2: the polysynth bank was introduced. Install the default
/// two-polysynth state when the field is missing.
fn v1_to_v2(doc: &mut Value) {
    let Some(state) = state_object(doc) else {
        return;
    };
    if !state.contains_key("polysynths") {
        let bank = serde_json::to_value(PolySynthBankState::default())
            .expect("default polysynth bank serializes");
        state.insert("polysynths".to_string(), bank);
    }
}

/// v2 → v3: the BPM transport was introduced. Fill the default tempo when
/// missing, preserve any present value.
fn v2_to_v3(doc: &mut Value) {
    let Some(state) = state_object(doc) else {
        return;
    };
    state.entry("bpm").or_insert(json!(DEFAULT_BPM));
}

/// v3 → v4: a second polysynth became part of the fixed layout. Append one
/// with default parameters when exactly one exists; leave 0, 2 or more
/// untouched.
fn v3_to_v4(doc: &mut Value) {
    let Some(list) = polysynth_list(doc) else {
        return;
    };
    if list.len() == 1 {
        let synth = serde_json::to_value(PolySynthParams::default())
            .expect("default polysynth serializes");
        list.push(synth);
    }
}

/// v4 → v5: per-polysynth `pan` was introduced. Fill 0 where missing,
/// preserve existing values.
fn v4_to_v5(doc: &mut Value) {
    let Some(list) = polysynth_list(doc) else {
        return;
    };
    for synth in list.iter_mut() {
        if let Some(params) = synth.as_object_mut() {
            params.entry("pan").or_insert(json!(0.0));
        }
    }
}
