//! Structural preset validation.
//!
//! Validation is deliberately loose: it checks presence and type of the
//! fields the application reads on load, and the bpm range, nothing more.
//! Parameter ranges inside the effect stages and the oscillator/sequence
//! length pairing are not enforced, so presets saved or shared by older
//! builds keep loading. The length pairing is surfaced as a warning.

use serde_json::Value;

use crate::error::{
    ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
use crate::preset::{Preset, MAX_BPM, MIN_BPM};

/// The six effect stages every preset carries, in signal order.
pub const EFFECT_STAGES: [&str; 6] = [
    "autoFilter",
    "bitCrusher",
    "chebyshev",
    "microlooper",
    "afterFilter",
    "delay",
];

/// Validates a raw preset document and returns a validation result.
///
/// The document may be at any schema version at or above v3; the serializer
/// runs this only after migration, so `bpm` and `polysynths` are required
/// here unconditionally.
pub fn validate_document(doc: &Value) -> ValidationResult {
    let mut result = ValidationResult::default();

    let Some(root) = doc.as_object() else {
        result.add_error(ValidationError::new(
            ErrorCode::InvalidState,
            "preset must be a JSON object",
        ));
        return result;
    };

    if !root.get("version").map_or(false, Value::is_number) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidVersion,
            "version must be a number",
            "version",
        ));
    }

    validate_metadata(root.get("metadata"), &mut result);

    let Some(state) = root.get("state").and_then(Value::as_object) else {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidState,
            "state must be an object",
            "state",
        ));
        return result;
    };

    validate_oscillators(state.get("oscillators"), &mut result);
    validate_effects(state.get("effects"), &mut result);

    match state.get("polysynths") {
        None | Some(Value::Null) => result.add_error(ValidationError::with_path(
            ErrorCode::MissingPolysynths,
            "polysynths must be present",
            "state.polysynths",
        )),
        Some(_) => {}
    }

    if !state.get("effectsBusSend").map_or(false, Value::is_number) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidBusSend,
            "effectsBusSend must be a number",
            "state.effectsBusSend",
        ));
    }

    validate_bpm(state.get("bpm"), &mut result);

    result
}

/// True iff a typed preset still satisfies the structural contract.
pub fn validate_preset(preset: &Preset) -> bool {
    match serde_json::to_value(preset) {
        Ok(doc) => validate_document(&doc).is_ok(),
        Err(_) => false,
    }
}

fn validate_metadata(metadata: Option<&Value>, result: &mut ValidationResult) {
    let Some(metadata) = metadata.and_then(Value::as_object) else {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidMetadata,
            "metadata must be an object",
            "metadata",
        ));
        return;
    };

    for field in ["id", "name", "created"] {
        if !metadata.get(field).map_or(false, Value::is_string) {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidMetadata,
                format!("metadata.{} must be a string", field),
                format!("metadata.{}", field),
            ));
        }
    }

    if !metadata.contains_key("description") {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::MissingDescription,
            "preset has no description",
            "metadata.description",
        ));
    }
}

fn validate_oscillators(oscillators: Option<&Value>, result: &mut ValidationResult) {
    let Some(bank) = oscillators.and_then(Value::as_object) else {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidOscillators,
            "oscillators must be an object",
            "state.oscillators",
        ));
        return;
    };

    for field in ["minFreq", "maxFreq"] {
        if !bank.get(field).map_or(false, Value::is_number) {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidOscillators,
                format!("oscillators.{} must be a number", field),
                format!("state.oscillators.{}", field),
            ));
        }
    }

    for field in ["oscillators", "sequences"] {
        if !bank.get(field).map_or(false, Value::is_array) {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidOscillators,
                format!("oscillators.{} must be an array", field),
                format!("state.oscillators.{}", field),
            ));
        }
    }

    // Parallel-array pairing is a consumer expectation, not a contract.
    if let (Some(voices), Some(sequences)) = (
        bank.get("oscillators").and_then(Value::as_array),
        bank.get("sequences").and_then(Value::as_array),
    ) {
        if voices.len() != sequences.len() {
            result.add_warning(ValidationWarning::with_path(
                WarningCode::VoiceSequenceMismatch,
                format!(
                    "{} oscillator(s) but {} sequence(s)",
                    voices.len(),
                    sequences.len()
                ),
                "state.oscillators",
            ));
        }
    }
}

fn validate_effects(effects: Option<&Value>, result: &mut ValidationResult) {
    let Some(effects) = effects.and_then(Value::as_object) else {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidEffects,
            "effects must be an object",
            "state.effects",
        ));
        return;
    };

    for stage in EFFECT_STAGES {
        if !effects.get(stage).map_or(false, Value::is_object) {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidEffects,
                format!("effects.{} must be present", stage),
                format!("state.effects.{}", stage),
            ));
        }
    }
}

fn validate_bpm(bpm: Option<&Value>, result: &mut ValidationResult) {
    let Some(bpm) = bpm.and_then(Value::as_f64) else {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidBpm,
            "bpm must be a number",
            "state.bpm",
        ));
        return;
    };

    if !(MIN_BPM..=MAX_BPM).contains(&bpm) {
        result.add_error(ValidationError::with_path(
            ErrorCode::BpmOutOfRange,
            format!("bpm must be within {}..={}, got {}", MIN_BPM, MAX_BPM, bpm),
            "state.bpm",
        ));
    }
}
