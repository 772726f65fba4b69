//! Validate command implementation
//!
//! Parses a preset file through the full load pipeline and reports the
//! outcome, including per-field diagnostics.

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use tonedrone_preset::{deserialize_preset, migration, validation};

/// Run the validate command
///
/// # Arguments
/// * `preset_path` - Path to the preset JSON file
///
/// # Returns
/// Exit code: 0 if the preset loads, 1 if it does not
pub fn run(preset_path: &str) -> Result<ExitCode> {
    println!("{} {}", "Validating:".cyan().bold(), preset_path);

    let text = fs::read_to_string(preset_path)
        .with_context(|| format!("Failed to read preset file: {}", preset_path))?;

    if let Some(version) = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .as_ref()
        .and_then(migration::document_version)
    {
        println!("{} {}", "Schema version:".dimmed(), version);
    }

    match deserialize_preset(&text) {
        Ok(preset) => {
            // Re-run document validation to surface warnings; the load
            // itself only fails on errors.
            if let Ok(doc) = serde_json::to_value(&preset) {
                for warning in validation::validate_document(&doc).warnings {
                    println!("  {} {}", "!".yellow(), warning);
                }
            }

            println!(
                "\n{} '{}' is a valid preset (id {})",
                "SUCCESS".green().bold(),
                preset.metadata.name,
                preset.metadata.id.dimmed()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("\n{} {}", "FAILED".red().bold(), err);
            for detail in err.validation_errors() {
                println!("  {} {}", "✗".red(), detail);
            }
            Ok(ExitCode::from(1))
        }
    }
}
