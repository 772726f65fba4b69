//! Migrate command implementation
//!
//! Upgrades a preset file to the current schema version and writes the
//! result back out.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use tonedrone_preset::migration::{document_version, migration_path};
use tonedrone_preset::{deserialize_preset, write_preset_file, PRESET_VERSION};

/// Run the migrate command
///
/// # Arguments
/// * `input` - Path to the preset JSON file
/// * `output` - Destination path; defaults to rewriting `input`
/// * `pretty` - Pretty-print the migrated JSON
pub fn run(input: &str, output: Option<&str>, pretty: bool) -> Result<ExitCode> {
    println!("{} {}", "Migrating:".cyan().bold(), input);

    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read preset file: {}", input))?;

    let doc: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Preset file is not valid JSON: {}", input))?;
    let from = document_version(&doc)
        .with_context(|| format!("Preset file has no schema version: {}", input))?;

    let path = migration_path(from.min(u64::from(u32::MAX)) as u32);
    if path.is_empty() {
        println!(
            "{} already at schema version {}",
            "Up to date:".dimmed(),
            PRESET_VERSION
        );
    } else {
        let hops: Vec<String> = path
            .iter()
            .chain(std::iter::once(&PRESET_VERSION))
            .map(|version| version.to_string())
            .collect();
        println!("{} {}", "Path:".dimmed(), hops.join(" -> "));
    }

    let preset =
        deserialize_preset(&text).with_context(|| format!("Failed to load preset: {}", input))?;

    let destination = output.unwrap_or(input);
    write_preset_file(Path::new(destination), &preset, pretty)
        .with_context(|| format!("Failed to write migrated preset: {}", destination))?;

    println!(
        "\n{} '{}' written to {} at schema version {}",
        "SUCCESS".green().bold(),
        preset.metadata.name,
        destination,
        preset.version
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonedrone_preset::preset::PresetState;
    use tonedrone_preset::{create_preset, read_preset_file};

    #[test]
    fn test_migrate_rewrites_old_file_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.json");

        let preset = create_preset("Aging", PresetState::default());
        let mut doc = serde_json::to_value(&preset).unwrap();
        doc["version"] = serde_json::json!(2);
        doc["state"].as_object_mut().unwrap().remove("bpm");
        fs::write(&path, doc.to_string()).unwrap();

        run(path.to_str().unwrap(), None, false).unwrap();

        let migrated = read_preset_file(&path).unwrap();
        assert_eq!(migrated.version, PRESET_VERSION);
    }
}
