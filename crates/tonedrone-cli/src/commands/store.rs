//! Store management commands: list, show, import, delete.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use tonedrone_preset::{
    factory_preset, factory_presets, is_factory_preset, read_preset_file,
    update_preset_timestamp,
};

use super::open_store;

/// Run the list command: factory presets first, then stored presets
/// newest-first.
pub fn run_list(store_dir: Option<&Path>) -> Result<ExitCode> {
    let store = open_store(store_dir)?;

    println!("{}", "Factory presets".cyan().bold());
    for preset in factory_presets() {
        println!(
            "  {}  {}",
            preset.metadata.id.dimmed(),
            preset.metadata.name
        );
    }

    let listed = store.list_presets();
    println!("\n{}", "Your presets".cyan().bold());
    if listed.is_empty() {
        println!("  {}", "(none saved yet)".dimmed());
    }
    for summary in &listed {
        let stamp = summary.modified.as_deref().unwrap_or(&summary.created);
        println!(
            "  {}  {}  {}",
            summary.id.dimmed(),
            summary.name,
            stamp.dimmed()
        );
    }

    Ok(ExitCode::SUCCESS)
}

/// Run the show command: print one preset as pretty JSON.
pub fn run_show(store_dir: Option<&Path>, id: &str) -> Result<ExitCode> {
    let preset = if is_factory_preset(id) {
        factory_preset(id).cloned()
    } else {
        open_store(store_dir)?.load_preset(id)
    };

    match preset {
        Some(preset) => {
            let text = serde_json::to_string_pretty(&preset)
                .context("Failed to render preset as JSON")?;
            println!("{}", text);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("{} no preset with id '{}'", "FAILED".red().bold(), id);
            Ok(ExitCode::from(1))
        }
    }
}

/// Run the import command: load a preset file (migrating as needed) and
/// save it to the store.
pub fn run_import(store_dir: Option<&Path>, file: &str) -> Result<ExitCode> {
    let store = open_store(store_dir)?;

    let preset = read_preset_file(Path::new(file))
        .with_context(|| format!("Failed to load preset file: {}", file))?;
    let preset = update_preset_timestamp(&preset);
    store
        .save_preset(&preset)
        .with_context(|| format!("Failed to store preset '{}'", preset.metadata.name))?;

    println!(
        "{} imported '{}' as {}",
        "SUCCESS".green().bold(),
        preset.metadata.name,
        preset.metadata.id.dimmed()
    );
    Ok(ExitCode::SUCCESS)
}

/// Run the delete command.
pub fn run_delete(store_dir: Option<&Path>, id: &str) -> Result<ExitCode> {
    if is_factory_preset(id) {
        println!(
            "{} '{}' is a factory preset and cannot be deleted",
            "FAILED".red().bold(),
            id
        );
        return Ok(ExitCode::from(1));
    }

    let store = open_store(store_dir)?;
    let existed = store.preset_exists(id);
    store
        .delete_preset(id)
        .with_context(|| format!("Failed to delete preset '{}'", id))?;

    if existed {
        println!("{} deleted '{}'", "SUCCESS".green().bold(), id);
    } else {
        println!("{} no preset with id '{}'", "Nothing to do:".dimmed(), id);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tonedrone_preset::preset::PresetState;
    use tonedrone_preset::{create_preset, write_preset_file};

    #[test]
    fn test_import_then_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store_dir = dir.path().join("store");
        let file = dir.path().join("incoming.json");

        let preset = create_preset("Imported", PresetState::default());
        write_preset_file(&file, &preset, false).unwrap();

        run_import(Some(&store_dir), file.to_str().unwrap()).unwrap();
        assert!(store_dir.join(format!("preset_{}.json", preset.metadata.id)).exists());

        run_delete(Some(&store_dir), &preset.metadata.id).unwrap();
        assert!(!store_dir.join(format!("preset_{}.json", preset.metadata.id)).exists());
    }

    #[test]
    fn test_import_migrates_historical_files() {
        let dir = tempfile::tempdir().unwrap();
        let store_dir = dir.path().join("store");
        let file = dir.path().join("legacy.json");

        let preset = create_preset("Legacy import", PresetState::default());
        let mut doc = serde_json::to_value(&preset).unwrap();
        doc["version"] = serde_json::json!(1);
        let state = doc["state"].as_object_mut().unwrap();
        state.remove("polysynths");
        state.remove("bpm");
        fs::write(&file, doc.to_string()).unwrap();

        run_import(Some(&store_dir), file.to_str().unwrap()).unwrap();

        let store = open_store(Some(&store_dir)).unwrap();
        let stored = store.load_preset(&preset.metadata.id).unwrap();
        assert_eq!(stored.version, tonedrone_preset::PRESET_VERSION);
        assert_eq!(stored.state.polysynths.polysynths.len(), 2);
    }
}
