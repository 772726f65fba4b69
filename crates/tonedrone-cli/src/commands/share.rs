//! Share commands: mint a shareable URL, decode one back into a preset.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use tonedrone_preset::{
    create_shareable_url, decode_preset_from_url, extract_preset_from_url, read_preset_file,
    write_preset_file,
};

/// Run the share command: print a URL carrying the preset.
pub fn run_share(file: &str, base_url: Option<&str>) -> Result<ExitCode> {
    let preset = read_preset_file(Path::new(file))
        .with_context(|| format!("Failed to load preset file: {}", file))?;

    let url = create_shareable_url(&preset, base_url)
        .with_context(|| format!("Failed to encode preset '{}'", preset.metadata.name))?;

    println!("{} '{}'", "Sharing:".cyan().bold(), preset.metadata.name);
    println!("{}", url);
    Ok(ExitCode::SUCCESS)
}

/// Run the decode command: recover a preset from a URL or a raw token.
///
/// # Arguments
/// * `source` - A full shareable URL or just the token value
/// * `output` - Optional path to write the preset to; stdout otherwise
pub fn run_decode(source: &str, output: Option<&str>) -> Result<ExitCode> {
    // A full URL carries the token in its query string; anything else is
    // treated as the bare token.
    let preset = if source.contains('?') || source.contains("://") {
        extract_preset_from_url(source)
            .context("URL carries no decodable 'preset' parameter")?
    } else {
        decode_preset_from_url(source).context("Failed to decode preset token")?
    };

    match output {
        Some(path) => {
            write_preset_file(Path::new(path), &preset, true)
                .with_context(|| format!("Failed to write preset: {}", path))?;
            println!(
                "{} '{}' written to {}",
                "SUCCESS".green().bold(),
                preset.metadata.name,
                path
            );
        }
        None => {
            let text = serde_json::to_string_pretty(&preset)
                .context("Failed to render preset as JSON")?;
            println!("{}", text);
        }
    }
    Ok(ExitCode::SUCCESS)
}
