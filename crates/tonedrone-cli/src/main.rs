//! Tone Drone CLI - Command-line interface for preset management
//!
//! This binary provides commands for validating, migrating, storing, and
//! sharing Tone Drone presets.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

// Use modules from the library crate
use tonedrone_cli::commands;

/// Tone Drone - Drone Synthesizer Preset Tools
#[derive(Parser)]
#[command(name = "tonedrone")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Preset store directory (default: the platform data directory)
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a preset file without storing it
    Validate {
        /// Path to the preset JSON file
        preset: String,
    },

    /// Upgrade a preset file to the current schema version
    Migrate {
        /// Path to the preset JSON file
        input: String,

        /// Destination path (default: rewrite the input file)
        #[arg(short, long)]
        output: Option<String>,

        /// Pretty-print the migrated JSON
        #[arg(long)]
        pretty: bool,
    },

    /// List factory and stored presets
    List,

    /// Print one preset as pretty JSON
    Show {
        /// Preset id (factory or stored)
        id: String,
    },

    /// Import a preset file into the store
    Import {
        /// Path to the preset JSON file
        file: String,
    },

    /// Delete a stored preset
    Delete {
        /// Preset id
        id: String,
    },

    /// Print a shareable URL carrying a preset
    Share {
        /// Path to the preset JSON file
        file: String,

        /// Base URL to attach the preset parameter to
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Recover a preset from a shareable URL or raw token
    Decode {
        /// A full URL or the bare token value
        source: String,

        /// Write the preset to this path instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let store_dir = cli.store_dir.as_deref();

    let result = match cli.command {
        Commands::Validate { preset } => commands::validate::run(&preset),
        Commands::Migrate {
            input,
            output,
            pretty,
        } => commands::migrate::run(&input, output.as_deref(), pretty),
        Commands::List => commands::store::run_list(store_dir),
        Commands::Show { id } => commands::store::run_show(store_dir, &id),
        Commands::Import { file } => commands::store::run_import(store_dir, &file),
        Commands::Delete { id } => commands::store::run_delete(store_dir, &id),
        Commands::Share { file, base_url } => {
            commands::share::run_share(&file, base_url.as_deref())
        }
        Commands::Decode { source, output } => {
            commands::share::run_decode(&source, output.as_deref())
        }
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "ERROR".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
