//! Tone Drone CLI library.
//!
//! Command implementations live here so they can be exercised by tests;
//! the `tonedrone` binary is a thin clap dispatcher on top.

pub mod commands;
