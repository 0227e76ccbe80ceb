//! chordmon - command-line front-end for chord-detect
//!
//! This library provides:
//! - `commands`: note parsing and rendering for each subcommand
//! - `telemetry`: tracing subscriber setup

pub mod commands;
pub mod telemetry;
