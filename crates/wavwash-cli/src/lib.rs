//! wavwash CLI library.
//!
//! Command implementations for the `wavwash` binary: inspecting WAV headers
//! and batch-converting WAV files to canonical PCM.

pub mod commands;
