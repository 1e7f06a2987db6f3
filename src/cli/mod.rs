//! CLI module for rexgen - argument parsing for the refinement run.

pub mod commands;

pub use commands::Cli;
