//! CLI definition using clap.
//!
//! rexgen takes a single task description and refines a regex against
//! generated tests; the remaining flags override config values.

use clap::Parser;
use std::path::PathBuf;

/// rexgen - test-driven regex generation via LLM refinement
#[derive(Parser, Debug)]
#[command(name = "rexgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Natural-language description of the pattern to generate
    pub description: String,

    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the attempt ceiling
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Override the model used for generation
    #[arg(long)]
    pub model: Option<String>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}
