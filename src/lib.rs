//! rexgen - test-driven regex generation
//!
//! An LLM drafts a Python unittest suite for a described pattern, then a
//! bounded retry loop proposes and refines a regex until the suite passes,
//! feeding each run's output back into the next proposal.

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod generate;
pub mod llm;
pub mod prompt;
pub mod runner;
pub mod suite;

pub use error::{Result, RexgenError};
