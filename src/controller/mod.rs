//! Retry controller - drives suite generation, pattern refinement, and runs.
//!
//! One pass through `INIT -> ATTEMPTING -> (SUCCESS | EXHAUSTED)`:
//! the suite is generated once, then each attempt proposes a pattern, injects
//! it, and runs the suite. From the second attempt on, the previous attempt's
//! pattern is re-run first so the generator sees feedback on the last
//! finalized pattern (the result text deliberately lags one iteration behind
//! the pattern it corrects).

use std::path::PathBuf;
use std::sync::Arc;

use colored::*;
use log::info;

use crate::error::Result;
use crate::generate::{PatternGenerator, SuiteGenerator};
use crate::llm::LlmClient;
use crate::prompt::INITIAL_RESULTS_SENTINEL;
use crate::runner::SuiteRunner;
use crate::suite::SuiteFile;

/// Default attempt ceiling.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Terminal outcome of a refinement run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefineOutcome {
    /// A pattern passed every generated test case.
    Converged { pattern: String, attempts: u32 },
    /// The attempt ceiling was reached without a passing run.
    Exhausted { attempts: u32 },
}

/// Configuration for the retry controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Attempt ceiling.
    pub max_attempts: u32,

    /// Max tokens per generation call.
    pub max_tokens: u32,

    /// Directory where the suite file is materialized.
    pub workdir: PathBuf,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_tokens: 4096,
            workdir: PathBuf::from("."),
        }
    }
}

/// Orchestrates the bounded refinement loop.
pub struct RetryController<L: LlmClient, R: SuiteRunner> {
    suite_generator: SuiteGenerator<L>,
    pattern_generator: PatternGenerator<L>,
    runner: Arc<R>,
    config: ControllerConfig,
}

impl<L: LlmClient, R: SuiteRunner> RetryController<L, R> {
    /// Create a controller over the given collaborators.
    pub fn new(llm: Arc<L>, runner: Arc<R>, config: ControllerConfig) -> Self {
        Self {
            suite_generator: SuiteGenerator::new(llm.clone(), config.max_tokens),
            pattern_generator: PatternGenerator::new(llm, config.max_tokens),
            runner,
            config,
        }
    }

    /// Run the loop for one task description until success or exhaustion.
    ///
    /// The materialized suite file is removed exactly once when this returns,
    /// on every path out of the loop including generation errors.
    pub async fn run(&self, description: &str) -> Result<RefineOutcome> {
        println!("{}", "Generating tests".cyan());
        let mut suite = self.suite_generator.generate(description).await?;

        // Scoped materialization: dropping the guard deletes the file.
        let suite_file = SuiteFile::materialize(&self.config.workdir, &suite.render())?;

        let mut attempt = 0;
        while attempt < self.config.max_attempts {
            attempt += 1;

            // First attempt has nothing to re-run; later attempts refresh the
            // feedback by executing the previous attempt's pattern.
            let results = if attempt == 1 {
                INITIAL_RESULTS_SENTINEL.to_string()
            } else {
                self.runner.run(suite_file.path()).await.output
            };

            let pattern = self
                .pattern_generator
                .propose(description, &suite, &results)
                .await?;

            suite.set_pattern(&pattern);
            suite_file.rewrite(&suite.render())?;

            let report = self.runner.run(suite_file.path()).await;
            let success = report.passed();

            info!(
                "Attempt {}: {} (outcome {:?})",
                attempt,
                if success { "success" } else { "failed" },
                report.outcome
            );
            let verdict = if success {
                "Success".green()
            } else {
                "Failed".red()
            };
            println!("Attempt {}: {}", attempt, verdict);
            println!("Test Results: {}", report.output);

            if success {
                println!(
                    "{} {}",
                    "Successfully generated regex pattern:".green(),
                    pattern
                );
                return Ok(RefineOutcome::Converged { pattern, attempts: attempt });
            }
        }

        println!(
            "{}",
            "Failed to generate a working regex pattern within the maximum number of attempts."
                .red()
        );
        Ok(RefineOutcome::Exhausted { attempts: attempt })
    }
}
