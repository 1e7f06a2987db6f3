//! Suite execution - runs the materialized test program under the interpreter.
//!
//! All execution failures (non-zero exit, spawn failure, timeout) are
//! converted into a returned [`RunReport`] rather than raised, so the retry
//! controller only ever sees report text. The unittest summary line is parsed
//! into a structured outcome instead of grepping the raw output for a marker.

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::debug;
use tokio::process::Command;

/// Configuration for the suite runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Interpreter executable (e.g., "python3").
    pub interpreter: String,

    /// Timeout for one execution.
    pub timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl RunnerConfig {
    /// Create a config with the given interpreter.
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
            ..Default::default()
        }
    }

    /// Set the execution timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Structured outcome of one suite execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every test case passed.
    Passed,
    /// At least one case failed or errored.
    Failed { failures: u32, errors: u32 },
    /// The run produced no recognizable unittest summary
    /// (interpreter crash, spawn failure, or timeout).
    Crashed,
}

/// Result of running the suite once.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Combined stdout and stderr, fed back to the pattern generator.
    pub output: String,
    pub duration: Duration,
}

impl RunReport {
    /// Whether this run counts as a success for the retry controller.
    pub fn passed(&self) -> bool {
        self.outcome == RunOutcome::Passed
    }

    fn crashed(output: impl Into<String>, duration: Duration) -> Self {
        Self {
            outcome: RunOutcome::Crashed,
            output: output.into(),
            duration,
        }
    }
}

/// Executes the materialized suite file.
#[async_trait]
pub trait SuiteRunner: Send + Sync {
    /// Run the suite at the given path and report the outcome.
    ///
    /// Never errors: every failure mode is folded into the report.
    async fn run(&self, suite_path: &Path) -> RunReport;
}

/// Runs the suite under an external Python interpreter.
pub struct PythonRunner {
    config: RunnerConfig,
}

impl PythonRunner {
    /// Create a runner with the given config.
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// The interpreter being invoked.
    pub fn interpreter(&self) -> &str {
        &self.config.interpreter
    }
}

#[async_trait]
impl SuiteRunner for PythonRunner {
    async fn run(&self, suite_path: &Path) -> RunReport {
        let start = Instant::now();

        let output = tokio::time::timeout(
            self.config.timeout,
            Command::new(&self.config.interpreter)
                .arg(suite_path)
                .output(),
        )
        .await;

        let duration = start.elapsed();

        match output {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                let combined = if stdout.is_empty() {
                    stderr.to_string()
                } else if stderr.is_empty() {
                    stdout.to_string()
                } else {
                    format!("{}\n{}", stdout, stderr)
                };

                let outcome = parse_outcome(&combined);
                debug!(
                    "Suite run finished in {:?}: exit={:?} outcome={:?}",
                    duration,
                    output.status.code(),
                    outcome
                );

                RunReport {
                    outcome,
                    output: combined,
                    duration,
                }
            }
            Ok(Err(e)) => RunReport::crashed(
                format!("Failed to start {}: {}", self.config.interpreter, e),
                duration,
            ),
            Err(_) => RunReport::crashed(
                format!("Suite run timed out after {:?}", self.config.timeout),
                self.config.timeout,
            ),
        }
    }
}

/// Parse the unittest summary out of combined run output.
///
/// unittest ends its report with either `OK` (optionally with a skip count)
/// or `FAILED (failures=N, errors=M)`. Output with neither is a crash.
fn parse_outcome(output: &str) -> RunOutcome {
    for line in output.lines().rev() {
        let line = line.trim();
        if line == "OK" || line.starts_with("OK (") {
            return RunOutcome::Passed;
        }
        if let Some(detail) = line.strip_prefix("FAILED") {
            return RunOutcome::Failed {
                failures: parse_count(detail, "failures="),
                errors: parse_count(detail, "errors="),
            };
        }
    }
    RunOutcome::Crashed
}

/// Extract a `key=N` count from a FAILED summary detail like
/// `(failures=2, errors=1)`.
fn parse_count(detail: &str, key: &str) -> u32 {
    detail
        .find(key)
        .map(|i| &detail[i + key.len()..])
        .and_then(|rest| {
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        })
        .unwrap_or(0)
}
