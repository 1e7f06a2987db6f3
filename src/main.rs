use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use rexgen::cli::Cli;
use rexgen::config::Config;
use rexgen::controller::{ControllerConfig, RefineOutcome, RetryController};
use rexgen::llm::{AnthropicClient, AnthropicConfig, LlmClient};
use rexgen::runner::{PythonRunner, RunnerConfig};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rexgen")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("rexgen.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Refining pattern for: {}", cli.description);

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let model = cli.model.clone().unwrap_or_else(|| config.llm.model.clone());
    let llm_config = AnthropicConfig {
        model,
        max_tokens: config.llm.max_tokens,
        timeout: Duration::from_millis(config.llm.timeout_ms),
    };
    let llm = Arc::new(AnthropicClient::new(llm_config).context("Failed to create LLM client")?);

    let runner_config = RunnerConfig::new(config.runner.interpreter.clone())
        .with_timeout(Duration::from_millis(config.runner.timeout_ms));
    let runner = Arc::new(PythonRunner::new(runner_config));

    let controller_config = ControllerConfig {
        max_attempts: cli.max_attempts.unwrap_or(config.retry.max_attempts),
        max_tokens: config.llm.max_tokens,
        workdir: PathBuf::from("."),
    };

    let controller = RetryController::new(llm.clone(), runner, controller_config);
    let outcome = controller
        .run(&cli.description)
        .await
        .context("Refinement run failed")?;

    let usage = llm.total_usage();
    info!(
        "Run finished: {:?} ({} input tokens, {} output tokens, model {})",
        outcome,
        usage.input_tokens,
        usage.output_tokens,
        llm.model()
    );

    if cli.is_verbose()
        && let RefineOutcome::Converged { attempts, .. } = outcome
    {
        println!("Converged after {} attempt(s)", attempts);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
