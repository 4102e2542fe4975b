//! `medroute` -- CLI binary for the medroute search orchestrator.
//!
//! Provides the following subcommands:
//!
//! - `medroute search` -- Route one search request through a pipeline and
//!   print the response document as JSON.
//! - `medroute status` -- Show resolved configuration and diagnostics.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;

use medroute_core::{CacheService, NoopSink, Orchestrator, Services, Settings};
use medroute_llm::{AnthropicClient, AnthropicConfig, RetryConfig, RetryPolicy};
use medroute_types::SearchRequest;

/// medroute medical search CLI.
#[derive(Parser)]
#[command(name = "medroute", about = "medroute medical search CLI", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Route one search request and print the response as JSON.
    Search(SearchArgs),

    /// Show resolved configuration.
    Status,
}

#[derive(clap::Args)]
struct SearchArgs {
    /// Pipeline to run: research_search, symptom_navigation, clinic_search,
    /// or report_generation.
    #[arg(long, default_value = "research_search")]
    tab: String,

    /// Request payload as inline JSON.
    #[arg(long, conflicts_with = "input")]
    data: Option<String>,

    /// Path of a JSON file holding the request payload.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Print compact JSON instead of pretty-printed.
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search(args) => run_search(args).await?,
        Commands::Status => run_status(),
    }

    Ok(())
}

async fn run_search(args: SearchArgs) -> anyhow::Result<()> {
    let settings = Settings::from_env();

    let data: Value = match (&args.data, &args.input) {
        (Some(inline), _) => {
            serde_json::from_str(inline).context("--data is not valid JSON")?
        }
        (None, Some(path)) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("{} is not valid JSON", path.display()))?
        }
        (None, None) => anyhow::bail!("provide the request payload via --data or --input"),
    };

    let model = RetryPolicy::new(
        AnthropicClient::new(AnthropicConfig {
            timeout_secs: settings.llm_timeout_secs,
            ..AnthropicConfig::default()
        }),
        RetryConfig {
            max_retries: settings.llm_max_retries,
            ..RetryConfig::default()
        },
    );
    let services = Services::from_settings(&settings, Box::new(model));
    let orchestrator = Orchestrator::new(services, CacheService::new(&settings, None))
        .with_history(Arc::new(NoopSink));

    let request = SearchRequest {
        source_tab: Some(args.tab),
        data: Some(data),
        ..SearchRequest::default()
    };
    let response = orchestrator.route(&request).await;

    let rendered = if args.compact {
        serde_json::to_string(&response)?
    } else {
        serde_json::to_string_pretty(&response)?
    };
    println!("{rendered}");
    Ok(())
}

fn run_status() {
    let settings = Settings::from_env();
    println!("medroute configuration");
    println!(
        "  generation:      {}",
        if settings.is_generation_configured() {
            "configured"
        } else {
            "NOT configured (deterministic fallbacks only)"
        }
    );
    println!("  fast model:      {}", settings.fast_model);
    println!("  deep model:      {}", settings.deep_model);
    println!(
        "  ncbi api key:    {}",
        if settings.ncbi_api_key.is_some() { "set" } else { "unset" }
    );
    println!("  llm timeout:     {:?}", Duration::from_secs(settings.llm_timeout_secs));
    println!("  llm retries:     {}", settings.llm_max_retries);
    println!("  prompt dir:      {}", settings.prompt_dir);
    println!(
        "  cache ttl:       trials {}s / literature {}s / clinics {}s",
        settings.cache_ttl_trials, settings.cache_ttl_literature, settings.cache_ttl_clinics
    );
}
