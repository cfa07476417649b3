mod budget;
mod cleanup;
mod cli;
mod deleter;
mod error;
mod models;
mod output;
mod pager;
mod policy;
mod registry;
#[cfg(test)]
mod testutil;

use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cleanup::CleanupOrchestrator;
use cli::Cli;
use error::AppError;
use models::PolicyParams;
use output::print_result;
use registry::RegistryClient;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let delete_regex = cli.delete_regex.ok_or(AppError::NoDeletePattern)?;

    let client = RegistryClient::new(&cli.registry).context("Failed to build HTTP client")?;

    let params = PolicyParams {
        delete_regex: Some(delete_regex),
        keep_regex: cli.keep_regex,
        keep_n: cli.keep_n,
        older_than: cli.older_than.map(chrono::Duration::days),
        disable_timeout: cli.disable_timeout,
        page_size: cli.page_size,
    };

    let orchestrator = CleanupOrchestrator::new(&client, Duration::from_secs(cli.timeout));
    let result = orchestrator.execute(&cli.repo, &params).await;

    print_result(&cli.repo, &result);

    if !result.is_success() {
        process::exit(1);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
