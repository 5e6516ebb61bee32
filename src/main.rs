use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use uapoly_bench::config::BenchArgs;
use uapoly_bench::run_benchmark;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = BenchArgs::parse()
        .into_config()
        .context("invalid benchmark target")?;

    println!("Querying {}", config.target());

    run_benchmark(&config)
        .await
        .with_context(|| format!("benchmark against {} aborted", config.target()))?;

    Ok(())
}
