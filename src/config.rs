use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::Parser;
use url::Url;

use crate::error::Result;
use crate::report::{ChartSize, ReportOptions};
use crate::utils::hardware::cpu_cores;

/// Requests issued by each fixed-volume phase, and users created.
pub const DEFAULT_REQUESTS: usize = 2000;

#[derive(Parser, Debug, Clone)]
#[command(name = "benchmark")]
#[command(about = "Utility to benchmark the UApoly backend", long_about = None)]
pub struct BenchArgs {
    /// The host to connect to
    pub host: String,

    /// The port to connect to
    pub port: u16,

    /// Requests per phase (and number of synthetic users)
    #[arg(
        short = 'n',
        long,
        env = "BENCH_REQUESTS",
        default_value_t = DEFAULT_REQUESTS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub requests: usize,

    /// Requests in flight at once [default: number of CPU cores]
    #[arg(short, long, env = "BENCH_WORKERS")]
    pub workers: Option<usize>,

    /// Write each phase's samples as CSV into this directory
    #[arg(long, env = "BENCH_CSV_DIR")]
    pub csv_dir: Option<PathBuf>,

    /// Do not draw latency charts
    #[arg(long)]
    pub no_chart: bool,

    /// Chart plot width in columns
    #[arg(long, default_value_t = 72)]
    pub chart_width: usize,

    /// Chart plot height in rows
    #[arg(long, default_value_t = 18)]
    pub chart_height: usize,
}

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub base_url: Url,
    pub requests: usize,
    pub workers: usize,
    pub report: ReportOptions,
}

impl BenchConfig {
    /// Base URL as typed on the command line, without the root slash `Url` adds.
    pub fn target(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }
}

impl BenchArgs {
    pub fn base_url(&self) -> Result<Url> {
        Ok(Url::parse(&format!("http://{}:{}", self.host, self.port))?)
    }

    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(cpu_cores).max(1)
    }

    pub fn into_config(self) -> Result<BenchConfig> {
        let chart = (!self.no_chart).then_some(ChartSize {
            width: self.chart_width.max(2),
            height: self.chart_height.max(2),
        });

        Ok(BenchConfig {
            base_url: self.base_url()?,
            requests: self.requests,
            workers: self.worker_count(),
            report: ReportOptions {
                chart,
                csv_dir: self.csv_dir,
            },
        })
    }
}
