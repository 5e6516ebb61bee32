pub mod chart;
pub mod export;

use std::path::PathBuf;

use colored::*;
use tracing::info;

use crate::error::Result;
use crate::models::metrics::{LatencyTable, Summary};

pub use self::chart::{render_chart, ChartSize};
pub use self::export::{export_csv, write_csv};

#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// `None` disables the terminal chart.
    pub chart: Option<ChartSize>,
    pub csv_dir: Option<PathBuf>,
}

/// Prints, draws and optionally exports each phase's table.
#[derive(Debug, Clone)]
pub struct Reporter {
    options: ReportOptions,
}

impl Reporter {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn display(&self, table: &LatencyTable) -> Result<()> {
        println!("{}", format_summary(table).trim_end());

        if let Some(size) = self.options.chart {
            println!();
            println!("{}", render_chart(table, size).trim_end());
        }

        if let Some(dir) = &self.options.csv_dir {
            let path = write_csv(dir, table)?;
            info!(route = %table.route, path = %path.display(), "samples exported");
        }

        Ok(())
    }
}

pub fn format_summary(table: &LatencyTable) -> String {
    match table.summary() {
        Some(summary) => format_stats(&summary),
        None => format!("{}\n", "No samples collected".yellow().bold()),
    }
}

fn format_stats(s: &Summary) -> String {
    let rows = [
        ("Samples       ", s.count.to_string()),
        ("Avg latency   ", format!("{:.3} ms", s.mean)),
        ("Max latency   ", format!("{:.3} ms", s.max)),
        ("Min latency   ", format!("{:.3} ms", s.min)),
        ("Latency std   ", format!("{:.3} ms", s.std)),
        ("Median latency", format!("{:.3} ms", s.median)),
    ];

    let mut out = String::new();
    for (label, value) in rows {
        out.push_str(&format!("{} {}\n", format!("{}:", label).bold().bright_green(), value.bold()));
    }
    out
}
