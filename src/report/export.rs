use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, SecondsFormat};

use crate::error::Result;
use crate::models::metrics::LatencyTable;

/// Renders a table as CSV: `#` comment lines with the summary, a header row,
/// then one row per sample in completion order.
pub fn export_csv(table: &LatencyTable) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# route: {}", table.route);
    let _ = writeln!(
        out,
        "# exported: {}",
        Local::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let _ = writeln!(out, "# samples: {}", table.len());
    if let Some(s) = table.summary() {
        let _ = writeln!(
            out,
            "# mean_ms: {:.3}  min_ms: {:.3}  max_ms: {:.3}  std_ms: {:.3}  median_ms: {:.3}",
            s.mean, s.min, s.max, s.std, s.median
        );
    }

    out.push_str("start_s,latency_ms\n");
    for sample in table.samples() {
        let _ = writeln!(out, "{:.6},{:.3}", sample.start, sample.latency);
    }

    out
}

/// File name for a route label, e.g. `/game/create (with password)` becomes
/// `game_create_with_password.csv`.
pub fn csv_file_name(route: &str) -> String {
    let mut slug = String::with_capacity(route.len());
    for c in route.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_');
    if slug.is_empty() {
        "root.csv".to_string()
    } else {
        format!("{}.csv", slug)
    }
}

pub fn write_csv(dir: &Path, table: &LatencyTable) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(csv_file_name(&table.route));
    fs::write(&path, export_csv(table))?;
    Ok(path)
}
