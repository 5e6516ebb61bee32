use std::fmt::Write as _;

use crate::models::metrics::LatencyTable;

const LABEL_WIDTH: usize = 10;
const POINT: char = '•';
const MEAN: char = '┄';

/// Plot dimensions, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: usize,
    pub height: usize,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: 72,
            height: 18,
        }
    }
}

/// Draws latency against request start offset as a text scatter plot, with the
/// mean latency as a dotted line.
pub fn render_chart(table: &LatencyTable, size: ChartSize) -> String {
    let title = format!("Latency over time ({})", table.route);
    let Some(summary) = table.summary() else {
        return format!("{}\n  (no samples)\n", title);
    };

    let width = size.width.max(2);
    let height = size.height.max(2);

    let x_max = table
        .samples()
        .iter()
        .map(|s| s.start)
        .fold(0.0_f64, f64::max);
    let x_max = if x_max > 0.0 { x_max } else { 1.0 };
    let y_max = if summary.max > 0.0 { summary.max } else { 1.0 };

    let scale = |value: f64, max: f64, cells: usize| -> usize {
        let cell = (value.max(0.0) / max * (cells - 1) as f64).round() as usize;
        cell.min(cells - 1)
    };

    let mut grid = vec![vec![' '; width]; height];

    let mean_row = height - 1 - scale(summary.mean, y_max, height);
    for cell in grid[mean_row].iter_mut() {
        *cell = MEAN;
    }

    for sample in table.samples() {
        let col = scale(sample.start, x_max, width);
        let row = height - 1 - scale(sample.latency, y_max, height);
        grid[row][col] = POINT;
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{:>w$} Latency in milliseconds", "", w = LABEL_WIDTH);

    let middle = height / 2;
    for (i, row) in grid.iter().enumerate() {
        let value = y_max * (height - 1 - i) as f64 / (height - 1) as f64;
        let (label, axis) = if i == 0 || i == middle {
            (format!("{:.1}", value), '┤')
        } else if i == mean_row {
            (format!("{:.1}", summary.mean), '┤')
        } else {
            (String::new(), '│')
        };
        let line: String = row.iter().collect();
        let _ = writeln!(out, "{:>w$}{}{}", label, axis, line.trim_end(), w = LABEL_WIDTH);
    }

    let _ = writeln!(
        out,
        "{:>w$}└{}",
        format!("{:.1}", 0.0),
        "─".repeat(width),
        w = LABEL_WIDTH
    );

    let left = "0.00".to_string();
    let right = format!("{:.2}", x_max);
    let gap = (width + 1).saturating_sub(left.len() + right.len()).max(1);
    let _ = writeln!(out, "{:>w$}{}{}{}", "", left, " ".repeat(gap), right, w = LABEL_WIDTH);
    let _ = writeln!(out, "{:>w$}Elapsed time in seconds", "", w = LABEL_WIDTH);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metrics::LatencySample;

    fn table(points: &[(f64, f64)]) -> LatencyTable {
        let mut table = LatencyTable::new("/user/me");
        for &(start, latency) in points {
            table.push(LatencySample { start, latency });
        }
        table
    }

    #[test]
    fn empty_table_renders_placeholder() {
        let out = render_chart(&LatencyTable::new("/game/boards (GET)"), ChartSize::default());
        assert!(out.starts_with("Latency over time (/game/boards (GET))"));
        assert!(out.contains("no samples"));
    }

    #[test]
    fn chart_has_title_axes_and_points() {
        let size = ChartSize {
            width: 20,
            height: 5,
        };
        let out = render_chart(&table(&[(0.0, 10.0), (0.5, 20.0), (1.0, 30.0)]), size);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "Latency over time (/user/me)");
        assert!(lines[1].contains("Latency in milliseconds"));
        // title, y label, plot rows, x axis, x ticks, x label
        assert_eq!(lines.len(), 2 + size.height + 3);
        assert!(lines[2].starts_with(&format!("{:>10}┤", "30.0")));
        assert!(out.ends_with("Elapsed time in seconds\n"));
        assert_eq!(out.matches(POINT).count(), 3);
        assert!(lines[lines.len() - 2].trim_end().ends_with("1.00"));
    }

    #[test]
    fn overlapping_points_share_a_cell() {
        let size = ChartSize {
            width: 10,
            height: 4,
        };
        let out = render_chart(&table(&[(0.0, 5.0), (0.0, 5.0), (0.0, 5.0)]), size);
        assert_eq!(out.matches(POINT).count(), 1);
    }

    #[test]
    fn mean_line_is_drawn() {
        let size = ChartSize {
            width: 12,
            height: 9,
        };
        let out = render_chart(&table(&[(0.0, 0.0), (1.0, 100.0)]), size);
        assert!(out.contains(MEAN));
    }
}
