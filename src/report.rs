//! Plain-text rendering of run results.
//!
//! Everything here is a pure function of the results; callers decide where
//! the text goes.

use std::fmt::Write;

use crate::analysis::{DistStats, Histogram, Summary, SweepDist};
use crate::simulation::Statistics;

/// Widest histogram bar, in characters.
const MAX_BAR: usize = 50;

const RULE: &str = "************************************************";

/// Full report for one run: headline figures, survivor averages and a
/// histogram of survivor final values.
pub fn render(stats: &Statistics, bins: usize) -> String {
    let s = Summary::from_statistics(stats);
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Monte Carlo Simulation Results:");
    let _ = writeln!(out, "Ruined:                  {:.2} %", s.ruin_percentage);
    let _ = writeln!(out, "Ruined count:            {}", s.ruined_count);
    let _ = writeln!(out, "Trials:                  {}", s.trial_count);
    let _ = writeln!(out, "Max drawdown:            {:.2}", s.max_drawdown_all);
    let _ = writeln!(out, "Avg drawdown:            {:.2}", s.avg_drawdown_all);
    if let (Some(dd), Some(min), Some(fin)) =
        (s.avg_survivor_drawdown, s.avg_survivor_min, s.avg_survivor_final)
    {
        let _ = writeln!(out, "Avg drawdown (survived): {dd:.2}");
        let _ = writeln!(out, "Avg min value:           {min:.2}");
        let _ = writeln!(out, "Avg final value:         {fin:.2}");
    }
    let _ = writeln!(out, "Survivors:               {}", s.survivor_count);
    if let Some(d) = &s.survivor_dist {
        let _ = writeln!(
            out,
            "Survivor final p5/p50/p95: {:.2} / {:.2} / {:.2}",
            d.p5, d.p50, d.p95
        );
    }
    out.push_str(&render_histogram(&stats.survivor_final_values, bins));
    let _ = writeln!(out, "{RULE}");
    out
}

/// Histogram of `values`, or a placeholder line when there are none.
pub fn render_histogram(values: &[f64], bins: usize) -> String {
    let Some(hist) = Histogram::build(values, bins) else {
        return "No survivors to display.\n".to_string();
    };

    let mut out = String::from("Histogram of final values:\n");
    let peak = hist.bins.iter().map(|b| b.count).max().unwrap_or(0);
    let bar = |count: usize| -> String {
        let width = if peak <= MAX_BAR { count } else { count * MAX_BAR / peak };
        "#".repeat(width)
    };

    if hist.is_degenerate() {
        let b = hist.bins[0];
        let _ = writeln!(out, "{:.2}: {} ({})", b.lower, bar(b.count), b.count);
        return out;
    }
    for b in &hist.bins {
        let _ = writeln!(out, "{:.2} - {:.2}: {} ({})", b.lower, b.upper, bar(b.count), b.count);
    }
    out
}

/// Per-seed table plus cross-run percentiles for a sweep.
pub fn render_sweep(runs: &[Statistics], start_seed: u64, dist: Option<&SweepDist>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\n=== Per-Run Results ===");
    let _ = writeln!(
        out,
        "{:>6} | {:>7} | {:>9} | {:>10} | {:>8} | {:>8}",
        "Seed", "Ruin%", "Survivors", "AvgFinal", "AvgDD", "MaxDD"
    );
    let _ = writeln!(out, "{}", "-".repeat(64));
    for (i, stats) in runs.iter().enumerate() {
        let s = Summary::from_statistics(stats);
        let avg_final = s
            .avg_survivor_final
            .map(|v| format!("{v:.2}"))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:>6} | {:>6.2}% | {:>9} | {:>10} | {:>8.2} | {:>8.2}",
            start_seed.wrapping_add(i as u64),
            s.ruin_percentage,
            s.survivor_count,
            avg_final,
            s.avg_drawdown_all,
            s.max_drawdown_all,
        );
    }

    if let Some(dist) = dist {
        let _ = writeln!(out, "\n=== Multi-Run Distribution (N={} runs) ===", dist.runs);
        let _ = writeln!(
            out,
            "{:<10} | {:>8} | {:>8} | {:>8} | {:>8} | {:>8} | {:>8} | {:>8} | {:>8}",
            "Metric", "min", "p5", "p25", "p50", "p75", "p95", "max", "stddev"
        );
        dist_row(&mut out, "Ruin%", &dist.ruin_percentage);
        if let Some(d) = &dist.avg_survivor_final {
            dist_row(&mut out, "AvgFinal", d);
        }
        dist_row(&mut out, "AvgDD", &dist.avg_drawdown);
        dist_row(&mut out, "MaxDD", &dist.max_drawdown);
    }
    out
}

fn dist_row(out: &mut String, label: &str, d: &DistStats) {
    let _ = writeln!(
        out,
        "{:<10} | {:>8.2} | {:>8.2} | {:>8.2} | {:>8.2} | {:>8.2} | {:>8.2} | {:>8.2} | {:>8.2}",
        label, d.min, d.p5, d.p25, d.p50, d.p75, d.p95, d.max, d.std_dev
    );
}
