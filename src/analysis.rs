use serde::Serialize;

use crate::simulation::Statistics;

/// Headline figures derived from a [`Statistics`] record.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub trial_count: u64,
    pub ruined_count: u64,
    pub survivor_count: u64,
    /// ruined / trials × 100.
    pub ruin_percentage: f64,
    pub max_drawdown_all: f64,
    pub avg_drawdown_all: f64,
    /// Survivor-only averages. `None` when every trial was ruined.
    pub avg_survivor_final: Option<f64>,
    pub avg_survivor_min: Option<f64>,
    pub avg_survivor_drawdown: Option<f64>,
    pub survivor_dist: Option<DistStats>,
}

impl Summary {
    pub fn from_statistics(stats: &Statistics) -> Self {
        let trials = stats.trial_count as f64;
        let survivors = stats.survivor_count();
        let avg = |sum: f64| (survivors > 0).then(|| sum / survivors as f64);

        let mut finals = stats.survivor_final_values.clone();
        Summary {
            trial_count: stats.trial_count,
            ruined_count: stats.ruined_count,
            survivor_count: survivors,
            ruin_percentage: ratio(stats.ruined_count as f64, trials) * 100.0,
            max_drawdown_all: stats.max_drawdown_all,
            avg_drawdown_all: ratio(stats.sum_drawdown_all, trials),
            avg_survivor_final: avg(stats.sum_survivor_final),
            avg_survivor_min: avg(stats.sum_survivor_min),
            avg_survivor_drawdown: avg(stats.sum_survivor_drawdown),
            survivor_dist: percentile_stats(&mut finals),
        }
    }
}

/// `num / den`, zero when `den` is zero.
fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

/// Distribution statistics for a continuous sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistStats {
    pub n: usize,
    pub min: f64,
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

/// Sorts `values` in place. Percentiles interpolate linearly between order
/// statistics; `std_dev` is the sample (n − 1) deviation.
pub fn percentile_stats(values: &mut [f64]) -> Option<DistStats> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();

    let interp = |p: f64| -> f64 {
        let h = p * (n - 1) as f64;
        let lo = h.floor() as usize;
        let hi = (lo + 1).min(n - 1);
        let frac = h - lo as f64;
        values[lo] * (1.0 - frac) + values[hi] * frac
    };

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = if n > 1 {
        values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
    } else {
        0.0
    };

    Some(DistStats {
        n,
        min: values[0],
        p5: interp(0.05),
        p25: interp(0.25),
        p50: interp(0.50),
        p75: interp(0.75),
        p95: interp(0.95),
        max: values[n - 1],
        mean,
        std_dev: variance.sqrt(),
    })
}

pub const DEFAULT_BINS: usize = 10;

/// One histogram bucket covering `[lower, upper)`; the last bucket is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram over `[min, max]` of a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    /// `None` for an empty sample. A sample whose values are all equal
    /// collapses to one zero-width bin holding every value.
    pub fn build(values: &[f64], bins: usize) -> Option<Self> {
        let bins = bins.max(1);
        let (min, max) = values.iter().fold(None, |acc: Option<(f64, f64)>, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;

        if min == max {
            return Some(Histogram {
                bins: vec![Bin { lower: min, upper: max, count: values.len() }],
            });
        }

        let width = (max - min) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = if v == max {
                bins - 1
            } else {
                (((v - min) / width) as usize).min(bins - 1)
            };
            counts[idx] += 1;
        }

        Some(Histogram {
            bins: counts
                .into_iter()
                .enumerate()
                .map(|(i, count)| {
                    let lower = min + i as f64 * width;
                    Bin { lower, upper: lower + width, count }
                })
                .collect(),
        })
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn is_degenerate(&self) -> bool {
        self.bins.len() == 1 && self.bins[0].lower == self.bins[0].upper
    }
}

/// Cross-run distribution of headline metrics for a seed sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepDist {
    pub runs: usize,
    pub ruin_percentage: DistStats,
    /// Runs with no survivors are left out, so `n` may be below `runs`.
    pub avg_survivor_final: Option<DistStats>,
    pub avg_drawdown: DistStats,
    pub max_drawdown: DistStats,
}

/// Summarise several independent runs. Fewer than 2 runs is not a distribution.
pub fn analyse_runs(runs: &[Statistics]) -> Option<SweepDist> {
    if runs.len() < 2 {
        return None;
    }
    let summaries: Vec<Summary> = runs.iter().map(Summary::from_statistics).collect();

    let mut ruin: Vec<f64> = summaries.iter().map(|s| s.ruin_percentage).collect();
    let mut finals: Vec<f64> = summaries.iter().filter_map(|s| s.avg_survivor_final).collect();
    let mut avg_dd: Vec<f64> = summaries.iter().map(|s| s.avg_drawdown_all).collect();
    let mut max_dd: Vec<f64> = summaries.iter().map(|s| s.max_drawdown_all).collect();

    Some(SweepDist {
        runs: runs.len(),
        ruin_percentage: percentile_stats(&mut ruin)?,
        avg_survivor_final: percentile_stats(&mut finals),
        avg_drawdown: percentile_stats(&mut avg_dd)?,
        max_drawdown: percentile_stats(&mut max_dd)?,
    })
}
