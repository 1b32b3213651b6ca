use std::f64::consts::PI;

use super::model::Column;
use super::stats::{quantile, sample_std};

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub bins: Vec<Bin>,
    pub bin_width: f64,
}

/// Upper bound on the bin count regardless of sample size.
pub const MAX_BINS: usize = 1000;

/// Number of equal-width bins: the finer of Freedman–Diaconis and Sturges,
/// Sturges alone when the IQR is zero. Never more than one bin per value
/// (capped at [`MAX_BINS`]) unless Sturges asks for more.
pub fn auto_bin_count(sorted: &[f64]) -> usize {
    let n = sorted.len();
    let (Some(&lo), Some(&hi)) = (sorted.first(), sorted.last()) else {
        return 1;
    };
    let range = hi - lo;
    if range <= 0.0 {
        return 1;
    }

    let sturges_bins = ((n as f64).log2() + 1.0).ceil().max(1.0);
    let iqr = quantile(sorted, 0.75) - quantile(sorted, 0.25);
    let fd = 2.0 * iqr * (n as f64).powf(-1.0 / 3.0);
    let fd_bins = if fd > 0.0 { (range / fd).ceil() } else { 0.0 };

    let cap = n.min(MAX_BINS).max(sturges_bins as usize) as f64;
    fd_bins.max(sturges_bins).min(cap) as usize
}

/// Bin `values` into equal-width bins over their range. The last bin is
/// closed on the right.
pub fn histogram(values: &[f64]) -> Histogram {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);

    let (Some(&lo), Some(&hi)) = (sorted.first(), sorted.last()) else {
        return Histogram {
            bins: Vec::new(),
            bin_width: 0.0,
        };
    };

    if hi - lo <= 0.0 {
        return Histogram {
            bins: vec![Bin {
                start: lo - 0.5,
                end: lo + 0.5,
                count: sorted.len(),
            }],
            bin_width: 1.0,
        };
    }

    let n_bins = auto_bin_count(&sorted);
    let width = (hi - lo) / n_bins as f64;
    let mut counts = vec![0usize; n_bins];
    for &v in &sorted {
        let idx = (((v - lo) / width).floor() as usize).min(n_bins - 1);
        counts[idx] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: lo + i as f64 * width,
            end: lo + (i + 1) as f64 * width,
            count,
        })
        .collect();

    Histogram {
        bins,
        bin_width: width,
    }
}

// ---------------------------------------------------------------------------
// Kernel density estimate
// ---------------------------------------------------------------------------

/// Gaussian KDE with Scott's bandwidth, evaluated at `points` evenly spaced
/// positions across the data range. `None` when fewer than two values or
/// zero variance.
pub fn kde(values: &[f64], points: usize) -> Option<Vec<[f64; 2]>> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = finite.len();
    let sigma = sample_std(&finite);
    if n < 2 || sigma.is_nan() || sigma <= 0.0 || points < 2 {
        return None;
    }

    let bw = sigma * (n as f64).powf(-0.2);
    let norm = 1.0 / (n as f64 * bw * (2.0 * PI).sqrt());
    let lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (hi - lo) / (points - 1) as f64;

    let curve = (0..points)
        .map(|i| {
            let x = lo + i as f64 * step;
            let density: f64 = finite
                .iter()
                .map(|xi| (-0.5 * ((x - xi) / bw).powi(2)).exp())
                .sum();
            [x, density * norm]
        })
        .collect();
    Some(curve)
}

// ---------------------------------------------------------------------------
// Distribution – what the chart draws for one column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub column: String,
    pub histogram: Histogram,
    /// Density curve scaled to histogram counts.
    pub density: Option<Vec<[f64; 2]>>,
    /// Values plotted (missing cells excluded).
    pub n: usize,
}

pub fn distribution(column: &Column, kde_points: usize) -> Distribution {
    let values = column.numeric_values();
    let histogram = histogram(&values);
    let n = histogram.bins.iter().map(|b| b.count).sum::<usize>();
    let scale = n as f64 * histogram.bin_width;
    let density = kde(&values, kde_points).map(|curve| {
        curve
            .into_iter()
            .map(|[x, y]| [x, y * scale])
            .collect()
    });

    Distribution {
        column: column.name.clone(),
        histogram,
        density,
        n,
    }
}
