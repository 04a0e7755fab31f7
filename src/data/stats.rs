use std::collections::HashMap;

use super::model::{RecordTable, is_missing_label};

// ---------------------------------------------------------------------------
// Value counts
// ---------------------------------------------------------------------------

/// One slice of the categorical distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub label: String,
    pub count: usize,
    /// Fraction of all labelled rows, in `[0, 1]`.
    pub fraction: f64,
}

impl Share {
    /// Percentage with one decimal, e.g. `"60.0%"`.
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.fraction * 100.0)
    }
}

/// Count each distinct label. Sorted by descending count; ties keep the
/// order in which labels first appear. Missing labels are skipped.
pub fn value_counts(labels: &[String]) -> Vec<Share> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels.iter().filter(|l| !is_missing_label(l)) {
        let entry = counts.entry(label.as_str()).or_insert_with(|| {
            order.push(label.as_str());
            0
        });
        *entry += 1;
    }

    let total: usize = counts.values().sum();
    let mut shares: Vec<Share> = order
        .into_iter()
        .map(|label| {
            let count = counts[label];
            Share {
                label: label.to_string(),
                count,
                fraction: count as f64 / total as f64,
            }
        })
        .collect();
    // stable: ties stay in first-appearance order
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

// ---------------------------------------------------------------------------
// Histogram + density
// ---------------------------------------------------------------------------

/// Equal-width binned counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Left edge of the first bin.
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Centre of bin `i`.
    pub fn center(&self, i: usize) -> f64 {
        self.start + (i as f64 + 0.5) * self.bin_width
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Finite values only.
fn finite(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// `[min, max]` of the finite values, `None` when there are none.
pub fn range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Bin the finite values into `bins` equal-width bins spanning `[min, max]`.
/// Every bin is half-open except the last, which includes `max`. A constant
/// sample gets a unit-wide range centred on the value.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let bins = bins.max(1);
    let (mut lo, mut hi) = range(values)?;
    if hi - lo < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    let bin_width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in finite(values) {
        let idx = (((v - lo) / bin_width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some(Histogram {
        start: lo,
        bin_width,
        counts,
    })
}

/// Scott's rule bandwidth: `σ · n^(-1/5)` with the sample standard deviation.
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let xs = finite(values);
    let n = xs.len();
    if n < 2 {
        return None;
    }
    let mean = xs.iter().sum::<f64>() / n as f64;
    let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let bw = var.sqrt() * (n as f64).powf(-0.2);
    (bw > 0.0).then_some(bw)
}

/// Gaussian kernel density estimate evaluated on `grid` evenly spaced points
/// across the data range, multiplied by `scale` (use `n · bin_width` to
/// overlay on a count histogram). Empty for fewer than two distinct values.
pub fn kde_curve(values: &[f64], grid: usize, scale: f64) -> Vec<[f64; 2]> {
    let xs = finite(values);
    let (Some(bw), Some((lo, hi))) = (scott_bandwidth(&xs), range(&xs)) else {
        return Vec::new();
    };
    let grid = grid.max(2);
    let norm = 1.0 / (xs.len() as f64 * bw * (2.0 * std::f64::consts::PI).sqrt());
    (0..grid)
        .map(|i| {
            let x = lo + (hi - lo) * i as f64 / (grid - 1) as f64;
            let density: f64 = xs
                .iter()
                .map(|xi| (-0.5 * ((x - xi) / bw).powi(2)).exp())
                .sum::<f64>()
                * norm;
            [x, density * scale]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson correlation over the rows where both values are finite.
/// NaN when fewer than two such rows exist or either side has no variance.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(x, y)| (*x, *y))
        .collect();
    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }
    let mean_a = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_b = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;
    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    if var_a == 0.0 || var_b == 0.0 {
        return f64::NAN;
    }
    (cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0)
}

/// Square correlation matrix over a set of named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    /// Row-major, `names.len()` × `names.len()`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

/// Pairwise Pearson correlation of every numeric column, in table order.
/// Text columns are skipped; the diagonal is 1.0.
pub fn correlation_matrix(table: &RecordTable) -> CorrelationMatrix {
    let numeric: Vec<(String, Vec<f64>)> = table
        .columns()
        .iter()
        .filter_map(|c| c.as_f64().map(|v| (c.name.clone(), v)))
        .collect();
    let n = numeric.len();
    let mut values = vec![vec![1.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let r = pearson(&numeric[i].1, &numeric[j].1);
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    CorrelationMatrix {
        names: numeric.into_iter().map(|(name, _)| name).collect(),
        values,
    }
}
