//! Fit and histogram numerics.
//!
//! Rust stand-ins for the single-call `scipy.stats.linregress` /
//! `np.histogram` work of the analysis scripts.

use monoblock_types::{MonoblockError, MonoblockResult};
use std::f64::consts::PI;

/// Least-squares straight-line fit, `scipy.stats.linregress` conventions.
#[derive(Debug, Clone, Copy)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient of the fit.
    pub r_value: f64,
    /// Standard error of the slope estimate.
    pub stderr: f64,
}

/// Fixed-width histogram of a sample set.
#[derive(Debug, Clone)]
pub struct Histogram {
    /// Per-bin counts, or probability density when normalised.
    pub counts: Vec<f64>,
    /// Bin edges, `counts.len() + 1` long.
    pub edges: Vec<f64>,
}

impl Histogram {
    /// Uniform bin width.
    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }
}

/// Least-squares fit of `y` against `x`.
pub fn linregress(x: &[f64], y: &[f64]) -> MonoblockResult<LinearFit> {
    if x.len() != y.len() {
        return Err(MonoblockError::PostProcessError(format!(
            "linregress inputs differ in length: {} vs {}",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    if n < 2 {
        return Err(MonoblockError::PostProcessError(format!(
            "linregress needs at least two points, got {n}"
        )));
    }

    let nf = n as f64;
    let mx = x.iter().sum::<f64>() / nf;
    let my = y.iter().sum::<f64>() / nf;

    let mut ss_xx = 0.0;
    let mut ss_xy = 0.0;
    let mut ss_yy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mx;
        let dy = yi - my;
        ss_xx += dx * dx;
        ss_xy += dx * dy;
        ss_yy += dy * dy;
    }
    if ss_xx == 0.0 {
        return Err(MonoblockError::PostProcessError(
            "linregress x values are all identical".into(),
        ));
    }

    let slope = ss_xy / ss_xx;
    let intercept = my - slope * mx;
    let r_den = (ss_xx * ss_yy).sqrt();
    let r_value = if r_den > 0.0 {
        (ss_xy / r_den).clamp(-1.0, 1.0)
    } else {
        0.0
    };
    // Slope standard error; two points fix the line exactly.
    let stderr = if n > 2 {
        ((1.0 - r_value * r_value) * ss_yy / ss_xx / (nf - 2.0)).sqrt()
    } else {
        0.0
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_value,
        stderr,
    })
}

/// The numpy `bins="auto"` rule: larger of the Sturges and
/// Freedman-Diaconis counts.
pub fn auto_bin_count(samples: &[f64]) -> usize {
    let n = samples.len();
    if n < 2 {
        return 1;
    }
    let sturges = (n as f64).log2().ceil() as usize + 1;

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let range = sorted[n - 1] - sorted[0];
    let iqr = percentile(&sorted, 75.0) - percentile(&sorted, 25.0);
    let h = 2.0 * iqr * (n as f64).powf(-1.0 / 3.0);

    if h > 0.0 && range > 0.0 {
        let fd = (range / h).ceil() as usize;
        sturges.max(fd).max(1)
    } else {
        sturges.max(1)
    }
}

/// Histogram over `[min, max]` of the samples. With `density` the counts
/// are scaled so the area under the bins is one, as
/// `np.histogram(..., density=True)`.
pub fn histogram(samples: &[f64], bins: usize, density: bool) -> MonoblockResult<Histogram> {
    if samples.is_empty() {
        return Err(MonoblockError::PostProcessError(
            "histogram of an empty sample set".into(),
        ));
    }
    if bins == 0 {
        return Err(MonoblockError::PostProcessError(
            "histogram bin count must be positive".into(),
        ));
    }

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in samples {
        if !v.is_finite() {
            return Err(MonoblockError::PostProcessError(format!(
                "histogram sample is not finite: {v}"
            )));
        }
        lo = lo.min(v);
        hi = hi.max(v);
    }
    // numpy widens a degenerate range to unit width.
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0.0; bins];
    for &v in samples {
        // The closing edge folds into the last bin.
        let i = (((v - lo) / width) as usize).min(bins - 1);
        counts[i] += 1.0;
    }
    if density {
        let norm = samples.len() as f64 * width;
        for c in counts.iter_mut() {
            *c /= norm;
        }
    }

    let edges = (0..=bins).map(|i| lo + i as f64 * width).collect();
    Ok(Histogram { counts, edges })
}

/// Normal probability density, the overlay curve of the spectrum figure.
/// Python: gaussian(x, mu, sigma) in `plot_source.py`.
pub fn gaussian_pdf(x: f64, mu: f64, sigma: f64) -> f64 {
    let z = (x - mu) / sigma;
    (-0.5 * z * z).exp() / (sigma * (2.0 * PI).sqrt())
}

/// Log-linear fit of a depth profile: `slope` is the attenuation
/// coefficient [1/cm] (negative for a decaying profile) and
/// `exp(intercept)` the extrapolated surface rate. Zero-valued bins carry
/// no information and are skipped.
pub fn attenuation_fit(depth_cm: &[f64], values: &[f64]) -> MonoblockResult<LinearFit> {
    if depth_cm.len() != values.len() {
        return Err(MonoblockError::PostProcessError(format!(
            "attenuation fit inputs differ in length: {} vs {}",
            depth_cm.len(),
            values.len()
        )));
    }
    let mut d = Vec::with_capacity(depth_cm.len());
    let mut ln_v = Vec::with_capacity(values.len());
    for (&di, &vi) in depth_cm.iter().zip(values) {
        if vi > 0.0 {
            d.push(di);
            ln_v.push(vi.ln());
        }
    }
    if d.len() < 2 {
        return Err(MonoblockError::PostProcessError(format!(
            "attenuation fit needs at least two positive samples, got {}",
            d.len()
        )));
    }
    linregress(&d, &ln_v)
}

/// Linear-interpolated percentile of pre-sorted data, numpy's default rule.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let idx = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = idx - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}
