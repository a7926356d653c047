//! Descriptive statistics over per-call timing samples (nanoseconds).

use crate::error::BenchError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const LOWER_QUANTILE: f64 = 0.025;
pub const UPPER_QUANTILE: f64 = 0.975;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub samples: usize,
    pub mean: f64,
    pub std_dev: f64,
    /// 2.5% quantile, widened down to the mean if needed.
    pub lower: f64,
    /// 97.5% quantile, widened up to the mean if needed.
    pub upper: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

/// Quantile of already-sorted data, interpolating linearly between closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

impl Summary {
    /// Returns `None` only for an empty sample set.
    pub fn from_samples(samples: &[f64]) -> Option<Summary> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std_dev = if n > 1 {
            let var = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            var.sqrt()
        } else {
            0.0
        };

        Some(Summary {
            samples: n,
            mean,
            std_dev,
            lower: quantile(&sorted, LOWER_QUANTILE).min(mean),
            upper: quantile(&sorted, UPPER_QUANTILE).max(mean),
            median: quantile(&sorted, 0.5),
            min: sorted[0],
            max: sorted[n - 1],
        })
    }

    /// Checks the shape the reporting layer relies on.
    pub fn validate(&self) -> Result<(), BenchError> {
        let fields = [
            ("mean", self.mean),
            ("std_dev", self.std_dev),
            ("lower", self.lower),
            ("upper", self.upper),
        ];
        if let Some((name, v)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(BenchError::stats(format!("{name} is not finite ({v})")));
        }
        if self.samples == 0 {
            return Err(BenchError::stats("no samples"));
        }
        if self.std_dev < 0.0 {
            return Err(BenchError::stats("negative standard deviation"));
        }
        if !(self.lower <= self.mean && self.mean <= self.upper) {
            return Err(BenchError::stats(format!(
                "bounds out of order: {} <= {} <= {}",
                self.lower, self.mean, self.upper
            )));
        }
        Ok(())
    }
}
