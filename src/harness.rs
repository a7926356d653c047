use std::convert::Infallible;
use std::hint::black_box;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::BenchError;
use crate::stats::Summary;

/// Largest number of calls grouped into one timed batch.
pub const MAX_BATCH: u64 = 1 << 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    Quick,
    Full,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Quick => "quick",
            Profile::Full => "full",
        }
    }
}

#[derive(Clone, Debug)]
pub struct BenchConfig {
    pub profile: Profile,
    pub seed: u64,
    /// The time budget cannot end sampling before this many samples exist.
    pub min_samples: usize,
    /// Sampling stops once this many samples exist.
    pub max_samples: usize,
    /// Sampling also stops once this much wall time has been spent on it.
    pub time_budget: Duration,
    /// Batches are grown until one lasts at least this long.
    pub min_batch_time: Duration,
    pub warmup_time: Duration,
}

impl BenchConfig {
    pub fn new(profile: Profile, seed: u64) -> Self {
        match profile {
            Profile::Quick => Self {
                profile,
                seed,
                min_samples: 30,
                max_samples: 100,
                time_budget: Duration::from_secs(3),
                min_batch_time: Duration::from_millis(1),
                warmup_time: Duration::from_millis(100),
            },
            Profile::Full => Self {
                profile,
                seed,
                min_samples: 100,
                max_samples: 1_000,
                time_budget: Duration::from_secs(15),
                min_batch_time: Duration::from_millis(5),
                warmup_time: Duration::from_millis(500),
            },
        }
    }

    /// Also lowers `min_samples` when it would exceed the new cap.
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self.min_samples = self.min_samples.min(max_samples);
        self
    }

    /// Also raises `max_samples` when it would fall below the new floor.
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self.max_samples = self.max_samples.max(min_samples);
        self
    }

    pub fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = time_budget;
        self
    }

    pub fn validate(&self) -> Result<(), BenchError> {
        if self.min_samples == 0 || self.max_samples == 0 {
            return Err(BenchError::config("sample count must be at least 1"));
        }
        if self.min_samples > self.max_samples {
            return Err(BenchError::config(format!(
                "min samples ({}) exceeds max samples ({})",
                self.min_samples, self.max_samples
            )));
        }
        if self.time_budget.is_zero() {
            return Err(BenchError::config("time budget must be non-zero"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct Measured {
    /// Calls per timed batch.
    pub batch_size: u64,
    pub warmup_iters: u64,
    /// Per-call nanoseconds, one entry per batch, in collection order.
    pub samples: Vec<f64>,
    /// Wall time of all sampled batches.
    pub total_ns: u128,
    pub summary: Summary,
}

impl Measured {
    pub fn iters(&self) -> u64 {
        self.batch_size * self.samples.len() as u64
    }
}

fn time_batch<T, E>(batch: u64, f: &mut impl FnMut() -> Result<T, E>) -> Result<Duration, E> {
    let start = Instant::now();
    for _ in 0..batch {
        black_box(f()?);
    }
    Ok(start.elapsed())
}

/// Finds the smallest power-of-two batch whose duration clears `min_batch_time`.
///
/// Returns the batch size and the number of calls spent finding it.
fn calibrate<T, E>(
    cfg: &BenchConfig,
    f: &mut impl FnMut() -> Result<T, E>,
) -> Result<(u64, u64), E> {
    let mut batch = 1u64;
    let mut calls = 0u64;
    loop {
        let elapsed = time_batch(batch, f)?;
        calls += batch;
        if elapsed >= cfg.min_batch_time || batch >= MAX_BATCH {
            return Ok((batch, calls));
        }
        batch = (batch * 2).min(MAX_BATCH);
    }
}

/// Times a fallible callable, returning its first error unchanged.
pub fn try_measure_fn<T, E>(
    cfg: &BenchConfig,
    mut f: impl FnMut() -> Result<T, E>,
) -> Result<Measured, E> {
    let warmup_start = Instant::now();
    let (batch_size, mut warmup_iters) = calibrate(cfg, &mut f)?;
    while warmup_start.elapsed() < cfg.warmup_time {
        time_batch(batch_size, &mut f)?;
        warmup_iters += batch_size;
    }
    debug!(batch_size, warmup_iters, "calibrated");

    let max_samples = cfg.max_samples.max(1);
    let min_samples = cfg.min_samples.clamp(1, max_samples);
    let mut samples = Vec::with_capacity(max_samples.min(4_096));
    let mut total = Duration::ZERO;
    let start = Instant::now();
    while samples.len() < max_samples {
        let elapsed = time_batch(batch_size, &mut f)?;
        total += elapsed;
        samples.push(elapsed.as_nanos() as f64 / batch_size as f64);

        // A first batch that alone outlasts the budget is the only sample taken.
        let first_exceeds_budget = samples.len() == 1 && elapsed >= cfg.time_budget;
        if start.elapsed() >= cfg.time_budget
            && (samples.len() >= min_samples || first_exceeds_budget)
        {
            break;
        }
    }

    let summary = Summary::from_samples(&samples).unwrap_or_default();
    Ok(Measured {
        batch_size,
        warmup_iters,
        samples,
        total_ns: total.as_nanos(),
        summary,
    })
}

pub fn measure_fn<T>(cfg: &BenchConfig, mut f: impl FnMut() -> T) -> Measured {
    match try_measure_fn(cfg, || Ok::<T, Infallible>(f())) {
        Ok(m) => m,
        Err(never) => match never {},
    }
}
