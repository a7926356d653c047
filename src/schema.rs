use serde::{Deserialize, Serialize};

use crate::report::Comparison;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub schema_version: u32,
    pub bench_version: String,
    pub profile: String,
    pub seed: u64,
    pub workload: String,
    pub timestamp_utc: String,
    pub git_sha: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    pub name: String,
    pub unit: String,

    /// Calls per timed batch.
    pub batch_size: u64,
    pub samples: usize,
    pub warmup_iters: u64,

    pub total_ns: u128,
    pub ns_per_iter: f64,
    pub std_dev_ns: f64,
    pub lower_ns: f64,
    pub upper_ns: f64,

    pub bytes_processed: Option<u64>,
    pub throughput_bytes_per_s: Option<f64>,

    pub extra: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    pub run: RunMeta,
    pub comparison: Option<Comparison>,
    pub measurements: Vec<Measurement>,
}
