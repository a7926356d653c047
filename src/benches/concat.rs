use crate::concat::Candidate;
use crate::dataset::Workload;
use crate::error::BenchError;
use crate::harness::{measure_fn, BenchConfig, Measured};
use crate::schema::Measurement;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// One candidate's timing result.
#[derive(Clone, Debug)]
pub struct CandidateRun {
    pub candidate: Candidate,
    pub measured: Measured,
    pub output_sha256: String,
}

impl CandidateRun {
    pub fn to_measurement(&self, workload: &Workload) -> Measurement {
        let m = &self.measured;
        let bytes = workload.total_bytes();
        let throughput = if m.summary.mean > 0.0 {
            Some(bytes as f64 / (m.summary.mean / 1e9))
        } else {
            None
        };

        Measurement {
            name: format!("concat.{}", self.candidate.name()),
            unit: "ns/iter".to_string(),
            batch_size: m.batch_size,
            samples: m.samples.len(),
            warmup_iters: m.warmup_iters,
            total_ns: m.total_ns,
            ns_per_iter: m.summary.mean,
            std_dev_ns: m.summary.std_dev,
            lower_ns: m.summary.lower,
            upper_ns: m.summary.upper,
            bytes_processed: Some(bytes),
            throughput_bytes_per_s: throughput,
            extra: json!({
                "fragments": workload.len(),
                "workload": workload.describe(),
                "output_sha256": self.output_sha256,
                "median_ns": m.summary.median,
                "min_ns": m.summary.min,
                "max_ns": m.summary.max,
            }),
        }
    }
}

fn hex32(d: [u8; 32]) -> String {
    let mut s = String::with_capacity(64);
    for b in d {
        s.push_str(&format!("{:02x}", b));
    }
    s
}

fn sha256_str(s: &str) -> String {
    hex32(Sha256::digest(s.as_bytes()).into())
}

/// Runs every candidate once and checks they produce the same bytes.
///
/// Returns the SHA-256 of each candidate's output, in `Candidate::ALL` order.
pub fn verify_outputs(workload: &Workload) -> Result<Vec<(Candidate, String)>, BenchError> {
    let fragments = workload.fragments();
    let expected_len = workload.total_bytes();

    let mut digests: Vec<(Candidate, String)> = Vec::with_capacity(Candidate::ALL.len());
    for candidate in Candidate::ALL {
        let out = candidate.run(fragments);
        if out.len() as u64 != expected_len {
            return Err(BenchError::mismatch(format!(
                "{} produced {} bytes, expected {}",
                candidate.name(),
                out.len(),
                expected_len
            )));
        }
        digests.push((candidate, sha256_str(&out)));
    }

    if let Some((first, first_digest)) = digests.first() {
        for (candidate, digest) in &digests[1..] {
            if digest != first_digest {
                return Err(BenchError::mismatch(format!(
                    "{} and {} differ ({} vs {})",
                    first.name(),
                    candidate.name(),
                    first_digest,
                    digest
                )));
            }
        }
    }

    Ok(digests)
}

/// Benchmarks each candidate in turn; the next one starts only after the previous finished.
pub fn run(cfg: &BenchConfig, workload: &Workload) -> Result<Vec<CandidateRun>, BenchError> {
    cfg.validate()?;
    let digests = verify_outputs(workload)?;
    debug!(fragments = workload.len(), "candidate outputs agree");

    let fragments = workload.fragments();
    let mut out = Vec::with_capacity(digests.len());
    for (candidate, output_sha256) in digests {
        info!(candidate = candidate.name(), "benchmarking");
        let measured = measure_fn(cfg, || candidate.run(fragments));
        info!(
            candidate = candidate.name(),
            samples = measured.samples.len(),
            batch_size = measured.batch_size,
            mean_ns = measured.summary.mean,
            "done"
        );
        out.push(CandidateRun {
            candidate,
            measured,
            output_sha256,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::Profile;
    use std::time::Duration;

    fn small_cfg() -> BenchConfig {
        BenchConfig::new(Profile::Quick, 0)
            .with_max_samples(10)
            .with_time_budget(Duration::from_millis(50))
    }

    #[test]
    fn verify_records_matching_digests() {
        let w = Workload::repeated("abc", 1_000);
        let digests = verify_outputs(&w).unwrap();
        assert_eq!(digests.len(), 2);
        assert_eq!(digests[0].1, digests[1].1);
        assert_eq!(digests[0].1, sha256_str(&"abc".repeat(1_000)));
        assert_eq!(digests[0].1.len(), 64);
    }

    #[test]
    fn empty_digest_is_well_known() {
        let digests = verify_outputs(&Workload::repeated("abc", 0)).unwrap();
        assert_eq!(
            digests[0].1,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn run_measures_both_candidates_in_order() {
        let w = Workload::repeated("abc", 500);
        let runs = run(&small_cfg(), &w).unwrap();
        let names: Vec<_> = runs.iter().map(|r| r.candidate.name()).collect();
        assert_eq!(names, ["naive_concat", "buffer_concat"]);
        for r in &runs {
            assert!(!r.measured.samples.is_empty());
            let m = r.to_measurement(&w);
            assert_eq!(m.bytes_processed, Some(1_500));
            assert_eq!(m.extra["fragments"], 500);
            assert_eq!(m.samples, r.measured.samples.len());
        }
    }

    #[test]
    fn empty_workload_still_produces_samples() {
        let w = Workload::repeated("abc", 0);
        let runs = run(&small_cfg(), &w).unwrap();
        assert!(runs.iter().all(|r| !r.measured.samples.is_empty()));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = small_cfg().with_max_samples(0);
        let err = run(&cfg, &Workload::repeated("a", 1)).unwrap_err();
        assert!(matches!(err, BenchError::Config(_)));
    }
}
