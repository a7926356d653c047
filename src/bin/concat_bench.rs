use clap::{Parser, ValueEnum};
use concat_bench::benches;
use concat_bench::dataset::{Workload, DEFAULT_FRAGMENTS, DEFAULT_TOKEN};
use concat_bench::harness::{BenchConfig, Profile};
use concat_bench::report::{self, Comparison};
use concat_bench::schema::{BenchReport, RunMeta};
use concat_bench::BenchError;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProfileArg {
    Quick,
    Full,
}

impl From<ProfileArg> for Profile {
    fn from(v: ProfileArg) -> Self {
        match v {
            ProfileArg::Quick => Profile::Quick,
            ProfileArg::Full => Profile::Full,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "concat-bench")]
#[command(about = "Compare naive and buffered string concatenation")]
struct Args {
    #[arg(long, value_enum, default_value_t = ProfileArg::Quick)]
    profile: ProfileArg,

    /// Seed for `--random-len` workloads.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of fragments in the workload.
    #[arg(long, default_value_t = DEFAULT_FRAGMENTS)]
    fragments: usize,

    /// Fragment repeated to build the workload.
    #[arg(long, default_value = DEFAULT_TOKEN)]
    token: String,

    /// Use seeded random alphanumeric fragments of this length instead of `--token`.
    #[arg(long, value_name = "LEN", conflicts_with = "token")]
    random_len: Option<usize>,

    /// Load fragments from a file, one per line.
    #[arg(long, value_name = "FILE", conflicts_with_all = ["token", "random_len", "fragments"])]
    input: Option<PathBuf>,

    /// Upper bound on samples per candidate (defaults to the profile's).
    #[arg(long)]
    samples: Option<usize>,

    /// Samples per candidate collected even past the time budget (defaults to the profile's).
    #[arg(long)]
    min_samples: Option<usize>,

    /// Sampling time budget per candidate, in milliseconds (defaults to the profile's).
    #[arg(long, value_name = "MS")]
    time_budget_ms: Option<u64>,

    /// Where to write the SVG chart.
    #[arg(long, value_name = "PATH", default_value = "concat_bench.svg")]
    chart: PathBuf,

    /// Skip the chart entirely.
    #[arg(long, default_value_t = false)]
    no_chart: bool,

    /// Also write the JSON report here.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Seconds since the Unix epoch, formatted as `unix:<secs>`.
fn now_unix_label() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("unix:{secs}")
}

fn git_sha_short() -> Option<String> {
    // Best-effort: read from environment set by CI/build scripts.
    std::env::var("GIT_SHA")
        .ok()
        .or_else(|| std::env::var("GITHUB_SHA").ok())
        .map(|s| s.chars().take(12).collect())
}

fn build_workload(args: &Args) -> Result<Workload, BenchError> {
    if let Some(path) = &args.input {
        return Ok(Workload::from_file(path)?);
    }
    Ok(match args.random_len {
        Some(len) => Workload::random(args.fragments, len, args.seed),
        None => Workload::repeated(&args.token, args.fragments),
    })
}

fn main() -> Result<(), BenchError> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut cfg = BenchConfig::new(args.profile.into(), args.seed);
    if let Some(n) = args.samples {
        cfg = cfg.with_max_samples(n);
    }
    if let Some(n) = args.min_samples {
        cfg = cfg.with_min_samples(n);
    }
    if let Some(ms) = args.time_budget_ms {
        cfg = cfg.with_time_budget(Duration::from_millis(ms));
    }
    cfg.validate()?;

    let workload = build_workload(&args)?;
    info!(workload = %workload.describe(), profile = cfg.profile.as_str(), "workload ready");

    let runs = benches::concat::run(&cfg, &workload)?;
    print!("{}", report::render_text(&workload.describe(), &runs));

    let comparison = Comparison::from_runs(&runs);
    if !args.no_chart {
        report::emit_chart(comparison.as_ref(), Some(args.chart.as_path()));
    }

    if let Some(out) = &args.out {
        let bench_report = BenchReport {
            run: RunMeta {
                schema_version: 1,
                bench_version: env!("CARGO_PKG_VERSION").to_string(),
                profile: cfg.profile.as_str().to_string(),
                seed: cfg.seed,
                workload: workload.describe(),
                timestamp_utc: now_unix_label(),
                git_sha: git_sha_short(),
            },
            comparison,
            measurements: runs.iter().map(|r| r.to_measurement(&workload)).collect(),
        };
        let json = serde_json::to_string_pretty(&bench_report)?;
        fs::write(out, json)?;
        info!(path = %out.display(), "report written");
    }

    Ok(())
}
