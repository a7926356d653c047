//! Text report plus a log-scaled bar chart comparing the candidates.
//!
//! The chart is drawn twice: as plain text for the terminal, and as a standalone SVG
//! file. Neither is allowed to stop the raw means from being printed; a chart that can
//! not be produced only logs a warning.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::benches::concat::CandidateRun;
use crate::concat::Candidate;
use crate::error::BenchError;
use crate::stats::Summary;

/// Stand-in for non-positive means before taking the logarithm.
pub const LOG_FLOOR: f64 = 1e-9;

pub const CHART_TITLE: &str = "naive_concat vs buffer_concat";
pub const CHART_Y_LABEL: &str = "log10(mean time / ns)";

pub fn log10_clamped(mean: f64) -> f64 {
    if mean > 0.0 {
        mean.log10()
    } else {
        LOG_FLOOR.log10()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub naive: Summary,
    pub buffer: Summary,
    pub naive_log10: f64,
    pub buffer_log10: f64,
    /// naive mean / buffer mean; `None` when the buffer mean is not positive.
    pub speedup: Option<f64>,
}

impl Comparison {
    pub fn new(naive: Summary, buffer: Summary) -> Self {
        let speedup = if buffer.mean > 0.0 {
            Some(naive.mean / buffer.mean)
        } else {
            None
        };
        Self {
            naive_log10: log10_clamped(naive.mean),
            buffer_log10: log10_clamped(buffer.mean),
            naive,
            buffer,
            speedup,
        }
    }

    /// `None` unless both candidates were measured.
    pub fn from_runs(runs: &[CandidateRun]) -> Option<Self> {
        let find = |c: Candidate| {
            runs.iter()
                .find(|r| r.candidate == c)
                .map(|r| r.measured.summary)
        };
        Some(Self::new(find(Candidate::Naive)?, find(Candidate::Buffer)?))
    }

    pub fn bars(&self) -> [(&'static str, f64); 2] {
        [
            (Candidate::Naive.name(), self.naive_log10),
            (Candidate::Buffer.name(), self.buffer_log10),
        ]
    }

    pub fn validate(&self) -> Result<(), BenchError> {
        self.naive.validate()?;
        self.buffer.validate()?;
        if !self.naive_log10.is_finite() || !self.buffer_log10.is_finite() {
            return Err(BenchError::stats("log-scaled mean is not finite"));
        }
        Ok(())
    }
}

/// Formats nanoseconds with an auto-scaled unit.
pub fn format_duration(ns: f64) -> String {
    let abs = ns.abs();
    if abs < 1e3 {
        format!("{ns:.3} ns")
    } else if abs < 1e6 {
        format!("{:.3} µs", ns / 1e3)
    } else if abs < 1e9 {
        format!("{:.3} ms", ns / 1e6)
    } else {
        format!("{:.3} s", ns / 1e9)
    }
}

pub fn render_candidate(run: &CandidateRun) -> String {
    let m = &run.measured;
    let s = &m.summary;
    let mut out = String::new();
    let _ = writeln!(out, "{}", run.candidate.name());
    let _ = writeln!(
        out,
        "  {} call(s) per sample, {} samples, {} warmup calls",
        m.batch_size,
        m.samples.len(),
        m.warmup_iters
    );
    let _ = writeln!(out, "  mean:        {}", format_duration(s.mean));
    let _ = writeln!(out, "  std dev:     {}", format_duration(s.std_dev));
    let _ = writeln!(
        out,
        "  2.5%-97.5%:  [{}, {}]",
        format_duration(s.lower),
        format_duration(s.upper)
    );
    let _ = writeln!(out, "  raw mean:    {} ns", s.mean);
    out
}

/// Final two-decimal lines; always produced, whatever shape the statistics are in.
pub fn render_means(runs: &[CandidateRun]) -> String {
    let mut out = String::new();
    for run in runs {
        let _ = writeln!(
            out,
            "Mean {}: {:.2} ns",
            run.candidate.name(),
            run.measured.summary.mean
        );
    }
    out
}

pub fn render_text(workload: &str, runs: &[CandidateRun]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "workload: {workload}");
    for run in runs {
        out.push('\n');
        out.push_str(&render_candidate(run));
    }
    out.push('\n');
    out.push_str(&render_means(runs));
    out
}

/// Lowest and highest value on the chart's value axis. The axis always includes zero.
fn axis_range(bars: &[(&str, f64)]) -> (f64, f64) {
    let lo = bars.iter().map(|(_, v)| *v).fold(0.0f64, f64::min);
    let hi = bars.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
    (lo.floor(), hi.ceil())
}

pub fn render_terminal_chart(cmp: &Comparison, width: usize) -> String {
    let bars = cmp.bars();
    let (lo, hi) = axis_range(&bars);
    let span = hi - lo;
    let label_width = bars.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "{CHART_TITLE} ({CHART_Y_LABEL})");
    for (name, value) in bars {
        let len = if span > 0.0 {
            (((value - lo) / span) * width as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "  {name:<label_width$} | {} {value:.2}",
            "#".repeat(len.min(width))
        );
    }
    if let Some(speedup) = cmp.speedup {
        let _ = writeln!(
            out,
            "  {} is {speedup:.1}x faster than {}",
            Candidate::Buffer.name(),
            Candidate::Naive.name()
        );
    }
    out
}

const SVG_WIDTH: f64 = 480.0;
const SVG_HEIGHT: f64 = 360.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;

pub fn render_svg(cmp: &Comparison) -> String {
    let bars = cmp.bars();
    let (lo, hi) = axis_range(&bars);
    let span = if hi > lo { hi - lo } else { 1.0 };

    let plot_w = SVG_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = SVG_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let y_of = |v: f64| MARGIN_TOP + plot_h * (hi - v) / span;
    let zero_y = y_of(0.0);
    let slot = plot_w / bars.len() as f64;
    let bar_w = slot * 0.5;

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{SVG_WIDTH}" height="{SVG_HEIGHT}" viewBox="0 0 {SVG_WIDTH} {SVG_HEIGHT}" font-family="sans-serif" font-size="12">"#
    );
    let _ = writeln!(
        out,
        r#"  <rect width="{SVG_WIDTH}" height="{SVG_HEIGHT}" fill="white"/>"#
    );
    let _ = writeln!(
        out,
        r#"  <text x="{:.1}" y="24" text-anchor="middle" font-size="16">{CHART_TITLE}</text>"#,
        SVG_WIDTH / 2.0
    );
    let _ = writeln!(
        out,
        r#"  <text transform="translate(18 {:.1}) rotate(-90)" text-anchor="middle">{CHART_Y_LABEL}</text>"#,
        MARGIN_TOP + plot_h / 2.0
    );

    // y ticks, one per decade
    let mut tick = lo;
    while tick <= hi {
        let y = y_of(tick);
        let _ = writeln!(
            out,
            r##"  <line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#ddd"/>"##,
            MARGIN_LEFT + plot_w
        );
        let _ = writeln!(
            out,
            r#"  <text x="{:.1}" y="{:.1}" text-anchor="end">{tick}</text>"#,
            MARGIN_LEFT - 6.0,
            y + 4.0
        );
        tick += 1.0;
    }

    for (i, (name, value)) in bars.iter().enumerate() {
        let x = MARGIN_LEFT + slot * i as f64 + (slot - bar_w) / 2.0;
        let y = y_of(*value);
        let (top, height) = if y < zero_y {
            (y, zero_y - y)
        } else {
            (zero_y, y - zero_y)
        };
        let fill = if i == 0 { "#d9534f" } else { "#5cb85c" };
        let _ = writeln!(
            out,
            r#"  <rect x="{x:.1}" y="{top:.1}" width="{bar_w:.1}" height="{height:.1}" fill="{fill}"/>"#
        );
        let _ = writeln!(
            out,
            r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle">{value:.2}</text>"#,
            x + bar_w / 2.0,
            top - 4.0
        );
        let _ = writeln!(
            out,
            r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle">{name}</text>"#,
            x + bar_w / 2.0,
            SVG_HEIGHT - MARGIN_BOTTOM + 20.0
        );
    }

    let _ = writeln!(
        out,
        r#"  <line x1="{MARGIN_LEFT}" y1="{zero_y:.1}" x2="{:.1}" y2="{zero_y:.1}" stroke="black"/>"#,
        MARGIN_LEFT + plot_w
    );
    out.push_str("</svg>\n");
    out
}

pub fn write_svg<P: AsRef<Path>>(cmp: &Comparison, path: P) -> Result<(), BenchError> {
    cmp.validate()?;
    let path = path.as_ref();
    fs::write(path, render_svg(cmp))
        .map_err(|e| BenchError::chart(format!("writing {}: {e}", path.display())))
}

/// Prints the terminal chart and exports the SVG, downgrading any failure to a warning.
///
/// Returns whether the chart was produced.
pub fn emit_chart(cmp: Option<&Comparison>, svg_path: Option<&Path>) -> bool {
    let Some(cmp) = cmp else {
        warn!("chart skipped: both candidates are needed for a comparison");
        return false;
    };
    if let Err(e) = cmp.validate() {
        warn!(error = %e, "chart skipped");
        return false;
    }

    print!("\n{}", render_terminal_chart(cmp, 40));

    match svg_path {
        Some(path) => match write_svg(cmp, path) {
            Ok(()) => {
                info!(path = %path.display(), "chart written");
                true
            }
            Err(e) => {
                warn!(error = %e, "chart export failed");
                false
            }
        },
        None => true,
    }
}
