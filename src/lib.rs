//! Benchmark harness comparing naive and buffered string concatenation.

pub mod benches;
pub mod concat;
pub mod dataset;
pub mod error;
pub mod harness;
pub mod report;
pub mod schema;
pub mod stats;

pub use concat::{buffer_concat, naive_concat, Candidate};
pub use error::BenchError;
