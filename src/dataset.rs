//! Input workloads for the concatenation benchmarks.
//!
//! A [`Workload`] is an ordered, read-only sequence of string fragments shared by every
//! candidate in a run. The default is 100,000 repetitions of `"abc"`.
//!
//! # File Format
//!
//! ```text
//! One fragment per line. `\n` and `\r\n` terminators are stripped;
//! every other byte (including leading/trailing spaces) is kept.
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fs;
use std::io;
use std::path::Path;

/// Fragment count of the default workload.
pub const DEFAULT_FRAGMENTS: usize = 100_000;

/// Token repeated by the default workload.
pub const DEFAULT_TOKEN: &str = "abc";

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Clone, Debug, PartialEq, Eq)]
enum Source {
    Repeated { token: String },
    Random { fragment_len: usize, seed: u64 },
    File { path: String },
}

/// Ordered fragment sequence fed to every candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Workload {
    fragments: Vec<String>,
    source: Source,
}

impl Default for Workload {
    fn default() -> Self {
        Self::repeated(DEFAULT_TOKEN, DEFAULT_FRAGMENTS)
    }
}

impl Workload {
    /// `count` copies of `token`.
    pub fn repeated(token: &str, count: usize) -> Self {
        Self {
            fragments: vec![token.to_string(); count],
            source: Source::Repeated {
                token: token.to_string(),
            },
        }
    }

    /// `count` alphanumeric fragments of `fragment_len` chars, deterministic for a given seed.
    pub fn random(count: usize, fragment_len: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let fragments: Vec<String> = (0..count)
            .map(|_| {
                (0..fragment_len)
                    .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
                    .collect()
            })
            .collect();

        Self {
            fragments,
            source: Source::Random { fragment_len, seed },
        }
    }

    /// Load fragments from a text file, one per line.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let fragments: Vec<String> = text.lines().map(str::to_string).collect();

        Ok(Self {
            fragments,
            source: Source::File {
                path: path.display().to_string(),
            },
        })
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Length in bytes of the concatenated output.
    pub fn total_bytes(&self) -> u64 {
        self.fragments.iter().map(|f| f.len() as u64).sum()
    }

    /// Short human-readable label, e.g. `repeated("abc") x 100000`.
    pub fn describe(&self) -> String {
        match &self.source {
            Source::Repeated { token } => format!("repeated({token:?}) x {}", self.len()),
            Source::Random { fragment_len, seed } => {
                format!("random(len={fragment_len}, seed={seed}) x {}", self.len())
            }
            Source::File { path } => format!("file({path}) x {}", self.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_is_100k_abc() {
        let w = Workload::default();
        assert_eq!(w.len(), 100_000);
        assert!(w.fragments().iter().all(|f| f == "abc"));
        assert_eq!(w.total_bytes(), 300_000);
        assert_eq!(w.describe(), "repeated(\"abc\") x 100000");
    }

    #[test]
    fn random_is_deterministic_per_seed() {
        let a = Workload::random(64, 7, 42);
        let b = Workload::random(64, 7, 42);
        let c = Workload::random(64, 7, 43);

        assert_eq!(a, b);
        assert_ne!(a.fragments(), c.fragments());
        assert!(a.fragments().iter().all(|f| f.len() == 7));
        assert!(a
            .fragments()
            .iter()
            .all(|f| f.bytes().all(|b| b.is_ascii_alphanumeric())));
    }

    #[test]
    fn empty_workload() {
        let w = Workload::repeated("abc", 0);
        assert!(w.is_empty());
        assert_eq!(w.total_bytes(), 0);
    }

    #[test]
    fn from_file_strips_line_endings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "ab\r\n cd \n\nef").unwrap();

        let w = Workload::from_file(file.path()).unwrap();
        assert_eq!(w.fragments(), ["ab", " cd ", "", "ef"]);
        assert!(w.describe().starts_with("file("));
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Workload::from_file(dir.path().join("missing.txt")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
