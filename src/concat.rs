//! The two concatenation candidates under comparison.

use clap::ValueEnum;

/// Concatenation strategy to benchmark.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq, Hash)]
pub enum Candidate {
    /// Fold fragments into a fresh string on every step (quadratic).
    Naive,
    /// Append into one growable buffer, finalize once (linear).
    Buffer,
}

impl Candidate {
    pub const ALL: [Candidate; 2] = [Candidate::Naive, Candidate::Buffer];

    pub fn name(&self) -> &'static str {
        match self {
            Candidate::Naive => "naive_concat",
            Candidate::Buffer => "buffer_concat",
        }
    }

    pub fn run<S: AsRef<str>>(&self, fragments: &[S]) -> String {
        match self {
            Candidate::Naive => naive_concat(fragments),
            Candidate::Buffer => buffer_concat(fragments),
        }
    }
}

/// Builds the result by allocating a new string for every fragment.
///
/// Each step copies the whole accumulated prefix into an exactly-sized allocation,
/// so no intermediate buffer is ever grown in place.
pub fn naive_concat<S: AsRef<str>>(fragments: &[S]) -> String {
    fragments.iter().fold(String::new(), |acc, fragment| {
        let fragment = fragment.as_ref();
        let mut next = String::with_capacity(acc.len() + fragment.len());
        next.push_str(&acc);
        next.push_str(fragment);
        next
    })
}

/// Appends every fragment into a single amortized-growth buffer.
pub fn buffer_concat<S: AsRef<str>>(fragments: &[S]) -> String {
    let mut buf = String::new();
    for fragment in fragments {
        buf.push_str(fragment.as_ref());
    }
    buf.shrink_to_fit();
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_string() {
        let empty: [&str; 0] = [];
        assert_eq!(naive_concat(&empty), "");
        assert_eq!(buffer_concat(&empty), "");
    }

    #[test]
    fn single_fragment() {
        assert_eq!(naive_concat(&["x"]), "x");
        assert_eq!(buffer_concat(&["x"]), "x");
    }

    #[test]
    fn default_workload_shape() {
        let fragments = vec!["abc"; 100_000];
        let naive = naive_concat(&fragments);
        let buffered = buffer_concat(&fragments);
        assert_eq!(naive.len(), 300_000);
        assert_eq!(naive, "abc".repeat(100_000));
        assert_eq!(naive, buffered);
    }

    #[test]
    fn mixed_fragments_agree() {
        let fragments = ["", "héllo", " ", "wörld", "", "🦀", "\n"];
        assert_eq!(naive_concat(&fragments), buffer_concat(&fragments));
        assert_eq!(buffer_concat(&fragments), "héllo wörld🦀\n");
    }

    #[test]
    fn candidate_dispatch() {
        let fragments = vec![String::from("ab"), String::from("cd")];
        for candidate in Candidate::ALL {
            assert_eq!(candidate.run(&fragments), "abcd");
        }
        assert_eq!(Candidate::Naive.name(), "naive_concat");
        assert_eq!(Candidate::Buffer.name(), "buffer_concat");
    }
}
