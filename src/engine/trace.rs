//! Run traces.
//!
//! A transform can optionally record what it tried, step by step. This is the
//! data behind `Session::transform_verbose` and the CLI's `--debug-print`
//! report. Recording is opt-in: the normal path never allocates steps, and
//! recording never changes which reply is chosen.

use std::fmt;
use std::time::Duration;

/// One thing the engine tried while transforming an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Started on a clause of the preprocessed input.
    Clause { text: String },
    /// Started trying a keyword's decompositions.
    Keyword { name: String, rank: u32 },
    /// Tested one decomposition pattern (`regex` is the compiled form).
    Decomposition { keyword: String, pattern: String, regex: String, matched: bool },
    /// Picked a reassembly of the matched decomposition.
    Reassembly { keyword: String, template: String },
    /// Followed a `goto`.
    Redirect { from: String, to: String },
    /// Gave up on a goto chain that exceeded the redirect bound.
    RedirectLimit { keyword: String },
    /// Deferred a reply to memory.
    Remembered { reply: String },
    /// Answered from memory.
    Recalled { reply: String },
}

/// Which stage of the fallback order produced the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// A keyword in the input; holds the keyword that rendered the reply
    /// (the end of any goto chain).
    Keyword(String),
    /// A reply deferred to memory by an earlier (or this) transform.
    Memory,
    /// The catch-all `xnone` keyword.
    Default,
    /// The fixed last-resort reply.
    Fallback,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Keyword(name) => write!(f, "keyword `{name}`"),
            Strategy::Memory => f.write_str("memory"),
            Strategy::Default => f.write_str("default key"),
            Strategy::Fallback => f.write_str("fallback"),
        }
    }
}

/// Transformer output bundled with its trace.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub reply: String,
    pub strategy: Strategy,
    /// Empty unless tracing was requested.
    pub steps: Vec<Step>,
    pub elapsed: Duration,
}
