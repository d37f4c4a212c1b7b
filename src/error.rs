//! Script loading errors.
//!
//! Every variant means the script is unusable: a `Script` is either fully
//! built and validated or not built at all. Failing to match input at run time
//! is not an error and never shows up here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    /// The script file could not be read.
    #[error("failed to read script {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `decomp:` line before any `key:`, or a `reasmb:` line before any `decomp:`.
    #[error("line {line}: `{directive}` must follow a `{parent}` line")]
    Misplaced { line: usize, directive: &'static str, parent: &'static str },

    /// A `key:` rank that does not fit in a `u32`.
    #[error("line {line}: invalid rank `{rank}` for key `{keyword}`")]
    InvalidRank { line: usize, keyword: String, rank: String },

    /// A pattern uses `@name` but no `synon: name ...` line exists.
    #[error("can not find synonyms `@{name}` used by key `{keyword}` in pattern `{pattern}`")]
    UnknownSynonym { keyword: String, pattern: String, name: String },

    /// A `goto` names a key that does not exist.
    #[error("can not find goto key `{target}` referenced from key `{keyword}`")]
    UnknownKey { keyword: String, target: String },

    /// A decomposition without any `reasmb:` line.
    #[error("decomposition `{pattern}` of key `{keyword}` has no reassembly")]
    EmptyDecomposition { keyword: String, pattern: String },

    /// A template refers to a capture group its pattern does not have.
    #[error("reassembly `{template}` of key `{keyword}` refers to ({index}) but `{pattern}` captures {groups} group(s)")]
    BackReference { keyword: String, pattern: String, template: String, index: usize, groups: usize },

    /// Keys whose matching rules only ever redirect form a loop.
    #[error("goto cycle through redirect-only rules: {}", .path.join(" -> "))]
    RedirectCycle { path: Vec<String> },

    /// The regex generated from a pattern was rejected.
    #[error("pattern `{pattern}` of key `{keyword}` failed to compile: {source}")]
    Pattern {
        keyword: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
