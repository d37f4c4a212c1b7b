//! Rule scripts.
//!
//! A [`Script`] is the static side of the crate: keywords with their
//! decomposition/reassembly rules, synonym sets, the pre/post substitution
//! tables and the greeting/farewell/quit phrase lists. It is built once,
//! validated, and never mutated afterwards; the round-robin cursors and the
//! reply memory belong to a [`Session`](crate::Session) instead, so one script
//! can serve any number of sessions (`Script` is `Send + Sync`).
//!
//! ## Building a script
//!
//! - From text: [`Script::parse`] / [`Script::from_path`] read the classic
//!   line-oriented script format (see `parser.rs`).
//! - In code: [`ScriptBuilder`] with [`KeyRule`] / [`DecompRule`] values.
//! - Bundled: [`Script::doctor`] is Weizenbaum's DOCTOR script.
//!
//! All three end in `ScriptBuilder::build`, which compiles patterns and runs
//! the checks in `validate.rs`. A script that fails them is never produced.
//!
//! ## Printing
//!
//! `Display` writes a script back out in the text format; the output parses
//! into an equivalent script.

#[path = "script/builder.rs"]
mod builder;
#[path = "script/parser.rs"]
mod parser;
#[path = "script/validate.rs"]
mod validate;

pub use builder::{DecompRule, KeyRule, ScriptBuilder};

use crate::{KeyId, Keyword, ScriptError, Substitutions, Synonyms};
use once_cell::sync::Lazy;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const DOCTOR_SCRIPT: &str = include_str!("script/doctor.txt");

static DOCTOR: Lazy<Script> = Lazy::new(|| match Script::parse(DOCTOR_SCRIPT) {
    Ok(script) => script,
    Err(err) => panic!("bundled DOCTOR script is invalid: {err}"),
});

/// A validated, immutable rule corpus.
#[derive(Debug)]
pub struct Script {
    pub(crate) initial: Vec<String>,
    pub(crate) farewells: Vec<String>,
    pub(crate) quit: Vec<String>,
    pub(crate) pre: Substitutions,
    pub(crate) post: Substitutions,
    pub(crate) synonyms: Synonyms,
    pub(crate) keys: Vec<Keyword>,
    pub(crate) key_index: HashMap<String, KeyId>,
    /// Total decompositions across all keys; sizes a session's cursor table.
    pub(crate) decomposition_count: usize,
}

impl Script {
    /// Parse script text.
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        parser::parse(text)
    }

    /// Read and parse a script file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| ScriptError::Io { path: path.to_path_buf(), source })?;
        Self::parse(&text)
    }

    /// The bundled DOCTOR script.
    pub fn doctor() -> &'static Script {
        &DOCTOR
    }

    /// A random `initial:` line, if the script has any.
    pub fn greeting<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.initial.choose(rng).map(String::as_str)
    }

    /// A random `final:` line, if the script has any.
    pub fn farewell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.farewells.choose(rng).map(String::as_str)
    }

    /// True when `line` (trimmed) is exactly one of the `quit:` phrases.
    pub fn is_quit(&self, line: &str) -> bool {
        let line = line.trim();
        self.quit.iter().any(|phrase| phrase == line)
    }

    /// Keyword names in declaration order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.name.as_str())
    }

    pub(crate) fn key_id(&self, name: &str) -> Option<KeyId> {
        self.key_index.get(name).copied()
    }
}

impl FromStr for Script {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.initial {
            writeln!(f, "initial: {line}")?;
        }
        for line in &self.farewells {
            writeln!(f, "final: {line}")?;
        }
        for line in &self.quit {
            writeln!(f, "quit: {line}")?;
        }
        for (word, replacement) in self.pre.iter() {
            writeln!(f, "pre: {word} {replacement}")?;
        }
        for (word, replacement) in self.post.iter() {
            writeln!(f, "post: {word} {replacement}")?;
        }
        for set in self.synonyms.iter() {
            writeln!(f, "synon: {}", set.words.join(" "))?;
        }
        for key in &self.keys {
            writeln!(f, "key: {} {}", key.name, key.rank)?;
            for decomposition in &key.decompositions {
                let marker = if decomposition.memorable { "$ " } else { "" };
                writeln!(f, "  decomp: {marker}{}", decomposition.source)?;
                for reassembly in &decomposition.reassemblies {
                    writeln!(f, "    reasmb: {reassembly}")?;
                }
            }
        }
        Ok(())
    }
}
