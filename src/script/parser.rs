//! Script text parser.
//!
//! The format is line-oriented; each line is one directive:
//!
//! ```text
//! initial: How do you do.  Please tell me your problem.
//! final: Goodbye.  Thank you for talking to me.
//! quit: bye
//! pre: dont don't
//! post: my your
//! synon: sad unhappy depressed sick
//! key: remember 5
//!   decomp: * i remember *
//!     reasmb: Do you often think of (2) ?
//!   decomp: $ * my *
//!     reasmb: Earlier you said your (2).
//! ```
//!
//! `decomp:` lines (two-space indent) belong to the most recent `key:`;
//! `reasmb:` lines (four-space indent) belong to the most recent `decomp:`.
//! A `$ ` before a pattern marks the decomposition memorable. Any other line
//! (blank, comment, unknown) is skipped.
//!
//! Parsing is a small state machine: the keyword under construction is held
//! as a `KeyRule` and handed to the `ScriptBuilder` when the next `key:` line
//! (or the end of input) closes it.

use super::Script;
use super::builder::{DecompRule, KeyRule, ScriptBuilder};
use crate::ScriptError;
use tracing::trace;

/// One classified line of script text.
#[derive(Debug, PartialEq, Eq)]
enum Directive<'t> {
    Initial(&'t str),
    Final(&'t str),
    Quit(&'t str),
    Pre(&'t str, &'t str),
    Post(&'t str, &'t str),
    Synon(Vec<&'t str>),
    Key { name: &'t str, rank: Option<&'t str> },
    Decomp { memorable: bool, pattern: &'t str },
    Reasmb(&'t str),
    Other,
}

fn group<'t>(caps: &regex::Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str())
}

fn classify(line: &str) -> Directive<'_> {
    if let Some(caps) = regex!(r"^initial: (.*)$").captures(line) {
        return Directive::Initial(group(&caps, 1));
    }
    if let Some(caps) = regex!(r"^final: (.*)$").captures(line) {
        return Directive::Final(group(&caps, 1));
    }
    if let Some(caps) = regex!(r"^quit: (.*)$").captures(line) {
        return Directive::Quit(group(&caps, 1));
    }
    if let Some(caps) = regex!(r"^pre: (\S+) (.*)$").captures(line) {
        return Directive::Pre(group(&caps, 1), group(&caps, 2));
    }
    if let Some(caps) = regex!(r"^post: (\S+) (.*)$").captures(line) {
        return Directive::Post(group(&caps, 1), group(&caps, 2));
    }
    if let Some(caps) = regex!(r"^synon: (.*)$").captures(line) {
        return Directive::Synon(group(&caps, 1).split_whitespace().collect());
    }
    if let Some(caps) = regex!(r"^key: (\S+)(?: (\d+))?$").captures(line) {
        return Directive::Key { name: group(&caps, 1), rank: caps.get(2).map(|m| m.as_str()) };
    }
    if let Some(caps) = regex!(r"^  decomp: (\$ )?(.+)$").captures(line) {
        return Directive::Decomp { memorable: caps.get(1).is_some(), pattern: group(&caps, 2) };
    }
    if let Some(caps) = regex!(r"^    reasmb: (.+)$").captures(line) {
        return Directive::Reasmb(group(&caps, 1));
    }
    Directive::Other
}

pub(super) fn parse(text: &str) -> Result<Script, ScriptError> {
    let mut builder = ScriptBuilder::new();
    let mut current: Option<KeyRule> = None;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;

        match classify(line) {
            Directive::Initial(text) => {
                builder.initial(text);
            }
            Directive::Final(text) => {
                builder.farewell(text);
            }
            Directive::Quit(text) => {
                builder.quit(text);
            }
            Directive::Pre(word, replacement) => {
                builder.pre(word, replacement);
            }
            Directive::Post(word, replacement) => {
                builder.post(word, replacement);
            }
            Directive::Synon(words) => {
                if words.is_empty() {
                    trace!(line = line_no, "empty synonym set skipped");
                } else {
                    builder.synonyms(words);
                }
            }
            Directive::Key { name, rank } => {
                let mut key = KeyRule::new(name);
                if let Some(rank) = rank {
                    key.rank = rank.parse().map_err(|_| ScriptError::InvalidRank {
                        line: line_no,
                        keyword: name.to_string(),
                        rank: rank.to_string(),
                    })?;
                }
                if let Some(done) = current.replace(key) {
                    builder.keyword(done);
                }
            }
            Directive::Decomp { memorable, pattern } => {
                let key = current.as_mut().ok_or(ScriptError::Misplaced {
                    line: line_no,
                    directive: "decomp",
                    parent: "key",
                })?;
                let mut decomposition = DecompRule::new(pattern);
                decomposition.memorable = memorable;
                key.decompositions.push(decomposition);
            }
            Directive::Reasmb(text) => {
                let decomposition = current.as_mut().and_then(|key| key.decompositions.last_mut()).ok_or(
                    ScriptError::Misplaced { line: line_no, directive: "reasmb", parent: "decomp" },
                )?;
                decomposition.reassemblies.push(text.to_string());
            }
            Directive::Other => {
                if !line.trim().is_empty() {
                    trace!(line = line_no, text = line, "unrecognised script line skipped");
                }
            }
        }
    }

    if let Some(done) = current {
        builder.keyword(done);
    }
    builder.build()
}
