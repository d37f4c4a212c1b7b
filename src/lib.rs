extern crate self as eliza;

use std::collections::HashMap;
use std::fmt;

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod repl;
mod script;

#[cfg(test)]
mod tests;

pub use api::{Options, Session, Step, Strategy, TransformDetails, TransformResult};
pub use error::ScriptError;
pub use repl::{repl, repl_with};
pub use script::{DecompRule, KeyRule, Script, ScriptBuilder};

use crate::engine::CompiledPattern;

/// Rank given to a `key:` line that does not name one.
pub const DEFAULT_RANK: u32 = 1;

/// Reserved catch-all keyword consulted when nothing else produced a reply.
pub const DEFAULT_KEY: &str = "xnone";

/// Last-resort reply when even the catch-all keyword fails.
pub const FALLBACK_REPLY: &str = "I am at a loss for words.";

// --- Internal types ---------------------------------------------------------

/// Index into `Script::keys`.
pub(crate) type KeyId = usize;

/// Corpus-wide decomposition index; sessions key their cursors by it.
pub(crate) type DecompId = usize;

/// Word-level substitution table used for the `pre:` and `post:` passes.
///
/// Insertion order is kept so a script prints back the way it was written.
#[derive(Debug, Clone, Default)]
pub(crate) struct Substitutions {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl Substitutions {
    /// Insert or overwrite the replacement for `word`.
    pub fn insert(&mut self, word: impl Into<String>, replacement: impl Into<String>) {
        let word = word.into();
        let replacement = replacement.into();
        match self.index.get(&word) {
            Some(&slot) => self.entries[slot].1 = replacement,
            None => {
                self.index.insert(word.clone(), self.entries.len());
                self.entries.push((word, replacement));
            }
        }
    }

    pub fn get(&self, word: &str) -> Option<&str> {
        self.index.get(word).map(|&slot| self.entries[slot].1.as_str())
    }

    /// Replace every whitespace-separated word found in the table.
    ///
    /// Words are re-joined with single spaces, so leading/trailing whitespace
    /// and runs of spaces collapse.
    pub fn apply(&self, text: &str) -> String {
        text.split_whitespace().map(|word| self.get(word).unwrap_or(word)).collect::<Vec<_>>().join(" ")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(word, replacement)| (word.as_str(), replacement.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A named group of interchangeable words. `words[0]` is the name itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SynonymSet {
    pub words: Vec<String>,
}

/// Synonym sets by name, in declaration order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Synonyms {
    sets: Vec<SynonymSet>,
    index: HashMap<String, usize>,
}

impl Synonyms {
    /// Register a set from its word list; the first word names the set.
    /// An empty list is ignored. A repeated name replaces the earlier set.
    pub fn insert(&mut self, words: Vec<String>) {
        let Some(name) = words.first().cloned() else {
            return;
        };
        let set = SynonymSet { words };
        match self.index.get(&name) {
            Some(&slot) => self.sets[slot] = set,
            None => {
                self.index.insert(name, self.sets.len());
                self.sets.push(set);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&SynonymSet> {
        self.index.get(name).map(|&slot| &self.sets[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SynonymSet> {
        self.sets.iter()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }
}

/// A trigger word with its rank and decomposition rules.
#[derive(Debug)]
pub(crate) struct Keyword {
    pub name: String,
    pub rank: u32,
    pub decompositions: Vec<Decomposition>,
}

/// A compiled decomposition pattern and the replies it can produce.
///
/// `reassemblies` is never empty; the builder rejects empty decompositions.
#[derive(Debug)]
pub(crate) struct Decomposition {
    pub id: DecompId,
    /// Pattern text as written in the script (without the `$ ` marker).
    pub source: String,
    pub pattern: CompiledPattern,
    /// Replies from a memorable decomposition go to the session memory
    /// instead of being returned.
    pub memorable: bool,
    pub reassemblies: Vec<Reassembly>,
}

impl Decomposition {
    /// True when every reassembly redirects to another keyword.
    pub fn is_redirect_only(&self) -> bool {
        self.reassemblies.iter().all(|r| matches!(r, Reassembly::Redirect { .. }))
    }

    pub fn redirect_targets(&self) -> impl Iterator<Item = KeyId> + '_ {
        self.reassemblies.iter().filter_map(|r| match r {
            Reassembly::Redirect { target, .. } => Some(*target),
            Reassembly::Reply(_) => None,
        })
    }
}

/// One candidate reply of a decomposition.
#[derive(Debug, Clone)]
pub(crate) enum Reassembly {
    Reply(Template),
    /// `goto <name>`: continue matching against another keyword.
    Redirect { target: KeyId, name: String },
}

impl Reassembly {
    /// Extract the keyword name from a `goto <name>` directive.
    pub fn parse_redirect(text: &str) -> Option<&str> {
        regex!(r"^goto (.*)$").captures(text).and_then(|caps| caps.get(1)).map(|m| m.as_str().trim())
    }
}

impl fmt::Display for Reassembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reassembly::Reply(template) => f.write_str(template.source()),
            Reassembly::Redirect { name, .. } => write!(f, "goto {name}"),
        }
    }
}

/// A reply template: literal text interleaved with `(n)` back-references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Template {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    /// Capture group number; `0` is the whole matched clause.
    Capture(usize),
}

impl Template {
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in regex!(r"\((\d)\)").captures_iter(source) {
            let (Some(whole), Some(digit)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last {
                segments.push(Segment::Text(source[last..whole.start()].to_string()));
            }
            // A single ASCII digit always parses.
            let group = digit.as_str().parse().unwrap_or(0);
            segments.push(Segment::Capture(group));
            last = whole.end();
        }
        if last < source.len() {
            segments.push(Segment::Text(source[last..].to_string()));
        }

        Template { source: source.to_string(), segments }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Highest group number referenced, if any.
    pub fn max_capture(&self) -> Option<usize> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Capture(group) => Some(*group),
                Segment::Text(_) => None,
            })
            .max()
    }

    /// Substitute captured fragments, each passed through `post` first.
    ///
    /// `captures[n]` is group `n`; groups that did not participate are empty.
    pub fn render(&self, captures: &[&str], post: &Substitutions) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Capture(group) => {
                    out.push_str(&post.apply(captures.get(*group).copied().unwrap_or("")));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod model_tests {
    use super::*;

    #[test]
    fn substitutions_map_words_and_pass_others_through() {
        let mut post = Substitutions::default();
        post.insert("my", "your");
        post.insert("i'm", "you are");

        assert_eq!(post.apply("  my dog"), "your dog");
        assert_eq!(post.apply("i'm   here"), "you are here");
        assert_eq!(post.apply(""), "");
    }

    #[test]
    fn substitutions_overwrite_keeps_position() {
        let mut pre = Substitutions::default();
        pre.insert("dont", "don't");
        pre.insert("cant", "can't");
        pre.insert("dont", "do not");

        let entries: Vec<_> = pre.iter().collect();
        assert_eq!(entries, vec![("dont", "do not"), ("cant", "can't")]);
    }

    #[test]
    fn synonym_set_is_named_by_first_word() {
        let mut synonyms = Synonyms::default();
        synonyms.insert(vec!["sad".into(), "unhappy".into()]);
        synonyms.insert(Vec::new());

        assert_eq!(synonyms.len(), 1);
        assert_eq!(synonyms.get("sad").map(|set| set.words.clone()), Some(vec!["sad".to_string(), "unhappy".to_string()]));
        assert!(synonyms.get("unhappy").is_none());
    }

    #[test]
    fn template_renders_back_references_through_post() {
        let mut post = Substitutions::default();
        post.insert("my", "your");

        let template = Template::parse("Do you often think of (2) ?");
        assert_eq!(template.max_capture(), Some(2));
        assert_eq!(template.render(&["", "x ", " my dog"], &post), "Do you often think of your dog ?");
    }

    #[test]
    fn template_without_references_is_literal() {
        let template = Template::parse("Please go on.");
        assert_eq!(template.max_capture(), None);
        assert_eq!(template.render(&[], &Substitutions::default()), "Please go on.");
    }

    #[test]
    fn missing_capture_renders_empty() {
        let template = Template::parse("[(3)]");
        assert_eq!(template.render(&["all"], &Substitutions::default()), "[]");
    }

    #[test]
    fn redirect_directive_is_recognised() {
        assert_eq!(Reassembly::parse_redirect("goto what"), Some("what"));
        assert_eq!(Reassembly::parse_redirect("Why goto there ?"), None);
    }
}
