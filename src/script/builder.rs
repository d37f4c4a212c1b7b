//! Programmatic script construction.
//!
//! `ScriptBuilder` collects raw rules (plain strings, nothing compiled yet).
//! `build` turns them into a `Script` in one pass:
//!
//! ```text
//! raw rules ── check_references ── compile patterns ── resolve reassemblies ── check_redirect_cycles
//!               (validate.rs)       (engine/pattern.rs)  (templates, goto ids)   (validate.rs)
//! ```
//!
//! The builder is consumed by `build`; there is no way to observe a
//! half-validated script.

use super::Script;
use super::validate::{check_redirect_cycles, check_references};
use crate::engine::CompiledPattern;
use crate::{DEFAULT_RANK, Decomposition, KeyId, Keyword, Reassembly, ScriptError, Substitutions, Synonyms, Template};
use std::collections::HashMap;
use tracing::debug;

/// A keyword and its decomposition rules, before compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRule {
    pub name: String,
    pub rank: u32,
    pub decompositions: Vec<DecompRule>,
}

impl KeyRule {
    pub fn new(name: impl Into<String>) -> Self {
        KeyRule { name: name.into(), rank: DEFAULT_RANK, decompositions: Vec::new() }
    }

    pub fn rank(mut self, rank: u32) -> Self {
        self.rank = rank;
        self
    }

    pub fn decomposition(mut self, decomposition: DecompRule) -> Self {
        self.decompositions.push(decomposition);
        self
    }
}

/// A decomposition pattern and its reassembly texts, before compilation.
///
/// Reassembly texts are either reply templates with `(n)` back-references or
/// `goto <key>` redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompRule {
    pub pattern: String,
    pub memorable: bool,
    pub reassemblies: Vec<String>,
}

impl DecompRule {
    pub fn new(pattern: impl Into<String>) -> Self {
        DecompRule { pattern: pattern.into(), memorable: false, reassemblies: Vec::new() }
    }

    /// Defer replies to the session memory instead of returning them.
    pub fn memorable(mut self) -> Self {
        self.memorable = true;
        self
    }

    pub fn reassembly(mut self, text: impl Into<String>) -> Self {
        self.reassemblies.push(text.into());
        self
    }
}

/// Collects script parts and validates them into a [`Script`].
#[derive(Debug, Default)]
pub struct ScriptBuilder {
    initial: Vec<String>,
    farewells: Vec<String>,
    quit: Vec<String>,
    pre: Substitutions,
    post: Substitutions,
    synonyms: Synonyms,
    keys: Vec<KeyRule>,
    /// Position of each keyword in `keys`; becomes its `KeyId`.
    key_slots: HashMap<String, KeyId>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial(&mut self, text: impl Into<String>) -> &mut Self {
        self.initial.push(text.into());
        self
    }

    pub fn farewell(&mut self, text: impl Into<String>) -> &mut Self {
        self.farewells.push(text.into());
        self
    }

    pub fn quit(&mut self, text: impl Into<String>) -> &mut Self {
        self.quit.push(text.into());
        self
    }

    /// Input-side substitution, applied before matching.
    pub fn pre(&mut self, word: impl Into<String>, replacement: impl Into<String>) -> &mut Self {
        self.pre.insert(word, replacement);
        self
    }

    /// Capture-side substitution, applied to fragments placed in replies.
    pub fn post(&mut self, word: impl Into<String>, replacement: impl Into<String>) -> &mut Self {
        self.post.insert(word, replacement);
        self
    }

    /// Add a synonym set; the first word names it (`@name` in patterns).
    pub fn synonyms<I, S>(&mut self, words: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms.insert(words.into_iter().map(Into::into).collect());
        self
    }

    /// Add a keyword. A keyword with the same name replaces the earlier one
    /// in place.
    pub fn keyword(&mut self, rule: KeyRule) -> &mut Self {
        match self.key_slots.get(&rule.name) {
            Some(&slot) => self.keys[slot] = rule,
            None => {
                self.key_slots.insert(rule.name.clone(), self.keys.len());
                self.keys.push(rule);
            }
        }
        self
    }

    /// Validate and compile everything into an immutable [`Script`].
    pub fn build(self) -> Result<Script, ScriptError> {
        let ScriptBuilder { initial, farewells, quit, pre, post, synonyms, keys: rules, key_slots: key_index } = self;

        check_references(&rules, &synonyms, &key_index)?;

        let mut next_id = 0;
        let mut keys = Vec::with_capacity(rules.len());
        for rule in rules {
            let mut decompositions = Vec::with_capacity(rule.decompositions.len());
            for raw in rule.decompositions {
                let pattern = CompiledPattern::compile(&raw.pattern, &synonyms).map_err(|source| {
                    ScriptError::Pattern { keyword: rule.name.clone(), pattern: raw.pattern.clone(), source }
                })?;
                let reassemblies = raw
                    .reassemblies
                    .iter()
                    .map(|text| resolve_reassembly(text, &rule.name, &raw.pattern, &pattern, &key_index))
                    .collect::<Result<Vec<_>, _>>()?;

                decompositions.push(Decomposition {
                    id: next_id,
                    source: raw.pattern,
                    pattern,
                    memorable: raw.memorable,
                    reassemblies,
                });
                next_id += 1;
            }
            keys.push(Keyword { name: rule.name, rank: rule.rank, decompositions });
        }

        check_redirect_cycles(&keys)?;

        debug!(
            keys = keys.len(),
            decompositions = next_id,
            synonyms = synonyms.len(),
            pre = pre.len(),
            post = post.len(),
            "script built"
        );

        Ok(Script {
            initial,
            farewells,
            quit,
            pre,
            post,
            synonyms,
            keys,
            key_index,
            decomposition_count: next_id,
        })
    }
}

fn resolve_reassembly(
    text: &str,
    keyword: &str,
    pattern_source: &str,
    pattern: &CompiledPattern,
    key_index: &HashMap<String, KeyId>,
) -> Result<Reassembly, ScriptError> {
    if let Some(name) = Reassembly::parse_redirect(text) {
        let target = key_index
            .get(name)
            .copied()
            .ok_or_else(|| ScriptError::UnknownKey { keyword: keyword.to_string(), target: name.to_string() })?;
        return Ok(Reassembly::Redirect { target, name: name.to_string() });
    }

    let template = Template::parse(text);
    if let Some(index) = template.max_capture().filter(|&index| index > pattern.groups()) {
        return Err(ScriptError::BackReference {
            keyword: keyword.to_string(),
            pattern: pattern_source.to_string(),
            template: text.to_string(),
            index,
            groups: pattern.groups(),
        });
    }
    Ok(Reassembly::Reply(template))
}
