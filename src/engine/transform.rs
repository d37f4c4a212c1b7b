//! The transform: one input line in, one reply out.
//!
//! This is the operational core of the engine. It never fails: every "no
//! match" is ordinary control flow that falls through to the next strategy.
//!
//! ## Strategy order
//!
//! ```text
//! preprocess ─> for each clause:
//!                 for each keyword (rank desc):
//!                   decompose ─┬─ Reply      -> return
//!                              ├─ Redirect   -> decompose target (bounded)
//!                              ├─ Deferred   -> reply queued, next keyword
//!                              └─ NoMatch    -> next keyword
//!            ─> memory (oldest first)
//!            ─> xnone against the whole preprocessed input
//!            ─> FALLBACK_REPLY
//! ```
//!
//! ## Goto chains
//!
//! Cycles made purely of redirect-only decompositions are rejected when the
//! script is built. Chains that still run long (possible with mixed
//! reassemblies) are cut after `max_redirects` hops; the keyword is then
//! treated as not matching.

use super::memory::Memory;
use super::scan::{clauses, preprocess, rank_keywords};
use super::select::Cursors;
use super::trace::{RunResult, Step, Strategy};
use crate::{DEFAULT_KEY, Decomposition, FALLBACK_REPLY, KeyId, Keyword, Reassembly, Script};
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Result of trying one keyword's decompositions.
enum Outcome {
    NoMatch,
    Redirect(KeyId),
    /// The reply went to memory; keep looking.
    Deferred,
    Reply(String),
}

/// A single transform run over a script and a session's mutable state.
///
/// Usage: `Transformer::new(..)`, optionally `.traced()`, then `run(input)`.
pub(crate) struct Transformer<'a> {
    script: &'a Script,
    cursors: &'a mut Cursors,
    memory: &'a mut Memory,
    max_redirects: usize,
    /// Steps recorded so far; `None` when tracing is off.
    steps: Option<Vec<Step>>,
}

impl<'a> Transformer<'a> {
    pub fn new(script: &'a Script, cursors: &'a mut Cursors, memory: &'a mut Memory, max_redirects: usize) -> Self {
        Transformer { script, cursors, memory, max_redirects, steps: None }
    }

    /// Record a step-by-step trace of the run.
    pub fn traced(mut self) -> Self {
        self.steps = Some(Vec::new());
        self
    }

    pub fn run(mut self, input: &str) -> RunResult {
        let start = Instant::now();
        let text = preprocess(input, &self.script.pre);
        debug!(input, preprocessed = %text, "transforming input");

        let (reply, strategy) = self.respond(&text);
        debug!(%reply, %strategy, "transform finished");

        RunResult { reply, strategy, steps: self.steps.unwrap_or_default(), elapsed: start.elapsed() }
    }

    fn respond(&mut self, text: &str) -> (String, Strategy) {
        for clause in clauses(text) {
            self.note(|| Step::Clause { text: clause.to_string() });
            debug!(clause, "trying clause");

            if let Some((id, reply)) = self.transform_clause(clause) {
                return (reply, Strategy::Keyword(self.script.keys[id].name.clone()));
            }
        }

        if let Some(reply) = self.memory.recall() {
            debug!(%reply, "answering from memory");
            self.note(|| Step::Recalled { reply: reply.clone() });
            return (reply, Strategy::Memory);
        }

        if let Some(id) = self.script.key_id(DEFAULT_KEY) {
            if let Some((_, reply)) = self.chase(id, text) {
                return (reply, Strategy::Default);
            }
        }

        (FALLBACK_REPLY.to_string(), Strategy::Fallback)
    }

    /// Try every keyword of `clause` in rank order; first immediate reply wins.
    fn transform_clause(&mut self, clause: &str) -> Option<(KeyId, String)> {
        for id in rank_keywords(self.script, clause) {
            if let Some(found) = self.chase(id, clause) {
                return Some(found);
            }
        }
        None
    }

    /// Decompose with `id`, following redirects until a reply or a dead end.
    fn chase(&mut self, mut id: KeyId, clause: &str) -> Option<(KeyId, String)> {
        let script = self.script;
        let mut hops = 0;

        loop {
            match self.decompose(&script.keys[id], clause) {
                Outcome::Reply(reply) => return Some((id, reply)),
                Outcome::Redirect(target) => {
                    hops += 1;
                    if hops > self.max_redirects {
                        warn!(keyword = %script.keys[id].name, hops, "goto chain too long, giving up");
                        self.note(|| Step::RedirectLimit { keyword: script.keys[id].name.clone() });
                        return None;
                    }
                    debug!(from = %script.keys[id].name, to = %script.keys[target].name, "following goto");
                    self.note(|| Step::Redirect {
                        from: script.keys[id].name.clone(),
                        to: script.keys[target].name.clone(),
                    });
                    id = target;
                }
                Outcome::Deferred | Outcome::NoMatch => return None,
            }
        }
    }

    /// Try `key`'s decompositions in order against `clause`.
    fn decompose(&mut self, key: &'a Keyword, clause: &str) -> Outcome {
        debug!(keyword = %key.name, rank = key.rank, "trying keyword");
        self.note(|| Step::Keyword { name: key.name.clone(), rank: key.rank });

        for decomposition in &key.decompositions {
            let captures = decomposition.pattern.captures(clause);
            trace!(
                pattern = %decomposition.source,
                regex = decomposition.pattern.as_str(),
                matched = captures.is_some(),
                "tried decomposition"
            );
            self.note(|| Step::Decomposition {
                keyword: key.name.clone(),
                pattern: decomposition.source.clone(),
                regex: decomposition.pattern.as_str().to_string(),
                matched: captures.is_some(),
            });

            if let Some(captures) = captures {
                return self.assemble(key, decomposition, &captures);
            }
        }

        Outcome::NoMatch
    }

    fn assemble(&mut self, key: &'a Keyword, decomposition: &'a Decomposition, captures: &[&str]) -> Outcome {
        let reassembly = self.cursors.select(decomposition);
        debug!(keyword = %key.name, reassembly = %reassembly, "using reassembly");
        self.note(|| Step::Reassembly { keyword: key.name.clone(), template: reassembly.to_string() });

        match reassembly {
            Reassembly::Redirect { target, .. } => Outcome::Redirect(*target),
            Reassembly::Reply(template) => {
                let reply = template.render(captures, &self.script.post);
                if decomposition.memorable {
                    debug!(%reply, "saving reply to memory");
                    self.note(|| Step::Remembered { reply: reply.clone() });
                    self.memory.remember(reply);
                    Outcome::Deferred
                } else {
                    Outcome::Reply(reply)
                }
            }
        }
    }

    fn note(&mut self, step: impl FnOnce() -> Step) {
        if let Some(steps) = &mut self.steps {
            steps.push(step());
        }
    }
}
