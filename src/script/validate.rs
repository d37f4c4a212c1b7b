//! Script validation.
//!
//! Two passes, both fatal on failure:
//!
//! - `check_references` runs on the raw rules: every `@name` must name a
//!   synonym set, every `goto <key>` (as a reassembly, or as a whole pattern)
//!   must name a keyword, and no decomposition may be without reassemblies.
//! - `check_redirect_cycles` runs on the compiled keys. A decomposition whose
//!   reassemblies are all redirects can never produce text by itself, so a
//!   cycle through such decompositions could bounce between keywords forever.
//!
//! ```text
//! apologise --goto--> sorry            ok
//! a --goto--> b --goto--> a            RedirectCycle [a, b, a]
//! a --goto--> a                        RedirectCycle [a, a]
//! ```
//!
//! Decompositions that mix replies and redirects are not edges: round-robin
//! selection guarantees they eventually reply.

use super::builder::KeyRule;
use crate::{KeyId, Keyword, Reassembly, ScriptError, Synonyms};
use std::collections::HashMap;

pub(super) fn check_references(
    rules: &[KeyRule],
    synonyms: &Synonyms,
    key_index: &HashMap<String, KeyId>,
) -> Result<(), ScriptError> {
    let goto_target = |keyword: &str, text: &str| -> Result<(), ScriptError> {
        match Reassembly::parse_redirect(text) {
            Some(target) if !key_index.contains_key(target) => {
                Err(ScriptError::UnknownKey { keyword: keyword.to_string(), target: target.to_string() })
            }
            _ => Ok(()),
        }
    };

    for rule in rules {
        for decomposition in &rule.decompositions {
            for caps in regex!(r"@(\w+)").captures_iter(&decomposition.pattern) {
                let Some(name) = caps.get(1) else {
                    continue;
                };
                if synonyms.get(name.as_str()).is_none() {
                    return Err(ScriptError::UnknownSynonym {
                        keyword: rule.name.clone(),
                        pattern: decomposition.pattern.clone(),
                        name: name.as_str().to_string(),
                    });
                }
            }

            goto_target(&rule.name, &decomposition.pattern)?;

            if decomposition.reassemblies.is_empty() {
                return Err(ScriptError::EmptyDecomposition {
                    keyword: rule.name.clone(),
                    pattern: decomposition.pattern.clone(),
                });
            }
            for text in &decomposition.reassemblies {
                goto_target(&rule.name, text)?;
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

pub(super) fn check_redirect_cycles(keys: &[Keyword]) -> Result<(), ScriptError> {
    let edges: Vec<Vec<KeyId>> = keys
        .iter()
        .map(|key| {
            key.decompositions.iter().filter(|d| d.is_redirect_only()).flat_map(|d| d.redirect_targets()).collect()
        })
        .collect();

    let mut marks = vec![Mark::Unvisited; keys.len()];
    for root in 0..keys.len() {
        if let Err(cycle) = visit(root, &edges, &mut marks) {
            return Err(ScriptError::RedirectCycle {
                path: cycle.into_iter().map(|id| keys[id].name.clone()).collect(),
            });
        }
    }
    Ok(())
}

/// Depth-first search from `root` with an explicit stack of
/// `(key, next edge)` frames; the stack doubles as the current path.
/// On a back edge returns the cycle, first node repeated at the end.
fn visit(root: KeyId, edges: &[Vec<KeyId>], marks: &mut [Mark]) -> Result<(), Vec<KeyId>> {
    if marks[root] != Mark::Unvisited {
        return Ok(());
    }
    marks[root] = Mark::OnPath;
    let mut stack: Vec<(KeyId, usize)> = vec![(root, 0)];

    while let Some(frame) = stack.last_mut() {
        let (id, edge) = *frame;
        let Some(&next) = edges[id].get(edge) else {
            marks[id] = Mark::Done;
            stack.pop();
            continue;
        };
        frame.1 += 1;

        match marks[next] {
            Mark::Done => {}
            Mark::OnPath => {
                let start = stack.iter().position(|&(p, _)| p == next).unwrap_or(0);
                let mut cycle: Vec<KeyId> = stack[start..].iter().map(|&(p, _)| p).collect();
                cycle.push(next);
                return Err(cycle);
            }
            Mark::Unvisited => {
                marks[next] = Mark::OnPath;
                stack.push((next, 0));
            }
        }
    }
    Ok(())
}
