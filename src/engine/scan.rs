//! Input normalisation and keyword scanning.
//!
//! Before any pattern is tried, the raw input goes through a fixed pipeline:
//!
//! ```text
//! "I'm sad, really!"
//!   lowercase            -> "i'm sad, really!"
//!   pre substitutions    -> "i am sad, really!"
//!   ? ! ,  ->  .         -> "i am sad. really."
//!   clauses              -> ["i am sad", "really"]
//! ```
//!
//! Each clause is then scanned for words that name a keyword. Candidates are
//! ordered by rank (highest first); keywords of equal rank keep the order in
//! which they appear in the clause.

use crate::{KeyId, Script, Substitutions};
use std::collections::HashSet;

/// Lowercase `input`, apply the `pre` table and turn `?`, `!` and `,` into
/// clause separators.
pub(crate) fn preprocess(input: &str, pre: &Substitutions) -> String {
    pre.apply(&input.to_lowercase()).replace(['?', '!', ','], ".")
}

/// Split preprocessed text into trimmed, non-empty clauses, in order.
pub(crate) fn clauses(text: &str) -> impl Iterator<Item = &str> {
    text.split('.').map(str::trim).filter(|clause| !clause.is_empty())
}

/// Keywords mentioned in `clause`, highest rank first.
///
/// A keyword mentioned twice is tried once, at its first position.
pub(crate) fn rank_keywords(script: &Script, clause: &str) -> Vec<KeyId> {
    let mut seen = HashSet::new();
    let mut found: Vec<KeyId> =
        clause.split_whitespace().filter_map(|word| script.key_id(word)).filter(|id| seen.insert(*id)).collect();

    // `sort_by` is stable: equal ranks stay in encounter order.
    found.sort_by(|a, b| script.keys[*b].rank.cmp(&script.keys[*a].rank));
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preprocess_lowercases_substitutes_and_normalises_punctuation() {
        let mut pre = Substitutions::default();
        pre.insert("i'm", "i am");
        pre.insert("dreamt", "dreamed");

        assert_eq!(preprocess("I'm sad, I DREAMT it!", &pre), "i am sad. i dreamed it.");
        assert_eq!(preprocess("What?", &pre), "what.");
    }

    #[test]
    fn clauses_skip_empty_pieces() {
        let got: Vec<_> = clauses("hello.. i am sad. ").collect();
        assert_eq!(got, vec!["hello", "i am sad"]);
        assert_eq!(clauses("...").count(), 0);
        assert_eq!(clauses("").count(), 0);
    }

    #[test]
    fn keywords_sorted_by_rank_with_stable_ties() {
        let script = script! {
            "key: low",
            "  decomp: *",
            "    reasmb: low",
            "key: high 50",
            "  decomp: *",
            "    reasmb: high",
            "key: other",
            "  decomp: *",
            "    reasmb: other",
        };
        let names = |clause: &str| -> Vec<String> {
            rank_keywords(&script, clause).into_iter().map(|id| script.keys[id].name.clone()).collect()
        };

        assert_eq!(names("other low high"), vec!["high", "other", "low"]);
        assert_eq!(names("low other low"), vec!["low", "other"]);
        assert!(names("nothing here").is_empty());
    }
}
