//! Decomposition pattern compiler.
//!
//! A decomposition pattern is literal words plus two kinds of capturing
//! tokens:
//!
//! - `*` matches any run of text (possibly empty). When the script shows
//!   whitespace next to the star, a word boundary is required on that side and
//!   the whitespace itself is absorbed into the wildcard:
//!
//!   ```text
//!   "* i remember *"  ->  ^(?:(.*)\bi remember\b(.*))$
//!   ```
//!
//! - `@name` matches exactly one member of the synonym set `name`:
//!
//!   ```text
//!   "* i am* @sad *"  ->  ^(?:(.*)\bi am(.*)\b(sad|unhappy|depressed|sick)\b(.*))$
//!   ```
//!
//! Capture groups are numbered in pattern order starting at 1, which is what
//! `(n)` in a reassembly template refers to. The whole regex is anchored: a
//! pattern must consume the entire clause.
//!
//! Literal text is escaped, so punctuation in a pattern is matched verbatim.

use crate::Synonyms;
use regex::Regex;

/// A compiled decomposition pattern.
#[derive(Debug, Clone)]
pub(crate) struct CompiledPattern {
    regex: Regex,
    groups: usize,
}

impl CompiledPattern {
    /// Compile `source`, expanding `@name` references from `synonyms`.
    ///
    /// References are checked before compilation (see `script/validate.rs`);
    /// an unknown set here degrades to matching the bare name.
    pub fn compile(source: &str, synonyms: &Synonyms) -> Result<Self, regex::Error> {
        let mut out = String::from("^(?:");
        let mut last = 0;

        for caps in regex!(r"(\s*)\*(\s*)|@(\w+)").captures_iter(source) {
            let Some(token) = caps.get(0) else {
                continue;
            };
            out.push_str(&regex::escape(&source[last..token.start()]));

            if let Some(name) = caps.get(3) {
                let alternatives = match synonyms.get(name.as_str()) {
                    Some(set) => set.words.iter().map(|w| regex::escape(w)).collect::<Vec<_>>().join("|"),
                    None => regex::escape(name.as_str()),
                };
                out.push('(');
                out.push_str(&alternatives);
                out.push(')');
            } else {
                let before = caps.get(1).is_some_and(|m| !m.is_empty());
                let after = caps.get(2).is_some_and(|m| !m.is_empty());
                if before {
                    out.push_str(r"\b");
                }
                out.push_str("(.*)");
                if after {
                    out.push_str(r"\b");
                }
            }

            last = token.end();
        }
        out.push_str(&regex::escape(&source[last..]));
        out.push_str(")$");

        let regex = Regex::new(&out)?;
        let groups = regex.captures_len() - 1;
        Ok(CompiledPattern { regex, groups })
    }

    /// Number of capture groups (wildcards plus synonym references).
    pub fn groups(&self) -> usize {
        self.groups
    }

    /// The generated regex, for traces.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Match the whole `clause`.
    ///
    /// On success returns `groups() + 1` fragments: index 0 is the whole
    /// clause, index `n` is group `n` (empty when it did not participate).
    pub fn captures<'t>(&self, clause: &'t str) -> Option<Vec<&'t str>> {
        let caps = self.regex.captures(clause)?;
        Some((0..caps.len()).map(|i| caps.get(i).map_or("", |m| m.as_str())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synonyms() -> Synonyms {
        let mut synonyms = Synonyms::default();
        synonyms.insert(["sad", "unhappy", "depressed", "sick"].map(String::from).to_vec());
        synonyms.insert(["family", "mother", "mom", "father", "dad"].map(String::from).to_vec());
        synonyms
    }

    fn compile(source: &str) -> CompiledPattern {
        CompiledPattern::compile(source, &synonyms()).unwrap()
    }

    #[test]
    fn star_with_spaces_becomes_bounded_wildcard() {
        let pattern = compile("* i remember *");
        assert_eq!(pattern.as_str(), r"^(?:(.*)\bi remember\b(.*))$");
        assert_eq!(pattern.groups(), 2);

        let caps = pattern.captures("well i remember my dog").unwrap();
        assert_eq!(caps[1], "well ");
        assert_eq!(caps[2], " my dog");
    }

    #[test]
    fn literal_gate_needs_word_boundaries() {
        let pattern = compile("* i remember *");
        assert!(pattern.captures("hi remember").is_none());
        assert!(pattern.captures("i rememberance").is_none());
        assert!(pattern.captures("i remember").is_some());
    }

    #[test]
    fn lone_star_matches_anything() {
        let pattern = compile("*");
        assert_eq!(pattern.as_str(), "^(?:(.*))$");
        assert_eq!(pattern.captures("").unwrap(), vec!["", ""]);
        assert_eq!(pattern.captures("12345").unwrap()[1], "12345");
    }

    #[test]
    fn synonym_reference_matches_any_member() {
        let pattern = compile("* @family *");
        let caps = pattern.captures("my mother is nice").unwrap();
        assert_eq!(caps[2], "mother");
        assert!(pattern.captures("my cat is nice").is_none());
    }

    #[test]
    fn glued_star_and_synonym() {
        let pattern = compile("* i am* @sad *");
        let caps = pattern.captures("i am sad").unwrap();
        assert_eq!(pattern.groups(), 4);
        assert_eq!(caps[1], "");
        assert_eq!(caps[3], "sad");

        let caps = pattern.captures("today i am very depressed indeed").unwrap();
        assert_eq!(caps[2], " very ");
        assert_eq!(caps[3], "depressed");
        assert_eq!(caps[4], " indeed");
    }

    #[test]
    fn pattern_must_consume_whole_clause() {
        let pattern = compile("hello");
        assert!(pattern.captures("hello").is_some());
        assert!(pattern.captures("hello there").is_none());
    }

    #[test]
    fn literal_punctuation_is_escaped() {
        let pattern = compile("a+b *");
        assert_eq!(pattern.groups(), 1);
        assert!(pattern.captures("a+b c").is_some());
        assert!(pattern.captures("aab c").is_none());
    }
}
