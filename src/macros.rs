/// Compile a regex literal once and hand out a `&'static Regex`.
///
/// Used for the fixed regexes of the script grammar and template syntax;
/// decomposition patterns come from script text and are compiled per script.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a `Script` from script-text lines, panicking if it is invalid.
///
/// ```text
/// script! {
///     "key: sorry",
///     "  decomp: *",
///     "    reasmb: Please don't apologise.",
/// }
/// ```
#[cfg(test)]
macro_rules! script {
    ($($line:expr),* $(,)?) => {{
        let text = [$($line),*].join("\n");
        match $crate::Script::parse(&text) {
            Ok(script) => script,
            Err(err) => panic!("test script is invalid: {err}"),
        }
    }};
}
