use eliza::{Step, Strategy, TransformDetails};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

/// Print the trace of one transform to stderr, keeping stdout for the
/// conversation itself.
pub fn print_transform(input: &str, details: &TransformDetails, color: bool) {
    let palette = ansi::Palette::new(color);
    eprintln!("\n{}", palette.bold(palette.paint(format!("⚙  Transforming: \"{}\"", input), ansi::CYAN)));

    eprintln!("\n{}", palette.paint("━━━ Steps ━━━", ansi::GRAY));
    if details.steps.is_empty() {
        eprintln!("{}", palette.dim("  No clause or keyword was tried"));
    }
    for step in &details.steps {
        eprintln!("{}", fmt_step(step, &palette));
    }

    eprintln!("\n{}", palette.paint("━━━ Reply ━━━", ansi::GRAY));
    let strategy = match &details.strategy {
        Strategy::Keyword(_) => palette.paint(details.strategy.to_string(), ansi::GREEN),
        Strategy::Memory | Strategy::Default => palette.paint(details.strategy.to_string(), ansi::YELLOW),
        Strategy::Fallback => palette.paint(details.strategy.to_string(), ansi::MAGENTA),
    };
    eprintln!("  {} {}", palette.dim("from:"), strategy);
    if let Strategy::Fallback = details.strategy {
        eprintln!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        eprintln!("  • The script has no `xnone` key");
        eprintln!("  • A goto chain hit the redirect limit");
    }

    eprintln!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    eprintln!(
        "  Total: {}  │  Memory: {}",
        palette.paint(format!("{:?}", details.total), ansi::GREEN),
        palette.paint(format!("{} pending", details.memory_len), ansi::BLUE),
    );
    eprintln!();
}

fn fmt_step(step: &Step, palette: &ansi::Palette) -> String {
    match step {
        Step::Clause { text } => format!("  {} {}", palette.paint("clause:", ansi::BLUE), palette.bold(text)),
        Step::Keyword { name, rank } => format!(
            "    {} {} {}",
            palette.paint("key:", ansi::CYAN),
            palette.bold(name),
            palette.dim(format!("(rank {rank})"))
        ),
        Step::Decomposition { pattern, regex, matched, .. } => {
            let mark = if *matched { palette.paint("✓", ansi::GREEN) } else { palette.dim("✗") };
            format!("      {} {} {}", mark, pattern, palette.dim(format!("│ {regex}")))
        }
        Step::Reassembly { template, .. } => {
            format!("        {} {}", palette.paint("reasmb:", ansi::YELLOW), template)
        }
        Step::Redirect { from, to } => {
            format!("        {} {} → {}", palette.paint("goto:", ansi::MAGENTA), from, palette.bold(to))
        }
        Step::RedirectLimit { keyword } => {
            format!("        {} {}", palette.paint("goto limit reached at", ansi::MAGENTA), keyword)
        }
        Step::Remembered { reply } => format!("        {} {}", palette.paint("saved to memory:", ansi::GRAY), reply),
        Step::Recalled { reply } => format!("  {} {}", palette.paint("from memory:", ansi::GRAY), reply),
    }
}
