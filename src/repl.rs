//! Line-based conversation loop.
//!
//! ```text
//! greeting
//! > line ── empty? skip ── quit phrase? stop ── transform ── reply
//! > ...
//! farewell
//! ```
//!
//! End of input ends the conversation like a quit phrase does.

use crate::{Session, TransformDetails};
use rand::Rng;
use std::io::{self, BufRead, Write};

/// Run a conversation over `input`/`output` until a quit phrase or EOF.
pub fn repl<G, R, W>(session: &mut Session<'_>, rng: &mut G, input: R, output: W) -> io::Result<()>
where
    G: Rng + ?Sized,
    R: BufRead,
    W: Write,
{
    repl_with(session, rng, input, output, None)
}

/// Like [`repl`], but hands every transform's debug details to `inspect`.
pub fn repl_with<G, R, W>(
    session: &mut Session<'_>,
    rng: &mut G,
    input: R,
    mut output: W,
    mut inspect: Option<&mut dyn FnMut(&str, &TransformDetails)>,
) -> io::Result<()>
where
    G: Rng + ?Sized,
    R: BufRead,
    W: Write,
{
    let script = session.script();
    if let Some(greeting) = script.greeting(rng) {
        writeln!(output, "{greeting}")?;
    }

    let mut lines = input.lines();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if script.is_quit(line) {
            break;
        }

        let reply = match inspect.as_mut() {
            Some(inspect) => {
                let result = session.transform_verbose(line);
                inspect(line, &result.details);
                result.reply
            }
            None => session.transform(line),
        };
        writeln!(output, "{reply}")?;
    }

    if let Some(farewell) = script.farewell(rng) {
        writeln!(output, "{farewell}")?;
    }
    output.flush()
}
