//! Round-robin reassembly selection.
//!
//! Every decomposition cycles through its reassemblies in declared order,
//! wrapping after the last one. The cursor for each decomposition lives here,
//! in a table owned by one session and indexed by `Decomposition::id`, so the
//! script itself stays immutable and can be shared between sessions.

use crate::{Decomposition, Reassembly};

#[derive(Debug, Clone, Default)]
pub(crate) struct Cursors {
    next: Vec<usize>,
}

impl Cursors {
    /// Cursor table for a script with `count` decompositions, all at the start.
    pub fn new(count: usize) -> Self {
        Cursors { next: vec![0; count] }
    }

    /// Return the decomposition's next reassembly and advance its cursor.
    pub fn select<'d>(&mut self, decomposition: &'d Decomposition) -> &'d Reassembly {
        if decomposition.id >= self.next.len() {
            self.next.resize(decomposition.id + 1, 0);
        }
        let len = decomposition.reassemblies.len();
        let slot = &mut self.next[decomposition.id];
        let chosen = &decomposition.reassemblies[*slot % len];
        *slot = (*slot + 1) % len;
        chosen
    }

    /// Rewind every cursor to the first reassembly.
    pub fn reset(&mut self) {
        self.next.iter_mut().for_each(|slot| *slot = 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_decomposition(script: &crate::Script) -> &Decomposition {
        &script.keys[0].decompositions[0]
    }

    #[test]
    fn cycles_in_declared_order() {
        let script = script! {
            "key: hello",
            "  decomp: *",
            "    reasmb: one",
            "    reasmb: two",
            "    reasmb: three",
        };
        let decomposition = key_decomposition(&script);
        let mut cursors = Cursors::new(script.decomposition_count);

        let picked: Vec<String> = (0..7).map(|_| cursors.select(decomposition).to_string()).collect();
        assert_eq!(picked, vec!["one", "two", "three", "one", "two", "three", "one"]);
    }

    #[test]
    fn reset_rewinds() {
        let script = script! {
            "key: hello",
            "  decomp: *",
            "    reasmb: one",
            "    reasmb: two",
        };
        let decomposition = key_decomposition(&script);
        let mut cursors = Cursors::new(script.decomposition_count);

        cursors.select(decomposition);
        cursors.reset();
        assert_eq!(cursors.select(decomposition).to_string(), "one");
    }

    #[test]
    fn separate_tables_do_not_interfere() {
        let script = script! {
            "key: hello",
            "  decomp: *",
            "    reasmb: one",
            "    reasmb: two",
        };
        let decomposition = key_decomposition(&script);
        let mut first = Cursors::new(script.decomposition_count);
        let mut second = Cursors::default();

        first.select(decomposition);
        assert_eq!(first.select(decomposition).to_string(), "two");
        assert_eq!(second.select(decomposition).to_string(), "one");
    }
}
