use crate::engine::{Cursors, Memory, Transformer};
use crate::Script;
use std::time::Duration;

pub use crate::engine::{Step, Strategy};

/// Options that affect how a session transforms input.
#[derive(Debug, Clone)]
pub struct Options {
    /// Maximum number of `goto` hops followed for one keyword before it is
    /// treated as not matching.
    pub max_redirects: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options { max_redirects: 16 }
    }
}

/// Result from [`Session::transform_verbose`].
#[derive(Debug, Clone)]
pub struct TransformResult {
    /// The raw input line.
    pub text: String,
    /// The chosen reply; identical to what [`Session::transform`] returns.
    pub reply: String,
    pub details: TransformDetails,
}

/// Debug details of one transform.
///
/// This is meant for tracing rule behaviour: which clauses and keywords were
/// tried, which patterns matched and which reassemblies were used.
#[derive(Debug, Clone)]
pub struct TransformDetails {
    /// Total elapsed time.
    pub total: Duration,
    /// Stage of the fallback order that produced the reply.
    pub strategy: Strategy,
    /// Everything tried, in order.
    pub steps: Vec<Step>,
    /// Replies still waiting in memory after this transform.
    pub memory_len: usize,
}

/// One conversation over a shared [`Script`].
///
/// The session owns the mutable state: the round-robin position of every
/// decomposition and the queue of deferred replies. Sessions over the same
/// script do not affect each other.
///
/// # Example
/// ```
/// use eliza::{Script, Session};
///
/// let mut session = Session::new(Script::doctor());
/// assert_eq!(session.transform("I am sad"), "I am sorry to hear that you are sad.");
/// ```
#[derive(Debug, Clone)]
pub struct Session<'s> {
    script: &'s Script,
    options: Options,
    cursors: Cursors,
    memory: Memory,
}

impl<'s> Session<'s> {
    /// Start a session with default [`Options`].
    pub fn new(script: &'s Script) -> Self {
        Self::with_options(script, Options::default())
    }

    pub fn with_options(script: &'s Script, options: Options) -> Self {
        Session { script, options, cursors: Cursors::new(script.decomposition_count), memory: Memory::default() }
    }

    pub fn script(&self) -> &'s Script {
        self.script
    }

    /// Produce the reply to one line of user input. Always returns a reply.
    pub fn transform(&mut self, input: &str) -> String {
        self.transformer().run(input).reply
    }

    /// Like [`transform`](Self::transform), but also returns a step-by-step
    /// trace of the run. The reply is the same either way.
    pub fn transform_verbose(&mut self, input: &str) -> TransformResult {
        let run = self.transformer().traced().run(input);
        let details = TransformDetails {
            total: run.elapsed,
            strategy: run.strategy,
            steps: run.steps,
            memory_len: self.memory.len(),
        };

        TransformResult { text: input.to_string(), reply: run.reply, details }
    }

    /// Number of deferred replies waiting to be used.
    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    /// Forget deferred replies and rewind every reassembly cursor, as if the
    /// session had just started.
    pub fn reset(&mut self) {
        self.cursors.reset();
        self.memory.clear();
    }

    fn transformer(&mut self) -> Transformer<'_> {
        Transformer::new(self.script, &mut self.cursors, &mut self.memory, self.options.max_redirects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_and_plain_replies_agree() {
        let script = Script::doctor();
        let mut plain = Session::new(script);
        let mut verbose = Session::new(script);

        for input in ["I am sad", "my dog is old", "hello, computer", "12345", "", "why don't you listen"] {
            let result = verbose.transform_verbose(input);
            assert_eq!(result.text, input);
            assert_eq!(result.reply, plain.transform(input));
        }
    }

    #[test]
    fn verbose_reports_strategy_and_memory() {
        let mut session = Session::new(Script::doctor());

        let result = session.transform_verbose("my car is red. hello");
        assert_eq!(result.details.strategy, Strategy::Keyword("hello".into()));
        assert_eq!(result.details.memory_len, 1);
        assert!(result.details.steps.contains(&Step::Clause { text: "my car is red".into() }));

        let result = session.transform_verbose("12345");
        assert_eq!(result.details.strategy, Strategy::Memory);
        assert_eq!(result.details.memory_len, 0);
    }

    #[test]
    fn sessions_share_one_script_across_threads() {
        let script = Script::doctor();
        let replies: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> =
                (0..4).map(|_| scope.spawn(move || Session::new(script).transform("I am sad"))).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(replies.iter().all(|r| r == "I am sorry to hear that you are sad."));
    }

    #[test]
    fn cloned_session_continues_independently() {
        let mut session = Session::new(Script::doctor());
        session.transform("I am sad");

        let mut fork = session.clone();
        assert_eq!(fork.transform("I am sad"), session.transform("I am sad"));
        assert_eq!(fork.transform("I am sad"), "I'm sure it's not pleasant to be sad.");
    }

    #[test]
    fn reset_starts_over() {
        let mut session = Session::new(Script::doctor());
        let first = session.transform("I am sad");
        session.transform("my car is red. hello");
        assert_eq!(session.memory_len(), 1);

        session.reset();
        assert_eq!(session.memory_len(), 0);
        assert_eq!(session.transform("I am sad"), first);
    }
}
