use mimicry_core::{ConfigResult, Invocation, NormalizedPattern, ProgrammedError, Value};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Computed answer: sees the full invocation, may itself raise.
pub type AnswerFn =
    Arc<dyn Fn(&Invocation) -> Result<Value, ProgrammedError> + Send + Sync>;

/// One programmed reaction to a matching call.
#[derive(Clone)]
pub enum Response {
    Return(Value),
    Raise(ProgrammedError),
    Answer(AnswerFn),
    /// Delegate to the real backing instance; a configuration error on a
    /// mock without one.
    CallReal,
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Return(v) => write!(f, "Return({v})"),
            Response::Raise(e) => write!(f, "Raise({e})"),
            Response::Answer(_) => write!(f, "Answer(..)"),
            Response::CallReal => write!(f, "CallReal"),
        }
    }
}

/// What an unstubbed call falls back to. Fixed per mock at creation time.
#[derive(Clone, Default)]
pub enum DefaultAnswer {
    /// The absence value of the method's declared return kind.
    #[default]
    Absence,
    /// A fixed value regardless of method.
    Fixed(Value),
    /// A computed answer.
    Answer(AnswerFn),
}

impl fmt::Debug for DefaultAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultAnswer::Absence => write!(f, "Absence"),
            DefaultAnswer::Fixed(v) => write!(f, "Fixed({v})"),
            DefaultAnswer::Answer(_) => write!(f, "Answer(..)"),
        }
    }
}

struct StubEntry {
    pattern: NormalizedPattern,
    queue: VecDeque<Response>,
}

/// Programmed responses for one mock.
///
/// Lookup is newest-registration-first among entries whose pattern accepts
/// the call, so a later registration on the same pattern overrides an
/// earlier one. Within an entry the response queue is consumed from the
/// front; the final response stays in place and repeats forever.
#[derive(Default)]
pub(crate) struct StubTable {
    entries: Vec<StubEntry>,
}

impl StubTable {
    pub fn register(&mut self, pattern: NormalizedPattern, responses: Vec<Response>) {
        debug!(
            target: "mimicry::stubs",
            pattern = %pattern.describe(),
            responses = responses.len(),
            "registered stub"
        );
        self.entries.push(StubEntry {
            pattern,
            queue: responses.into(),
        });
    }

    /// Resolve a response for a concrete call, or `None` when no entry
    /// matches and the mock's default-answer policy applies.
    pub fn resolve(&mut self, method: &str, args: &[Value]) -> ConfigResult<Option<Response>> {
        for entry in self.entries.iter_mut().rev() {
            if entry.pattern.accepts(method, args)? {
                let response = if entry.queue.len() > 1 {
                    entry.queue.pop_front()
                } else {
                    // Sticky last response
                    entry.queue.front().cloned()
                };
                return Ok(response);
            }
        }
        Ok(None)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
