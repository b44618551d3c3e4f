use mimicry_core::{ArgPattern, CaptureSlot, Matcher, Value, ValueKind};
use parking_lot::Mutex;
use std::sync::Arc;

/// Captures arguments accepted during verification (or stub resolution)
/// for later assertions.
///
/// The captor hands out pattern positions via [`ArgCaptor::capture`]; every
/// invocation the surrounding pattern accepts appends that position's
/// argument to the captor, oldest first.
#[derive(Clone, Default)]
pub struct ArgCaptor {
    slot: CaptureSlot,
}

impl ArgCaptor {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A pattern position capturing any value.
    pub fn capture(&self) -> ArgPattern {
        ArgPattern::Matcher(Matcher::Capture {
            slot: self.slot.clone(),
            inner: Box::new(Matcher::Any(None)),
        })
    }

    /// A pattern position capturing values of the given kind only.
    pub fn capture_of(&self, kind: ValueKind) -> ArgPattern {
        ArgPattern::Matcher(Matcher::Capture {
            slot: self.slot.clone(),
            inner: Box::new(Matcher::Any(Some(kind))),
        })
    }

    /// All captured values, oldest first.
    pub fn values(&self) -> Vec<Value> {
        self.slot.lock().clone()
    }

    /// The most recently captured value.
    pub fn last(&self) -> Option<Value> {
        self.slot.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.slot.lock().clear();
    }
}
