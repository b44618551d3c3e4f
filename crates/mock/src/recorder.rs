use mimicry_core::{Invocation, MockId, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Global sequence counter. Gives invocations a total order across all
/// mocks so in-order verification can merge histories.
static GLOBAL_SEQ: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_seq() -> u64 {
    GLOBAL_SEQ.fetch_add(1, Ordering::SeqCst)
}

/// One log slot: the invocation plus its exhaustiveness bookkeeping.
#[derive(Debug, Clone)]
pub struct LoggedInvocation {
    pub invocation: Invocation,
    /// Set once any passing verify has covered this invocation; consumed by
    /// `verify_no_more_interactions`.
    pub verified: bool,
}

/// Append-only per-mock call log.
#[derive(Debug, Default)]
pub struct InvocationLog {
    entries: Vec<LoggedInvocation>,
}

impl InvocationLog {
    /// Append a call and return the recorded invocation. Never fails.
    pub fn record(&mut self, mock_id: MockId, method: &str, args: Vec<Value>) -> Invocation {
        let invocation = Invocation::new(next_seq(), mock_id, method, args);
        debug!(
            target: "mimicry::recorder",
            mock = %mock_id,
            seq = invocation.seq,
            call = %invocation.describe(),
            "recorded invocation"
        );
        self.entries.push(LoggedInvocation {
            invocation: invocation.clone(),
            verified: false,
        });
        invocation
    }

    pub fn entries(&self) -> &[LoggedInvocation] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [LoggedInvocation] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mark the given entry indices as covered by a passing verify.
    pub fn mark_verified(&mut self, indices: &[usize]) {
        for &idx in indices {
            if let Some(slot) = self.entries.get_mut(idx) {
                slot.verified = true;
            }
        }
    }

    /// Invocations no passing verify has covered yet.
    pub fn unverified(&self) -> impl Iterator<Item = &Invocation> {
        self.entries
            .iter()
            .filter(|slot| !slot.verified)
            .map(|slot| &slot.invocation)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order_with_increasing_seq() {
        let id = MockId::new();
        let mut log = InvocationLog::default();
        let a = log.record(id, "add", vec![Value::Int(1)]);
        let b = log.record(id, "add", vec![Value::Int(2)]);
        assert!(a.seq < b.seq);
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].invocation.describe(), "add(1)");
    }

    #[test]
    fn sequence_is_global_across_logs() {
        let mut first = InvocationLog::default();
        let mut second = InvocationLog::default();
        let a = first.record(MockId::new(), "x", vec![]);
        let b = second.record(MockId::new(), "y", vec![]);
        let c = first.record(MockId::new(), "z", vec![]);
        assert!(a.seq < b.seq && b.seq < c.seq);
    }

    #[test]
    fn clear_wipes_history_and_flags() {
        let id = MockId::new();
        let mut log = InvocationLog::default();
        log.record(id, "add", vec![Value::Int(1)]);
        log.mark_verified(&[0]);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.unverified().count(), 0);
    }

    #[test]
    fn unverified_tracks_marks() {
        let id = MockId::new();
        let mut log = InvocationLog::default();
        log.record(id, "add", vec![Value::Int(1)]);
        log.record(id, "add", vec![Value::Int(2)]);
        log.mark_verified(&[0]);
        let left: Vec<String> = log.unverified().map(|i| i.describe()).collect();
        assert_eq!(left, vec!["add(2)".to_string()]);
    }
}
