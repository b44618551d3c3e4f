use crate::value::Value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of one mock instance. Every recorded invocation is attributed
/// to exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MockId(pub Uuid);

impl MockId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short prefix is enough to tell mocks apart in logs
        let s = self.0.to_string();
        write!(f, "{}", &s[..8])
    }
}

/// One intercepted call. Immutable once recorded; retained until the
/// owning mock is reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invocation {
    /// Position in the global call order, shared across all mocks.
    pub seq: u64,
    pub mock_id: MockId,
    pub method: String,
    pub args: Vec<Value>,
    pub recorded_at: DateTime<Utc>,
}

impl Invocation {
    pub fn new(seq: u64, mock_id: MockId, method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            seq,
            mock_id,
            method: method.into(),
            args,
            recorded_at: Utc::now(),
        }
    }

    /// Compact `method(arg, ...)` rendering for diagnostics.
    pub fn describe(&self) -> String {
        let args: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
        format!("{}({})", self.method, args.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_renders_method_and_args() {
        let inv = Invocation::new(1, MockId::new(), "add", vec![Value::Int(1), Value::Str("x".into())]);
        assert_eq!(inv.describe(), "add(1, \"x\")");
    }

    #[test]
    fn mock_ids_are_distinct() {
        assert_ne!(MockId::new(), MockId::new());
    }
}
