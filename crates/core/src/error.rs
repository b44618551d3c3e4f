use crate::value::ValueKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mistakes in how the engine itself is used. Raised at stub/verify setup
/// time or when a call does not fit the declared capability set.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("method {method}: literal arguments mixed with matchers; use a matcher for every position")]
    MixedArgumentStyle { method: String },

    #[error("unknown method {method} on capability set {capability}")]
    UnknownMethod { capability: String, method: String },

    #[error("method {method}: expected {expected} argument(s), got {actual}")]
    ArityMismatch {
        method: String,
        expected: usize,
        actual: usize,
    },

    #[error("method {method}: argument {position} expects {expected}, got {got}")]
    ArgumentKind {
        method: String,
        position: usize,
        expected: ValueKind,
        got: String,
    },

    #[error("method {method}: predicate {label} failed: {detail}")]
    PredicateFailure {
        method: String,
        label: String,
        detail: String,
    },

    #[error("method {method}: programmed to call the real implementation, but no real instance is attached")]
    NoRealInstance { method: String },

    #[error("duplicate method {method} in capability set {capability}")]
    DuplicateMethod { capability: String, method: String },

    #[error("mock {mock} is not part of this in-order verification set")]
    ForeignMock { mock: String },

    #[error("invalid capability set: {detail}")]
    InvalidCapability { detail: String },
}

/// A stub-configured exception. Propagated to the caller exactly as
/// programmed; indistinguishable from a real failure at the call site.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ProgrammedError {
    pub message: String,
}

impl ProgrammedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A failed post-hoc expectation, with expected-vs-actual detail so a test
/// runner can report it without aborting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VerificationError {
    #[error("{pattern}: expected {expected} invocation(s), recorded {actual}")]
    CountMismatch {
        pattern: String,
        expected: String,
        actual: usize,
    },

    #[error("{pattern}: no matching invocation after sequence {cursor}")]
    OutOfOrder { pattern: String, cursor: u64 },

    #[error("mock {mock}: unverified interactions remain: {remaining:?}")]
    UnverifiedInteractions { mock: String, remaining: Vec<String> },

    #[error("mock {mock}: expected zero interactions, recorded {count}")]
    UnexpectedInteractions { mock: String, count: usize },
}

/// Top-level error surface of the engine.
#[derive(Error, Debug)]
pub enum MockError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("verification failure: {0}")]
    Verification(#[from] VerificationError),

    #[error("{0}")]
    Raised(#[from] ProgrammedError),
}

impl MockError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, MockError::Configuration(_))
    }

    pub fn is_verification(&self) -> bool {
        matches!(self, MockError::Verification(_))
    }

    pub fn is_raised(&self) -> bool {
        matches!(self, MockError::Raised(_))
    }
}

pub type Result<T> = std::result::Result<T, MockError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
