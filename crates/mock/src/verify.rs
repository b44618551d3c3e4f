use crate::mock::Mock;
use crate::recorder::InvocationLog;
use mimicry_core::{
    CallPattern, ConfigError, ConfigResult, NormalizedPattern, Result, VerificationError,
};
use std::fmt;
use tracing::{debug, warn};

/// Call-count constraint for verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Times {
    Exact(usize),
    AtLeast(usize),
    AtMost(usize),
    Never,
}

pub fn times(n: usize) -> Times {
    Times::Exact(n)
}

pub fn once() -> Times {
    Times::Exact(1)
}

pub fn at_least(n: usize) -> Times {
    Times::AtLeast(n)
}

pub fn at_least_once() -> Times {
    Times::AtLeast(1)
}

pub fn at_most(n: usize) -> Times {
    Times::AtMost(n)
}

pub fn never() -> Times {
    Times::Never
}

impl Times {
    pub fn satisfied_by(&self, count: usize) -> bool {
        match self {
            Times::Exact(n) => count == *n,
            Times::AtLeast(n) => count >= *n,
            Times::AtMost(n) => count <= *n,
            Times::Never => count == 0,
        }
    }
}

impl fmt::Display for Times {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Times::Exact(n) => write!(f, "exactly {n}"),
            Times::AtLeast(n) => write!(f, "at least {n}"),
            Times::AtMost(n) => write!(f, "at most {n}"),
            Times::Never => write!(f, "no"),
        }
    }
}

/// Count invocations matching `pattern`, compare against `times`, and on
/// success mark the matched invocations verified.
pub(crate) fn verify_count(
    log: &mut InvocationLog,
    pattern: &NormalizedPattern,
    times: Times,
) -> Result<()> {
    let mut matched = Vec::new();
    for (idx, slot) in log.entries().iter().enumerate() {
        if pattern.accepts(&slot.invocation.method, &slot.invocation.args)? {
            matched.push(idx);
        }
    }
    if !times.satisfied_by(matched.len()) {
        warn!(
            target: "mimicry::verify",
            pattern = %pattern.describe(),
            expected = %times,
            actual = matched.len(),
            "count verification failed"
        );
        return Err(VerificationError::CountMismatch {
            pattern: pattern.describe(),
            expected: times.to_string(),
            actual: matched.len(),
        }
        .into());
    }
    debug!(
        target: "mimicry::verify",
        pattern = %pattern.describe(),
        matched = matched.len(),
        "count verification passed"
    );
    log.mark_verified(&matched);
    Ok(())
}

/// Find the first invocation strictly after `cursor` that `pattern`
/// accepts, mark it verified, and return its sequence number.
pub(crate) fn first_match_after(
    log: &mut InvocationLog,
    cursor: u64,
    pattern: &NormalizedPattern,
) -> ConfigResult<Option<u64>> {
    for slot in log.entries_mut() {
        if slot.invocation.seq > cursor
            && pattern.accepts(&slot.invocation.method, &slot.invocation.args)?
        {
            slot.verified = true;
            return Ok(Some(slot.invocation.seq));
        }
    }
    Ok(None)
}

/// Shared cursor over the merged, globally sequenced history of a set of
/// mocks. Each verify must match at or after the cursor and advances it
/// past the matched invocation; verifying against the true interleaving in
/// any other order fails.
pub struct InOrder {
    mocks: Vec<Mock>,
    cursor: u64,
}

/// Begin ordered verification across the given mocks.
pub fn in_order(mocks: &[&Mock]) -> InOrder {
    InOrder {
        mocks: mocks.iter().map(|m| (*m).clone()).collect(),
        cursor: 0,
    }
}

impl InOrder {
    pub fn verify(&mut self, mock: &Mock, pattern: CallPattern) -> Result<()> {
        if !self.mocks.iter().any(|m| m.id() == mock.id()) {
            return Err(ConfigError::ForeignMock {
                mock: mock.describe(),
            }
            .into());
        }
        let pattern = mock.normalize_site(pattern)?;
        match mock.find_after(self.cursor, &pattern)? {
            Some(seq) => {
                debug!(
                    target: "mimicry::verify",
                    pattern = %pattern.describe(),
                    seq,
                    "in-order verification advanced"
                );
                self.cursor = seq;
                Ok(())
            }
            None => {
                warn!(
                    target: "mimicry::verify",
                    pattern = %pattern.describe(),
                    cursor = self.cursor,
                    "in-order verification failed"
                );
                Err(VerificationError::OutOfOrder {
                    pattern: pattern.describe(),
                    cursor: self.cursor,
                }
                .into())
            }
        }
    }
}

/// Fail if any of the given mocks has recorded any interaction at all.
pub fn verify_zero_interactions(mocks: &[&Mock]) -> Result<()> {
    for mock in mocks {
        let count = mock.interaction_count();
        if count > 0 {
            return Err(VerificationError::UnexpectedInteractions {
                mock: mock.describe(),
                count,
            }
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_satisfaction() {
        assert!(Times::Exact(2).satisfied_by(2));
        assert!(!Times::Exact(2).satisfied_by(1));
        assert!(!Times::Exact(2).satisfied_by(3));
        assert!(Times::AtLeast(2).satisfied_by(5));
        assert!(!Times::AtLeast(2).satisfied_by(1));
        assert!(Times::AtMost(3).satisfied_by(3));
        assert!(!Times::AtMost(3).satisfied_by(4));
        assert!(Times::Never.satisfied_by(0));
        assert!(!Times::Never.satisfied_by(1));
    }

    #[test]
    fn constraint_rendering() {
        assert_eq!(times(2).to_string(), "exactly 2");
        assert_eq!(at_least_once().to_string(), "at least 1");
        assert_eq!(at_most(3).to_string(), "at most 3");
        assert_eq!(never().to_string(), "no");
        assert_eq!(once(), Times::Exact(1));
    }
}
