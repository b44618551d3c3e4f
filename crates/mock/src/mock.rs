use crate::recorder::InvocationLog;
use crate::stub::{DefaultAnswer, Response, StubTable};
use crate::verify::{self, Times};
use mimicry_core::{
    CallPattern, CapabilitySet, ConfigError, Invocation, MockId, NormalizedPattern,
    ProgrammedError, Result, Value, ValueKind, VerificationError,
};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Adapter to a real backing object for spies and partial mocks.
///
/// Implementations route a dynamic call onto the real implementation and
/// surface its failures as [`ProgrammedError`].
pub trait RealInstance: Send {
    fn call(&mut self, method: &str, args: &[Value]) -> std::result::Result<Value, ProgrammedError>;
}

/// Per-mock settings, fixed at creation time.
#[derive(Debug, Clone, Default)]
pub struct MockSettings {
    /// Display name used in diagnostics instead of the capability name.
    pub name: Option<String>,
    /// What an unstubbed call falls back to.
    pub default_answer: DefaultAnswer,
}

impl MockSettings {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn default_answer(mut self, answer: DefaultAnswer) -> Self {
        self.default_answer = answer;
        self
    }
}

/// Stub table and invocation log live behind one lock so reset is atomic
/// from the caller's perspective.
struct Inner {
    log: InvocationLog,
    stubs: StubTable,
    real: Option<Box<dyn RealInstance>>,
}

/// Handle to one mock or spy instance. Cloning shares the underlying
/// state; the handle is `Send + Sync`, but callers coordinating calls from
/// several threads must supply their own ordering.
#[derive(Clone)]
pub struct Mock {
    id: MockId,
    capability: Arc<CapabilitySet>,
    settings: Arc<MockSettings>,
    inner: Arc<Mutex<Inner>>,
}

impl fmt::Debug for Mock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mock")
            .field("id", &self.id)
            .field("capability", &self.capability.name)
            .finish()
    }
}

impl Mock {
    /// Create a plain mock over the given capability set.
    pub fn new(capability: CapabilitySet) -> Self {
        Self::build(capability, MockSettings::default(), None)
    }

    /// Create a mock with explicit settings (display name, default answer).
    pub fn with_settings(capability: CapabilitySet, settings: MockSettings) -> Self {
        Self::build(capability, settings, None)
    }

    /// Create a spy: unstubbed calls delegate to `real` after recording.
    pub fn spy(capability: CapabilitySet, real: impl RealInstance + 'static) -> Self {
        Self::build(capability, MockSettings::default(), Some(Box::new(real)))
    }

    fn build(
        capability: CapabilitySet,
        settings: MockSettings,
        real: Option<Box<dyn RealInstance>>,
    ) -> Self {
        let id = MockId::new();
        info!(
            target: "mimicry::mock",
            mock = %id,
            capability = %capability.name,
            spy = real.is_some(),
            "created mock"
        );
        Self {
            id,
            capability: Arc::new(capability),
            settings: Arc::new(settings),
            inner: Arc::new(Mutex::new(Inner {
                log: InvocationLog::default(),
                stubs: StubTable::default(),
                real,
            })),
        }
    }

    pub fn id(&self) -> MockId {
        self.id
    }

    pub fn capability(&self) -> &CapabilitySet {
        &self.capability
    }

    /// Name used in diagnostics.
    pub fn describe(&self) -> String {
        match &self.settings.name {
            Some(name) => name.clone(),
            None => format!("{}#{}", self.capability.name, self.id),
        }
    }

    /// Intercept a call: validate it against the capability set, record it,
    /// resolve a response, and return or raise.
    pub fn call(&self, method: &str, args: Vec<Value>) -> Result<Value> {
        let return_kind = self.capability.check_call(method, &args)?.returns;
        let (invocation, response, has_real) = {
            let mut inner = self.inner.lock();
            let invocation = inner.log.record(self.id, method, args);
            let response = inner
                .stubs
                .resolve(&invocation.method, &invocation.args)?;
            (invocation, response, inner.real.is_some())
        };
        match response {
            Some(Response::Return(value)) => Ok(value),
            Some(Response::Raise(error)) => {
                debug!(
                    target: "mimicry::mock",
                    mock = %self.id,
                    call = %invocation.describe(),
                    "raising programmed exception"
                );
                Err(error.into())
            }
            Some(Response::Answer(answer)) => answer(&invocation).map_err(Into::into),
            Some(Response::CallReal) => self.delegate(&invocation),
            // A spy with no matching stub runs the real implementation.
            None if has_real => self.delegate(&invocation),
            None => self.default_answer(return_kind, &invocation),
        }
    }

    /// Begin programming responses for calls matching `pattern`. The
    /// pattern is plain data, so a spy's real instance is never invoked as
    /// a byproduct of stub setup. The returned builder registers its entry
    /// when dropped.
    pub fn when(&self, pattern: CallPattern) -> Result<StubBuilder> {
        let pattern = self.normalize_site(pattern)?;
        Ok(StubBuilder {
            mock: self.clone(),
            pattern: Some(pattern),
            responses: Vec::new(),
        })
    }

    /// Verify the pattern was called exactly once.
    pub fn verify(&self, pattern: CallPattern) -> Result<()> {
        self.verify_times(pattern, Times::Exact(1))
    }

    /// Verify the pattern was called per the given count constraint.
    pub fn verify_times(&self, pattern: CallPattern, times: Times) -> Result<()> {
        let pattern = self.normalize_site(pattern)?;
        let mut inner = self.inner.lock();
        verify::verify_count(&mut inner.log, &pattern, times)
    }

    /// Fail if any recorded invocation was never covered by a passing
    /// verify.
    pub fn verify_no_more_interactions(&self) -> Result<()> {
        let inner = self.inner.lock();
        let remaining: Vec<String> = inner.log.unverified().map(|i| i.describe()).collect();
        if remaining.is_empty() {
            Ok(())
        } else {
            Err(VerificationError::UnverifiedInteractions {
                mock: self.describe(),
                remaining,
            }
            .into())
        }
    }

    /// Wipe stubs and history in one step; the mock behaves as freshly
    /// created. Attached real instances survive a reset.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.stubs.clear();
        inner.log.clear();
        info!(target: "mimicry::mock", mock = %self.id, "reset");
    }

    /// Snapshot of the recorded history, oldest first.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.inner
            .lock()
            .log
            .entries()
            .iter()
            .map(|slot| slot.invocation.clone())
            .collect()
    }

    pub fn interaction_count(&self) -> usize {
        self.inner.lock().log.len()
    }

    /// Validate a stub/verify site against the schema, then apply the
    /// matcher homogeneity rule.
    pub(crate) fn normalize_site(&self, pattern: CallPattern) -> Result<NormalizedPattern> {
        self.capability
            .check_pattern(&pattern.method, pattern.args.len())?;
        Ok(pattern.normalize()?)
    }

    pub(crate) fn find_after(
        &self,
        cursor: u64,
        pattern: &NormalizedPattern,
    ) -> Result<Option<u64>> {
        let mut inner = self.inner.lock();
        Ok(verify::first_match_after(&mut inner.log, cursor, pattern)?)
    }

    fn delegate(&self, invocation: &Invocation) -> Result<Value> {
        let mut inner = self.inner.lock();
        match inner.real.as_mut() {
            Some(real) => {
                debug!(
                    target: "mimicry::mock",
                    mock = %self.id,
                    call = %invocation.describe(),
                    "delegating to real instance"
                );
                real.call(&invocation.method, &invocation.args)
                    .map_err(Into::into)
            }
            None => Err(ConfigError::NoRealInstance {
                method: invocation.method.clone(),
            }
            .into()),
        }
    }

    fn default_answer(&self, return_kind: ValueKind, invocation: &Invocation) -> Result<Value> {
        match &self.settings.default_answer {
            DefaultAnswer::Absence => {
                debug!(
                    target: "mimicry::mock",
                    mock = %self.id,
                    call = %invocation.describe(),
                    "unstubbed call, returning absence value"
                );
                Ok(return_kind.absence())
            }
            DefaultAnswer::Fixed(value) => Ok(value.clone()),
            DefaultAnswer::Answer(answer) => answer(invocation).map_err(Into::into),
        }
    }

    fn register_stub(&self, pattern: NormalizedPattern, responses: Vec<Response>) {
        self.inner.lock().stubs.register(pattern, responses);
    }
}

/// Fluent response programming. Each chained call appends to the entry's
/// response queue; the entry is registered when the builder is dropped, so
/// there is no ambient "stub being configured" state.
pub struct StubBuilder {
    mock: Mock,
    pattern: Option<NormalizedPattern>,
    responses: Vec<Response>,
}

impl fmt::Debug for StubBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubBuilder")
            .field("pattern", &self.pattern)
            .field("responses", &self.responses)
            .finish_non_exhaustive()
    }
}

impl StubBuilder {
    pub fn then_return(mut self, value: impl Into<Value>) -> Self {
        self.responses.push(Response::Return(value.into()));
        self
    }

    pub fn then_throw(mut self, error: ProgrammedError) -> Self {
        self.responses.push(Response::Raise(error));
        self
    }

    pub fn then_answer<F>(mut self, answer: F) -> Self
    where
        F: Fn(&Invocation) -> std::result::Result<Value, ProgrammedError> + Send + Sync + 'static,
    {
        self.responses.push(Response::Answer(Arc::new(answer)));
        self
    }

    pub fn then_call_real(mut self) -> Self {
        self.responses.push(Response::CallReal);
        self
    }
}

impl Drop for StubBuilder {
    fn drop(&mut self) {
        if self.responses.is_empty() {
            return;
        }
        if let Some(pattern) = self.pattern.take() {
            let responses = std::mem::take(&mut self.responses);
            self.mock.register_stub(pattern, responses);
        }
    }
}
