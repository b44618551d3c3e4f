//! Mock-object verification engine
//!
//! The engine fulfils an explicitly declared capability set: every
//! intercepted call is recorded in a globally sequenced invocation log,
//! resolved against a stub table, and answered with a programmed response,
//! a delegation to a real backing instance (spy mode), or the mock's
//! default-answer policy. Verification runs after the fact over the
//! recorded history: call counts, cross-mock ordering, exhaustiveness.
//!
//! ```
//! use mock::{call, CapabilitySet, Mock, ValueKind};
//!
//! let schema = CapabilitySet::builder("Iterator")
//!     .method("next", [], ValueKind::Str)
//!     .build()
//!     .unwrap();
//! let iter = Mock::new(schema);
//! iter.when(call("next", vec![])).unwrap()
//!     .then_return("hello")
//!     .then_return("world");
//! assert_eq!(iter.call("next", vec![]).unwrap().as_str(), Some("hello"));
//! assert_eq!(iter.call("next", vec![]).unwrap().as_str(), Some("world"));
//! iter.verify_times(call("next", vec![]), mock::times(2)).unwrap();
//! ```

pub mod captor;
pub mod mock;
pub mod recorder;
pub mod stub;
pub mod verify;

pub use captor::ArgCaptor;
pub use mock::{Mock, MockSettings, RealInstance, StubBuilder};
pub use recorder::{InvocationLog, LoggedInvocation};
pub use stub::{AnswerFn, DefaultAnswer, Response};
pub use verify::{
    at_least, at_least_once, at_most, in_order, never, once, times, verify_zero_interactions,
    InOrder, Times,
};

// Re-export the domain surface so callers need only this crate
pub use mimicry_core::{
    any, any_bool, any_int, any_of, any_str, arg, arg_that, call, eq, try_arg_that, ArgPattern,
    CallPattern, CapabilityBuilder, CapabilitySet, ConfigError, Invocation, Matcher, MethodSig,
    MockError, MockId, ProgrammedError, Result, Value, ValueKind, VerificationError,
};
