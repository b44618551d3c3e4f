//! Core domain model for the mimicry mock engine
//!
//! This crate contains the plain-data layer the engine is built on:
//! - `Value`/`ValueKind`: the dynamic value domain and its absence values
//! - `CapabilitySet`/`MethodSig`: explicit capability declarations
//! - `Invocation`/`MockId`: immutable, globally sequenced call records
//! - `Matcher`/`CallPattern`: argument matching with the homogeneity rule
//! - The error hierarchy: configuration, verification, programmed failures

pub mod error;
pub mod invocation;
pub mod matcher;
pub mod schema;
pub mod value;

#[cfg(test)]
mod proptests;

pub use error::{
    ConfigError, ConfigResult, MockError, ProgrammedError, Result, VerificationError,
};
pub use invocation::{Invocation, MockId};
pub use matcher::{
    any, any_bool, any_int, any_of, any_str, arg, arg_that, call, eq, try_arg_that, ArgPattern,
    CallPattern, CaptureSlot, Matcher, NormalizedPattern, Predicate,
};
pub use schema::{CapabilityBuilder, CapabilitySet, MethodSig};
pub use value::{Value, ValueKind};
