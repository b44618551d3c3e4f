use crate::error::{ConfigError, ConfigResult};
use crate::value::{Value, ValueKind};
use serde::{Deserialize, Serialize};

/// Signature of one method in a capability set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSig {
    pub name: String,
    pub params: Vec<ValueKind>,
    pub returns: ValueKind,
}

/// An explicit declaration of the surface a mock fulfils.
///
/// Supplied by the caller at mock-creation time; there is no reflection or
/// code generation. A schema is plain data and round-trips through JSON, so
/// fixtures can declare it once and share it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilitySet {
    pub name: String,
    methods: Vec<MethodSig>,
}

impl CapabilitySet {
    pub fn builder(name: impl Into<String>) -> CapabilityBuilder {
        CapabilityBuilder {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn method(&self, name: &str) -> Option<&MethodSig> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn methods(&self) -> &[MethodSig] {
        &self.methods
    }

    pub fn expect_method(&self, name: &str) -> ConfigResult<&MethodSig> {
        self.method(name).ok_or_else(|| ConfigError::UnknownMethod {
            capability: self.name.clone(),
            method: name.to_string(),
        })
    }

    /// Validate a concrete call against this schema: the method must exist,
    /// the arity must match, and every argument must inhabit the declared
    /// parameter kind.
    pub fn check_call(&self, method: &str, args: &[Value]) -> ConfigResult<&MethodSig> {
        let sig = self.expect_method(method)?;
        if sig.params.len() != args.len() {
            return Err(ConfigError::ArityMismatch {
                method: method.to_string(),
                expected: sig.params.len(),
                actual: args.len(),
            });
        }
        for (position, (kind, value)) in sig.params.iter().zip(args).enumerate() {
            if !kind.admits(value) {
                return Err(ConfigError::ArgumentKind {
                    method: method.to_string(),
                    position,
                    expected: *kind,
                    got: value.kind_name().to_string(),
                });
            }
        }
        Ok(sig)
    }

    /// Validate a pattern site (stub or verify): method must exist and the
    /// pattern arity must match. Kinds are checked per-argument only for
    /// concrete calls.
    pub fn check_pattern(&self, method: &str, arity: usize) -> ConfigResult<&MethodSig> {
        let sig = self.expect_method(method)?;
        if sig.params.len() != arity {
            return Err(ConfigError::ArityMismatch {
                method: method.to_string(),
                expected: sig.params.len(),
                actual: arity,
            });
        }
        Ok(sig)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let set: CapabilitySet =
            serde_json::from_str(json).map_err(|e| ConfigError::InvalidCapability {
                detail: e.to_string(),
            })?;
        set.validate()?;
        Ok(set)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::InvalidCapability {
            detail: e.to_string(),
        })
    }

    fn validate(&self) -> ConfigResult<()> {
        for (i, m) in self.methods.iter().enumerate() {
            if self.methods[..i].iter().any(|other| other.name == m.name) {
                return Err(ConfigError::DuplicateMethod {
                    capability: self.name.clone(),
                    method: m.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Fluent declaration of a capability set.
#[derive(Debug, Clone)]
pub struct CapabilityBuilder {
    name: String,
    methods: Vec<MethodSig>,
}

impl CapabilityBuilder {
    pub fn method(
        mut self,
        name: impl Into<String>,
        params: impl Into<Vec<ValueKind>>,
        returns: ValueKind,
    ) -> Self {
        self.methods.push(MethodSig {
            name: name.into(),
            params: params.into(),
            returns,
        });
        self
    }

    pub fn build(self) -> ConfigResult<CapabilitySet> {
        let set = CapabilitySet {
            name: self.name,
            methods: self.methods,
        };
        set.validate()?;
        Ok(set)
    }
}
