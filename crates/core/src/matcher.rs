use crate::error::{ConfigError, ConfigResult};
use crate::value::{Value, ValueKind};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Fallible predicate used by [`Matcher::Where`]. An `Err` surfaces as a
/// configuration failure, never as a silent non-match.
pub type Predicate = Arc<dyn Fn(&Value) -> Result<bool, String> + Send + Sync>;

/// Shared slot a capturing matcher appends accepted values into.
pub type CaptureSlot = Arc<Mutex<Vec<Value>>>;

/// Accepts or rejects a single argument position.
#[derive(Clone)]
pub enum Matcher {
    /// Structural equality with a literal value.
    Eq(Value),
    /// Wildcard. `Some(kind)` restricts acceptance to kind-compatible
    /// values; `None` accepts anything.
    Any(Option<ValueKind>),
    /// User-supplied predicate.
    Where { label: String, pred: Predicate },
    /// Accepts whatever `inner` accepts and records the value into `slot`.
    Capture { slot: CaptureSlot, inner: Box<Matcher> },
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Eq(v) => write!(f, "Eq({v})"),
            Matcher::Any(None) => write!(f, "Any"),
            Matcher::Any(Some(kind)) => write!(f, "Any({kind})"),
            Matcher::Where { label, .. } => write!(f, "Where({label})"),
            Matcher::Capture { inner, .. } => write!(f, "Capture({inner:?})"),
        }
    }
}

impl Matcher {
    /// Pure acceptance check; capture slots are not written here.
    fn accepts(&self, method: &str, value: &Value) -> ConfigResult<bool> {
        match self {
            Matcher::Eq(expected) => Ok(expected == value),
            Matcher::Any(None) => Ok(true),
            Matcher::Any(Some(kind)) => Ok(kind.admits(value)),
            Matcher::Where { label, pred } => {
                pred(value).map_err(|detail| ConfigError::PredicateFailure {
                    method: method.to_string(),
                    label: label.clone(),
                    detail,
                })
            }
            Matcher::Capture { inner, .. } => inner.accepts(method, value),
        }
    }

    /// Second pass, run only after the whole pattern accepted a call.
    fn record_capture(&self, value: &Value) {
        if let Matcher::Capture { slot, .. } = self {
            slot.lock().push(value.clone());
        }
    }

    fn describe(&self) -> String {
        match self {
            Matcher::Eq(v) => v.to_string(),
            Matcher::Any(None) => "any()".to_string(),
            Matcher::Any(Some(kind)) => format!("any({kind})"),
            Matcher::Where { label, .. } => format!("<{label}>"),
            Matcher::Capture { inner, .. } => format!("capture({})", inner.describe()),
        }
    }
}

/// One argument position as written at a stub or verify site, before the
/// homogeneity rule is applied.
#[derive(Debug, Clone)]
pub enum ArgPattern {
    Literal(Value),
    Matcher(Matcher),
}

/// Literal argument.
pub fn arg(value: impl Into<Value>) -> ArgPattern {
    ArgPattern::Literal(value.into())
}

/// Explicit equality matcher, usable alongside other matchers.
pub fn eq(value: impl Into<Value>) -> ArgPattern {
    ArgPattern::Matcher(Matcher::Eq(value.into()))
}

/// Matches any value of any kind.
pub fn any() -> ArgPattern {
    ArgPattern::Matcher(Matcher::Any(None))
}

/// Matches any value of the given kind (`Null` included for reference kinds).
pub fn any_of(kind: ValueKind) -> ArgPattern {
    ArgPattern::Matcher(Matcher::Any(Some(kind)))
}

pub fn any_int() -> ArgPattern {
    any_of(ValueKind::Int)
}

pub fn any_str() -> ArgPattern {
    any_of(ValueKind::Str)
}

pub fn any_bool() -> ArgPattern {
    any_of(ValueKind::Bool)
}

/// Predicate matcher over an infallible closure.
pub fn arg_that(
    label: impl Into<String>,
    pred: impl Fn(&Value) -> bool + Send + Sync + 'static,
) -> ArgPattern {
    ArgPattern::Matcher(Matcher::Where {
        label: label.into(),
        pred: Arc::new(move |v| Ok(pred(v))),
    })
}

/// Predicate matcher whose closure may fail; failures become
/// [`ConfigError::PredicateFailure`].
pub fn try_arg_that(
    label: impl Into<String>,
    pred: impl Fn(&Value) -> Result<bool, String> + Send + Sync + 'static,
) -> ArgPattern {
    ArgPattern::Matcher(Matcher::Where {
        label: label.into(),
        pred: Arc::new(pred),
    })
}

/// A method name plus argument patterns, as written at a stub or verify
/// site.
#[derive(Debug, Clone)]
pub struct CallPattern {
    pub method: String,
    pub args: Vec<ArgPattern>,
}

/// Shorthand constructor for a call pattern.
pub fn call(method: impl Into<String>, args: Vec<ArgPattern>) -> CallPattern {
    CallPattern {
        method: method.into(),
        args,
    }
}

impl CallPattern {
    /// Enforce the homogeneity rule and yield the matcher list: either every
    /// position is a literal or every position is a matcher. Mixing the two
    /// is a configuration error, never a silent reinterpretation.
    pub fn normalize(self) -> ConfigResult<NormalizedPattern> {
        let has_matcher = self
            .args
            .iter()
            .any(|a| matches!(a, ArgPattern::Matcher(_)));
        let has_literal = self
            .args
            .iter()
            .any(|a| matches!(a, ArgPattern::Literal(_)));
        if has_matcher && has_literal {
            return Err(ConfigError::MixedArgumentStyle {
                method: self.method,
            });
        }
        let matchers = self
            .args
            .into_iter()
            .map(|a| match a {
                ArgPattern::Literal(v) => Matcher::Eq(v),
                ArgPattern::Matcher(m) => m,
            })
            .collect();
        Ok(NormalizedPattern {
            method: self.method,
            matchers,
        })
    }
}

/// Validated pattern: method name plus a homogeneous matcher list.
#[derive(Debug, Clone)]
pub struct NormalizedPattern {
    pub method: String,
    pub matchers: Vec<Matcher>,
}

impl NormalizedPattern {
    /// Whether this pattern accepts the given call. Capture slots are
    /// written only when the call is accepted as a whole, so a capturing
    /// position never records arguments of rejected calls.
    pub fn accepts(&self, method: &str, args: &[Value]) -> ConfigResult<bool> {
        if method != self.method || args.len() != self.matchers.len() {
            return Ok(false);
        }
        for (matcher, value) in self.matchers.iter().zip(args) {
            if !matcher.accepts(&self.method, value)? {
                return Ok(false);
            }
        }
        for (matcher, value) in self.matchers.iter().zip(args) {
            matcher.record_capture(value);
        }
        Ok(true)
    }

    /// Compact `method(matcher, ...)` rendering for diagnostics.
    pub fn describe(&self) -> String {
        let args: Vec<String> = self.matchers.iter().map(|m| m.describe()).collect();
        format!("{}({})", self.method, args.join(", "))
    }
}
