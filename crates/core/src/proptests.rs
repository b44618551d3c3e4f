//! Property tests over the matcher and value invariants.

use crate::matcher::{any_str, arg, call};
use crate::{ConfigError, Value, ValueKind};
use proptest::prelude::*;

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1e9f64..1e9f64).prop_map(Value::Float),
        "[a-z]{0,8}".prop_map(Value::Str),
    ]
}

fn arb_kind() -> impl Strategy<Value = ValueKind> {
    prop_oneof![
        Just(ValueKind::Unit),
        Just(ValueKind::Bool),
        Just(ValueKind::Int),
        Just(ValueKind::Float),
        Just(ValueKind::Str),
        Just(ValueKind::List),
    ]
}

proptest! {
    /// The absence value of a kind always inhabits that kind.
    #[test]
    fn absence_inhabits_its_kind(kind in arb_kind()) {
        prop_assert!(kind.admits(&kind.absence()));
    }

    /// The untyped wildcard accepts every value.
    #[test]
    fn untyped_wildcard_accepts_everything(value in arb_value()) {
        let pattern = call("f", vec![crate::matcher::any()]).normalize().unwrap();
        prop_assert!(pattern.accepts("f", &[value]).unwrap());
    }

    /// Literal patterns are reflexive: a pattern built from a value accepts
    /// that value.
    #[test]
    fn literal_pattern_is_reflexive(value in arb_value()) {
        let pattern = call("f", vec![arg(value.clone())]).normalize().unwrap();
        prop_assert!(pattern.accepts("f", &[value]).unwrap());
    }

    /// Any mixed literal/matcher pattern is rejected at normalization.
    #[test]
    fn mixed_patterns_always_rejected(value in arb_value(), literal_first in any::<bool>()) {
        let args = if literal_first {
            vec![arg(value.clone()), crate::matcher::any()]
        } else {
            vec![crate::matcher::any(), arg(value.clone())]
        };
        let err = call("f", args).normalize().unwrap_err();
        prop_assert!(
            matches!(err, ConfigError::MixedArgumentStyle { .. }),
            "expected ConfigError::MixedArgumentStyle, got {:?}",
            err
        );
    }

    /// A typed wildcard never accepts a value of a different primitive kind.
    #[test]
    fn typed_wildcard_respects_kinds(n in any::<i64>()) {
        let pattern = call("f", vec![any_str()]).normalize().unwrap();
        prop_assert!(!pattern.accepts("f", &[Value::Int(n)]).unwrap());
    }
}
