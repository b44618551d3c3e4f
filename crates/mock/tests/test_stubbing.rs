//! Integration tests for the stubbing path: programmed returns, consecutive
//! responses, thrown exceptions, answer callbacks, default answers, spies.

use mock::{
    any_int, arg, call, CapabilitySet, DefaultAnswer, Mock, MockError, MockSettings,
    ProgrammedError, RealInstance, Value, ValueKind,
};

fn list_capability() -> CapabilitySet {
    CapabilitySet::builder("List")
        .method("add", [ValueKind::Str], ValueKind::Bool)
        .method("get", [ValueKind::Int], ValueKind::Str)
        .method("size", [], ValueKind::Int)
        .method("clear", [], ValueKind::Unit)
        .build()
        .expect("valid schema")
}

/// Vec-backed real implementation used by spy tests.
struct VecList {
    items: Vec<String>,
}

impl VecList {
    fn new() -> Self {
        Self { items: Vec::new() }
    }
}

impl RealInstance for VecList {
    fn call(&mut self, method: &str, args: &[Value]) -> Result<Value, ProgrammedError> {
        match method {
            "add" => {
                let item = args[0]
                    .as_str()
                    .ok_or_else(|| ProgrammedError::new("add expects a string"))?;
                self.items.push(item.to_string());
                Ok(Value::Bool(true))
            }
            "get" => {
                let index = args[0]
                    .as_int()
                    .ok_or_else(|| ProgrammedError::new("get expects an index"))?;
                self.items
                    .get(index as usize)
                    .map(|s| Value::Str(s.clone()))
                    .ok_or_else(|| ProgrammedError::new(format!("index {index} out of bounds")))
            }
            "size" => Ok(Value::Int(self.items.len() as i64)),
            "clear" => {
                self.items.clear();
                Ok(Value::Null)
            }
            other => Err(ProgrammedError::new(format!("unsupported method {other}"))),
        }
    }
}

#[test]
fn consecutive_responses_then_sticky_last() {
    let mock = Mock::new(list_capability());
    mock.when(call("get", vec![arg(1)]))
        .expect("valid site")
        .then_return("zero")
        .then_return("one")
        .then_throw(ProgrammedError::new("exhausted"));

    assert_eq!(
        mock.call("get", vec![Value::Int(1)]).expect("first"),
        Value::Str("zero".into())
    );
    assert_eq!(
        mock.call("get", vec![Value::Int(1)]).expect("second"),
        Value::Str("one".into())
    );
    // Third and every later call raises: the final response repeats.
    for _ in 0..3 {
        let err = mock.call("get", vec![Value::Int(1)]).unwrap_err();
        assert!(matches!(err, MockError::Raised(ref e) if e.message == "exhausted"));
    }
}

#[test]
fn later_registration_overrides_earlier() {
    let mock = Mock::new(list_capability());
    mock.when(call("get", vec![arg(0)])).expect("site").then_return("first");
    mock.when(call("get", vec![arg(0)])).expect("site").then_return("second");

    assert_eq!(
        mock.call("get", vec![Value::Int(0)]).expect("ok"),
        Value::Str("second".into())
    );
    assert_eq!(
        mock.call("get", vec![Value::Int(0)]).expect("ok"),
        Value::Str("second".into())
    );
}

#[test]
fn per_argument_stubs_and_absence_fallback() {
    let mock = Mock::new(list_capability());
    mock.when(call("get", vec![arg(0)])).expect("site").then_return("the first");
    mock.when(call("get", vec![arg(1)]))
        .expect("site")
        .then_throw(ProgrammedError::new("boom"));

    assert_eq!(
        mock.call("get", vec![Value::Int(0)]).expect("ok"),
        Value::Str("the first".into())
    );
    assert!(mock.call("get", vec![Value::Int(1)]).is_err());
    // No stub for 999: the declared return kind's absence value.
    assert_eq!(
        mock.call("get", vec![Value::Int(999)]).expect("ok"),
        Value::Null
    );
}

#[test]
fn answer_callback_computes_from_arguments() {
    let mock = Mock::new(list_capability());
    mock.when(call("get", vec![any_int()]))
        .expect("site")
        .then_answer(|invocation| {
            let index = invocation.args[0]
                .as_int()
                .ok_or_else(|| ProgrammedError::new("expected an index"))?;
            Ok(Value::Str(format!("item-{index}")))
        });

    assert_eq!(
        mock.call("get", vec![Value::Int(0)]).expect("ok"),
        Value::Str("item-0".into())
    );
    assert_eq!(
        mock.call("get", vec![Value::Int(998)]).expect("ok"),
        Value::Str("item-998".into())
    );
}

#[test]
fn answer_callback_may_raise() {
    let mock = Mock::new(list_capability());
    mock.when(call("get", vec![any_int()]))
        .expect("site")
        .then_answer(|_| Err(ProgrammedError::new("computed failure")));
    let err = mock.call("get", vec![Value::Int(3)]).unwrap_err();
    assert!(matches!(err, MockError::Raised(_)));
}

#[test]
fn creation_time_default_answer_policy() {
    let mock = Mock::with_settings(
        list_capability(),
        MockSettings::named("defaulting list")
            .default_answer(DefaultAnswer::Fixed(Value::Int(999))),
    );
    // Neither call is stubbed; both fall back to the configured policy.
    assert_eq!(mock.call("size", vec![]).expect("ok"), Value::Int(999));
    assert_eq!(
        mock.call("get", vec![Value::Int(1)]).expect("ok"),
        Value::Int(999)
    );
}

#[test]
fn spy_delegates_unstubbed_calls_to_real_instance() {
    let spy = Mock::spy(list_capability(), VecList::new());
    spy.call("add", vec![Value::Str("a".into())]).expect("ok");
    spy.call("add", vec![Value::Str("b".into())]).expect("ok");

    assert_eq!(spy.call("size", vec![]).expect("ok"), Value::Int(2));
    assert_eq!(
        spy.call("get", vec![Value::Int(0)]).expect("ok"),
        Value::Str("a".into())
    );
    // The real implementation's failure propagates untouched.
    let err = spy.call("get", vec![Value::Int(99)]).unwrap_err();
    assert!(matches!(err, MockError::Raised(ref e) if e.message.contains("out of bounds")));
}

#[test]
fn spy_stub_shadows_real_implementation() {
    let spy = Mock::spy(list_capability(), VecList::new());
    spy.call("add", vec![Value::Str("a".into())]).expect("ok");
    spy.when(call("size", vec![])).expect("site").then_return(100);

    assert_eq!(spy.call("size", vec![]).expect("ok"), Value::Int(100));
    // Other methods still reach the real instance.
    assert_eq!(
        spy.call("get", vec![Value::Int(0)]).expect("ok"),
        Value::Str("a".into())
    );
}

#[test]
fn stub_setup_on_spy_never_touches_real_instance() {
    let spy = Mock::spy(list_capability(), VecList::new());
    // If stubbing invoked the real method, get(999) would fail here.
    spy.when(call("get", vec![arg(999)])).expect("site").then_return("stubbed");
    assert_eq!(
        spy.call("get", vec![Value::Int(999)]).expect("ok"),
        Value::Str("stubbed".into())
    );
    assert_eq!(spy.interaction_count(), 1);
}

#[test]
fn call_real_response_on_spy_runs_real_method() {
    let spy = Mock::spy(list_capability(), VecList::new());
    spy.call("add", vec![Value::Str("x".into())]).expect("ok");
    spy.when(call("size", vec![]))
        .expect("site")
        .then_return(7)
        .then_call_real();

    assert_eq!(spy.call("size", vec![]).expect("ok"), Value::Int(7));
    assert_eq!(spy.call("size", vec![]).expect("ok"), Value::Int(1));
}

#[test]
fn mixed_literal_and_matcher_stub_rejected() {
    let two_arg = CapabilitySet::builder("Comparator")
        .method("compare", [ValueKind::Str, ValueKind::Str], ValueKind::Int)
        .build()
        .expect("valid schema");
    let mock = Mock::new(two_arg);
    let err = mock
        .when(call("compare", vec![mock::any_str(), arg("hello")]))
        .unwrap_err();
    assert!(matches!(
        err,
        MockError::Configuration(mock::ConfigError::MixedArgumentStyle { .. })
    ));
}
