//! Errors, both the out-of-band kind and the in-band kind.
//!
//! [`LiftError`] is returned by [`Func::lift`](crate::Func::lift) when a
//! function cannot be made into an arrow. [`Fault`] is the in-band error value:
//! it travels through continuations like any other output, usually as the
//! `Err` side of a `Result<T, Fault>`, and only the error-channel combinators
//! treat it specially.

use std::{
    collections::{BTreeMap, HashMap},
    rc::Rc,
};

use either::Either;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Failure to lift a function into an arrow.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LiftError {
    /// Only nullary and unary functions lift; three-argument steps are
    /// already arrows.
    #[error("incorrect number of parameters: cannot lift a function of arity {arity}")]
    ParameterCount { arity: usize },
}

/// In-band error value with an optional payload and an appendable context chain.
///
/// ```rust
/// use lifta::Fault;
///
/// let fault = Fault::new("validation failed")
///     .with_payload(25)
///     .promote("stage two")
///     .promote("stage three");
///
/// assert_eq!(fault.payload(), Some(&serde_json::json!(25)));
/// assert_eq!(fault.context().len(), 2);
/// ```
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message}")]
pub struct Fault {
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    context: Vec<Value>,
}

impl Fault {
    pub fn new(message: impl Into<String>) -> Self {
        Fault {
            message: message.into(),
            payload: None,
            context: Vec::new(),
        }
    }

    /// Attach the value that caused the fault.
    pub fn with_payload<T: Serialize>(mut self, payload: T) -> Self {
        self.payload = Some(encode(&payload));
        self
    }

    /// Append `context` to the chain, keeping everything recorded before it.
    pub fn promote<T: Serialize>(mut self, context: T) -> Self {
        self.context.push(encode(&context));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Context values, oldest first.
    pub fn context(&self) -> &[Value] {
        &self.context
    }
}

fn encode<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|err| {
        warn!(%err, "fault value is not representable as JSON");
        Value::Null
    })
}

/// Detects in-band faults.
///
/// `is_fault` asks whether the value itself is a fault. `has_fault` also
/// looks one level into pairs: a pair has a fault when either element is one.
/// Nested pairs are not searched.
///
/// Containers and common value types never count as faults themselves. A
/// type of your own opts in with a one-line impl:
///
/// ```rust
/// use lifta::*;
///
/// struct Reading(f64);
///
/// impl Faulty for Reading {
///     fn is_fault(&self) -> bool {
///         false
///     }
/// }
///
/// let sensor = left_error(lift(|x: f64| Reading(x)));
/// assert!(run_sync(&sensor, 1.5).is_some_and(|tagged| tagged.is_right()));
/// ```
pub trait Faulty {
    fn is_fault(&self) -> bool;

    fn has_fault(&self) -> bool {
        self.is_fault()
    }
}

impl Faulty for Fault {
    fn is_fault(&self) -> bool {
        true
    }
}

impl<T> Faulty for Result<T, Fault> {
    fn is_fault(&self) -> bool {
        self.is_err()
    }
}

impl<T: Faulty> Faulty for Option<T> {
    fn is_fault(&self) -> bool {
        self.as_ref().is_some_and(Faulty::is_fault)
    }
}

impl<T: Faulty + ?Sized> Faulty for Box<T> {
    fn is_fault(&self) -> bool {
        (**self).is_fault()
    }

    fn has_fault(&self) -> bool {
        (**self).has_fault()
    }
}

impl<T: Faulty + ?Sized> Faulty for Rc<T> {
    fn is_fault(&self) -> bool {
        (**self).is_fault()
    }

    fn has_fault(&self) -> bool {
        (**self).has_fault()
    }
}

/// A tagged value is a fault when its payload is.
impl<L: Faulty, R: Faulty> Faulty for Either<L, R> {
    fn is_fault(&self) -> bool {
        either::for_both!(self, inner => inner.is_fault())
    }
}

impl<A: Faulty, B: Faulty> Faulty for (A, B) {
    fn is_fault(&self) -> bool {
        false
    }

    fn has_fault(&self) -> bool {
        self.0.is_fault() || self.1.is_fault()
    }
}

macro_rules! never_faulty {
    ($($t:ty),* $(,)?) => {
        $(
            impl Faulty for $t {
                fn is_fault(&self) -> bool {
                    false
                }
            }
        )*
    };
}

never_faulty!(
    (), bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, &str, Value,
);

// a collection is data, even when it holds faults
impl<T> Faulty for Vec<T> {
    fn is_fault(&self) -> bool {
        false
    }
}

impl<T> Faulty for [T] {
    fn is_fault(&self) -> bool {
        false
    }
}

impl<K, V, S> Faulty for HashMap<K, V, S> {
    fn is_fault(&self) -> bool {
        false
    }
}

impl<K, V> Faulty for BTreeMap<K, V> {
    fn is_fault(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lift_error_message() {
        let err = LiftError::ParameterCount { arity: 2 };
        assert_eq!(
            err.to_string(),
            "incorrect number of parameters: cannot lift a function of arity 2"
        );
    }

    #[test]
    fn test_promote_appends_context() {
        let fault = Fault::new("ouch").promote("first").promote(json!({ "stage": 2 }));

        assert_eq!(fault.message(), "ouch");
        assert_eq!(fault.context(), &[json!("first"), json!({ "stage": 2 })]);
        assert_eq!(fault.payload(), None);
    }

    #[test]
    fn test_fault_serializes_without_empty_fields() {
        let fault = Fault::new("ouch");
        assert_eq!(serde_json::to_value(&fault).unwrap(), json!({ "message": "ouch" }));

        let fault = fault.with_payload(vec![1, 2]);
        let back: Fault = serde_json::from_value(serde_json::to_value(&fault).unwrap()).unwrap();
        assert_eq!(back, fault);
    }

    #[test]
    fn test_fault_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(Fault::new("didithurt"));
        assert_eq!(err.to_string(), "didithurt");
    }

    #[test]
    fn test_has_fault_checks_value_and_pair_elements() {
        let bad: Result<i32, Fault> = Err(Fault::new("ouch"));
        let good: Result<i32, Fault> = Ok(1);

        assert!(bad.has_fault());
        assert!(!good.has_fault());
        assert!((bad.clone(), "fish").has_fault());
        assert!(("butter", bad.clone()).has_fault());
        assert!(!(None::<Fault>, "knockwurst").has_fault());
        assert!((Some(Fault::new("ouch")), 1).has_fault());
    }

    #[test]
    fn test_containers_are_faulty_only_through_their_payload() {
        let bad: Result<i32, Fault> = Err(Fault::new("ouch"));

        assert!(Box::new(bad.clone()).is_fault());
        assert!(Rc::new(Fault::new("shared")).is_fault());
        assert!(Either::<_, i32>::Left(bad.clone()).is_fault());
        assert!(!Either::<i32, String>::Right("fine".to_string()).is_fault());
        assert!(!vec![bad.clone()].has_fault());
        assert!(!HashMap::<String, i32>::new().is_fault());
        assert!((vec![1, 2], bad).has_fault());
    }

    #[test]
    fn test_has_fault_does_not_search_nested_pairs() {
        let nested = ((Fault::new("deep"), 1), 2);
        assert!(!nested.has_fault());
        assert!(!nested.is_fault());
    }
}
