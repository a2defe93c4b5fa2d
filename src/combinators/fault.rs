//! The in-band error channel.
//!
//! Faults are ordinary outputs. Nothing here unwinds: [`barrier`] stops work
//! on a faulted input, [`left_error`] turns "has a fault" into a branch tag for
//! [`lor`](crate::lor), and [`false_error`] / [`promote_error`] convert
//! validation results and nested failures into `Err(Fault)`.

use either::Either;
use serde::Serialize;
use tracing::trace;

use crate::{Arrow, Cont, Fault, Faulty, Pure, Scope, Then, lift, then};

/// Skip `f` when its input is already a fault.
///
/// ```rust
/// use lifta::*;
///
/// let halve = barrier(lift(|x: i32| Ok::<_, Fault>(x / 2)));
/// assert_eq!(run_sync(&halve, Ok(8)), Some(Ok(4)));
///
/// let upstream = Fault::new("upstream failed");
/// assert_eq!(run_sync(&halve, Err(upstream.clone())), Some(Err(upstream)));
/// ```
pub fn barrier<F>(f: F) -> Barrier<F> {
    Barrier(f)
}

/// Fault guard, created via [`barrier()`] or [`Arrow::barrier`].
pub struct Barrier<F>(F);

impl<I, O, F> Arrow<Result<I, Fault>, Result<O, Fault>> for Barrier<F>
where
    F: Arrow<I, Result<O, Fault>>,
{
    fn call(&self, input: Result<I, Fault>, cont: Cont<Result<O, Fault>>, scope: Scope) {
        match input {
            Ok(input) => self.0.call(input, cont, scope),
            Err(fault) => {
                trace!(%fault, "barrier skipped step");
                cont(Err(fault), scope)
            }
        }
    }
}

/// Tag `f`'s output `Left` when it has a fault, `Right` otherwise.
///
/// A pair has a fault when either of its elements is one. The output type
/// must implement [`Faulty`]; primitives, strings, JSON values, collections,
/// `Option`, `Either` and `Result<_, Fault>` already do, and a type of your
/// own needs an impl whose `is_fault` returns `false`.
pub fn left_error<F>(f: F) -> LeftError<F> {
    LeftError(f)
}

/// Fault tagger, created via [`left_error()`] or [`Arrow::left_error`].
pub struct LeftError<F>(F);

impl<I, O, F> Arrow<I, Either<O, O>> for LeftError<F>
where
    F: Arrow<I, O>,
    O: Faulty + 'static,
{
    fn call(&self, input: I, cont: Cont<Either<O, O>>, scope: Scope) {
        self.0.call(
            input,
            Box::new(move |output, scope| {
                let tagged = if output.has_fault() {
                    Either::Left(output)
                } else {
                    Either::Right(output)
                };
                cont(tagged, scope)
            }),
            scope,
        );
    }
}

/// Step that rejects `(false, x)`.
pub type FalseError<F, T> = Then<F, Pure<fn((bool, T)) -> Result<(bool, T), Fault>>, (bool, T)>;

/// Turn `f`'s `(false, x)` output into a fault carrying `x`; `(true, x)` passes.
///
/// ```rust
/// use lifta::*;
///
/// let adult = false_error(lift(|age: u32| (age >= 18, age)));
/// assert_eq!(run_sync(&adult, 30), Some(Ok((true, 30))));
///
/// let fault = run_sync(&adult, 12).unwrap().unwrap_err();
/// assert_eq!(fault.payload(), Some(&serde_json::json!(12)));
/// ```
pub fn false_error<I, T, F>(f: F) -> FalseError<F, T>
where
    F: Arrow<I, (bool, T)>,
    T: Serialize,
{
    then(f, lift(reject_false::<T> as fn((bool, T)) -> _))
}

fn reject_false<T: Serialize>((flag, value): (bool, T)) -> Result<(bool, T), Fault> {
    if flag {
        Ok((flag, value))
    } else {
        Err(Fault::new("false result").with_payload(value))
    }
}

/// Step that surfaces a fault from the first element of a pair.
pub type PromoteError<F, A, B> =
    Then<F, Pure<fn((Result<A, Fault>, B)) -> Result<(A, B), Fault>>, (Result<A, Fault>, B)>;

/// When `f` outputs `(Err(fault), b)`, continue with that fault with `b`
/// appended to its context chain; otherwise continue with `Ok((a, b))`.
///
/// ```rust
/// use lifta::*;
///
/// let stage = promote_error(lift(|x: i32| {
///     let inner = if x < 0 { Err(Fault::new("negative")) } else { Ok(x) };
///     (inner, "stage one")
/// }));
///
/// assert_eq!(run_sync(&stage, 4), Some(Ok((4, "stage one"))));
/// let fault = run_sync(&stage, -1).unwrap().unwrap_err();
/// assert_eq!(fault.context(), &[serde_json::json!("stage one")]);
/// ```
pub fn promote_error<I, A, B, F>(f: F) -> PromoteError<F, A, B>
where
    F: Arrow<I, (Result<A, Fault>, B)>,
    B: Serialize,
{
    then(f, lift(promote::<A, B> as fn((Result<A, Fault>, B)) -> _))
}

fn promote<A, B: Serialize>((first, second): (Result<A, Fault>, B)) -> Result<(A, B), Fault> {
    match first {
        Ok(first) => Ok((first, second)),
        Err(fault) => Err(fault.promote(second)),
    }
}
