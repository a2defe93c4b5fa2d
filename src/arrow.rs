//! The continuation-passing step every combinator consumes and produces.
//!
//! An [`Arrow<I, O>`] is called with an input, a continuation and the run's
//! [`Scope`]. It eventually hands its output to the continuation, either
//! before `call` returns or later from a host callback. A cancelled step may
//! never call it at all.
//!
//! ```rust
//! use lifta::prelude::*;
//!
//! let pipeline = lift(|x: i32| x + 1).then(lift(|x: i32| x * 10));
//! assert_eq!(run_sync(&pipeline, 4), Some(50));
//! ```

use std::rc::Rc;

use either::Either;
use serde::Serialize;

use crate::{
    Fault, Faulty, Negate, Scope,
    combinators::{
        And, Barrier, FalseError, Fan, First, LeftError, LeftOrRight, Not, Or, Product,
        PromoteError, Race, Repeat, Second, Then, When, and, barrier, either, false_error, fan,
        first, left_error, lor, not, or, product, promote_error, repeat, second, then, when_false,
        when_true,
    },
};

/// Receives a step's output together with the scope it ran in.
pub type Cont<O> = Box<dyn FnOnce(O, Scope)>;

/// Type-erased, shareable arrow.
pub type SharedArrow<I, O> = Rc<dyn Arrow<I, O>>;

/// A composable step: `(input, continuation, scope)`.
pub trait Arrow<I, O> {
    /// Run the step on `input`, eventually passing the output to `cont`.
    fn call(&self, input: I, cont: Cont<O>, scope: Scope);

    /// Erase the concrete type behind a reference-counted handle.
    fn shared(self) -> SharedArrow<I, O>
    where
        Self: Sized + 'static,
    {
        Rc::new(self)
    }

    /// Run `g` on this step's output.
    fn then<O2, G>(self, g: G) -> Then<Self, G, O>
    where
        Self: Sized,
        G: Arrow<O, O2>,
    {
        then(self, g)
    }

    /// Run this step and `g` on the same input; continue with both outputs in order.
    fn fan<O2, G>(self, g: G) -> Fan<Self, G>
    where
        Self: Sized,
        G: Arrow<I, O2>,
        I: Clone,
    {
        fan(self, g)
    }

    /// Run this step on the first element of a pair and `g` on the second.
    fn product<I2, O2, G>(self, g: G) -> Product<Self, G>
    where
        Self: Sized,
        G: Arrow<I2, O2>,
    {
        product(self, g)
    }

    /// Race this step against `g`; the first to continue wins.
    fn either<G>(self, g: G) -> Race<Self, G>
    where
        Self: Sized,
        G: Arrow<I, O>,
        I: Clone,
    {
        either(self, g)
    }

    /// Apply this step to the first element of a pair.
    fn first(self) -> First<Self>
    where
        Self: Sized,
    {
        first(self)
    }

    /// Apply this step to the second element of a pair.
    fn second(self) -> Second<Self>
    where
        Self: Sized,
    {
        second(self)
    }

    /// Loop this step while it continues with [`Loop::Repeat`](crate::Loop::Repeat).
    fn repeat(self) -> Repeat<Self>
    where
        Self: Sized,
    {
        repeat(self)
    }

    /// Use this step as a selector dispatching to `left` or `right`.
    fn lor<X, Y, O2, L, R>(self, left: L, right: R) -> LeftOrRight<Self, L, R, X, Y>
    where
        Self: Sized + Arrow<I, Either<X, Y>>,
        L: Arrow<X, O2>,
        R: Arrow<Y, O2>,
    {
        lor(self, left, right)
    }

    /// Skip this step when its input is already a fault.
    fn barrier(self) -> Barrier<Self>
    where
        Self: Sized,
    {
        barrier(self)
    }

    /// Tag this step's output `Left` when it carries a fault, `Right` otherwise.
    fn left_error(self) -> LeftError<Self>
    where
        Self: Sized,
        O: Faulty,
    {
        left_error(self)
    }

    /// Turn a `(false, x)` output into a fault carrying `x`.
    fn false_error<T>(self) -> FalseError<Self, T>
    where
        Self: Sized + Arrow<I, (bool, T)>,
        T: Serialize,
    {
        false_error(self)
    }

    /// Fold the second element of a pair into a fault in the first.
    fn promote_error<A, B>(self) -> PromoteError<Self, A, B>
    where
        Self: Sized + Arrow<I, (Result<A, Fault>, B)>,
        B: Serialize,
    {
        promote_error(self)
    }

    /// `(b1 || b2, c1)` over this step and `g`.
    fn or<C, D, G>(self, g: G) -> Or<Self, G, C, D>
    where
        Self: Sized + Arrow<I, (bool, C)>,
        G: Arrow<I, (bool, D)>,
        I: Clone,
        C: 'static,
        D: 'static,
    {
        or(self, g)
    }

    /// `(b1 && b2, c1)` over this step and `g`.
    fn and<C, D, G>(self, g: G) -> And<Self, G, C, D>
    where
        Self: Sized + Arrow<I, (bool, C)>,
        G: Arrow<I, (bool, D)>,
        I: Clone,
        C: 'static,
        D: 'static,
    {
        and(self, g)
    }

    /// Negate this step's boolean output.
    fn not(self) -> Not<Self, O>
    where
        Self: Sized,
        O: Negate,
    {
        not(self)
    }

    /// Run `g` on this step's `(bool, c)` output when the flag is `true`.
    fn when_true<C, G>(self, g: G) -> When<Self, G, C>
    where
        Self: Sized + Arrow<I, (bool, C)>,
        G: Arrow<(bool, C), (bool, C)>,
    {
        when_true(self, g)
    }

    /// Run `g` on this step's `(bool, c)` output when the flag is `false`.
    fn when_false<C, G>(self, g: G) -> When<Self, G, C>
    where
        Self: Sized + Arrow<I, (bool, C)>,
        G: Arrow<(bool, C), (bool, C)>,
    {
        when_false(self, g)
    }
}

impl<I, O, A> Arrow<I, O> for Rc<A>
where
    A: Arrow<I, O> + ?Sized,
{
    fn call(&self, input: I, cont: Cont<O>, scope: Scope) {
        (**self).call(input, cont, scope)
    }
}

impl<I, O, A> Arrow<I, O> for Box<A>
where
    A: Arrow<I, O> + ?Sized,
{
    fn call(&self, input: I, cont: Cont<O>, scope: Scope) {
        (**self).call(input, cont, scope)
    }
}

impl<I, O, A> Arrow<I, O> for &'_ A
where
    A: Arrow<I, O> + ?Sized,
{
    fn call(&self, input: I, cont: Cont<O>, scope: Scope) {
        (**self).call(input, cont, scope)
    }
}
