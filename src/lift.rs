//! Turning functions into arrows.
//!
//! Plain unary closures become arrows with [`lift`]; closures that already
//! speak the continuation protocol become arrows with [`step`]. [`Func`] is the
//! tagged form for callers that hold functions of mixed shape and want the
//! lifting decision made (and cached) at runtime.

use std::{cell::OnceCell, fmt, rc::Rc};

use tracing::debug;

use crate::{
    Arrow, Cont, LiftError, Negate, Scope, SharedArrow,
    combinators::{Not, not},
};

/// A unary function lifted into an arrow. Continues immediately with its result.
#[derive(Clone, Copy)]
pub struct Pure<F>(F);

impl<I, O, F> Arrow<I, O> for Pure<F>
where
    F: Fn(I) -> O,
{
    fn call(&self, input: I, cont: Cont<O>, scope: Scope) {
        cont((self.0)(input), scope)
    }
}

/// Lift a unary function into an arrow.
///
/// ```rust
/// use lifta::*;
///
/// let add_two = lift(|x: i32| x + 2);
/// assert_eq!(run_sync(&add_two, 3), Some(5));
/// ```
pub fn lift<F>(f: F) -> Pure<F> {
    Pure(f)
}

/// A closure that already takes `(input, continuation, scope)`.
#[derive(Clone, Copy)]
pub struct StepFn<F>(F);

impl<I, O, F> Arrow<I, O> for StepFn<F>
where
    F: Fn(I, Cont<O>, Scope),
{
    fn call(&self, input: I, cont: Cont<O>, scope: Scope) {
        (self.0)(input, cont, scope)
    }
}

/// Use a continuation-style closure as an arrow as-is.
///
/// ```rust
/// use lifta::*;
///
/// let echo = step(|x: u8, cont: Cont<u8>, scope: Scope| cont(x, scope));
/// assert_eq!(run_sync(&echo, 7), Some(7));
/// ```
pub fn step<F>(f: F) -> StepFn<F> {
    StepFn(f)
}

/// The shape of a function held by a [`Func`].
pub enum Callable<I, O> {
    Nullary(Rc<dyn Fn() -> O>),
    Unary(Rc<dyn Fn(I) -> O>),
    Binary(Rc<dyn Fn(I, I) -> O>),
    Step(SharedArrow<I, O>),
}

impl<I, O> Callable<I, O> {
    /// Number of formal parameters.
    pub fn arity(&self) -> usize {
        match self {
            Callable::Nullary(_) => 0,
            Callable::Unary(_) => 1,
            Callable::Binary(_) => 2,
            Callable::Step(_) => 3,
        }
    }
}

/// A function value with its lifted arrow cached alongside it.
///
/// Lifting is idempotent: every successful [`lift`](Func::lift) returns the
/// same shared arrow, and a step lifts to itself.
///
/// ```rust
/// use lifta::*;
/// use std::rc::Rc;
///
/// let double = Func::unary(|x: i32| x * 2);
/// let a = double.lift().unwrap();
/// let b = double.lift().unwrap();
/// assert!(Rc::ptr_eq(&a, &b));
///
/// let product = Func::binary(|x: i32, y: i32| x * y);
/// assert_eq!(product.lift().err(), Some(LiftError::ParameterCount { arity: 2 }));
/// ```
pub struct Func<I, O> {
    callable: Callable<I, O>,
    lifted: OnceCell<SharedArrow<I, O>>,
    negated: Option<SharedArrow<I, O>>,
}

impl<I: 'static, O: 'static> Func<I, O> {
    pub fn new(callable: Callable<I, O>) -> Self {
        Func {
            callable,
            lifted: OnceCell::new(),
            negated: None,
        }
    }

    pub fn nullary<F>(f: F) -> Self
    where
        F: Fn() -> O + 'static,
    {
        Self::new(Callable::Nullary(Rc::new(f)))
    }

    pub fn unary<F>(f: F) -> Self
    where
        F: Fn(I) -> O + 'static,
    {
        Self::new(Callable::Unary(Rc::new(f)))
    }

    pub fn binary<F>(f: F) -> Self
    where
        F: Fn(I, I) -> O + 'static,
    {
        Self::new(Callable::Binary(Rc::new(f)))
    }

    /// Wrap a continuation-style closure.
    pub fn step<F>(f: F) -> Self
    where
        F: Fn(I, Cont<O>, Scope) + 'static,
    {
        Self::from_arrow(Rc::new(StepFn(f)))
    }

    /// Wrap an existing arrow. It is its own lifted form.
    pub fn from_arrow(arrow: SharedArrow<I, O>) -> Self {
        Self::new(Callable::Step(arrow))
    }

    pub fn callable(&self) -> &Callable<I, O> {
        &self.callable
    }

    pub fn arity(&self) -> usize {
        self.callable.arity()
    }

    /// Whether a lifted arrow has been cached yet.
    pub fn is_lifted(&self) -> bool {
        self.lifted.get().is_some()
    }

    /// The canonical arrow for this function.
    pub fn lift(&self) -> Result<SharedArrow<I, O>, LiftError> {
        if let Some(arrow) = self.lifted.get() {
            return Ok(Rc::clone(arrow));
        }
        let arrow: SharedArrow<I, O> = match &self.callable {
            Callable::Step(arrow) => Rc::clone(arrow),
            Callable::Unary(f) => {
                let f = Rc::clone(f);
                Rc::new(Pure(move |input: I| f(input)))
            }
            Callable::Nullary(f) => {
                let f = Rc::clone(f);
                Rc::new(Pure(move |_: I| f()))
            }
            Callable::Binary(_) => {
                let arity = self.arity();
                debug!(arity, "refusing to lift function");
                return Err(LiftError::ParameterCount { arity });
            }
        };
        Ok(Rc::clone(self.lifted.get_or_init(|| arrow)))
    }
}

impl<I: 'static, O: Negate + 'static> Func<I, O> {
    /// Install a precomputed negation returned by [`not`](Func::not).
    pub fn set_not(&mut self, negated: SharedArrow<I, O>) {
        self.negated = Some(negated);
    }

    pub fn clear_not(&mut self) {
        self.negated = None;
    }

    /// The lifted arrow with its boolean output negated, or the override
    /// installed with [`set_not`](Func::set_not).
    pub fn not(&self) -> Result<SharedArrow<I, O>, LiftError> {
        if let Some(negated) = &self.negated {
            return Ok(Rc::clone(negated));
        }
        let negated: Not<SharedArrow<I, O>, O> = not(self.lift()?);
        Ok(Rc::new(negated))
    }
}

impl<I, O> fmt::Debug for Func<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Func")
            .field("arity", &self.callable.arity())
            .field("lifted", &self.lifted.get().is_some())
            .field("not_overridden", &self.negated.is_some())
            .finish()
    }
}
