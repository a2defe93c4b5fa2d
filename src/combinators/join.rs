//! Splitting one run into two branches and joining their outputs by position.
//!
//! Both branches are started before either is required to finish. The join
//! continues once both outputs are in, always as `(left, right)` no matter
//! which side completed first.

use std::{cell::RefCell, rc::Rc};

use crate::{Arrow, Cont, Scope};

/// Output slots for a two-way join.
struct Join<A, B> {
    left: Option<A>,
    right: Option<B>,
    cont: Option<Cont<(A, B)>>,
}

type SharedJoin<A, B> = Rc<RefCell<Join<A, B>>>;

impl<A: 'static, B: 'static> Join<A, B> {
    fn shared(cont: Cont<(A, B)>) -> SharedJoin<A, B> {
        Rc::new(RefCell::new(Join {
            left: None,
            right: None,
            cont: Some(cont),
        }))
    }

    fn left_cont(join: &SharedJoin<A, B>) -> Cont<A> {
        let join = Rc::clone(join);
        Box::new(move |a, scope| {
            let ready = {
                let mut slots = join.borrow_mut();
                if slots.left.is_none() {
                    slots.left = Some(a);
                }
                slots.take_ready()
            };
            if let Some((pair, cont)) = ready {
                cont(pair, scope);
            }
        })
    }

    fn right_cont(join: &SharedJoin<A, B>) -> Cont<B> {
        let join = Rc::clone(join);
        Box::new(move |b, scope| {
            let ready = {
                let mut slots = join.borrow_mut();
                if slots.right.is_none() {
                    slots.right = Some(b);
                }
                slots.take_ready()
            };
            if let Some((pair, cont)) = ready {
                cont(pair, scope);
            }
        })
    }

    fn take_ready(&mut self) -> Option<((A, B), Cont<(A, B)>)> {
        if self.left.is_none() || self.right.is_none() {
            return None;
        }
        let cont = self.cont.take()?;
        let pair = (self.left.take()?, self.right.take()?);
        Some((pair, cont))
    }
}

/// Run two arrows on the same input.
///
/// ```rust
/// use lifta::*;
///
/// let both = fan(lift(|x: i32| x / 10), lift(|x: i32| x + 2));
/// assert_eq!(run_sync(&both, 20), Some((2, 22)));
/// ```
pub fn fan<F, G>(f: F, g: G) -> Fan<F, G> {
    Fan { f, g }
}

/// Parallel split with a positional join, created via [`fan()`] or [`Arrow::fan`].
pub struct Fan<F, G> {
    f: F,
    g: G,
}

impl<I, A, B, F, G> Arrow<I, (A, B)> for Fan<F, G>
where
    F: Arrow<I, A>,
    G: Arrow<I, B>,
    I: Clone,
    A: 'static,
    B: 'static,
{
    fn call(&self, input: I, cont: Cont<(A, B)>, scope: Scope) {
        let join = Join::shared(cont);
        self.f.call(input.clone(), Join::left_cont(&join), scope.clone());
        self.g.call(input, Join::right_cont(&join), scope);
    }
}

/// Run `f` on the first element of a pair and `g` on the second.
///
/// ```rust
/// use lifta::*;
///
/// let both = product(lift(|x: i32| x + 1), lift(|s: &'static str| s.len()));
/// assert_eq!(run_sync(&both, (1, "four")), Some((2, 4)));
/// ```
pub fn product<F, G>(f: F, g: G) -> Product<F, G> {
    Product { f, g }
}

/// Pairwise split, created via [`product()`] or [`Arrow::product`].
pub struct Product<F, G> {
    f: F,
    g: G,
}

impl<X, Y, A, B, F, G> Arrow<(X, Y), (A, B)> for Product<F, G>
where
    F: Arrow<X, A>,
    G: Arrow<Y, B>,
    A: 'static,
    B: 'static,
{
    fn call(&self, (x, y): (X, Y), cont: Cont<(A, B)>, scope: Scope) {
        let join = Join::shared(cont);
        self.f.call(x, Join::left_cont(&join), scope.clone());
        self.g.call(y, Join::right_cont(&join), scope);
    }
}

/// Apply `f` to the first element of a pair, carrying the second through.
pub fn first<F>(f: F) -> First<F> {
    First(f)
}

pub struct First<F>(F);

impl<A, B, C, F> Arrow<(A, C), (B, C)> for First<F>
where
    F: Arrow<A, B>,
    B: 'static,
    C: 'static,
{
    fn call(&self, (a, c): (A, C), cont: Cont<(B, C)>, scope: Scope) {
        self.0
            .call(a, Box::new(move |b, scope| cont((b, c), scope)), scope);
    }
}

/// Apply `f` to the second element of a pair, carrying the first through.
pub fn second<F>(f: F) -> Second<F> {
    Second(f)
}

pub struct Second<F>(F);

impl<A, B, C, F> Arrow<(C, A), (C, B)> for Second<F>
where
    F: Arrow<A, B>,
    B: 'static,
    C: 'static,
{
    fn call(&self, (c, a): (C, A), cont: Cont<(C, B)>, scope: Scope) {
        self.0
            .call(a, Box::new(move |b, scope| cont((c, b), scope)), scope);
    }
}
