//! Predicates over `(bool, context)` outputs.
//!
//! `or` and `and` run both predicates, then reduce the two pairs into one. The
//! context always comes from the left predicate.

use crate::{Arrow, Cont, Fan, Pure, Scope, Then, fan, lift, then};

/// Outputs whose leading boolean can be flipped by [`not`].
pub trait Negate {
    fn negate(self) -> Self;
}

impl Negate for bool {
    fn negate(self) -> Self {
        !self
    }
}

impl<C> Negate for (bool, C) {
    fn negate(self) -> Self {
        (!self.0, self.1)
    }
}

/// Fan `f` and `g` over one input and combine both outputs with `reduce`.
///
/// ```rust
/// use lifta::*;
///
/// let spread = fan_and_reduce(
///     lift(|x: i32| x - 1),
///     lift(|x: i32| x + 1),
///     |(lo, hi): (i32, i32)| hi - lo,
/// );
/// assert_eq!(run_sync(&spread, 10), Some(2));
/// ```
pub fn fan_and_reduce<I, A, B, O, F, G, R>(
    f: F,
    g: G,
    reduce: R,
) -> Then<Fan<F, G>, Pure<R>, (A, B)>
where
    F: Arrow<I, A>,
    G: Arrow<I, B>,
    R: Fn((A, B)) -> O,
    I: Clone,
    A: 'static,
    B: 'static,
{
    then(fan(f, g), lift(reduce))
}

type Reduce<C, D> = fn(((bool, C), (bool, D))) -> (bool, C);

/// Disjunction of two predicates, created via [`or()`] or [`Arrow::or`].
pub type Or<F, G, C, D> = Then<Fan<F, G>, Pure<Reduce<C, D>>, ((bool, C), (bool, D))>;

/// Conjunction of two predicates, created via [`and()`] or [`Arrow::and`].
pub type And<F, G, C, D> = Or<F, G, C, D>;

/// `(b1 || b2, c1)` for `f(x) = (b1, c1)` and `g(x) = (b2, c2)`.
///
/// Both predicates always run.
///
/// ```rust
/// use lifta::*;
///
/// let big = lift(|x: i32| (x > 100, "big"));
/// let even = lift(|x: i32| (x % 2 == 0, "even"));
/// let either_one = or(big, even);
///
/// assert_eq!(run_sync(&either_one, 4), Some((true, "big")));
/// assert_eq!(run_sync(&either_one, 3), Some((false, "big")));
/// ```
pub fn or<I, C, D, F, G>(f: F, g: G) -> Or<F, G, C, D>
where
    F: Arrow<I, (bool, C)>,
    G: Arrow<I, (bool, D)>,
    I: Clone,
    C: 'static,
    D: 'static,
{
    fan_and_reduce(f, g, reduce_or::<C, D> as Reduce<C, D>)
}

/// `(b1 && b2, c1)` for `f(x) = (b1, c1)` and `g(x) = (b2, c2)`.
///
/// Both predicates always run.
pub fn and<I, C, D, F, G>(f: F, g: G) -> And<F, G, C, D>
where
    F: Arrow<I, (bool, C)>,
    G: Arrow<I, (bool, D)>,
    I: Clone,
    C: 'static,
    D: 'static,
{
    fan_and_reduce(f, g, reduce_and::<C, D> as Reduce<C, D>)
}

fn reduce_or<C, D>(((b1, c1), (b2, _)): ((bool, C), (bool, D))) -> (bool, C) {
    (b1 || b2, c1)
}

fn reduce_and<C, D>(((b1, c1), (b2, _)): ((bool, C), (bool, D))) -> (bool, C) {
    (b1 && b2, c1)
}

/// Negated predicate, created via [`not()`] or [`Arrow::not`].
pub type Not<F, O> = Then<F, Pure<fn(O) -> O>, O>;

/// Flip the boolean `f` produces, keeping any context.
///
/// ```rust
/// use lifta::*;
///
/// let odd = not(lift(|x: i32| (x % 2 == 0, x)));
/// assert_eq!(run_sync(&odd, 3), Some((true, 3)));
/// ```
pub fn not<I, O, F>(f: F) -> Not<F, O>
where
    F: Arrow<I, O>,
    O: Negate,
{
    then(f, lift(O::negate as fn(O) -> O))
}

/// Predicate with a gated follow-on step, created via [`when_true()`] /
/// [`when_false()`].
pub type When<F, G, C> = Then<F, Gate<G>, (bool, C)>;

/// Run `g` on `f`'s `(bool, c)` output when the flag is `true`; pass the pair
/// through unchanged when it is `false`.
///
/// ```rust
/// use lifta::*;
///
/// let positive = lift(|x: i32| (x > 0, x));
/// let double = lift(|(flag, x): (bool, i32)| (flag, x * 2));
/// let arrow = when_true(positive, double);
///
/// assert_eq!(run_sync(&arrow, 4), Some((true, 8)));
/// assert_eq!(run_sync(&arrow, -4), Some((false, -4)));
/// ```
pub fn when_true<I, C, F, G>(f: F, g: G) -> When<F, G, C>
where
    F: Arrow<I, (bool, C)>,
    G: Arrow<(bool, C), (bool, C)>,
{
    then(f, Gate { branch: g, when: true })
}

/// Run `g` on `f`'s `(bool, c)` output when the flag is `false`.
pub fn when_false<I, C, F, G>(f: F, g: G) -> When<F, G, C>
where
    F: Arrow<I, (bool, C)>,
    G: Arrow<(bool, C), (bool, C)>,
{
    then(f, Gate { branch: g, when: false })
}

pub struct Gate<G> {
    branch: G,
    when: bool,
}

impl<C, G> Arrow<(bool, C), (bool, C)> for Gate<G>
where
    G: Arrow<(bool, C), (bool, C)>,
{
    fn call(&self, input: (bool, C), cont: Cont<(bool, C)>, scope: Scope) {
        if input.0 == self.when {
            self.branch.call(input, cont, scope)
        } else {
            cont(input, scope)
        }
    }
}
