use std::{marker::PhantomData, rc::Rc};

use either::Either;

use crate::{Arrow, Cont, Scope};

/// Run `selector`, then dispatch its payload to `left` or `right` by tag.
///
/// ```rust
/// use lifta::*;
///
/// let small = |x: i32| if x < 10 { Either::Left(x) } else { Either::Right(x) };
/// let route = lor(lift(small), lift(|x: i32| x + 2), lift(|x: i32| x / 10));
///
/// assert_eq!(run_sync(&route, 3), Some(5));
/// assert_eq!(run_sync(&route, 70), Some(7));
/// ```
pub fn lor<I, X, Y, O, S, L, R>(selector: S, left: L, right: R) -> LeftOrRight<S, L, R, X, Y>
where
    S: Arrow<I, Either<X, Y>>,
    L: Arrow<X, O>,
    R: Arrow<Y, O>,
{
    LeftOrRight {
        selector,
        left: Rc::new(left),
        right: Rc::new(right),
        _phantom: PhantomData,
    }
}

/// Two-way branch, created via [`lor()`] or [`Arrow::lor`].
pub struct LeftOrRight<S, L, R, X, Y> {
    selector: S,
    left: Rc<L>,
    right: Rc<R>,
    _phantom: PhantomData<fn(X, Y)>,
}

impl<I, X, Y, O, S, L, R> Arrow<I, O> for LeftOrRight<S, L, R, X, Y>
where
    S: Arrow<I, Either<X, Y>>,
    L: Arrow<X, O> + 'static,
    R: Arrow<Y, O> + 'static,
    X: 'static,
    Y: 'static,
    O: 'static,
{
    fn call(&self, input: I, cont: Cont<O>, scope: Scope) {
        let left = Rc::clone(&self.left);
        let right = Rc::clone(&self.right);
        self.selector.call(
            input,
            Box::new(move |tagged, scope| match tagged {
                Either::Left(x) => left.call(x, cont, scope),
                Either::Right(y) => right.call(y, cont, scope),
            }),
            scope,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lift, lift_async, run_sync, run_with, step, testing::Clock};
    use std::cell::{Cell, RefCell};

    fn below_ten(x: i32) -> Either<i32, i32> {
        if x < 10 {
            Either::Left(x)
        } else {
            Either::Right(x)
        }
    }

    #[test]
    fn test_lor_dispatch() {
        let arrow = lift(below_ten).lor(lift(|x: i32| x + 2), lift(|x: i32| x / 10));
        assert_eq!(run_sync(&arrow, 3), Some(5));
        assert_eq!(run_sync(&arrow, 70), Some(7));
    }

    #[test]
    fn test_lor_runs_only_the_selected_side() {
        let ran_right = Rc::new(Cell::new(false));
        let right = {
            let ran_right = Rc::clone(&ran_right);
            step(move |x: i32, cont: Cont<i32>, scope: Scope| {
                ran_right.set(true);
                cont(x, scope)
            })
        };
        let arrow = lor(lift(below_ten), lift(|x: i32| x), right);

        assert_eq!(run_sync(&arrow, 1), Some(1));
        assert!(!ran_right.get());
    }

    #[test]
    fn test_lor_branch_types_may_differ() {
        let parse = |s: &'static str| match s.parse::<i64>() {
            Ok(n) => Either::Left(n),
            Err(_) => Either::Right(s),
        };
        let arrow = lor(
            lift(parse),
            lift(|n: i64| format!("number {n}")),
            lift(|s: &'static str| format!("word {s}")),
        );
        assert_eq!(run_sync(&arrow, "12").as_deref(), Some("number 12"));
        assert_eq!(run_sync(&arrow, "twelve").as_deref(), Some("word twelve"));
    }

    #[test]
    fn test_lor_async_selector() {
        let clock = Clock::new();
        let arrow = lor(
            lift_async(below_ten, clock.clone()),
            lift(|x: i32| x + 2),
            lift(|x: i32| x / 10),
        );

        let out = Rc::new(RefCell::new(Vec::new()));
        for x in [3, 70] {
            let out = Rc::clone(&out);
            run_with(&arrow, x, move |y, _| out.borrow_mut().push(y));
        }
        assert!(out.borrow().is_empty());

        clock.run_all();
        assert_eq!(&*out.borrow(), &[5, 7]);
    }
}
