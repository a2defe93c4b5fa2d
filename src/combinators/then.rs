use std::{marker::PhantomData, rc::Rc};

use crate::{Arrow, Cont, Scope};

/// Run the first arrow, then feed its output to the second.
///
/// The second arrow never starts before the first one continues. Both see the
/// same scope.
///
/// ```rust
/// use lifta::*;
///
/// let pipeline = then(lift(|x: i32| x + 1), lift(|x: i32| x * 2));
/// assert_eq!(run_sync(&pipeline, 3), Some(8));
/// ```
pub fn then<I, M, O, F, G>(f: F, g: G) -> Then<F, G, M>
where
    F: Arrow<I, M>,
    G: Arrow<M, O>,
{
    Then {
        f,
        g: Rc::new(g),
        _phantom: PhantomData,
    }
}

/// Sequential composition, created via [`then()`] or [`Arrow::then`].
pub struct Then<F, G, M> {
    f: F,
    g: Rc<G>,
    _phantom: PhantomData<fn(M)>,
}

impl<I, M, O, F, G> Arrow<I, O> for Then<F, G, M>
where
    F: Arrow<I, M>,
    G: Arrow<M, O> + 'static,
    M: 'static,
    O: 'static,
{
    fn call(&self, input: I, cont: Cont<O>, scope: Scope) {
        let g = Rc::clone(&self.g);
        self.f.call(
            input,
            Box::new(move |mid, scope| g.call(mid, cont, scope)),
            scope,
        );
    }
}
