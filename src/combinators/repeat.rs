use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use tracing::trace;

use crate::{Arrow, Cont, Loop, Scope};

/// Run `body` until it continues with [`Loop::Done`].
///
/// There is no iteration limit; a body that always repeats never finishes.
/// Bodies that continue synchronously are driven in a loop rather than by
/// recursion, so long synchronous runs use constant stack.
///
/// ```rust
/// use lifta::*;
///
/// let count_up = repeat(lift(|x: i32| if x > 9 { Loop::Done(x) } else { Loop::Repeat(x + 1) }));
/// assert_eq!(run_sync(&count_up, 0), Some(10));
/// ```
pub fn repeat<F>(body: F) -> Repeat<F> {
    Repeat(Rc::new(body))
}

/// Loop driver, created via [`repeat()`] or [`Arrow::repeat`].
pub struct Repeat<F>(Rc<F>);

impl<I, O, F> Arrow<I, O> for Repeat<F>
where
    F: Arrow<I, Loop<I, O>> + 'static,
    I: 'static,
    O: 'static,
{
    fn call(&self, input: I, cont: Cont<O>, scope: Scope) {
        drive(Rc::clone(&self.0), input, cont, scope);
    }
}

enum Slot<T> {
    /// the body has not continued yet and the driver is still inside `call`
    Waiting,
    Ready(T, Scope),
    /// the driver returned; the body's continuation must resume the loop
    Detached,
}

fn drive<I, O, F>(body: Rc<F>, mut input: I, cont: Cont<O>, mut scope: Scope)
where
    F: Arrow<I, Loop<I, O>> + 'static,
    I: 'static,
    O: 'static,
{
    let cont = Rc::new(Cell::new(Some(cont)));
    let mut iteration = 0_u64;
    loop {
        iteration += 1;
        trace!(iteration, "repeat iteration");
        let slot = Rc::new(RefCell::new(Slot::Waiting));
        body.call(
            input,
            {
                let slot = Rc::clone(&slot);
                let body = Rc::clone(&body);
                let cont = Rc::clone(&cont);
                Box::new(move |signal, scope| {
                    let mut state = slot.borrow_mut();
                    if matches!(*state, Slot::Waiting) {
                        *state = Slot::Ready(signal, scope);
                    } else if matches!(*state, Slot::Detached) {
                        drop(state);
                        if let Some(cont) = cont.take() {
                            resume(body, signal, cont, scope);
                        }
                    }
                    // a second synchronous continuation is ignored
                })
            },
            scope,
        );

        let state = std::mem::replace(&mut *slot.borrow_mut(), Slot::Detached);
        match state {
            Slot::Ready(Loop::Repeat(next), next_scope) => {
                input = next;
                scope = next_scope;
            }
            Slot::Ready(Loop::Done(output), next_scope) => {
                if let Some(cont) = cont.take() {
                    cont(output, next_scope);
                }
                return;
            }
            Slot::Waiting | Slot::Detached => return,
        }
    }
}

fn resume<I, O, F>(body: Rc<F>, signal: Loop<I, O>, cont: Cont<O>, scope: Scope)
where
    F: Arrow<I, Loop<I, O>> + 'static,
    I: 'static,
    O: 'static,
{
    match signal {
        Loop::Repeat(next) => drive(body, next, cont, scope),
        Loop::Done(output) => cont(output, scope),
    }
}
