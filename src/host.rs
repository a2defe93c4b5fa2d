//! The seam between arrows and whatever event loop drives them.
//!
//! Combinators never suspend on their own. Only leaf steps do, by handing a
//! task to a [`Schedule`] implementation that runs it on a later turn.

use std::{cell::Cell, rc::Rc};

use tracing::trace;

use crate::{Arrow, Cont, Scope};

/// Deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// A host event loop that can run a task on a later turn.
pub trait Schedule {
    fn schedule(&self, task: Task);
}

impl<S> Schedule for Rc<S>
where
    S: Schedule + ?Sized,
{
    fn schedule(&self, task: Task) {
        (**self).schedule(task)
    }
}

impl<S> Schedule for &'_ S
where
    S: Schedule + ?Sized,
{
    fn schedule(&self, task: Task) {
        (**self).schedule(task)
    }
}

/// A unary function whose continuation runs on a later turn of the host.
///
/// While pending it holds a cleanup in the scope; cancelling the scope drops
/// the result instead of continuing with it.
pub struct Deferred<F, S> {
    f: Rc<F>,
    host: S,
}

/// Lift a unary function into an arrow that continues asynchronously.
pub fn lift_async<F, S>(f: F, host: S) -> Deferred<F, S>
where
    S: Schedule,
{
    Deferred {
        f: Rc::new(f),
        host,
    }
}

impl<I, O, F, S> Arrow<I, O> for Deferred<F, S>
where
    F: Fn(I) -> O + 'static,
    S: Schedule,
    I: 'static,
    O: 'static,
{
    fn call(&self, input: I, cont: Cont<O>, scope: Scope) {
        let live = Rc::new(Cell::new(true));
        let token = scope.add({
            let live = Rc::clone(&live);
            move || live.set(false)
        });
        let f = Rc::clone(&self.f);
        self.host.schedule(Box::new(move || {
            if !live.get() {
                trace!("deferred step cancelled before it ran");
                return;
            }
            scope.dismiss(token);
            cont(f(input), scope);
        }));
    }
}
