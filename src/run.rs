//! Functions for driving arrows from outside a pipeline.
//!
//! Each entry point creates a fresh [`Scope`] for the run and hands it back,
//! so the caller can cancel whatever is still in flight.

use std::{
    cell::RefCell,
    future::Future,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll, Waker},
};

use tracing::trace;

use crate::{Arrow, Scope};

/// Start `arrow` on `input`, discarding its output.
pub fn run<I, O, A>(arrow: &A, input: I) -> Scope
where
    A: Arrow<I, O> + ?Sized,
{
    run_with(arrow, input, |_, _| {})
}

/// Start `arrow` on `input` with `cont` as the terminal continuation.
///
/// Returns the run's scope as soon as `arrow` stops making synchronous
/// progress; `cont` may already have been called by then, or may be called
/// later from a host callback.
pub fn run_with<I, O, A, K>(arrow: &A, input: I, cont: K) -> Scope
where
    A: Arrow<I, O> + ?Sized,
    K: FnOnce(O, Scope) + 'static,
{
    let scope = Scope::new();
    arrow.call(input, Box::new(cont), scope.clone());
    scope
}

/// Run `arrow` and return its output if it finished without suspending.
///
/// Returns `None` when any step deferred its continuation; the run is
/// cancelled in that case so nothing continues later.
///
/// ```rust
/// use lifta::*;
///
/// let arrow = lift(|x: i32| x * 3);
/// assert_eq!(run_sync(&arrow, 4), Some(12));
/// ```
pub fn run_sync<I, O, A>(arrow: &A, input: I) -> Option<O>
where
    A: Arrow<I, O> + ?Sized,
    O: 'static,
{
    let slot = Rc::new(RefCell::new(None));
    let scope = run_with(arrow, input, {
        let slot = Rc::clone(&slot);
        move |output, _| *slot.borrow_mut() = Some(output)
    });
    let output = slot.borrow_mut().take();
    if output.is_none() {
        trace!("arrow suspended, cancelling synchronous run");
        scope.cancel();
    }
    output
}

/// Run `arrow` and wait for its output as a [`Future`].
///
/// Whatever drives the host's callbacks must keep running for the future to
/// resolve. Dropping the future early cancels the run.
pub fn run_future<I, O, A>(arrow: &A, input: I) -> Completion<O>
where
    A: Arrow<I, O> + ?Sized,
    O: 'static,
{
    let state = Rc::new(RefCell::new(Pending {
        output: None,
        waker: None,
        finished: false,
    }));
    let scope = run_with(arrow, input, {
        let state = Rc::clone(&state);
        move |output, _| {
            let waker = {
                let mut state = state.borrow_mut();
                state.output = Some(output);
                state.finished = true;
                state.waker.take()
            };
            if let Some(waker) = waker {
                waker.wake();
            }
        }
    });
    Completion { state, scope }
}

struct Pending<O> {
    output: Option<O>,
    waker: Option<Waker>,
    finished: bool,
}

/// The output of a run, created via [`run_future()`].
pub struct Completion<O> {
    state: Rc<RefCell<Pending<O>>>,
    scope: Scope,
}

impl<O> Completion<O> {
    /// The scope the run was started with.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

impl<O> Future for Completion<O> {
    type Output = O;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<O> {
        let mut state = self.state.borrow_mut();
        match state.output.take() {
            Some(output) => Poll::Ready(output),
            None => {
                state.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

impl<O> Drop for Completion<O> {
    fn drop(&mut self) {
        let finished = self.state.borrow().finished;
        if !finished {
            trace!("completion dropped before the run finished");
            self.scope.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Cont, lift, lift_async, step,
        testing::{Clock, block_on},
    };
    use std::cell::Cell;

    #[test]
    fn test_run_discards_output() {
        let ran = Rc::new(Cell::new(false));
        let arrow = {
            let ran = Rc::clone(&ran);
            lift(move |x: i32| {
                ran.set(true);
                x
            })
        };
        let scope = run(&arrow, 1);
        assert!(ran.get());
        assert_eq!(scope.pending(), 0);
    }

    #[test]
    fn test_run_sync_returns_none_when_suspended() {
        let clock = Clock::new();
        let arrow = lift_async(|x: i32| x + 1, clock.clone());

        assert_eq!(run_sync(&arrow, 1), None);
        clock.run_all();
    }

    #[test]
    fn test_run_sync_on_shared_arrow() {
        let arrow = lift(|x: i32| x - 1).shared();
        assert_eq!(run_sync(&*arrow, 10), Some(9));
        assert_eq!(run_sync(&arrow, 10), Some(9));
    }

    #[test]
    fn test_run_future_sync_arrow() {
        let arrow = lift(|x: i32| x * 2).then(lift(|x: i32| x + 1));
        assert_eq!(block_on(run_future(&arrow, 20)), 41);
    }

    #[test]
    fn test_run_future_resolves_after_host_runs() {
        let clock = Clock::new();
        let arrow = lift_async(|s: &'static str| s.len(), clock.clone());

        let mut future = Box::pin(run_future(&arrow, "four"));
        let waker = Waker::noop();
        let mut cx = Context::from_waker(waker);
        assert_eq!(future.as_mut().poll(&mut cx), Poll::Pending);

        clock.run_all();
        assert_eq!(future.as_mut().poll(&mut cx), Poll::Ready(4));
    }

    #[test]
    fn test_dropping_completion_cancels_run() {
        let clock = Clock::new();
        let cleared = Rc::new(Cell::new(false));
        let arrow = {
            let clock = clock.clone();
            let cleared = Rc::clone(&cleared);
            step(move |x: i32, cont: Cont<i32>, scope: Scope| {
                let timer = clock.set_timeout(1, {
                    let scope = scope.clone();
                    move || cont(x, scope)
                });
                let clock = clock.clone();
                let cleared = Rc::clone(&cleared);
                scope.add(move || {
                    cleared.set(true);
                    clock.clear_timeout(timer);
                });
            })
        };

        let future = run_future(&arrow, 5);
        assert!(!future.scope().is_cancelled());
        drop(future);

        assert!(cleared.get());
        assert_eq!(clock.pending(), 0);
    }
}
