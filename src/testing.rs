//! Test support: a virtual clock and a minimal executor.

use std::{
    cell::RefCell,
    collections::BTreeMap,
    future::Future,
    rc::Rc,
    sync::Arc,
    task::{Context, Poll, Wake, Waker},
};

use crate::{Schedule, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimerId(u64, u64);

#[derive(Default)]
struct Timers {
    now: u64,
    seq: u64,
    queue: BTreeMap<(u64, u64), Task>,
}

/// Fake timers. Nothing runs until the clock is driven.
#[derive(Clone, Default)]
pub struct Clock(Rc<RefCell<Timers>>);

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_timeout<F>(&self, delay: u64, task: F) -> TimerId
    where
        F: FnOnce() + 'static,
    {
        let mut timers = self.0.borrow_mut();
        let key = (timers.now + delay, timers.seq);
        timers.seq += 1;
        timers.queue.insert(key, Box::new(task));
        TimerId(key.0, key.1)
    }

    pub fn clear_timeout(&self, id: TimerId) {
        self.0.borrow_mut().queue.remove(&(id.0, id.1));
    }

    pub fn now(&self) -> u64 {
        self.0.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.0.borrow().queue.len()
    }

    /// Fire timers in due order, including ones scheduled while running,
    /// until none are left.
    pub fn run_all(&self) {
        loop {
            let next = {
                let mut timers = self.0.borrow_mut();
                let next = timers.queue.pop_first();
                if let Some(((due, _), _)) = &next {
                    timers.now = *due;
                }
                next
            };
            match next {
                Some((_, task)) => task(),
                None => return,
            }
        }
    }
}

impl Schedule for Clock {
    fn schedule(&self, task: Task) {
        self.set_timeout(0, task);
    }
}

pub fn block_on<F: Future>(future: F) -> F::Output {
    struct Noop;
    impl Wake for Noop {
        fn wake(self: Arc<Self>) {}
    }

    let waker = Waker::from(Arc::new(Noop));
    let mut context = Context::from_waker(&waker);
    let mut future = Box::pin(future);

    loop {
        match Future::poll(future.as_mut(), &mut context) {
            Poll::Ready(value) => return value,
            Poll::Pending => std::thread::yield_now(),
        }
    }
}

/// Route `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timers_fire_in_due_order() {
        let clock = Clock::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for (delay, name) in [(5, "late"), (0, "soon"), (1, "middle")] {
            let order = Rc::clone(&order);
            clock.set_timeout(delay, move || order.borrow_mut().push(name));
        }

        clock.run_all();

        assert_eq!(&*order.borrow(), &["soon", "middle", "late"]);
        assert_eq!(clock.now(), 5);
    }

    #[test]
    fn test_cleared_timer_never_fires() {
        let clock = Clock::new();
        let id = clock.set_timeout(0, || panic!("cleared timer fired"));
        clock.clear_timeout(id);
        clock.run_all();
        assert_eq!(clock.pending(), 0);
    }
}
