//! Cooperative cancellation.
//!
//! A [`Scope`] is created fresh for every top-level run and threaded through
//! the whole pipeline. Steps that start work they may need to tear down
//! (a pending timer, a host callback) register a cleanup with [`Scope::add`]
//! and retire it with [`Scope::advance`] once they finish. Races cancel the
//! losing branch by advancing whatever that branch left registered.
//!
//! ```rust
//! use lifta::Scope;
//! use std::{cell::Cell, rc::Rc};
//!
//! let scope = Scope::new();
//! let fired = Rc::new(Cell::new(0));
//! let token = scope.add({
//!     let fired = Rc::clone(&fired);
//!     move || fired.set(fired.get() + 1)
//! });
//!
//! assert!(scope.advance(token));
//! assert!(!scope.advance(token)); // already retired
//! assert_eq!(fired.get(), 1);
//! ```

use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use tracing::trace;

/// A registered cleanup callback.
pub type Cleanup = Box<dyn FnOnce()>;

/// Handle to one cleanup registered with a [`Scope`].
///
/// Tokens are only meaningful for the scope that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(usize);

impl Token {
    pub(crate) fn as_usize(&self) -> usize {
        self.0
    }
}

/// Shared registry of pending cleanups for one run.
///
/// Cloning a `Scope` clones the handle, not the registry.
#[derive(Clone, Default)]
pub struct Scope(Rc<RefCell<Registry>>);

#[derive(Default)]
struct Registry {
    // live cleanups only; an entry leaves the map when advanced or dismissed
    cleanups: HashMap<usize, Cleanup>,
    next: usize,
    cancelled: bool,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cleanup and return the token that retires it.
    ///
    /// If the scope was already cancelled the cleanup runs immediately and the
    /// returned token is dead.
    pub fn add<F>(&self, cleanup: F) -> Token
    where
        F: FnOnce() + 'static,
    {
        let mut registry = self.0.borrow_mut();
        let token = Token(registry.next);
        registry.next += 1;
        if registry.cancelled {
            drop(registry);
            trace!(token = token.as_usize(), "scope cancelled, running cleanup on add");
            cleanup();
        } else {
            registry.cleanups.insert(token.0, Box::new(cleanup));
            trace!(token = token.as_usize(), "cleanup registered");
        }
        token
    }

    /// Run and retire the cleanup behind `token`.
    ///
    /// Returns `false` without doing anything if the token was already
    /// advanced, dismissed, or never issued by this scope.
    pub fn advance(&self, token: Token) -> bool {
        match self.take(token) {
            Some(cleanup) => {
                trace!(token = token.as_usize(), "advancing cleanup");
                cleanup();
                true
            }
            None => false,
        }
    }

    /// Retire the cleanup behind `token` without running it.
    pub fn dismiss(&self, token: Token) -> bool {
        self.take(token).is_some()
    }

    /// Advance every pending cleanup in registration order and mark the scope
    /// cancelled. Later registrations run as soon as they are added.
    pub fn cancel(&self) {
        let mut drained: Vec<(usize, Cleanup)> = {
            let mut registry = self.0.borrow_mut();
            registry.cancelled = true;
            registry.cleanups.drain().collect()
        };
        drained.sort_unstable_by_key(|(token, _)| *token);
        trace!(pending = drained.len(), "cancelling scope");
        for (_, cleanup) in drained {
            cleanup();
        }
    }

    pub fn is_pending(&self, token: Token) -> bool {
        self.0.borrow().cleanups.contains_key(&token.0)
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.borrow().cancelled
    }

    /// Number of cleanups still waiting to be advanced.
    pub fn pending(&self) -> usize {
        self.0.borrow().cleanups.len()
    }

    fn take(&self, token: Token) -> Option<Cleanup> {
        // the borrow must end before the cleanup runs; cleanups may re-enter
        self.0.borrow_mut().cleanups.remove(&token.0)
    }

    /// Capacity held by the registry, live or not.
    #[cfg(test)]
    pub(crate) fn footprint(&self) -> usize {
        self.0.borrow().cleanups.capacity()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("pending", &self.pending())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
        let count = Rc::new(Cell::new(0));
        let bump = {
            let count = Rc::clone(&count);
            move || count.set(count.get() + 1)
        };
        (count, bump)
    }

    #[test]
    fn test_advance_runs_cleanup_once() {
        let scope = Scope::new();
        let (count, bump) = counter();
        let token = scope.add(bump);

        assert!(scope.is_pending(token));
        assert!(scope.advance(token));
        assert!(!scope.advance(token));
        assert!(!scope.is_pending(token));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_advance_unknown_token_is_noop() {
        let scope = Scope::new();
        assert!(!scope.advance(Token(42)));
        assert_eq!(scope.pending(), 0);
    }

    #[test]
    fn test_advance_only_touches_its_own_cleanup() {
        let scope = Scope::new();
        let (first, bump_first) = counter();
        let (second, bump_second) = counter();
        let a = scope.add(bump_first);
        let _b = scope.add(bump_second);

        scope.advance(a);

        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 0);
        assert_eq!(scope.pending(), 1);
    }

    #[test]
    fn test_dismiss_retires_without_running() {
        let scope = Scope::new();
        let (count, bump) = counter();
        let token = scope.add(bump);

        assert!(scope.dismiss(token));
        assert!(!scope.advance(token));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_cancel_runs_pending_in_order() {
        let scope = Scope::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let order = Rc::clone(&order);
            scope.add(move || order.borrow_mut().push(i));
        }
        let retired = scope.add(|| panic!("advanced cleanup must not rerun"));
        scope.dismiss(retired);

        scope.cancel();

        assert_eq!(&*order.borrow(), &[0, 1, 2]);
        assert!(scope.is_cancelled());
        assert_eq!(scope.pending(), 0);
    }

    #[test]
    fn test_add_after_cancel_runs_immediately() {
        let scope = Scope::new();
        scope.cancel();
        let (count, bump) = counter();
        let token = scope.add(bump);

        assert_eq!(count.get(), 1);
        assert!(!scope.is_pending(token));
    }

    #[test]
    fn test_cleanup_may_reenter_scope() {
        let scope = Scope::new();
        let (count, bump) = counter();
        let inner = scope.add(bump);
        let outer = scope.add({
            let scope = scope.clone();
            move || {
                scope.advance(inner);
            }
        });

        assert!(scope.advance(outer));
        assert_eq!(count.get(), 1);
        assert_eq!(scope.pending(), 0);
    }

    #[test]
    fn test_retired_cleanups_release_their_slots() {
        let scope = Scope::new();
        for _ in 0..10_000 {
            let (_, bump) = counter();
            let token = scope.add(bump);
            scope.advance(token);
            let token = scope.add(|| {});
            scope.dismiss(token);
        }

        assert_eq!(scope.pending(), 0);
        assert!(scope.footprint() < 16);
    }

    #[test]
    fn test_clones_share_registry() {
        let scope = Scope::new();
        let other = scope.clone();
        let (count, bump) = counter();
        let token = scope.add(bump);

        assert!(other.advance(token));
        assert_eq!(count.get(), 1);
    }
}
