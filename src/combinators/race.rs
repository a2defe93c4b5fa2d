//! Racing two arrows against each other.

use std::{cell::RefCell, rc::Rc};

use tracing::debug;

use crate::{Arrow, Cont, Scope, Token};

/// Run `f` and `g` on the same input; whichever continues first wins.
///
/// Each branch runs in its own child scope. When one branch continues, the
/// other branch's scope is cancelled (so any cleanup it registered runs
/// exactly once) before the winner's output is passed downstream with the
/// parent scope. Anything the loser sends afterwards is dropped. If neither
/// branch ever continues, neither does the race.
pub fn either<F, G>(f: F, g: G) -> Race<F, G> {
    Race { f, g }
}

/// A race between two arrows, created via [`either()`] or [`Arrow::either`].
pub struct Race<F, G> {
    f: F,
    g: G,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

struct Referee<O> {
    cont: Option<Cont<O>>,
    parent: Scope,
    token: Token,
    left: Scope,
    right: Scope,
}

impl<O: 'static> Referee<O> {
    fn branch_cont(referee: &Rc<RefCell<Referee<O>>>, side: Side) -> Cont<O> {
        let referee = Rc::clone(referee);
        Box::new(move |output, _branch_scope| {
            let decided = {
                let mut r = referee.borrow_mut();
                r.cont.take().map(|cont| {
                    let loser = match side {
                        Side::Left => r.right.clone(),
                        Side::Right => r.left.clone(),
                    };
                    (cont, loser, r.parent.clone(), r.token)
                })
            };
            let Some((cont, loser, parent, token)) = decided else {
                debug!(?side, "race already decided, dropping late result");
                return;
            };
            debug!(?side, "race decided");
            parent.dismiss(token);
            loser.cancel();
            cont(output, parent);
        })
    }
}

impl<I, O, F, G> Arrow<I, O> for Race<F, G>
where
    F: Arrow<I, O>,
    G: Arrow<I, O>,
    I: Clone,
    O: 'static,
{
    fn call(&self, input: I, cont: Cont<O>, scope: Scope) {
        let left = Scope::new();
        let right = Scope::new();
        // cancelling the parent tears down both branches
        let token = scope.add({
            let (left, right) = (left.clone(), right.clone());
            move || {
                left.cancel();
                right.cancel();
            }
        });
        let referee = Rc::new(RefCell::new(Referee {
            cont: Some(cont),
            parent: scope,
            token,
            left: left.clone(),
            right: right.clone(),
        }));

        self.f.call(
            input.clone(),
            Referee::branch_cont(&referee, Side::Left),
            left,
        );
        self.g
            .call(input, Referee::branch_cont(&referee, Side::Right), right);
    }
}
