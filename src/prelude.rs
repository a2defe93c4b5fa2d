//! Commonly used imports
//!
//! Use `use lifta::prelude::*;` for quick access to the most common types and functions.

// Core types
pub use crate::{Arrow, Cont, Either, Fault, Faulty, Loop, Scope, SharedArrow};

// Building steps
pub use crate::{Func, lift, lift_async, step};

// Composition
pub use crate::{either, fan, first, lor, product, repeat, second, then};

// Error channel
pub use crate::{barrier, false_error, left_error, promote_error};

// Logic
pub use crate::{Negate, and, not, or, when_false, when_true};

// Execution
pub use crate::{run, run_future, run_sync, run_with};
