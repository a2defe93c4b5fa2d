//! # lifta: continuation-passing arrow combinators
//!
//! Compose plain functions and explicitly asynchronous steps into pipelines,
//! fan-outs, races, loops and branches, with errors carried as data and
//! cooperative cancellation through a shared [`Scope`].
//!
//! ## Core Types
//!
//! - **[`Arrow<I, O>`]**: a step called with `(input, continuation, scope)`
//! - **[`Scope`]**: per-run registry of cleanup callbacks
//! - **[`Fault`]**: the in-band error value, carried as `Result<T, Fault>`
//! - **[`Loop`]**: what a [`repeat`] body continues with
//!
//! ## Example
//!
//! ```
//! use lifta::*;
//!
//! let below_ten = |x: i32| if x < 10 { Either::Left(x) } else { Either::Right(x) };
//! let pipeline = lift(below_ten)
//!     .lor(lift(|x: i32| x + 2), lift(|x: i32| x / 10))
//!     .fan(lift(|x: i32| x % 2 == 0));
//!
//! assert_eq!(run_sync(&pipeline, 3), Some((5, false)));
//! assert_eq!(run_sync(&pipeline, 70), Some((7, true)));
//! ```
//!
//! ## Common Functions
//!
//! **Building steps:**
//! - [`lift(f)`] - Continue immediately with `f(x)`
//! - [`step(f)`] - Use a continuation-style closure as-is
//! - [`lift_async(f, host)`] - Continue with `f(x)` on a later turn of `host`
//!
//! **Composition:**
//! - [`then(f, g)`], [`fan(f, g)`], [`product(f, g)`], [`either(f, g)`]
//! - [`repeat(f)`], [`lor(s, l, r)`]
//!
//! **Error channel:**
//! - [`barrier(f)`], [`left_error(f)`], [`false_error(f)`], [`promote_error(f)`]
//!
//! **Execution:**
//! - [`run(arrow, x)`], [`run_with(arrow, x, k)`], [`run_sync(arrow, x)`],
//!   [`run_future(arrow, x)`]

mod arrow;
mod combinators;
mod control;
mod error;
mod host;
mod lift;
pub mod prelude;
mod run;
mod scope;

#[cfg(test)]
mod testing;

pub use arrow::*;
pub use combinators::*;
pub use control::*;
pub use either::Either;
pub use error::*;
pub use host::*;
pub use lift::*;
pub use run::*;
pub use scope::*;
