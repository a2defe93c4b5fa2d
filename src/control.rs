/// What a [`repeat`](crate::repeat) body continues with: another input, or the
/// final output.
///
/// `Loop` plays the same role for arrows that `ControlFlow` plays for
/// iterators.
///
/// # Examples
///
/// ```rust
/// use lifta::*;
///
/// let halve_until_odd = repeat(lift(|x: u32| {
///     if x % 2 == 0 { Loop::Repeat(x / 2) } else { Loop::Done(x) }
/// }));
/// assert_eq!(run_sync(&halve_until_odd, 48), Some(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Loop<R, D> {
    /// Run the body again with this input
    Repeat(R),
    /// Stop and continue downstream with this output
    Done(D),
}
