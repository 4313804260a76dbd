/// All possible errors in this crate
///
/// The touch algorithm itself can't fail, degenerate readings are handled numerically. The only errors come from the
/// hardware: a failed oscillator count read (`S`) or a failed button read (`B`).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<S, B> {
    /// Reading a capacitive sensor failed
    Sense(S),
    /// Reading the mode button failed
    Button(B),
}
