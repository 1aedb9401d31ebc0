//! Transform kernel: the per-frame interactive transform accumulator.
//!
//! # Invariants
//! - The accumulated matrix is only mutated through [`Accumulator::apply`]
//!   and [`Accumulator::apply_frame`].
//! - Controls are applied in [`Control::ALL`] order, each one composing onto
//!   the matrix already updated by the previous control in the same frame.
//! - With no control held, a frame leaves the matrix bit-for-bit unchanged.

pub mod accumulator;
pub mod control;
pub mod transcript;

pub use accumulator::Accumulator;
pub use control::{Control, KeyState, pressed_controls};
pub use transcript::Transcript;
pub use objview_common::Steps;
