//! Desktop keyboard input mapped onto transform controls.
//!
//! # Invariants
//! - The kernel consumes [`Control`]s through [`KeyState`], never raw key codes.
//! - Keys without a binding never reach the accumulator.

pub mod bindings;

pub use bindings::{HeldKeys, KeyBindings};
pub use objview_kernel::{Control, KeyState};
