use crate::control::{Control, KeyState};
use glam::Mat4;
use objview_common::Steps;

/// The running interactive transform.
///
/// Starts at identity and is composed on the right with one elementary
/// transform per held control per frame (`M = M * E`). The matrix is never
/// renormalized; float drift over a long session is accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
    matrix: Mat4,
    steps: Steps,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new(Steps::default())
    }
}

impl Accumulator {
    pub fn new(steps: Steps) -> Self {
        Self {
            matrix: Mat4::IDENTITY,
            steps,
        }
    }

    /// Current accumulated transform.
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn steps(&self) -> &Steps {
        &self.steps
    }

    /// Back to identity.
    pub fn reset(&mut self) {
        self.matrix = Mat4::IDENTITY;
    }

    /// Compose one control's elementary transform onto the matrix.
    pub fn apply(&mut self, control: Control) {
        self.matrix *= control.elementary(&self.steps);
        tracing::trace!(?control, "applied control");
    }

    /// Advance one frame: apply every held control in [`Control::ALL`] order.
    pub fn apply_frame<K: KeyState + ?Sized>(&mut self, keys: &K) {
        for control in Control::ALL {
            if keys.is_down(control) {
                self.apply(control);
            }
        }
    }
}
