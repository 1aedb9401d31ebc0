use glam::{Mat4, Vec3};
use objview_common::Steps;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A transform control. Each one is bound to a single elementary transform.
///
/// Declaration order is application order: within one frame, held controls
/// are applied top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Control {
    /// Translate +Y.
    MoveUp,
    /// Translate -Y.
    MoveDown,
    /// Translate -X.
    MoveLeft,
    /// Translate +X.
    MoveRight,
    /// Rotate +step about Z.
    RollLeft,
    /// Rotate -step about Z.
    RollRight,
    /// Rotate +step about Y.
    YawLeft,
    /// Rotate -step about Y.
    YawRight,
    /// Rotate +step about X.
    PitchUp,
    /// Rotate -step about X.
    PitchDown,
    /// Scale Z by the scale step.
    StretchZ,
    /// Scale Z by the reciprocal of the scale step.
    ShrinkZ,
}

impl Control {
    /// Every control, in application order.
    pub const ALL: [Control; 12] = [
        Control::MoveUp,
        Control::MoveDown,
        Control::MoveLeft,
        Control::MoveRight,
        Control::RollLeft,
        Control::RollRight,
        Control::YawLeft,
        Control::YawRight,
        Control::PitchUp,
        Control::PitchDown,
        Control::StretchZ,
        Control::ShrinkZ,
    ];

    /// The letter of the key this control is bound to by default.
    pub fn label(self) -> char {
        match self {
            Control::MoveUp => 'W',
            Control::MoveDown => 'S',
            Control::MoveLeft => 'A',
            Control::MoveRight => 'D',
            Control::RollLeft => 'Q',
            Control::RollRight => 'E',
            Control::YawLeft => 'Z',
            Control::YawRight => 'X',
            Control::PitchUp => 'T',
            Control::PitchDown => 'G',
            Control::StretchZ => 'R',
            Control::ShrinkZ => 'F',
        }
    }

    /// Inverse of [`Control::label`], case-insensitive.
    pub fn from_label(c: char) -> Option<Control> {
        let c = c.to_ascii_uppercase();
        Self::ALL.into_iter().find(|control| control.label() == c)
    }

    pub fn description(self) -> &'static str {
        match self {
            Control::MoveUp => "Move model up",
            Control::MoveDown => "Move model down",
            Control::MoveLeft => "Move model left",
            Control::MoveRight => "Move model right",
            Control::RollLeft => "Rotate model about z axis anticlockwise",
            Control::RollRight => "Rotate model about z axis clockwise",
            Control::YawLeft => "Rotate model about y axis anticlockwise",
            Control::YawRight => "Rotate model about y axis clockwise",
            Control::PitchUp => "Rotate model about x axis anticlockwise",
            Control::PitchDown => "Rotate model about x axis clockwise",
            Control::StretchZ => "Stretch model along z axis",
            Control::ShrinkZ => "Shrink model along z axis",
        }
    }

    /// The elementary transform this control composes onto the running matrix.
    pub fn elementary(self, steps: &Steps) -> Mat4 {
        let d = steps.translate;
        let angle = steps.rotate_degrees.to_radians();
        let s = steps.scale;
        match self {
            Control::MoveUp => Mat4::from_translation(Vec3::new(0.0, d, 0.0)),
            Control::MoveDown => Mat4::from_translation(Vec3::new(0.0, -d, 0.0)),
            Control::MoveLeft => Mat4::from_translation(Vec3::new(-d, 0.0, 0.0)),
            Control::MoveRight => Mat4::from_translation(Vec3::new(d, 0.0, 0.0)),
            Control::RollLeft => Mat4::from_rotation_z(angle),
            Control::RollRight => Mat4::from_rotation_z(-angle),
            Control::YawLeft => Mat4::from_rotation_y(angle),
            Control::YawRight => Mat4::from_rotation_y(-angle),
            Control::PitchUp => Mat4::from_rotation_x(angle),
            Control::PitchDown => Mat4::from_rotation_x(-angle),
            Control::StretchZ => Mat4::from_scale(Vec3::new(1.0, 1.0, s)),
            Control::ShrinkZ => Mat4::from_scale(Vec3::new(1.0, 1.0, 1.0 / s)),
        }
    }
}

/// Polling view of the keyboard: "is this control currently held?"
///
/// Sampled once per frame. Implementations report level state, not edges,
/// so a held key repeats its effect every frame.
pub trait KeyState {
    fn is_down(&self, control: Control) -> bool;
}

impl KeyState for [Control] {
    fn is_down(&self, control: Control) -> bool {
        self.contains(&control)
    }
}

impl<const N: usize> KeyState for [Control; N] {
    fn is_down(&self, control: Control) -> bool {
        self.contains(&control)
    }
}

impl KeyState for HashSet<Control> {
    fn is_down(&self, control: Control) -> bool {
        self.contains(&control)
    }
}

/// Held controls in application order.
pub fn pressed_controls<K: KeyState + ?Sized>(keys: &K) -> Vec<Control> {
    Control::ALL
        .into_iter()
        .filter(|control| keys.is_down(*control))
        .collect()
}
