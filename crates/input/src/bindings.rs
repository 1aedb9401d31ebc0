use objview_kernel::{Control, KeyState};
use std::collections::HashSet;
use winit::keyboard::KeyCode;

/// Fixed table from physical keys to transform controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    /// Indexed in `Control::ALL` order.
    keys: [KeyCode; 12],
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            keys: [
                KeyCode::KeyW,
                KeyCode::KeyS,
                KeyCode::KeyA,
                KeyCode::KeyD,
                KeyCode::KeyQ,
                KeyCode::KeyE,
                KeyCode::KeyZ,
                KeyCode::KeyX,
                KeyCode::KeyT,
                KeyCode::KeyG,
                KeyCode::KeyR,
                KeyCode::KeyF,
            ],
        }
    }
}

impl KeyBindings {
    pub fn key_for(&self, control: Control) -> KeyCode {
        self.keys[control as usize]
    }

    pub fn control_for(&self, key: KeyCode) -> Option<Control> {
        self.keys
            .iter()
            .position(|k| *k == key)
            .map(|i| Control::ALL[i])
    }
}

/// Level-triggered keyboard state built from winit key events.
///
/// Winit reports edges; the accumulator wants "is it down right now". This
/// folds press/release events into a set and answers [`KeyState`] queries
/// through the bindings.
#[derive(Debug, Default)]
pub struct HeldKeys {
    held: HashSet<KeyCode>,
    bindings: KeyBindings,
}

impl HeldKeys {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            held: HashSet::new(),
            bindings,
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn press(&mut self, key: KeyCode) {
        if self.held.insert(key) {
            if let Some(control) = self.bindings.control_for(key) {
                tracing::debug!(?key, ?control, "control held");
            }
        }
    }

    pub fn release(&mut self, key: KeyCode) {
        self.held.remove(&key);
    }

    /// Apply a winit key event.
    pub fn handle(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.press(key);
        } else {
            self.release(key);
        }
    }

    /// Forget every held key. Used on focus loss, where release events are not delivered.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// True when at least one bound key is held.
    pub fn any_control_down(&self) -> bool {
        Control::ALL.into_iter().any(|c| self.is_down(c))
    }
}

impl KeyState for HeldKeys {
    fn is_down(&self, control: Control) -> bool {
        self.held.contains(&self.bindings.key_for(control))
    }
}
