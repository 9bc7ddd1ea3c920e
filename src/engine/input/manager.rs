// Input manager - turns winit keyboard events into action state

use super::action::{default_bindings, Action, DirectionalInput, InputSource};
use std::collections::{HashMap, HashSet};
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::PhysicalKey;

/// Tracks which actions are held and which were pressed this frame.
pub struct InputManager {
    /// Input source to action mapping
    bindings: HashMap<InputSource, Action>,

    /// Actions that are currently held
    pressed: HashSet<Action>,

    /// Actions whose press edge happened since the last `update`
    just_pressed: HashSet<Action>,
}

impl InputManager {
    /// Create an input manager with the default bindings
    pub fn new() -> Self {
        Self {
            bindings: default_bindings().into_iter().collect(),
            pressed: HashSet::new(),
            just_pressed: HashSet::new(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(key_code) = event.physical_key else {
            return;
        };

        let Some(&action) = self.bindings.get(&InputSource::key(key_code)) else {
            return;
        };

        match event.state {
            ElementState::Pressed => {
                // OS key repeat is not a new press
                if !event.repeat {
                    self.press(action);
                }
            }
            ElementState::Released => {
                self.release(action);
            }
        }
    }

    /// Update input state for a new frame.
    /// Call this once per frame after the simulation has consumed input.
    pub fn update(&mut self) {
        self.just_pressed.clear();
    }

    /// Check if an action is currently held
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Check if an action was pressed since the last frame update
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Snapshot of the four directional key states for this frame
    pub fn directional(&self) -> DirectionalInput {
        DirectionalInput {
            up: self.is_pressed(Action::MoveUp),
            down: self.is_pressed(Action::MoveDown),
            left: self.is_pressed(Action::MoveLeft),
            right: self.is_pressed(Action::MoveRight),
        }
    }

    /// Reset all input state (e.g. on window focus loss, so keys released
    /// while unfocused don't stick)
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
    }

    pub(crate) fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    pub(crate) fn release(&mut self, action: Action) {
        self.pressed.remove(&action);
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
