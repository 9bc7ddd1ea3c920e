// Input handling system
//
// Turns winit keyboard events into game actions. The simulation never sees
// key codes: it consumes a `DirectionalInput` snapshot each frame, and the
// attack is triggered from the `Attack` action's press edge.

pub mod action;
pub mod manager;

// Re-export commonly used types
pub use action::{Action, DirectionalInput, InputSource};
pub use manager::InputManager;
