//! Input subsystem.
//!
//! The public API does not expose winit types; `platform` translates window
//! system events into [`InputEvent`]s for the runtime.

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, KeyState, MouseButton, WheelDelta};
