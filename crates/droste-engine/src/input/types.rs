use crate::coords::Vec2;

/// Keyboard key identifier, by physical position.
///
/// Named variants are the studio's bindings; any other key is `Unknown` with
/// its platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Space,

    ArrowUp,
    ArrowDown,

    A, D, S, W,

    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    /// Primary (left).
    Left,
    /// Secondary (right).
    Right,
    /// Tertiary (middle / wheel click).
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Mouse wheel delta.
///
/// `Line` is notched-wheel input; `Pixel` is touchpad-style high precision.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

impl WheelDelta {
    /// Vertical component; positive scrolls up / away from the user.
    #[inline]
    pub fn vertical(&self) -> f32 {
        match *self {
            WheelDelta::Line { y, .. } | WheelDelta::Pixel { y, .. } => y,
        }
    }
}

/// Platform-agnostic input events emitted by the runtime.
///
/// Positions are canvas pixels (logical, top-left origin, +Y down).
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: KeyState,
        /// True when the event is an auto-repeat of a held key.
        repeat: bool,
    },

    PointerMoved(Vec2),

    PointerButton {
        button: MouseButton,
        state: ButtonState,
        position: Vec2,
    },

    Wheel(WheelDelta),

    /// Pointer left the window surface.
    PointerLeft,

    /// Window focus change.
    Focused(bool),
}
