use super::types::InputEvent;

/// Events received since the last presented frame, in arrival order.
///
/// `InputState` holds what is currently down; the runtime clears the frame
/// after each `on_frame`.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub events: Vec<InputEvent>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }
}
