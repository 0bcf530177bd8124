use std::collections::HashSet;

use crate::coords::Vec2;

use super::frame::InputFrame;
use super::types::{ButtonState, InputEvent, Key, KeyState, MouseButton};

/// Current input state for the window: held keys and buttons, pointer position.
///
/// Every applied event is also recorded into an [`InputFrame`].
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,

    /// Pointer position in canvas pixels; `None` while outside the window.
    pub pointer: Option<Vec2>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies an event to the held state and records it in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases are not delivered while unfocused.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(p) => self.pointer = Some(*p),
            InputEvent::PointerLeft => self.pointer = None,

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    self.keys_down.insert(*key);
                }
                KeyState::Released => {
                    self.keys_down.remove(key);
                }
            },

            InputEvent::PointerButton {
                button,
                state,
                position,
            } => {
                self.pointer = Some(*position);
                match state {
                    ButtonState::Pressed => {
                        self.buttons_down.insert(*button);
                    }
                    ButtonState::Released => {
                        self.buttons_down.remove(button);
                    }
                }
            }

            InputEvent::Wheel(_) => {}
        }

        frame.push_event(ev);
    }

    #[inline]
    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    #[inline]
    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Last known pointer position, or the origin if it never entered.
    #[inline]
    pub fn pointer_or_origin(&self) -> Vec2 {
        self.pointer.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key {
            key,
            state,
            repeat: false,
        }
    }

    #[test]
    fn key_press_and_release_track_held_state() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();

        st.apply_event(&mut fr, key(Key::D, KeyState::Pressed));
        st.apply_event(&mut fr, key(Key::D, KeyState::Pressed));
        assert!(st.key_down(Key::D));
        assert_eq!(fr.events.len(), 2);

        st.apply_event(&mut fr, key(Key::D, KeyState::Released));
        assert!(!st.key_down(Key::D));
        assert_eq!(fr.events.last(), Some(&key(Key::D, KeyState::Released)));
    }

    #[test]
    fn button_events_update_pointer() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        st.apply_event(
            &mut fr,
            InputEvent::PointerButton {
                button: MouseButton::Left,
                state: ButtonState::Pressed,
                position: Vec2::new(3.0, 4.0),
            },
        );
        assert!(st.button_down(MouseButton::Left));
        assert_eq!(st.pointer, Some(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        st.apply_event(&mut fr, key(Key::W, KeyState::Pressed));
        st.apply_event(&mut fr, InputEvent::Focused(false));
        assert!(st.keys_down.is_empty());
    }

    #[test]
    fn pointer_left_clears_position() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        st.apply_event(&mut fr, InputEvent::PointerMoved(Vec2::new(1.0, 1.0)));
        st.apply_event(&mut fr, InputEvent::PointerLeft);
        assert_eq!(st.pointer, None);
        assert_eq!(st.pointer_or_origin(), Vec2::zero());

        fr.clear();
        assert!(fr.events.is_empty());
    }
}
