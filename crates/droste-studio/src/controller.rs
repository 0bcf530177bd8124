//! Maps translated input onto screen-registry operations.
//!
//! The controller is window-free: it consumes `InputEvent`s and the held-input
//! snapshot and tells the app whether to exit and whether to composite.

use droste_engine::coords::Vec2;
use droste_engine::input::{ButtonState, InputEvent, InputState, Key, KeyState, MouseButton};
use droste_engine::render::OutlineSpec;
use droste_engine::screen::ScreenRegistry;
use droste_engine::ToyConfig;

/// Key that starts (press) and commits (release) a live resize.
pub const RESIZE_KEY: Key = Key::Space;

/// A live resize in progress on the selected screen.
///
/// Width follows the pointer's horizontal travel and height its inverted
/// vertical travel, from where the gesture started.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ResizeGesture {
    start: Vec2,
    original: (u32, u32),
    pending: (u32, u32),
}

impl ResizeGesture {
    fn new(start: Vec2, original: (u32, u32)) -> Self {
        Self {
            start,
            original,
            pending: original,
        }
    }

    #[inline]
    pub fn pending(&self) -> (u32, u32) {
        self.pending
    }

    fn track(&mut self, pointer: Vec2, registry: &ScreenRegistry) {
        let d = pointer - self.start;
        let w = offset_dimension(self.original.0, d.x);
        let h = offset_dimension(self.original.1, -d.y);
        self.pending = registry.clamp_resize(w, h);
    }
}

/// `dim + delta` truncated toward zero, floored at 0.
fn offset_dimension(dim: u32, delta: f32) -> u32 {
    let v = dim as f64 + delta as f64;
    if v <= 0.0 {
        0
    } else if v >= u32::MAX as f64 {
        u32::MAX
    } else {
        v as u32
    }
}

/// Result of one controller tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TickOutcome {
    pub exit: bool,
    /// False while a live resize freezes the composite.
    pub composite: bool,
}

pub struct Controller {
    registry: ScreenRegistry,
    resize: Option<ResizeGesture>,
    pointer: Vec2,
    rotation_speed: f32,
    dev_tools: bool,
}

impl Controller {
    pub fn new(config: &ToyConfig) -> Self {
        Self {
            registry: ScreenRegistry::new(config),
            resize: None,
            pointer: Vec2::zero(),
            rotation_speed: config.rotation_speed,
            dev_tools: config.dev_tools,
        }
    }

    #[inline]
    pub fn registry(&self) -> &ScreenRegistry {
        &self.registry
    }

    #[inline]
    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    /// Applies one discrete event.
    pub fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerMoved(p) => {
                self.pointer = *p;
                if let Some(gesture) = self.resize.as_mut() {
                    gesture.track(*p, &self.registry);
                }
            }

            InputEvent::PointerButton {
                button,
                state: ButtonState::Pressed,
                position,
            } => {
                self.pointer = *position;
                if !self.is_resizing() {
                    self.click(*button, *position);
                }
            }

            InputEvent::Wheel(delta) if !self.is_resizing() => {
                self.registry.scale(delta.vertical());
            }

            InputEvent::Key {
                key: RESIZE_KEY,
                state: KeyState::Pressed,
                repeat: false,
            } => self.begin_resize(),

            InputEvent::Key {
                key: RESIZE_KEY,
                state: KeyState::Released,
                ..
            } => self.commit_resize(),

            // Releases are delivered while unfocused only on some platforms.
            InputEvent::Focused(false) => self.commit_resize(),

            _ => {}
        }
    }

    fn click(&mut self, button: MouseButton, position: Vec2) {
        match button {
            MouseButton::Left => {
                self.registry.select(position);
            }
            MouseButton::Right => {
                if let Some(id) = self.registry.select(position) {
                    self.registry.delete(id);
                }
            }
            MouseButton::Middle => {
                self.registry.create(position);
                self.registry.select(position);
            }
            MouseButton::Other(_) => {}
        }
    }

    fn begin_resize(&mut self) {
        if self.resize.is_some() {
            return;
        }
        let Some(screen) = self.registry.selected() else { return };
        let original = (screen.width(), screen.height());
        log::debug!("live resize started on screen {}", screen.id().raw());
        self.resize = Some(ResizeGesture::new(self.pointer, original));
    }

    fn commit_resize(&mut self) {
        let Some(gesture) = self.resize.take() else { return };
        let (w, h) = gesture.pending;
        self.registry.resize_selected(w, h);
        log::info!("live resize committed: {w}x{h}");
    }

    /// Per-tick continuous input: quit, held-key adjustments, and dragging.
    ///
    /// Only the highest-priority held adjustment key acts each tick:
    /// D, A, W, S, then (dev tools) ArrowUp, ArrowDown.
    pub fn tick(&mut self, input: &InputState) -> TickOutcome {
        if input.key_down(Key::Escape) {
            return TickOutcome {
                exit: true,
                composite: false,
            };
        }

        if input.key_down(Key::D) {
            self.registry.rotate(-self.rotation_speed);
        } else if input.key_down(Key::A) {
            self.registry.rotate(self.rotation_speed);
        } else if input.key_down(Key::W) {
            self.registry.strengthen();
        } else if input.key_down(Key::S) {
            self.registry.weaken();
        } else if self.dev_tools {
            if input.key_down(Key::ArrowUp) {
                self.registry.cycle_hue();
            } else if input.key_down(Key::ArrowDown) {
                self.registry.cycle_saturation();
            }
        }

        if self.is_resizing() {
            return TickOutcome {
                exit: false,
                composite: false,
            };
        }

        let pointer = input.pointer.unwrap_or(self.pointer);
        self.registry
            .drag(pointer, input.button_down(MouseButton::Left));

        TickOutcome {
            exit: false,
            composite: true,
        }
    }

    /// Outline for the overlay: the selected screen, at its pending size while
    /// a live resize is in progress.
    pub fn outline(&self) -> Option<OutlineSpec> {
        let spec = OutlineSpec::for_screen(self.registry.selected()?);
        Some(match &self.resize {
            Some(gesture) => {
                let (w, h) = gesture.pending();
                spec.resizing_to(w, h)
            }
            None => spec,
        })
    }
}
