//! Toy-wide configuration.
//!
//! A single immutable `ToyConfig` is built at startup and handed to every
//! constructor that needs tuning constants. Nothing reads configuration from
//! globals.

use anyhow::{ensure, Result};

use crate::coords::Viewport;
use crate::paint::Rgba8;

/// Tuning constants for the canvas, screens, input speeds and overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct ToyConfig {
    /// Fixed canvas size in logical pixels. The window is created at this size.
    pub canvas_width: u32,
    pub canvas_height: u32,

    /// Upper bound on ticks per second (end-of-tick pacing).
    pub target_fps: u32,

    /// Tint given to newly created screens.
    pub default_screen_color: Rgba8,

    /// New screens are `canvas * initial_size_ratio` in each dimension.
    pub initial_size_ratio: f32,

    /// Wheel scaling factors (up > 1, down < 1).
    pub scale_up: f64,
    pub scale_down: f64,

    /// Smallest dimension reachable through wheel scaling.
    pub min_scaled_size: u32,

    /// Smallest dimension reachable through a live resize.
    pub min_resized_size: u32,

    /// Screens never exceed `canvas * max_screen_ratio` in either dimension.
    pub max_screen_ratio: f32,

    /// Degrees per tick while a rotate key is held.
    pub rotation_speed: f32,

    /// Hue / saturation change per tick while a dev-tools key is held.
    pub hue_step: f32,
    pub saturation_step: f32,

    /// Alpha change per tick, as a fraction of 255.
    pub alpha_step: f32,

    /// `strengthen` never raises a screen's alpha above this.
    pub max_screen_alpha: u8,

    /// Selection outline alpha, and the extra alpha added during live resize.
    pub outline_alpha: u8,
    pub outline_resize_boost: u8,

    /// Selection outline band width in pixels.
    pub outline_thickness: f32,

    /// Presentation clear color behind the composite.
    pub background: Rgba8,

    /// Enables the hue/saturation cycling keys.
    pub dev_tools: bool,
}

impl Default for ToyConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1600,
            canvas_height: 950,
            target_fps: 140,
            default_screen_color: Rgba8::new(66, 135, 245, 15),
            initial_size_ratio: 0.25,
            scale_up: 1.05,
            scale_down: 0.95,
            min_scaled_size: 10,
            min_resized_size: 0,
            max_screen_ratio: 1.0,
            rotation_speed: 1.0,
            hue_step: 0.002,
            saturation_step: 0.01,
            alpha_step: 0.1,
            max_screen_alpha: 100,
            outline_alpha: 40,
            outline_resize_boost: 40,
            outline_thickness: 5.0,
            background: Rgba8::new(0, 0, 0, 255),
            dev_tools: false,
        }
    }
}

impl ToyConfig {
    /// Rejects constants that would break registry or renderer invariants.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.canvas_width > 0 && self.canvas_height > 0,
            "canvas must have a non-zero size (got {}x{})",
            self.canvas_width,
            self.canvas_height
        );
        ensure!(self.target_fps > 0, "target_fps must be positive");
        ensure!(
            self.initial_size_ratio > 0.0 && self.initial_size_ratio.is_finite(),
            "initial_size_ratio must be positive (got {})",
            self.initial_size_ratio
        );
        ensure!(
            self.max_screen_ratio > 0.0 && self.max_screen_ratio.is_finite(),
            "max_screen_ratio must be positive (got {})",
            self.max_screen_ratio
        );
        ensure!(
            self.scale_up > 1.0 && self.scale_up.is_finite(),
            "scale_up must be greater than 1 (got {})",
            self.scale_up
        );
        ensure!(
            self.scale_down > 0.0 && self.scale_down < 1.0,
            "scale_down must lie in (0, 1) (got {})",
            self.scale_down
        );
        ensure!(
            self.min_scaled_size <= self.max_width() && self.min_scaled_size <= self.max_height(),
            "min_scaled_size {} exceeds the largest allowed screen",
            self.min_scaled_size
        );
        ensure!(
            self.outline_thickness > 0.0 && self.outline_thickness.is_finite(),
            "outline_thickness must be positive (got {})",
            self.outline_thickness
        );
        Ok(())
    }

    #[inline]
    pub fn canvas(&self) -> Viewport {
        Viewport::new(self.canvas_width as f32, self.canvas_height as f32)
    }

    /// Largest screen width allowed by `max_screen_ratio`.
    #[inline]
    pub fn max_width(&self) -> u32 {
        (self.canvas_width as f32 * self.max_screen_ratio) as u32
    }

    /// Largest screen height allowed by `max_screen_ratio`.
    #[inline]
    pub fn max_height(&self) -> u32 {
        (self.canvas_height as f32 * self.max_screen_ratio) as u32
    }

    /// Alpha added or removed per strengthen/weaken tick.
    #[inline]
    pub fn alpha_delta(&self) -> f32 {
        self.alpha_step * 255.0
    }
}
