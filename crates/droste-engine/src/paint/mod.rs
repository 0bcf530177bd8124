//! Color model shared between the registry and renderers.
//!
//! - `Rgba8`: straight 8-bit storage used by screens
//! - `Color`: linear premultiplied f32 consumed by shaders
//! - `hsv`: conversions for the color cycling tools

pub mod color;
pub mod hsv;
mod rgba8;

pub use color::Color;
pub use rgba8::Rgba8;
