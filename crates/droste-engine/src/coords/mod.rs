//! Coordinate types shared by the transform engine, registry and renderers.
//!
//! Canonical CPU space:
//! - canvas pixels (logical, DPI-aware)
//! - origin top-left
//! - +X right, +Y down
//!
//! The compositor and overlay convert to NDC through a canvas projection.

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
