//! GPU rendering subsystem.
//!
//! Each renderer owns its GPU resources (pipelines, buffers, textures).
//!
//! Convention:
//! - CPU geometry is in canvas pixels (top-left origin, +Y down)
//! - vertex shaders apply a per-instance model matrix, then the canvas
//!   projection uniform

mod common;
mod ctx;

pub mod compositor;
pub mod outline;
pub mod pingpong;

pub use compositor::FrameCompositor;
pub use ctx::{RenderCtx, RenderTarget};
pub use outline::{OutlineRenderer, OutlineSpec, OutlineStyle};
pub use pingpong::{PingPong, Slot};
