//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single canvas window, wires them to the
//! GPU layer, and paces redraws.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
