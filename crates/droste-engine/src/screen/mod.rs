//! Placed screens: geometry, hit-testing and the ordered registry.

mod registry;
#[allow(clippy::module_inception)]
mod screen;
pub mod transform;

pub use registry::ScreenRegistry;
pub use screen::{Screen, ScreenId};
