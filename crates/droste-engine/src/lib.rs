//! Droste engine crate.
//!
//! Platform + GPU runtime, the screen model and the ping-pong feedback
//! compositor used by the studio binary.

pub mod config;
pub mod coords;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod screen;
pub mod time;
pub mod window;

pub use config::ToyConfig;
