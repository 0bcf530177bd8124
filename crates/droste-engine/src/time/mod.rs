//! Time subsystem.
//!
//! - `FramePacer`: caps the tick rate with an end-of-tick deadline

mod pacer;

pub use pacer::FramePacer;
