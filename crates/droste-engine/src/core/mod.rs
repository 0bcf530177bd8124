//! Engine-facing contracts between the runtime loop and the studio.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
