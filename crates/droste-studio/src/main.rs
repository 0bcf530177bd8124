mod app;
mod controller;

use anyhow::Result;
use droste_engine::device::GpuInit;
use droste_engine::logging::{init_logging, LoggingConfig};
use droste_engine::window::{Runtime, RuntimeConfig};
use droste_engine::ToyConfig;
use winit::dpi::LogicalSize;

use crate::app::DrosteApp;

/// Set to `1` or `true` to enable the hue/saturation cycling keys.
const DEV_TOOLS_ENV: &str = "DROSTE_DEV_TOOLS";

fn dev_tools_enabled(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true")
    )
}

fn run() -> Result<()> {
    let config = ToyConfig {
        dev_tools: dev_tools_enabled(std::env::var(DEV_TOOLS_ENV).ok().as_deref()),
        ..ToyConfig::default()
    };
    config.validate()?;

    if config.dev_tools {
        log::info!("dev tools enabled: arrow up/down cycle hue/saturation");
    }

    let runtime = RuntimeConfig {
        title: "droste".to_string(),
        initial_size: LogicalSize::new(config.canvas_width as f64, config.canvas_height as f64),
        resizable: false,
        target_fps: Some(config.target_fps),
    };
    let gpu_init = GpuInit {
        prefer_srgb: false,
        ..GpuInit::default()
    };

    Runtime::run(runtime, gpu_init, DrosteApp::new(config))
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let result = run();
    if let Err(err) = &result {
        log::error!("droste exited with an error: {err:#}");
    }
    result
}
