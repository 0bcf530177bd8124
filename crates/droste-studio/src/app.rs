use droste_engine::core::{App, AppControl, FrameCtx};
use droste_engine::render::{FrameCompositor, OutlineRenderer, OutlineStyle};
use droste_engine::ToyConfig;

use crate::controller::Controller;

/// The toy: a controller over the screen registry plus the GPU renderers,
/// created lazily on the first frame that has a device.
pub struct DrosteApp {
    config: ToyConfig,
    controller: Controller,
    compositor: Option<FrameCompositor>,
    outline: OutlineRenderer,
}

impl DrosteApp {
    pub fn new(config: ToyConfig) -> Self {
        let controller = Controller::new(&config);
        let outline = OutlineRenderer::new(OutlineStyle::from_config(&config));
        Self {
            config,
            controller,
            compositor: None,
            outline,
        }
    }
}

impl App for DrosteApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        // ── Input ─────────────────────────────────────────────────────────
        for event in &ctx.input_frame.events {
            self.controller.handle_event(event);
        }
        let outcome = self.controller.tick(ctx.input);
        if outcome.exit {
            log::info!("exit requested");
            return AppControl::Exit;
        }

        // ── Render ────────────────────────────────────────────────────────
        let canvas = self.config.canvas();
        let outline_spec = self.controller.outline();
        let screens = self.controller.registry().screens();
        let compositor = &mut self.compositor;
        let outline = &mut self.outline;

        ctx.render(self.config.background.to_premul(), |rctx, target| {
            let rctx = rctx.with_viewport(canvas);
            let compositor = compositor.get_or_insert_with(|| FrameCompositor::new(&rctx));

            if outcome.composite {
                compositor.process_frame(&rctx, target.encoder, screens);
            }
            compositor.render_current_frame(&rctx, target);
            outline.render(&rctx, target, outline_spec);
        })
    }
}
