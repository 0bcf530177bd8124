use crate::coords::Viewport;

/// Renderer-facing context (device/queue + surface format + canvas size).
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Canvas size in logical pixels.
    pub viewport: Viewport,
    /// Physical pixels per logical pixel.
    pub scale_factor: f32,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
        scale_factor: f32,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            viewport,
            scale_factor,
        }
    }

    /// Same device and target, drawing into a canvas of `viewport` that the
    /// projection stretches over the whole target.
    pub fn with_viewport(&self, viewport: Viewport) -> RenderCtx<'a> {
        RenderCtx::new(
            self.device,
            self.queue,
            self.surface_format,
            viewport,
            self.scale_factor,
        )
    }

    /// Canvas size in physical pixels, never smaller than 1x1.
    pub fn physical_size(&self) -> (u32, u32) {
        physical_extent(self.viewport, self.scale_factor)
    }
}

pub(crate) fn physical_extent(viewport: Viewport, scale_factor: f32) -> (u32, u32) {
    let scale = if scale_factor.is_finite() && scale_factor > 0.0 {
        scale_factor
    } else {
        1.0
    };
    let w = (viewport.width * scale).round().max(1.0) as u32;
    let h = (viewport.height * scale).round().max(1.0) as u32;
    (w, h)
}

/// Target for drawing (encoder + color view).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}
