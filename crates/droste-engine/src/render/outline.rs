//! Selection outline overlay, drawn on the presentation target after the blit.
//!
//! The outline never touches the composite textures, so it cannot leak into
//! the feedback loop.

use wgpu::util::DeviceExt;

use crate::config::ToyConfig;
use crate::coords::Vec2;
use crate::paint::Rgba8;
use crate::render::{RenderCtx, RenderTarget};
use crate::screen::{transform, Screen};

use super::common::{
    ensure_instance_buffer, premul_alpha_blend, projection_layout_entry, quad_pipeline,
    ProjectionUniform, QuadInstance, FEEDBACK_SHADER, QUAD_INDICES, QUAD_VERTICES,
};

/// Geometry and state of the outline to draw this frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OutlineSpec {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
    /// Source of the outline's RGB; its alpha is ignored.
    pub color: Rgba8,
    /// A live resize is in progress.
    pub resizing: bool,
}

impl OutlineSpec {
    pub fn for_screen(screen: &Screen) -> Self {
        Self {
            center: screen.position(),
            width: screen.width() as f32,
            height: screen.height() as f32,
            rotation: screen.rotation(),
            color: screen.color(),
            resizing: false,
        }
    }

    /// Replaces the footprint with pending live-resize dimensions.
    pub fn resizing_to(self, width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            resizing: true,
            ..self
        }
    }
}

/// Outline alpha and band width.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OutlineStyle {
    pub alpha: u8,
    pub resize_boost: u8,
    pub thickness: f32,
}

impl OutlineStyle {
    pub fn from_config(config: &ToyConfig) -> Self {
        Self {
            alpha: config.outline_alpha,
            resize_boost: config.outline_resize_boost,
            thickness: config.outline_thickness,
        }
    }

    #[inline]
    pub fn alpha_for(&self, resizing: bool) -> u8 {
        if resizing {
            self.alpha.saturating_add(self.resize_boost)
        } else {
            self.alpha
        }
    }
}

/// Draws the four edge bands of the selected screen's outline.
///
/// GPU resources are created lazily on first use and rebuilt if the surface
/// format changes.
pub struct OutlineRenderer {
    style: OutlineStyle,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    projection_ubo: Option<wgpu::Buffer>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl OutlineRenderer {
    pub fn new(style: OutlineStyle) -> Self {
        Self {
            style,
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            projection_ubo: None,
            quad_vbo: None,
            quad_ibo: None,
            instance_vbo: None,
            instance_capacity: 0,
        }
    }

    /// Draws `outline` over `target`; `None` draws nothing.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        outline: Option<OutlineSpec>,
    ) {
        let Some(outline) = outline else { return };
        if outline.width <= 0.0 && outline.height <= 0.0 {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);

        let instances = outline_instances(&outline, &self.style);
        self.write_projection(ctx);
        ensure_instance_buffer(
            ctx.device,
            "droste outline instance vbo",
            &mut self.instance_vbo,
            &mut self.instance_capacity,
            instances.len(),
        );

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&instances));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("droste outline pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..6, 0, 0..instances.len() as u32);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("droste outline shader"),
            source: wgpu::ShaderSource::Wgsl(FEEDBACK_SHADER.into()),
        });

        let bind_group_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("droste outline bgl"),
                entries: &[projection_layout_entry(0)],
            });

        // Flat fill only: the texture group is never bound.
        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("droste outline pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = quad_pipeline(
            ctx.device,
            "droste outline pipeline",
            &pipeline_layout,
            &shader,
            "fs_flat",
            ctx.surface_format,
            premul_alpha_blend(),
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.projection_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.projection_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let projection_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("droste outline projection ubo"),
            size: std::mem::size_of::<ProjectionUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("droste outline bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_ubo.as_entire_binding(),
            }],
        });

        self.projection_ubo = Some(projection_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("droste outline quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("droste outline quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn write_projection(&self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.projection_ubo.as_ref() else { return };
        let u = ProjectionUniform::new(transform::canvas_projection(ctx.viewport));
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }
}

/// Four edge-band instances for `outline`, colored with the screen's RGB at
/// the style's alpha (premultiplied).
fn outline_instances(outline: &OutlineSpec, style: &OutlineStyle) -> [QuadInstance; 4] {
    let color = outline
        .color
        .with_alpha(style.alpha_for(outline.resizing))
        .to_premul();
    let edges = transform::outline_edges(
        outline.center,
        outline.width,
        outline.height,
        outline.rotation,
        style.thickness,
    );
    edges.map(|m| QuadInstance::new(m, color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::ScreenRegistry;

    fn style() -> OutlineStyle {
        OutlineStyle::from_config(&ToyConfig::default())
    }

    fn spec() -> OutlineSpec {
        OutlineSpec {
            center: Vec2::new(100.0, 100.0),
            width: 60.0,
            height: 40.0,
            rotation: 0.0,
            color: Rgba8::new(255, 0, 0, 15),
            resizing: false,
        }
    }

    #[test]
    fn alpha_is_boosted_while_resizing() {
        let s = style();
        assert_eq!(s.alpha_for(false), 40);
        assert_eq!(s.alpha_for(true), 80);
    }

    #[test]
    fn boost_saturates() {
        let s = OutlineStyle { alpha: 250, resize_boost: 40, thickness: 5.0 };
        assert_eq!(s.alpha_for(true), 255);
    }

    #[test]
    fn outline_uses_screen_rgb_with_style_alpha() {
        let inst = outline_instances(&spec(), &style());
        let a = 40.0 / 255.0;
        for i in &inst {
            assert!((i.color[0] - a).abs() < 1e-6);
            assert_eq!(i.color[1], 0.0);
            assert!((i.color[3] - a).abs() < 1e-6);
        }
    }

    #[test]
    fn resizing_to_overrides_dimensions() {
        let o = spec().resizing_to(10, 20);
        assert!(o.resizing);
        assert_eq!((o.width, o.height), (10.0, 20.0));
        assert_eq!(o.center, spec().center);
    }

    #[test]
    fn for_screen_copies_geometry() {
        let mut reg = ScreenRegistry::new(&ToyConfig::default());
        reg.create(Vec2::new(800.0, 475.0));
        let o = OutlineSpec::for_screen(&reg.screens()[0]);
        assert_eq!((o.width, o.height), (400.0, 237.0));
        assert!(!o.resizing);
        assert_eq!(o.rotation, 0.0);
    }
}
