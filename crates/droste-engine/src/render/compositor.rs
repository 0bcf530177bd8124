//! Ping-pong feedback compositor.
//!
//! Each call to [`FrameCompositor::process_frame`] renders every screen into
//! the *current* composite texture as a quad that samples the *previous*
//! composite, stamps the screen's tint over it, then swaps the two roles.

use wgpu::util::DeviceExt;

use crate::coords::Viewport;
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};
use crate::screen::{transform, Screen};

use super::common::{
    ensure_instance_buffer, premul_alpha_blend, projection_layout_entry, quad_pipeline,
    straight_alpha_blend, ProjectionUniform, QuadInstance, FEEDBACK_SHADER,
    QUAD_INDICES, QUAD_VERTICES,
};
use super::pingpong::{PingPong, Slot};

/// Storage format of both composite textures.
pub const COMPOSITE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// One composite render target plus the bind group that samples it.
pub struct CompositeTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    sample_bind_group: wgpu::BindGroup,
}

impl CompositeTarget {
    fn new(
        device: &wgpu::Device,
        label: &str,
        (width, height): (u32, u32),
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COMPOSITE_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sample_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("droste composite sample bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            _texture: texture,
            view,
            sample_bind_group,
        }
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

/// Owns the two composite textures and the pipelines that feed them.
///
/// Lifecycle: allocated once for a fixed canvas, both targets cleared to
/// transparent, released on drop. No operation exposes a half-swapped pair.
pub struct FrameCompositor {
    canvas: Viewport,
    targets: PingPong<CompositeTarget>,

    projection_bind_group: wgpu::BindGroup,
    _projection_ubo: wgpu::Buffer,

    feedback_pipeline: wgpu::RenderPipeline,
    tint_pipeline: wgpu::RenderPipeline,
    blit_pipeline: wgpu::RenderPipeline,
    present_format: wgpu::TextureFormat,

    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,
    blit_vbo: wgpu::Buffer,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl FrameCompositor {
    /// Allocates the composite pair at `ctx`'s physical canvas size and builds
    /// pipelines for the surface format in `ctx`.
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        let device = ctx.device;
        let canvas = ctx.viewport;
        let size = ctx.physical_size();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("droste feedback shader"),
            source: wgpu::ShaderSource::Wgsl(FEEDBACK_SHADER.into()),
        });

        let projection_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("droste projection bgl"),
            entries: &[projection_layout_entry(0)],
        });

        let sample_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("droste composite sample bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("droste compositor pipeline layout"),
            bind_group_layouts: &[&projection_layout, &sample_layout],
            immediate_size: 0,
        });

        let feedback_pipeline = quad_pipeline(
            device,
            "droste feedback pipeline",
            &pipeline_layout,
            &shader,
            "fs_textured",
            COMPOSITE_FORMAT,
            premul_alpha_blend(),
        );
        let tint_pipeline = quad_pipeline(
            device,
            "droste tint pipeline",
            &pipeline_layout,
            &shader,
            "fs_flat",
            COMPOSITE_FORMAT,
            premul_alpha_blend(),
        );
        let blit_pipeline = quad_pipeline(
            device,
            "droste blit pipeline",
            &pipeline_layout,
            &shader,
            "fs_textured",
            ctx.surface_format,
            straight_alpha_blend(),
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("droste composite sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let targets = PingPong::new(
            CompositeTarget::new(device, "droste composite A", size, &sample_layout, &sampler),
            CompositeTarget::new(device, "droste composite B", size, &sample_layout, &sampler),
        );

        let projection = ProjectionUniform::new(transform::canvas_projection(canvas));
        let projection_ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("droste projection ubo"),
            contents: bytemuck::bytes_of(&projection),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("droste projection bind group"),
            layout: &projection_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_ubo.as_entire_binding(),
            }],
        });

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("droste quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("droste quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        let blit_instance = QuadInstance::new(transform::full_canvas_matrix(canvas), Color::white());
        let blit_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("droste blit instance vbo"),
            contents: bytemuck::bytes_of(&blit_instance),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let compositor = Self {
            canvas,
            targets,
            projection_bind_group,
            _projection_ubo: projection_ubo,
            feedback_pipeline,
            tint_pipeline,
            blit_pipeline,
            present_format: ctx.surface_format,
            quad_vbo,
            quad_ibo,
            blit_vbo,
            instance_vbo: None,
            instance_capacity: 0,
        };
        compositor.clear_targets(ctx);

        log::info!(
            "compositor allocated: 2 x {}x{} {:?} (canvas {}x{})",
            size.0,
            size.1,
            COMPOSITE_FORMAT,
            canvas.width,
            canvas.height
        );
        compositor
    }

    fn clear_targets(&self, ctx: &RenderCtx<'_>) {
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("droste composite clear"),
            });
        for target in self.targets.iter() {
            let _rpass = begin_clear_pass(&mut encoder, target.view(), "droste composite clear pass");
        }
        ctx.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Slot holding the most recently completed composite.
    #[inline]
    pub fn latest(&self) -> Slot {
        self.targets.previous_slot()
    }

    /// Renders one feedback generation into the current slot, swaps the roles,
    /// and returns the slot just completed (now the previous frame).
    pub fn process_frame(
        &mut self,
        ctx: &RenderCtx<'_>,
        encoder: &mut wgpu::CommandEncoder,
        screens: &[Screen],
    ) -> Slot {
        let instances = build_instances(screens, self.canvas.height);
        if !instances.is_empty() {
            ensure_instance_buffer(
                ctx.device,
                "droste compositor instance vbo",
                &mut self.instance_vbo,
                &mut self.instance_capacity,
                instances.len(),
            );
            if let Some(vbo) = self.instance_vbo.as_ref() {
                ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&instances));
            }
        }

        // Returned: this call's target, never the next call's.
        let written = self.targets.current_slot();
        {
            let current = self.targets.current();
            let previous = self.targets.previous();
            let mut rpass = begin_clear_pass(encoder, current.view(), "droste composite pass");

            if let Some(instance_vbo) = self.instance_vbo.as_ref().filter(|_| !instances.is_empty()) {
                rpass.set_bind_group(0, &self.projection_bind_group, &[]);
                rpass.set_bind_group(1, &previous.sample_bind_group, &[]);
                rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
                rpass.set_vertex_buffer(1, instance_vbo.slice(..));
                rpass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

                for i in 0..screens.len() as u32 {
                    let feedback = 2 * i;
                    rpass.set_pipeline(&self.feedback_pipeline);
                    rpass.draw_indexed(0..6, 0, feedback..feedback + 1);
                    rpass.set_pipeline(&self.tint_pipeline);
                    rpass.draw_indexed(0..6, 0, feedback + 1..feedback + 2);
                }
            }
        }

        self.targets.swap();
        debug_assert_eq!(self.targets.previous_slot(), written);
        written
    }

    /// Blits the latest composite over the whole presentation target.
    pub fn render_current_frame(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        if ctx.surface_format != self.present_format {
            log::warn!(
                "presentation format changed ({:?} -> {:?}); blit skipped",
                self.present_format,
                ctx.surface_format
            );
            return;
        }

        let latest = self.targets.get(self.latest());
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("droste blit pass"),
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

        rpass.set_pipeline(&self.blit_pipeline);
        rpass.set_bind_group(0, &self.projection_bind_group, &[]);
        rpass.set_bind_group(1, &latest.sample_bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, self.blit_vbo.slice(..));
        rpass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..6, 0, 0..1);
    }
}

fn begin_clear_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    label: &str,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(Color::transparent().to_wgpu()),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}

/// Two instances per screen, in insertion order: the white-tinted feedback
/// quad, then the premultiplied tint quad with the same transform.
fn build_instances(screens: &[Screen], canvas_height: f32) -> Vec<QuadInstance> {
    let mut out = Vec::with_capacity(screens.len() * 2);
    for screen in screens {
        let model = screen.model_matrix(canvas_height);
        out.push(QuadInstance::new(model, Color::white()));
        out.push(QuadInstance::new(model, screen.color().to_premul()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToyConfig;
    use crate::coords::Vec2;
    use crate::screen::ScreenRegistry;

    fn registry_with(n: usize) -> ScreenRegistry {
        let mut reg = ScreenRegistry::new(&ToyConfig::default());
        for i in 0..n {
            reg.create(Vec2::new(200.0 + 100.0 * i as f32, 300.0));
        }
        reg
    }

    // ── instance packing ───────────────────────────────────────────────────

    #[test]
    fn two_instances_per_screen() {
        let reg = registry_with(3);
        assert_eq!(build_instances(reg.screens(), 950.0).len(), 6);
        assert!(build_instances(&[], 950.0).is_empty());
    }

    #[test]
    fn feedback_instance_is_white_and_tint_is_premultiplied() {
        let reg = registry_with(1);
        let inst = build_instances(reg.screens(), 950.0);

        assert_eq!(inst[0].color, [1.0, 1.0, 1.0, 1.0]);

        let a = 15.0 / 255.0;
        let expected = [66.0 / 255.0 * a, 135.0 / 255.0 * a, 245.0 / 255.0 * a, a];
        for (got, want) in inst[1].color.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6);
        }
    }

    #[test]
    fn feedback_and_tint_share_transform() {
        let reg = registry_with(2);
        let inst = build_instances(reg.screens(), 950.0);
        assert_eq!(inst[0].model, inst[1].model);
        assert_eq!(inst[2].model, inst[3].model);
        assert_ne!(inst[0].model, inst[2].model);
    }

    #[test]
    fn instances_follow_insertion_order() {
        let reg = registry_with(2);
        let inst = build_instances(reg.screens(), 950.0);
        // Same y and size, so the vertical translations agree.
        assert_eq!(inst[0].model[3][1], inst[2].model[3][1]);
        let x0 = reg.screens()[0].model_matrix(950.0).to_cols_array_2d();
        assert_eq!(inst[0].model, x0);
    }
}
