use wgpu::util::DeviceExt;
use wgpu::*;
use glam::{Mat4, Vec3};
use tracing::debug;

use crate::model::{BlockPos, Camera, World};
use super::mesh::{create_outline_mesh, Mesh, MeshBuffer, Vertex};

/// Sky blue (#87ceeb) used for the clear colour and fog
pub const SKY_SRGB: [f32; 3] = [135.0 / 255.0, 206.0 / 255.0, 235.0 / 255.0];
pub const FOG_START: f32 = 20.0;
pub const FOG_END: f32 = 100.0;
pub const SUN_POSITION: Vec3 = Vec3::new(50.0, 100.0, 50.0);
pub const SUN_INTENSITY: f32 = 0.8;
pub const AMBIENT: f32 = 0.7;

const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            eye: camera.eye.extend(1.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    pub sun_dir: [f32; 3],
    pub sun_intensity: f32,
    pub sky_color: [f32; 4],
    pub ambient: f32,
    pub fog_start: f32,
    pub fog_end: f32,
    pub _pad: f32,
}

impl Default for LightingUniform {
    fn default() -> Self {
        let sky = sky_linear();
        Self {
            sun_dir: SUN_POSITION.normalize().to_array(),
            sun_intensity: SUN_INTENSITY,
            sky_color: [sky[0], sky[1], sky[2], 1.0],
            ambient: AMBIENT,
            fog_start: FOG_START,
            fog_end: FOG_END,
            _pad: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub transform: [[f32; 4]; 4],
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
}

pub fn sky_linear() -> [f32; 3] {
    SKY_SRGB.map(srgb_to_linear)
}

/// egui output ready to be drawn on top of the scene
pub struct UiFrame {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub screen: egui_wgpu::ScreenDescriptor,
}

pub fn create_depth_texture(device: &Device, width: u32, height: u32) -> TextureView {
    let depth_texture = device.create_texture(&TextureDescriptor {
        label: Some("depth_texture"),
        size: Extent3d { width: width.max(1), height: height.max(1), depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    depth_texture.create_view(&TextureViewDescriptor::default())
}

fn uniform_entry(binding: u32, visibility: ShaderStages) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility,
        ty: BindingType::Buffer {
            ty: BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn create_pipeline(
    device: &Device,
    label: &str,
    layout: &PipelineLayout,
    shader: &ShaderModule,
    format: TextureFormat,
    topology: PrimitiveTopology,
    cull_mode: Option<Face>,
    depth_write_enabled: bool,
    depth_compare: CompareFunction,
) -> RenderPipeline {
    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(ColorTargetState { format, blend: Some(BlendState::REPLACE), write_mask: ColorWrites::ALL })],
            compilation_options: Default::default(),
        }),
        primitive: PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: FrontFace::Ccw,
            cull_mode,
            polygon_mode: PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        }),
        multisample: MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
        multiview: None,
        cache: None,
    })
}

/// GPU resources for the block world, the target outline and the egui overlay
pub struct Renderer {
    block_pipeline: RenderPipeline,
    outline_pipeline: RenderPipeline,

    camera_buffer: Buffer,
    camera_bind_group: BindGroup,
    outline_buffer: Buffer,
    outline_bind_group: BindGroup,

    outline_mesh: MeshBuffer,
    world_mesh: Option<MeshBuffer>,
    world_revision: Option<u64>,
    show_outline: bool,

    depth_view: TextureView,
    clear_color: Color,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub fn new(device: &Device, format: TextureFormat, width: u32, height: u32) -> Self {
        let camera_buffer = device.create_buffer_init(&util::BufferInitDescriptor {
            label: Some("camera_buffer"),
            contents: bytemuck::bytes_of(&CameraUniform {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                eye: [0.0; 4],
            }),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let lighting_buffer = device.create_buffer_init(&util::BufferInitDescriptor {
            label: Some("lighting_buffer"),
            contents: bytemuck::bytes_of(&LightingUniform::default()),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let outline_buffer = device.create_buffer_init(&util::BufferInitDescriptor {
            label: Some("outline_transform"),
            contents: bytemuck::bytes_of(&TransformUniform {
                transform: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });

        // Blocks: camera + lighting
        let camera_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("camera_bind_group_layout"),
            entries: &[
                uniform_entry(0, ShaderStages::VERTEX | ShaderStages::FRAGMENT),
                uniform_entry(1, ShaderStages::FRAGMENT),
            ],
        });
        let camera_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &camera_bgl,
            entries: &[
                BindGroupEntry { binding: 0, resource: camera_buffer.as_entire_binding() },
                BindGroupEntry { binding: 1, resource: lighting_buffer.as_entire_binding() },
            ],
        });

        // Outline: camera + model transform
        let outline_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("outline_bgl"),
            entries: &[
                uniform_entry(0, ShaderStages::VERTEX),
                uniform_entry(1, ShaderStages::VERTEX),
            ],
        });
        let outline_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("outline_bg"),
            layout: &outline_bgl,
            entries: &[
                BindGroupEntry { binding: 0, resource: camera_buffer.as_entire_binding() },
                BindGroupEntry { binding: 1, resource: outline_buffer.as_entire_binding() },
            ],
        });

        let block_shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("block_shader"),
            source: ShaderSource::Wgsl(include_str!("shaders/block.wgsl").into()),
        });
        let outline_shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("outline_shader"),
            source: ShaderSource::Wgsl(include_str!("shaders/outline.wgsl").into()),
        });

        let block_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("block_pipeline_layout"),
            bind_group_layouts: &[&camera_bgl],
            push_constant_ranges: &[],
        });
        let outline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("outline_pipeline_layout"),
            bind_group_layouts: &[&outline_bgl],
            push_constant_ranges: &[],
        });

        let block_pipeline = create_pipeline(
            device,
            "block_pipeline",
            &block_layout,
            &block_shader,
            format,
            PrimitiveTopology::TriangleList,
            Some(Face::Back),
            true,
            CompareFunction::Less,
        );
        let outline_pipeline = create_pipeline(
            device,
            "outline_pipeline",
            &outline_layout,
            &outline_shader,
            format,
            PrimitiveTopology::LineList,
            None,
            false,
            CompareFunction::LessEqual,
        );

        let sky = sky_linear();
        Self {
            block_pipeline,
            outline_pipeline,
            camera_buffer,
            camera_bind_group,
            outline_buffer,
            outline_bind_group,
            outline_mesh: create_outline_mesh().upload(device),
            world_mesh: None,
            world_revision: None,
            show_outline: false,
            depth_view: create_depth_texture(device, width, height),
            clear_color: Color { r: sky[0] as f64, g: sky[1] as f64, b: sky[2] as f64, a: 1.0 },
            egui_renderer: egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default()),
        }
    }

    pub fn resize(&mut self, device: &Device, width: u32, height: u32) {
        self.depth_view = create_depth_texture(device, width, height);
    }

    /// Rebuild the world mesh if the world changed since the last upload
    pub fn sync_world(&mut self, device: &Device, world: &World) {
        if self.world_revision == Some(world.revision()) {
            return;
        }
        let mesh = Mesh::from_world(world);
        debug!(revision = world.revision(), vertices = mesh.vertices.len(), "rebuilt world mesh");
        self.world_mesh = if mesh.is_empty() { None } else { Some(mesh.upload(device)) };
        self.world_revision = Some(world.revision());
    }

    /// Upload per-frame uniforms
    pub fn update(&mut self, queue: &Queue, camera: &Camera, target: Option<BlockPos>) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&CameraUniform::from_camera(camera)));

        self.show_outline = target.is_some();
        if let Some(block) = target {
            let transform = TransformUniform {
                transform: Mat4::from_translation(block.center()).to_cols_array_2d(),
            };
            queue.write_buffer(&self.outline_buffer, 0, bytemuck::bytes_of(&transform));
        }
    }

    /// Draw one frame. Surface errors are returned so the host can
    /// reconfigure or bail out.
    pub fn draw(
        &mut self,
        device: &Device,
        queue: &Queue,
        surface: &Surface,
        ui: Option<UiFrame>,
    ) -> Result<(), SurfaceError> {
        let frame = surface.get_current_texture()?;
        let view = frame.texture.create_view(&TextureViewDescriptor::default());
        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("encoder"),
        });

        {
            let mut rp = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(self.clear_color),
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(mesh) = &self.world_mesh {
                rp.set_pipeline(&self.block_pipeline);
                rp.set_bind_group(0, &self.camera_bind_group, &[]);
                rp.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                rp.set_index_buffer(mesh.index_buffer.slice(..), IndexFormat::Uint32);
                rp.draw_indexed(0..mesh.index_count, 0, 0..1);
            }

            if self.show_outline {
                rp.set_pipeline(&self.outline_pipeline);
                rp.set_bind_group(0, &self.outline_bind_group, &[]);
                rp.set_vertex_buffer(0, self.outline_mesh.vertex_buffer.slice(..));
                rp.set_index_buffer(self.outline_mesh.index_buffer.slice(..), IndexFormat::Uint32);
                rp.draw_indexed(0..self.outline_mesh.index_count, 0, 0..1);
            }
        }

        let mut extra_commands = Vec::new();
        if let Some(ui) = &ui {
            for (id, image_delta) in &ui.textures_delta.set {
                self.egui_renderer.update_texture(device, queue, *id, image_delta);
            }
            extra_commands = self
                .egui_renderer
                .update_buffers(device, queue, &mut encoder, &ui.primitives, &ui.screen);

            let egui_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("egui_render_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Load,
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui_renderer
                .render(&mut egui_pass.forget_lifetime(), &ui.primitives, &ui.screen);
        }

        queue.submit(extra_commands.into_iter().chain(std::iter::once(encoder.finish())));
        frame.present();

        if let Some(ui) = ui {
            for id in &ui.textures_delta.free {
                self.egui_renderer.free_texture(id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layouts_match_shaders() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
        assert_eq!(std::mem::size_of::<LightingUniform>(), 48);
        assert_eq!(std::mem::size_of::<TransformUniform>(), 64);
        assert_eq!(std::mem::size_of::<Vertex>(), 40);
    }

    #[test]
    fn test_sky_is_linearized() {
        let sky = sky_linear();
        for (lin, srgb) in sky.iter().zip(SKY_SRGB) {
            assert!(*lin < srgb && *lin > 0.0);
        }
        let sun = LightingUniform::default().sun_dir;
        assert!((Vec3::from(sun).length() - 1.0).abs() < 1e-5);
    }
}
