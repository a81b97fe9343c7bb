//! WebGPU colored-quad pipeline
//!
//! One pipeline, two camera uniforms. The world layer is drawn first with
//! the scene camera, then the UI layer with the fixed screen camera.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::draw_list::DrawList;
use super::vertex::Vertex;
use crate::sim::{Camera, Layer};

/// Camera transform (must match shader)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    /// World point at the middle of the screen
    pub center: [f32; 2],
    /// World units to clip space, y flipped
    pub scale: [f32; 2],
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        let vp = camera.viewport.max(glam::Vec2::ONE);
        Self {
            center: camera.center.to_array(),
            scale: [2.0 * camera.zoom / vp.x, -2.0 * camera.zoom / vp.y],
        }
    }

    /// Clip-space position of `p`, as the vertex shader computes it
    pub fn to_clip(&self, p: [f32; 2]) -> [f32; 2] {
        [
            (p[0] - self.center[0]) * self.scale[0],
            (p[1] - self.center[1]) * self.scale[1],
        ]
    }
}

/// Main render state
pub struct QuadRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    world_uniform: wgpu::Buffer,
    ui_uniform: wgpu::Buffer,
    world_bind_group: wgpu::BindGroup,
    ui_bind_group: wgpu::BindGroup,
    /// Surface size in physical pixels
    pub size: (u32, u32),
}

impl QuadRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("when-pigs-fly-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("quad_shader.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let identity = CameraUniform {
            center: [0.0, 0.0],
            scale: [1.0, 1.0],
        };
        let make_camera = |label: &str| {
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(&identity),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            (buffer, bind_group)
        };
        let (world_uniform, world_bind_group) = make_camera("world_camera");
        let (ui_uniform, ui_bind_group) = make_camera("ui_camera");

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quad_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            world_uniform,
            ui_uniform,
            world_bind_group,
            ui_bind_group,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload both layers and draw them through their cameras
    pub fn render(&mut self, list: &DrawList) -> Result<(), wgpu::SurfaceError> {
        let world = match &list.world_camera {
            Some(camera) => {
                self.queue.write_buffer(
                    &self.world_uniform,
                    0,
                    bytemuck::bytes_of(&CameraUniform::from_camera(camera)),
                );
                list.vertices(Layer::World)
            }
            None => Vec::new(),
        };
        let ui = list.vertices(Layer::Ui);
        self.queue.write_buffer(
            &self.ui_uniform,
            0,
            bytemuck::bytes_of(&CameraUniform::from_camera(&list.ui_camera)),
        );

        let world_count = world.len() as u32;
        let total = world_count + ui.len() as u32;
        let mut vertices = world;
        vertices.extend(ui);

        // Rebuilt every frame; the scene is a few dozen quads
        let vertex_buffer = (total > 0).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let [r, g, b, a] = list.clear.map(f64::from);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quad_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(buffer) = &vertex_buffer {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                if world_count > 0 {
                    render_pass.set_bind_group(0, &self.world_bind_group, &[]);
                    render_pass.draw(0..world_count, 0..1);
                }
                if total > world_count {
                    render_pass.set_bind_group(0, &self.ui_bind_group, &[]);
                    render_pass.draw(world_count..total, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_screen_camera_maps_viewport_to_clip() {
        let u = CameraUniform::from_camera(&Camera::screen(Vec2::new(800.0, 600.0)));
        assert_eq!(u.to_clip([0.0, 0.0]), [-1.0, 1.0]);
        assert_eq!(u.to_clip([800.0, 600.0]), [1.0, -1.0]);
        assert_eq!(u.to_clip([400.0, 300.0]), [0.0, 0.0]);
    }

    #[test]
    fn test_world_camera_uses_zoom() {
        let mut camera = Camera::screen(Vec2::new(800.0, 600.0));
        camera.center = Vec2::new(1000.0, 0.0);
        camera.zoom = 2.0;
        let u = CameraUniform::from_camera(&camera);
        // Half a viewport at zoom 2 is 200 world units
        assert_eq!(u.to_clip([1200.0, 0.0]), [1.0, 0.0]);
    }

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 16);
    }
}
