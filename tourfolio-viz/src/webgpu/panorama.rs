//! Dual-material panorama sphere renderer
//!
//! The sphere is drawn once per visible material with additive blending. Each
//! material writes its tone-mapped color premultiplied by its opacity, so two
//! draws with opacities `1 - o` and `o` produce a linear cross-fade.

use std::collections::HashMap;

use web_sys::HtmlCanvasElement;

use super::{GpuContext, GpuTexture, mesh_buffers, mesh_vertex_layout, texture_entries, uniform_entry};
use crate::camera::Camera3D;
use crate::effects::panorama_shader;
use crate::error::ViewerError;
use crate::geometry::{SPHERE_RADIUS, SPHERE_SEGMENTS, uv_sphere};
use crate::texture_data::DecodedTexture;
use crate::tour::FrameStatus;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniforms {
    view_proj: [f32; 16],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct MaterialUniforms {
    opacity: f32,
    _padding: [f32; 3],
}

impl MaterialUniforms {
    fn new(opacity: f32) -> Self {
        Self {
            opacity,
            _padding: [0.0; 3],
        }
    }
}

/// One of the two co-located sphere materials
struct SphereMaterial {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct PanoramaTexture {
    _texture: GpuTexture,
    bind_group: wgpu::BindGroup,
}

pub struct PanoramaRenderer {
    gpu: GpuContext,
    pipeline: wgpu::RenderPipeline,

    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,

    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    /// Slot 0 shows the current panorama, slot 1 the next one
    materials: [SphereMaterial; 2],

    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    /// Uploaded textures keyed by panorama index
    textures: HashMap<usize, PanoramaTexture>,
}

impl PanoramaRenderer {
    pub async fn new(canvas: HtmlCanvasElement) -> Result<Self, ViewerError> {
        let gpu = GpuContext::new(canvas, "tourfolio-panorama").await?;

        let camera_layout = gpu
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX)],
            });
        let material_layout = gpu
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Material Bind Group Layout"),
                entries: &[uniform_entry(0, wgpu::ShaderStages::FRAGMENT)],
            });
        let texture_layout = gpu
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Panorama Texture Bind Group Layout"),
                entries: &texture_entries(0, 1),
            });

        let camera_buffer = gpu.uniform_buffer(
            "Camera Uniform Buffer",
            bytemuck::bytes_of(&CameraUniforms {
                view_proj: [0.0; 16],
            }),
        );
        let camera_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let materials = [1.0, 0.0].map(|opacity| {
            let buffer = gpu.uniform_buffer(
                "Material Uniform Buffer",
                bytemuck::bytes_of(&MaterialUniforms::new(opacity)),
            );
            let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Material Bind Group"),
                layout: &material_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            SphereMaterial { buffer, bind_group }
        });

        let shader = gpu
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Panorama Shader"),
                source: wgpu::ShaderSource::Wgsl(panorama_shader().into()),
            });

        let pipeline_layout = gpu
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Panorama Pipeline Layout"),
                bind_group_layouts: &[&camera_layout, &material_layout, &texture_layout],
                push_constant_ranges: &[],
            });

        let additive = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };

        let pipeline = gpu
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Panorama Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[mesh_vertex_layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.format(),
                        blend: Some(wgpu::BlendState {
                            color: additive,
                            alpha: additive,
                        }),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // Only the interior faces the camera at the center
                    cull_mode: Some(wgpu::Face::Front),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        let sphere = uv_sphere(SPHERE_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS);
        let (vertex_buffer, index_buffer) = mesh_buffers(&gpu, &sphere, "Sphere");
        let sampler = gpu.texture_sampler();

        Ok(Self {
            gpu,
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: sphere.indices.len() as u32,
            camera_buffer,
            camera_bind_group,
            materials,
            texture_layout,
            sampler,
            textures: HashMap::new(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    /// Upload the decoded panorama for entry `index`
    pub fn upload(&mut self, index: usize, decoded: &DecodedTexture) {
        let texture = GpuTexture::upload(&self.gpu, decoded, "Panorama Texture");
        let bind_group = self.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Panorama Texture Bind Group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        self.textures.insert(
            index,
            PanoramaTexture {
                _texture: texture,
                bind_group,
            },
        );
    }

    /// Free the GPU texture for entry `index`
    pub fn release(&mut self, index: usize) {
        if self.textures.remove(&index).is_some() {
            tracing::debug!(index, "panorama texture released");
        }
    }

    /// Draw one frame for `status`
    pub fn render(&mut self, camera: &Camera3D, status: FrameStatus) {
        // (panorama index, opacity) per material slot
        let draws: Vec<(usize, f32)> = match status {
            FrameStatus::Empty | FrameStatus::Loading => Vec::new(),
            FrameStatus::Still { current } | FrameStatus::Committed { current } => {
                vec![(current, 1.0)]
            }
            FrameStatus::Fading {
                current,
                next,
                fade,
            } => vec![(current, fade.current), (next, fade.next)],
        };

        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniforms {
                view_proj: camera.view_projection_matrix(),
            }),
        );
        for ((_, opacity), material) in draws.iter().zip(&self.materials) {
            self.gpu.queue.write_buffer(
                &material.buffer,
                0,
                bytemuck::bytes_of(&MaterialUniforms::new(*opacity)),
            );
        }

        let Some(output) = self.gpu.acquire() else {
            return;
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Panorama Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Panorama Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            for ((index, _), material) in draws.iter().zip(&self.materials) {
                let Some(texture) = self.textures.get(index) else {
                    continue;
                };
                render_pass.set_bind_group(1, &material.bind_group, &[]);
                render_pass.set_bind_group(2, &texture.bind_group, &[]);
                render_pass.draw_indexed(0..self.index_count, 0, 0..1);
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}
