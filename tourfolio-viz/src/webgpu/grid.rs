//! Effect-shaded tile renderer for the portfolio grid
//!
//! Every tile owns its transform buffer, its effect uniform buffer and, once
//! its image has loaded, a bind group tying those to its texture. Tiles whose
//! image is still loading are skipped.

use std::collections::HashMap;

use web_sys::HtmlCanvasElement;

use super::{GpuContext, GpuTexture, mesh_buffers, mesh_vertex_layout, texture_entries, uniform_entry};
use crate::effects::{EffectKind, TransformUniforms};
use crate::error::ViewerError;
use crate::geometry::{PLANE_SEGMENTS, plane};
use crate::scene::PortfolioScene;
use crate::texture_data::DecodedTexture;

struct TileResources {
    transform_buffer: wgpu::Buffer,
    effect_buffer: wgpu::Buffer,
    bind_group: Option<wgpu::BindGroup>,
    _texture: Option<GpuTexture>,
}

pub struct GridRenderer {
    gpu: GpuContext,
    pipelines: HashMap<EffectKind, wgpu::RenderPipeline>,
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,

    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,

    tiles: Vec<TileResources>,
}

impl GridRenderer {
    pub async fn new(canvas: HtmlCanvasElement, scene: &PortfolioScene) -> Result<Self, ViewerError> {
        let gpu = GpuContext::new(canvas, "tourfolio-grid").await?;

        let [texture_entry, sampler_entry] = texture_entries(2, 3);
        let layout = gpu
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Tile Bind Group Layout"),
                entries: &[
                    uniform_entry(0, wgpu::ShaderStages::VERTEX),
                    uniform_entry(1, wgpu::ShaderStages::VERTEX_FRAGMENT),
                    texture_entry,
                    sampler_entry,
                ],
            });

        let pipeline_layout = gpu
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Tile Pipeline Layout"),
                bind_group_layouts: &[&layout],
                push_constant_ranges: &[],
            });

        let pipelines = EffectKind::ALL
            .into_iter()
            .map(|kind| (kind, create_pipeline(&gpu, &pipeline_layout, kind)))
            .collect();

        let mesh = plane(1.0, 1.0, PLANE_SEGMENTS, PLANE_SEGMENTS);
        let (vertex_buffer, index_buffer) = mesh_buffers(&gpu, &mesh, "Tile");

        let tiles = scene
            .tiles()
            .iter()
            .map(|tile| TileResources {
                transform_buffer: gpu.uniform_buffer(
                    "Tile Transform Buffer",
                    bytemuck::bytes_of(&TransformUniforms::new([0.0; 16], tile.position, [1.0, 1.0])),
                ),
                effect_buffer: gpu.uniform_buffer(
                    "Tile Effect Buffer",
                    tile.material.uniforms().as_bytes(),
                ),
                bind_group: None,
                _texture: None,
            })
            .collect();

        let sampler = gpu.texture_sampler();

        Ok(Self {
            gpu,
            pipelines,
            layout,
            sampler,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            tiles,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    /// Bind the loaded image of tile `index`
    pub fn set_texture(&mut self, index: usize, decoded: &DecodedTexture) {
        let Some(tile) = self.tiles.get_mut(index) else {
            return;
        };
        let texture = GpuTexture::upload(&self.gpu, decoded, "Tile Texture");
        let bind_group = self.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Tile Bind Group"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: tile.transform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: tile.effect_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        tile.bind_group = Some(bind_group);
        tile._texture = Some(texture);
    }

    /// Upload this frame's uniforms and draw every loaded tile
    pub fn render(&mut self, scene: &PortfolioScene) {
        let view_proj = scene.camera().view_projection_matrix();
        let size = scene.preset().item_size;

        for (resources, tile) in self.tiles.iter().zip(scene.tiles()) {
            let transform = TransformUniforms::new(view_proj, tile.position, size);
            self.gpu
                .queue
                .write_buffer(&resources.transform_buffer, 0, bytemuck::bytes_of(&transform));
            self.gpu
                .queue
                .write_buffer(&resources.effect_buffer, 0, tile.material.uniforms().as_bytes());
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
                label: Some("Grid Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Grid Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            for (resources, tile) in self.tiles.iter().zip(scene.tiles()) {
                let Some(bind_group) = &resources.bind_group else {
                    continue;
                };
                let Some(pipeline) = self.pipelines.get(&tile.material.kind()) else {
                    continue;
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, bind_group, &[]);
                render_pass.draw_indexed(0..self.index_count, 0, 0..1);
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

fn create_pipeline(
    gpu: &GpuContext,
    layout: &wgpu::PipelineLayout,
    kind: EffectKind,
) -> wgpu::RenderPipeline {
    let shader = gpu
        .device
        .create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(kind.name()),
            source: wgpu::ShaderSource::Wgsl(kind.shader_source().into()),
        });

    gpu.device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(kind.name()),
            layout: Some(layout),
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
            multiview: None,
            cache: None,
        })
}
