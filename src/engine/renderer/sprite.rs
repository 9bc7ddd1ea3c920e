// Sprite batching and the draw surface the game renders against

use super::{Texture, TextureHandle, TextureManager, Vertex};
use crate::core::math::Rect;
use glam::{Affine2, Vec2, Vec3};
use std::ops::Range;
use wgpu::util::DeviceExt;

/// The drawing interface game entities emit against. Entities never touch
/// wgpu types; they describe blits in world space and the renderer turns
/// them into geometry.
pub trait DrawSurface {
    /// Copy `src` (a pixel rect within the texture) into the world-space
    /// rect `dst`.
    fn blit(&mut self, texture: TextureHandle, src: Rect, dst: Rect);

    /// Copy the whole texture into the world-space rect `dst`.
    fn blit_full(&mut self, texture: TextureHandle, dst: Rect);

    /// Open a transform scope: subsequent blits are placed in a space
    /// translated by `translation` and rotated by `rotation` radians.
    /// Scopes nest.
    fn push_transform(&mut self, translation: Vec2, rotation: f32);

    /// Close the innermost transform scope.
    fn pop_transform(&mut self);
}

/// One queued draw
#[derive(Debug, Clone, Copy)]
struct Blit {
    texture: TextureHandle,
    /// Pixel source rect; None means the whole texture
    src: Option<Rect>,
    dst: Rect,
    transform: Affine2,
}

/// Batches blits for a frame and renders them in submission order
pub struct SpriteRenderer {
    render_pipeline: wgpu::RenderPipeline,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    blits: Vec<Blit>,
    transforms: Vec<Affine2>,

    // Rebuilt by `prepare` each frame
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    draw_runs: Vec<(TextureHandle, Range<u32>)>,
}

impl SpriteRenderer {
    /// Create a new sprite renderer
    pub fn new(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
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

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Texture Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
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
            label: Some("Sprite Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sprite Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // The y-down projection reverses winding; draw both faces
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let camera_uniform = super::CameraUniform {
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
        };

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        Self {
            render_pipeline,
            texture_bind_group_layout,
            camera_buffer,
            camera_bind_group,
            blits: Vec::new(),
            transforms: Vec::new(),
            vertex_buffer: None,
            index_buffer: None,
            draw_runs: Vec::new(),
        }
    }

    /// Drop last frame's blits and any unbalanced transform scopes
    pub fn begin_frame(&mut self) {
        self.blits.clear();
        self.transforms.clear();
    }

    /// Build GPU buffers from the queued blits
    pub fn prepare(&mut self, device: &wgpu::Device, textures: &TextureManager) {
        self.draw_runs.clear();
        self.vertex_buffer = None;
        self.index_buffer = None;

        if self.blits.is_empty() {
            return;
        }

        let mut vertices: Vec<Vertex> = Vec::with_capacity(self.blits.len() * 4);
        let mut indices: Vec<u16> = Vec::with_capacity(self.blits.len() * 6);

        for blit in &self.blits {
            let Some(texture) = textures.get(blit.texture) else {
                log::warn!("blit references unknown texture {:?}", blit.texture);
                continue;
            };

            let base = vertices.len() as u16;
            push_quad(&mut vertices, blit, texture);
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);

            let index_end = indices.len() as u32;
            match self.draw_runs.last_mut() {
                Some((handle, range)) if *handle == blit.texture => range.end = index_end,
                _ => self
                    .draw_runs
                    .push((blit.texture, index_end - 6..index_end)),
            }
        }

        if vertices.is_empty() {
            return;
        }

        self.vertex_buffer = Some(device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Sprite Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
        self.index_buffer = Some(device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Sprite Index Buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        ));
    }

    /// Issue the prepared draws
    pub fn render<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        textures: &'a TextureManager,
    ) {
        let (Some(vertex_buffer), Some(index_buffer)) =
            (self.vertex_buffer.as_ref(), self.index_buffer.as_ref())
        else {
            return;
        };

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        for (handle, range) in &self.draw_runs {
            let Some(texture) = textures.get(*handle) else {
                continue;
            };
            render_pass.set_bind_group(1, &texture.bind_group, &[]);
            render_pass.draw_indexed(range.clone(), 0, 0..1);
        }
    }

    /// Get a reference to the camera buffer
    pub fn camera_buffer(&self) -> &wgpu::Buffer {
        &self.camera_buffer
    }

    /// Layout texture uploads must use for their bind groups
    pub fn texture_bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.texture_bind_group_layout
    }

    fn current_transform(&self) -> Affine2 {
        self.transforms.last().copied().unwrap_or(Affine2::IDENTITY)
    }
}

impl DrawSurface for SpriteRenderer {
    fn blit(&mut self, texture: TextureHandle, src: Rect, dst: Rect) {
        self.blits.push(Blit {
            texture,
            src: Some(src),
            dst,
            transform: self.current_transform(),
        });
    }

    fn blit_full(&mut self, texture: TextureHandle, dst: Rect) {
        self.blits.push(Blit {
            texture,
            src: None,
            dst,
            transform: self.current_transform(),
        });
    }

    fn push_transform(&mut self, translation: Vec2, rotation: f32) {
        let scope = self.current_transform()
            * Affine2::from_translation(translation)
            * Affine2::from_angle(rotation);
        self.transforms.push(scope);
    }

    fn pop_transform(&mut self) {
        self.transforms.pop();
    }
}

fn push_quad(vertices: &mut Vec<Vertex>, blit: &Blit, texture: &Texture) {
    let tex_width = texture.width as f32;
    let tex_height = texture.height as f32;
    let src = blit
        .src
        .unwrap_or_else(|| Rect::new(0.0, 0.0, tex_width, tex_height));

    let u0 = src.x / tex_width;
    let v0 = src.y / tex_height;
    let u1 = src.right() / tex_width;
    let v1 = src.bottom() / tex_height;

    let dst = blit.dst;
    let corners = [
        (Vec2::new(dst.x, dst.y), Vec2::new(u0, v0)),
        (Vec2::new(dst.right(), dst.y), Vec2::new(u1, v0)),
        (Vec2::new(dst.right(), dst.bottom()), Vec2::new(u1, v1)),
        (Vec2::new(dst.x, dst.bottom()), Vec2::new(u0, v1)),
    ];

    for (corner, uv) in corners {
        let world = blit.transform.transform_point2(corner);
        vertices.push(Vertex::new(Vec3::new(world.x, world.y, 0.0), uv));
    }
}
