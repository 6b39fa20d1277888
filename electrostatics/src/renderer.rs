//! Rendering system for the widget canvases

use common::{create_uniform_buffer, create_vertex_buffer, Camera2D, CameraUniform, GraphicsContext, Vertex};
use glam::Vec2;

use crate::drag::Rect;
use crate::scene::{Color, Shape};

const ELLIPSE_SEGMENTS: usize = 32;

/// A widget's shapes and where its container sits in the window
pub struct Layer<'a> {
    pub origin: Vec2,
    pub size: Vec2,
    pub shapes: &'a [Shape],
}

/// Vertices of one container, drawn clipped to it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Batch {
    pub start: u32,
    pub count: u32,
    pub clip: Rect,
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn surface_color(color: Color, linear: bool) -> [f32; 4] {
    if linear {
        [
            srgb_to_linear(color[0]),
            srgb_to_linear(color[1]),
            srgb_to_linear(color[2]),
            color[3],
        ]
    } else {
        color
    }
}

fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

fn push_quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], colors: [[f32; 4]; 4]) {
    for i in [0, 1, 2, 0, 2, 3] {
        out.push(Vertex::new(corners[i].to_array(), colors[i]));
    }
}

fn push_ellipse(out: &mut Vec<Vertex>, center: Vec2, radii: Vec2, color: [f32; 4]) {
    let step = std::f32::consts::TAU / ELLIPSE_SEGMENTS as f32;
    for i in 0..ELLIPSE_SEGMENTS {
        let a0 = i as f32 * step;
        let a1 = a0 + step;
        out.push(Vertex::new(center.to_array(), color));
        out.push(Vertex::new((center + Vec2::new(a0.cos(), a0.sin()) * radii).to_array(), color));
        out.push(Vertex::new((center + Vec2::new(a1.cos(), a1.sin()) * radii).to_array(), color));
    }
}

/// Turn shapes into a triangle list. `origin` moves container coordinates into
/// window coordinates; `linear` converts colors for an sRGB surface.
pub fn tessellate(shapes: &[Shape], origin: Vec2, linear: bool, out: &mut Vec<Vertex>) {
    for shape in shapes {
        match shape {
            Shape::Backdrop { min, max, top, bottom } => {
                let (min, max) = (*min + origin, *max + origin);
                let top = surface_color(*top, linear);
                let bottom = surface_color(*bottom, linear);
                push_quad(
                    out,
                    [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
                    [top, top, bottom, bottom],
                );
            }
            Shape::Rect { center, size, rotation, color } => {
                let color = surface_color(*color, linear);
                let (sin, cos) = rotation.sin_cos();
                let half = *size * 0.5;
                let corners = [
                    Vec2::new(-half.x, -half.y),
                    Vec2::new(half.x, -half.y),
                    Vec2::new(half.x, half.y),
                    Vec2::new(-half.x, half.y),
                ]
                .map(|c| *center + origin + Vec2::new(c.x * cos - c.y * sin, c.x * sin + c.y * cos));
                push_quad(out, corners, [color; 4]);
            }
            Shape::Ellipse { center, radii, color } => {
                push_ellipse(out, *center + origin, *radii, surface_color(*color, linear));
            }
            Shape::Stroke {
                points,
                width,
                top,
                bottom,
                span,
            } => {
                let height = (span.1 - span.0).max(f32::EPSILON);
                let shade = |p: Vec2| surface_color(lerp_color(*top, *bottom, (p.y - span.0) / height), linear);

                for pair in points.windows(2) {
                    let (a, b) = (pair[0], pair[1]);
                    let normal = (b - a).normalize_or_zero().perp() * (*width * 0.5);
                    let (ca, cb) = (shade(a), shade(b));
                    let (a, b) = (a + origin, b + origin);
                    push_quad(out, [a + normal, b + normal, b - normal, a - normal], [ca, cb, cb, ca]);
                }
                // Round the joints
                if points.len() > 2 {
                    for p in &points[1..points.len() - 1] {
                        push_ellipse(out, *p + origin, Vec2::splat(*width * 0.5), shade(*p));
                    }
                }
            }
        }
    }
}

pub struct Renderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    max_vertices: usize,
    linear_colors: bool,
    vertices: Vec<Vertex>,
}

impl Renderer {
    pub fn new(ctx: &GraphicsContext, camera: &Camera2D, max_vertices: usize) -> Self {
        let device = &ctx.device;

        // Load shader
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        // Camera uniform buffer
        let camera_buffer = create_uniform_buffer(device, &CameraUniform::from_camera_2d(camera));

        let camera_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Rotated rects come in either winding
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        Self {
            pipeline,
            vertex_buffer: create_vertex_buffer(device, max_vertices),
            camera_buffer,
            camera_bind_group,
            max_vertices,
            linear_colors: ctx.config.format.is_srgb(),
            vertices: Vec::with_capacity(max_vertices),
        }
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &Camera2D) {
        let uniform = CameraUniform::from_camera_2d(camera);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Upload every layer; returns one batch per layer
    pub fn update_layers(&mut self, queue: &wgpu::Queue, layers: &[Layer]) -> Vec<Batch> {
        self.vertices.clear();
        let mut batches = Vec::with_capacity(layers.len());

        for layer in layers {
            let start = self.vertices.len();
            tessellate(layer.shapes, layer.origin, self.linear_colors, &mut self.vertices);
            if self.vertices.len() > self.max_vertices {
                log::warn!("scene exceeds {} vertices, truncating", self.max_vertices);
                self.vertices.truncate(self.max_vertices);
            }
            let start = start.min(self.vertices.len());
            batches.push(Batch {
                start: start as u32,
                count: (self.vertices.len() - start) as u32,
                clip: Rect::new(layer.origin, layer.size),
            });
        }

        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.vertices));
        batches
    }

    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        batches: &[Batch],
        camera: &Camera2D,
        surface_size: (u32, u32),
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.93,
                        g: 0.96,
                        b: 1.0,
                        a: 1.0,
                    }),
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

        for batch in batches {
            if batch.count == 0 {
                continue;
            }
            if let Some((x, y, w, h)) = scissor(batch.clip, camera, surface_size) {
                render_pass.set_scissor_rect(x, y, w, h);
                render_pass.draw(batch.start..batch.start + batch.count, 0..1);
            }
        }
    }
}

/// Clip rectangle in physical pixels, `None` when it falls off the surface
pub fn scissor(clip: Rect, camera: &Camera2D, surface_size: (u32, u32)) -> Option<(u32, u32, u32, u32)> {
    let scale = camera.scale_factor;
    let offset = Vec2::new(camera.position.x, camera.position.y);
    let min = ((clip.min - offset) * scale).max(Vec2::ZERO);
    let max = ((clip.max - offset) * scale).min(Vec2::new(surface_size.0 as f32, surface_size.1 as f32));

    if max.x <= min.x || max.y <= min.y {
        return None;
    }
    let (x, y) = (min.x.floor() as u32, min.y.floor() as u32);
    let (right, bottom) = (max.x.ceil() as u32, max.y.ceil() as u32);
    Some((x, y, right.min(surface_size.0) - x, bottom.min(surface_size.1) - y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::palette;

    #[test]
    fn rect_is_two_triangles() {
        let mut out = Vec::new();
        tessellate(
            &[Shape::Rect {
                center: Vec2::new(10.0, 10.0),
                size: Vec2::new(4.0, 2.0),
                rotation: 0.0,
                color: palette::WHITE,
            }],
            Vec2::new(100.0, 0.0),
            false,
            &mut out,
        );

        assert_eq!(out.len(), 6);
        assert_eq!(out[0].position, [108.0, 9.0]);
        assert_eq!(out[2].position, [112.0, 11.0]);
    }

    #[test]
    fn quarter_turn_swaps_extents() {
        let mut out = Vec::new();
        tessellate(
            &[Shape::Rect {
                center: Vec2::ZERO,
                size: Vec2::new(4.0, 2.0),
                rotation: std::f32::consts::FRAC_PI_2,
                color: palette::WHITE,
            }],
            Vec2::ZERO,
            false,
            &mut out,
        );

        let max_x = out.iter().map(|v| v.position[0].abs()).fold(0.0, f32::max);
        let max_y = out.iter().map(|v| v.position[1].abs()).fold(0.0, f32::max);
        assert!((max_x - 1.0).abs() < 1e-5);
        assert!((max_y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn straight_stroke_is_one_quad() {
        let mut out = Vec::new();
        tessellate(
            &[Shape::Stroke {
                points: vec![Vec2::new(150.0, 60.0), Vec2::new(150.0, 400.0)],
                width: 8.0,
                top: palette::WATER_LIGHT,
                bottom: palette::WATER_DARK,
                span: (0.0, 400.0),
            }],
            Vec2::ZERO,
            false,
            &mut out,
        );

        assert_eq!(out.len(), 6);
        let xs: Vec<f32> = out.iter().map(|v| v.position[0]).collect();
        assert!(xs.iter().all(|x| (*x - 146.0).abs() < 1e-4 || (*x - 154.0).abs() < 1e-4));
        // bottom end is full dark
        let bottom = out.iter().find(|v| v.position[1] == 400.0).expect("bottom vertex");
        for (got, want) in bottom.color.iter().zip(palette::WATER_DARK) {
            assert!((got - want).abs() < 1e-6);
        }
    }

    #[test]
    fn ellipse_fan_size() {
        let mut out = Vec::new();
        tessellate(
            &[Shape::Ellipse {
                center: Vec2::ZERO,
                radii: Vec2::splat(3.0),
                color: palette::WHITE,
            }],
            Vec2::ZERO,
            true,
            &mut out,
        );
        assert_eq!(out.len(), ELLIPSE_SEGMENTS * 3);
        assert_eq!(out[0].color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn linear_conversion_darkens_midtones() {
        assert!(srgb_to_linear(0.5) < 0.25);
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn scissor_scales_and_clamps() {
        let camera = Camera2D::new(2000, 1000, 2.0);
        let clip = Rect::new(Vec2::new(20.0, 40.0), Vec2::new(600.0, 400.0));
        assert_eq!(scissor(clip, &camera, (2000, 1000)), Some((40, 80, 1200, 800)));

        let clipped = Rect::new(Vec2::new(900.0, 450.0), Vec2::new(600.0, 400.0));
        assert_eq!(scissor(clipped, &camera, (2000, 1000)), Some((1800, 900, 200, 100)));

        let off = Rect::new(Vec2::new(2000.0, 0.0), Vec2::new(10.0, 10.0));
        assert_eq!(scissor(off, &camera, (2000, 1000)), None);
    }
}
