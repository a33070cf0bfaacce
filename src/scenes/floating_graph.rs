use anyhow::Result;
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use super::Scene;
use crate::core::samples::SampleSource;
use crate::display::FrameContext;
use crate::gpu::GpuContext;

const LINE_COUNT: usize = 20;
const POINT_COUNT: usize = 15;

const MS_IN_NS: i64 = 1_000_000;
const SEC_IN_NS: i64 = 1_000_000_000;

// Animation schedule
const TIME_TO_SCALE_NS: i64 = 2 * SEC_IN_NS;
const SCALE_INTERVAL_NS: i64 = 2 * SEC_IN_NS;
const TARGET_SCALE: f32 = 1.5;
const TIME_TO_ROTATE_NS: i64 = 5 * SEC_IN_NS;
const ROTATION_INTERVAL_NS: i64 = 5 * SEC_IN_NS;
const ROTATION_ANGLE: f32 = std::f32::consts::PI / 6.0;
const POINT_ADD_INTERVAL_NS: i64 = 100 * MS_IN_NS;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.16,
    g: 0.62,
    b: 0.56,
    a: 1.0,
};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct GraphTransforms {
    rotation: [[f32; 4]; 4],
    scale: [[f32; 4]; 4],
}

/// CPU-side animation state, kept separate from the GPU resources so the
/// timer arithmetic is testable without a device
struct GraphAnimation {
    general_timer: i64,
    point_add_timer: i64,
    current_count: usize,
    z_rotation: f32,
    scale: f32,
    // [x, y] pairs, line-major: line * POINT_COUNT + point
    vertices: Vec<[f32; 2]>,
}

impl GraphAnimation {
    fn new() -> Self {
        let mut vertices = vec![[0.0f32; 2]; LINE_COUNT * POINT_COUNT];

        // x positions span [-1.0, 1.0] and never change
        for line in 0..LINE_COUNT {
            for point in 0..POINT_COUNT {
                vertices[line * POINT_COUNT + point][0] =
                    2.0 / (POINT_COUNT - 1) as f32 * point as f32 - 1.0;
            }
        }

        Self {
            general_timer: 0,
            point_add_timer: 0,
            current_count: 0,
            z_rotation: 0.0,
            scale: 1.0,
            vertices,
        }
    }

    fn advance(&mut self, delta_ns: i64, samples: &mut SampleSource) {
        self.point_add_timer -= delta_ns;
        self.general_timer += delta_ns;

        // Scale ramps linearly to its target, then holds
        self.scale = if self.general_timer >= TIME_TO_SCALE_NS + SCALE_INTERVAL_NS {
            TARGET_SCALE
        } else if self.general_timer >= TIME_TO_SCALE_NS {
            let progress =
                (self.general_timer - TIME_TO_SCALE_NS) as f32 / SCALE_INTERVAL_NS as f32;
            1.0 + progress * (TARGET_SCALE - 1.0)
        } else {
            1.0
        };

        // Triangle-wave rotation sweep between +/- ROTATION_ANGLE
        if self.general_timer >= TIME_TO_ROTATE_NS {
            let rotation_timer = self.general_timer % ROTATION_INTERVAL_NS;
            let quarter = ROTATION_INTERVAL_NS / 4;
            self.z_rotation = if rotation_timer >= 3 * quarter {
                -ROTATION_ANGLE
                    + (rotation_timer - 3 * quarter) as f32 / quarter as f32 * ROTATION_ANGLE
            } else if rotation_timer >= quarter {
                ROTATION_ANGLE
                    - (rotation_timer - quarter) as f32 / (2 * quarter) as f32
                        * ROTATION_ANGLE
                        * 2.0
            } else {
                rotation_timer as f32 / quarter as f32 * ROTATION_ANGLE
            };
        }

        if self.point_add_timer <= 0 {
            self.point_add_timer += POINT_ADD_INTERVAL_NS;

            if self.current_count < POINT_COUNT {
                self.current_count += 1;
            } else {
                // Window is full: shift every line one point to the left
                for line in 0..LINE_COUNT {
                    for point in 0..POINT_COUNT - 1 {
                        let next_y = self.vertices[line * POINT_COUNT + point + 1][1];
                        self.vertices[line * POINT_COUNT + point][1] = next_y;
                    }
                }
            }

            // The newest sample lands in the last live slot of each line
            for line in 0..LINE_COUNT {
                let y = samples.next_float() * 2.0 - 1.0;
                self.vertices[line * POINT_COUNT + self.current_count - 1][1] = y;
            }
        }
    }
}

struct GraphResources {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    transform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Animated multi-line graph driven by floating-point samples
pub struct FloatingGraphScene {
    gpu: GpuContext,
    surface_format: wgpu::TextureFormat,
    anim: GraphAnimation,
    resources: Option<GraphResources>,
}

impl FloatingGraphScene {
    pub fn new(gpu: GpuContext, surface_format: wgpu::TextureFormat) -> Self {
        Self {
            gpu,
            surface_format,
            anim: GraphAnimation::new(),
            resources: None,
        }
    }

    fn create_resources(&self) -> GraphResources {
        let device = self.gpu.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("floating graph shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("graph.wgsl").into()),
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("floating graph vertices"),
            size: (LINE_COUNT * POINT_COUNT * std::mem::size_of::<[f32; 2]>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let transforms = GraphTransforms {
            rotation: Mat4::IDENTITY.to_cols_array_2d(),
            scale: Mat4::IDENTITY.to_cols_array_2d(),
        };
        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("floating graph transforms"),
            contents: bytemuck::cast_slice(&[transforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("floating graph bind group layout"),
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

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("floating graph bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("floating graph pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("floating graph pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x2,
                        offset: 0,
                        shader_location: 0,
                    }],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
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
            cache: None,
        });

        GraphResources {
            pipeline,
            vertex_buffer,
            transform_buffer,
            bind_group,
        }
    }
}

impl Scene for FloatingGraphScene {
    fn name(&self) -> &str {
        "Floating graph"
    }

    fn initialize(&mut self) -> Result<()> {
        self.anim = GraphAnimation::new();
        self.resources = Some(self.create_resources());
        Ok(())
    }

    fn update(&mut self, delta_ns: i64, samples: &mut SampleSource) {
        self.anim.advance(delta_ns, samples);
    }

    fn draw(&mut self, frame: &mut FrameContext<'_>) {
        let Some(resources) = &self.resources else {
            return;
        };

        frame.queue.write_buffer(
            &resources.vertex_buffer,
            0,
            bytemuck::cast_slice(&self.anim.vertices),
        );

        let transforms = GraphTransforms {
            rotation: Mat4::from_rotation_z(self.anim.z_rotation).to_cols_array_2d(),
            scale: Mat4::from_scale(Vec3::new(self.anim.scale, self.anim.scale, 1.0))
                .to_cols_array_2d(),
        };
        frame.queue.write_buffer(
            &resources.transform_buffer,
            0,
            bytemuck::cast_slice(&[transforms]),
        );

        let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("floating graph pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        pass.set_pipeline(&resources.pipeline);
        pass.set_bind_group(0, &resources.bind_group, &[]);
        pass.set_vertex_buffer(0, resources.vertex_buffer.slice(..));

        let live_points = self.anim.current_count as u32;
        for line in 0..LINE_COUNT as u32 {
            let start = line * POINT_COUNT as u32;
            pass.draw(start..start + live_points, 0..1);
        }
    }

    fn deinitialize(&mut self) {
        self.resources = None;
    }
}
