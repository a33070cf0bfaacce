use anyhow::Result;
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use super::Scene;
use crate::core::fixed::{from_fixed, FRACTIONAL_BITS, ONE};
use crate::core::samples::SampleSource;
use crate::display::FrameContext;
use crate::gpu::GpuContext;

const LINE_COUNT: usize = 20;
const POINT_COUNT: usize = 15;

const MS_IN_NS: i64 = 1_000_000;
const SEC_IN_NS: i64 = 1_000_000_000;

const TIME_TO_SCALE_NS: i64 = 2 * SEC_IN_NS;
const SCALE_INTERVAL_NS: i64 = 2 * SEC_IN_NS;
const TARGET_SCALE_FIXED: i32 = ONE + ONE / 2;
const POINT_ADD_INTERVAL_NS: i64 = 100 * MS_IN_NS;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.16,
    g: 0.62,
    b: 0.56,
    a: 1.0,
};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct FixedGraphTransforms {
    scale: [[f32; 4]; 4],
}

/// CPU-side animation state carried entirely in 16.16 fixed-point
///
/// The fixed-point path has no trig, so unlike the floating scene there is
/// no rotation sweep; the workload difference between the two scenes is the
/// point of the comparison.
struct FixedGraphAnimation {
    general_timer: i64,
    point_add_timer: i64,
    current_count: usize,
    scale_fixed: i32,
    // [x, y] pairs in 16.16, line-major
    vertices: Vec<[i32; 2]>,
}

impl FixedGraphAnimation {
    fn new() -> Self {
        let mut vertices = vec![[0i32; 2]; LINE_COUNT * POINT_COUNT];

        // x positions span [-1.0, 1.0] in fixed-point, computed without
        // going through floats: 2/(n-1)*p - 1 scaled by 2^16
        for line in 0..LINE_COUNT {
            for point in 0..POINT_COUNT {
                let x = ((2 * point) as i64 * ONE as i64 / (POINT_COUNT - 1) as i64) as i32 - ONE;
                vertices[line * POINT_COUNT + point][0] = x;
            }
        }

        Self {
            general_timer: 0,
            point_add_timer: 0,
            current_count: 0,
            scale_fixed: ONE,
            vertices,
        }
    }

    fn advance(&mut self, delta_ns: i64, samples: &mut SampleSource) {
        self.point_add_timer -= delta_ns;
        self.general_timer += delta_ns;

        self.scale_fixed = Self::scale_at(self.general_timer);

        if self.point_add_timer <= 0 {
            self.point_add_timer += POINT_ADD_INTERVAL_NS;

            if self.current_count < POINT_COUNT {
                self.current_count += 1;
            } else {
                for line in 0..LINE_COUNT {
                    for point in 0..POINT_COUNT - 1 {
                        let next_y = self.vertices[line * POINT_COUNT + point + 1][1];
                        self.vertices[line * POINT_COUNT + point][1] = next_y;
                    }
                }
            }

            for line in 0..LINE_COUNT {
                // y = sample * 2 - 1, entirely in 16.16
                let y = samples.next_fixed() * 2 - ONE;
                self.vertices[line * POINT_COUNT + self.current_count - 1][1] = y;
            }
        }
    }

    /// Scale ramp evaluated with a fixed-point lerp (i64 intermediate)
    fn scale_at(general_timer: i64) -> i32 {
        if general_timer >= TIME_TO_SCALE_NS + SCALE_INTERVAL_NS {
            TARGET_SCALE_FIXED
        } else if general_timer >= TIME_TO_SCALE_NS {
            let progress =
                ((general_timer - TIME_TO_SCALE_NS) << FRACTIONAL_BITS) / SCALE_INTERVAL_NS;
            (ONE as i64 + ((progress * (TARGET_SCALE_FIXED - ONE) as i64) >> FRACTIONAL_BITS))
                as i32
        } else {
            ONE
        }
    }
}

struct FixedGraphResources {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    transform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// The graph scene's fixed-point twin
///
/// Consumes the fixed-point view of the sample stream, keeps vertices as
/// 16.16 integers, and uploads them as `Sint32x2` for the shader to rescale.
pub struct FixedGraphScene {
    gpu: GpuContext,
    surface_format: wgpu::TextureFormat,
    anim: FixedGraphAnimation,
    resources: Option<FixedGraphResources>,
}

impl FixedGraphScene {
    pub fn new(gpu: GpuContext, surface_format: wgpu::TextureFormat) -> Self {
        Self {
            gpu,
            surface_format,
            anim: FixedGraphAnimation::new(),
            resources: None,
        }
    }

    fn create_resources(&self) -> FixedGraphResources {
        let device = self.gpu.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("fixed graph shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("graph_fixed.wgsl").into()),
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("fixed graph vertices"),
            size: (LINE_COUNT * POINT_COUNT * std::mem::size_of::<[i32; 2]>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let transforms = FixedGraphTransforms {
            scale: Mat4::IDENTITY.to_cols_array_2d(),
        };
        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("fixed graph transforms"),
            contents: bytemuck::cast_slice(&[transforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("fixed graph bind group layout"),
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
            label: Some("fixed graph bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("fixed graph pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("fixed graph pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[i32; 2]>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Sint32x2,
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

        FixedGraphResources {
            pipeline,
            vertex_buffer,
            transform_buffer,
            bind_group,
        }
    }
}

impl Scene for FixedGraphScene {
    fn name(&self) -> &str {
        "Fixed graph"
    }

    fn initialize(&mut self) -> Result<()> {
        self.anim = FixedGraphAnimation::new();
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

        // Fixed-point leaves the CPU only here, at uniform upload
        let scale = from_fixed(self.anim.scale_fixed);
        let transforms = FixedGraphTransforms {
            scale: Mat4::from_scale(Vec3::new(scale, scale, 1.0)).to_cols_array_2d(),
        };
        frame.queue.write_buffer(
            &resources.transform_buffer,
            0,
            bytemuck::cast_slice(&[transforms]),
        );

        let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("fixed graph pass"),
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
