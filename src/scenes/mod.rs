mod fixed_graph;
mod floating_graph;

pub use fixed_graph::FixedGraphScene;
pub use floating_graph::FloatingGraphScene;

use anyhow::Result;

use crate::core::samples::SampleSource;
use crate::display::FrameContext;
use crate::gpu::GpuContext;

/// A self-contained animated rendering unit with a 4-phase lifecycle
///
/// The runner calls `initialize` exactly once per benchmark run of the scene,
/// `update`/`draw` once per frame for the duration of the run, and
/// `deinitialize` exactly once when the run ends — whether by timeout or
/// cancellation. After a failed `initialize` nothing else is called.
///
/// GPU resources are scene-local: acquired in `initialize`, released in
/// `deinitialize`, never shared across scenes.
pub trait Scene {
    /// Display name used in reports
    fn name(&self) -> &str;

    /// Acquire GPU resources and reset animation state
    fn initialize(&mut self) -> Result<()>;

    /// Advance animation state by a signed nanosecond delta
    ///
    /// Must tolerate a delta of zero; the first frame's delta is whatever
    /// little time passed since the run clock started.
    fn update(&mut self, delta_ns: i64, samples: &mut SampleSource);

    /// Record this frame's draw commands
    fn draw(&mut self, frame: &mut FrameContext<'_>);

    /// Release everything acquired by `initialize`
    fn deinitialize(&mut self);
}

/// The benchmark's scene list, in run order
pub fn registry(gpu: &GpuContext, surface_format: wgpu::TextureFormat) -> Vec<Box<dyn Scene>> {
    vec![
        Box::new(FloatingGraphScene::new(gpu.clone(), surface_format)),
        Box::new(FixedGraphScene::new(gpu.clone(), surface_format)),
    ]
}
