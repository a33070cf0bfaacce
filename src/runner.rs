use std::time::Duration;

use anyhow::{Context, Result};

use crate::core::cancel::CancellationToken;
use crate::core::clock::Clock;
use crate::core::samples::SampleSource;
use crate::scenes::Scene;

/// Wall-clock budget for one scene's run
pub const SCENE_BUDGET: Duration = Duration::from_secs(15);

/// What the host observed while servicing its event queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceOutcome {
    Continue,
    CloseRequested,
}

/// Display-side collaborator contract consumed by the runner
///
/// `service_events` must not block: it drains whatever the windowing layer
/// has pending and returns. `render` performs one draw-and-present handshake
/// for the scene's current state.
pub trait RenderHost {
    fn service_events(&mut self) -> ServiceOutcome;

    fn render(&mut self, scene: &mut dyn Scene) -> Result<()>;
}

/// Throughput measured for one scene's run
#[derive(Debug, Clone)]
pub struct RunResult {
    pub name: String,
    pub frames: u64,
    pub elapsed: Duration,
}

impl RunResult {
    /// Frames divided by elapsed wall-clock seconds
    pub fn fps(&self) -> f64 {
        self.frames as f64 / self.elapsed.as_secs_f64()
    }
}

/// Drives each scene through its lifecycle inside the timed loop
///
/// Scenes run strictly in registry order, one fully completed (including
/// deinitialization) before the next starts. Cancellation ends the sequence
/// cleanly; a failed scene initialization aborts the whole session.
pub struct SceneRunner {
    budget: Duration,
    cancel: CancellationToken,
    samples: SampleSource,
}

impl SceneRunner {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            budget: SCENE_BUDGET,
            cancel,
            samples: SampleSource::new(),
        }
    }

    /// Override the per-scene budget
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    /// Run every scene in order, stopping early on cancellation or failure
    ///
    /// Cancellation is a clean stop: the results gathered so far are
    /// returned as success. An initialization failure is fatal for the
    /// session and propagates as an error.
    pub fn run_all(
        &mut self,
        host: &mut dyn RenderHost,
        scenes: &mut [Box<dyn Scene>],
    ) -> Result<Vec<RunResult>> {
        let mut results = Vec::with_capacity(scenes.len());

        for scene in scenes.iter_mut() {
            if self.cancel.is_cancelled() {
                break;
            }

            results.push(self.run_scene(host, scene.as_mut())?);
        }

        Ok(results)
    }

    fn run_scene(&mut self, host: &mut dyn RenderHost, scene: &mut dyn Scene) -> Result<RunResult> {
        println!("run scene '{}'", scene.name());

        // Every scene sees the deterministic stream from the start
        self.samples.reset();

        // A failed initialization leaves nothing to deinitialize
        scene
            .initialize()
            .with_context(|| format!("failed to initialize scene '{}'", scene.name()))?;

        let mut clock = Clock::start();
        let outcome = self.drive(host, scene, &mut clock);

        // Deinitialize on every exit path past this point, render errors included
        scene.deinitialize();
        let frames = outcome?;

        let elapsed_ns = clock.now().delta_ns(clock.started());
        let result = RunResult {
            name: scene.name().to_string(),
            frames,
            elapsed: Duration::from_nanos(elapsed_ns.max(0) as u64),
        };

        println!("Average FPS = {:.2}", result.fps());
        println!("---");
        println!();

        Ok(result)
    }

    fn drive(
        &mut self,
        host: &mut dyn RenderHost,
        scene: &mut dyn Scene,
        clock: &mut Clock,
    ) -> Result<u64> {
        let budget_ns = self.budget.as_nanos() as i64;
        let mut frames = 0u64;

        // The budget is checked against the previous iteration's timestamp,
        // so the frame in flight always completes
        while clock.last().delta_ns(clock.started()) < budget_ns {
            if self.cancel.is_cancelled() {
                break;
            }

            if host.service_events() == ServiceOutcome::CloseRequested {
                log::info!("close requested, stopping the benchmark");
                self.cancel.cancel();
                break;
            }

            let delta_ns = clock.tick();
            scene.update(delta_ns, &mut self.samples);
            host.render(scene)?;
            frames += 1;
        }

        Ok(frames)
    }
}
