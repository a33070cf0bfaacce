use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use framebench::core::cancel::CancellationToken;
use framebench::core::samples::SampleSource;
use framebench::display::FrameContext;
use framebench::runner::{RenderHost, SceneRunner, ServiceOutcome};
use framebench::scenes::Scene;

/// Shared observation point for a scene's lifecycle calls
#[derive(Default)]
struct SceneProbe {
    initialize_calls: AtomicU64,
    update_calls: AtomicU64,
    deinitialize_calls: AtomicU64,
    events: Mutex<Vec<String>>,
}

impl SceneProbe {
    fn log(&self, event: &str) {
        self.events.lock().unwrap().push(event.to_string());
    }

    fn initialized(&self) -> u64 {
        self.initialize_calls.load(Ordering::SeqCst)
    }

    fn updated(&self) -> u64 {
        self.update_calls.load(Ordering::SeqCst)
    }

    fn deinitialized(&self) -> u64 {
        self.deinitialize_calls.load(Ordering::SeqCst)
    }
}

struct TestScene {
    name: &'static str,
    fail_initialize: bool,
    probe: Arc<SceneProbe>,
}

impl TestScene {
    fn new(name: &'static str, probe: Arc<SceneProbe>) -> Self {
        Self {
            name,
            fail_initialize: false,
            probe,
        }
    }

    fn failing(name: &'static str, probe: Arc<SceneProbe>) -> Self {
        Self {
            name,
            fail_initialize: true,
            probe,
        }
    }
}

impl Scene for TestScene {
    fn name(&self) -> &str {
        self.name
    }

    fn initialize(&mut self) -> Result<()> {
        self.probe.initialize_calls.fetch_add(1, Ordering::SeqCst);
        self.probe.log(&format!("initialize:{}", self.name));
        if self.fail_initialize {
            anyhow::bail!("synthetic initialization failure");
        }
        Ok(())
    }

    fn update(&mut self, _delta_ns: i64, _samples: &mut SampleSource) {
        self.probe.update_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn draw(&mut self, _frame: &mut FrameContext<'_>) {}

    fn deinitialize(&mut self) {
        self.probe.deinitialize_calls.fetch_add(1, Ordering::SeqCst);
        self.probe.log(&format!("deinitialize:{}", self.name));
    }
}

/// Headless host: counts presented frames, optionally simulating per-frame
/// cost, a cancellation request, or a window close
#[derive(Default)]
struct MockHost {
    frames_presented: u64,
    frame_cost: Duration,
    cancel_after: Option<(u64, CancellationToken)>,
    close_after: Option<u64>,
}

impl RenderHost for MockHost {
    fn service_events(&mut self) -> ServiceOutcome {
        if let Some(threshold) = self.close_after {
            if self.frames_presented >= threshold {
                return ServiceOutcome::CloseRequested;
            }
        }
        ServiceOutcome::Continue
    }

    fn render(&mut self, _scene: &mut dyn Scene) -> Result<()> {
        if !self.frame_cost.is_zero() {
            std::thread::sleep(self.frame_cost);
        }
        self.frames_presented += 1;

        if let Some((threshold, token)) = &self.cancel_after {
            if self.frames_presented >= *threshold {
                token.cancel();
            }
        }
        Ok(())
    }
}

#[test]
fn two_scenes_run_full_lifecycles_in_order() {
    let probe = Arc::new(SceneProbe::default());
    let mut scenes: Vec<Box<dyn Scene>> = vec![
        Box::new(TestScene::new("first", probe.clone())),
        Box::new(TestScene::new("second", probe.clone())),
    ];
    let mut host = MockHost {
        frame_cost: Duration::from_millis(1),
        ..Default::default()
    };

    let mut runner =
        SceneRunner::new(CancellationToken::new()).with_budget(Duration::from_millis(30));
    let results = runner.run_all(&mut host, &mut scenes).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name, "first");
    assert_eq!(results[1].name, "second");
    assert!(results[0].fps() > 0.0);
    assert!(results[1].fps() > 0.0);

    // First scene fully completes, including deinitialization, before the
    // second one starts
    let events = probe.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "initialize:first",
            "deinitialize:first",
            "initialize:second",
            "deinitialize:second",
        ]
    );
}

#[test]
fn initialization_failure_aborts_the_session() {
    let ok_probe = Arc::new(SceneProbe::default());
    let failing_probe = Arc::new(SceneProbe::default());
    let mut scenes: Vec<Box<dyn Scene>> = vec![
        Box::new(TestScene::new("healthy", ok_probe.clone())),
        Box::new(TestScene::failing("broken", failing_probe.clone())),
    ];
    let mut host = MockHost::default();

    let mut runner =
        SceneRunner::new(CancellationToken::new()).with_budget(Duration::from_millis(10));
    let outcome = runner.run_all(&mut host, &mut scenes);

    assert!(outcome.is_err());

    // The healthy scene's run stands; the broken one was never deinitialized
    assert_eq!(ok_probe.deinitialized(), 1);
    assert_eq!(failing_probe.initialized(), 1);
    assert_eq!(failing_probe.deinitialized(), 0);
    assert_eq!(failing_probe.updated(), 0);
}

#[test]
fn cancellation_stops_the_sequence_cleanly() {
    let cancel = CancellationToken::new();
    let first_probe = Arc::new(SceneProbe::default());
    let second_probe = Arc::new(SceneProbe::default());
    let mut scenes: Vec<Box<dyn Scene>> = vec![
        Box::new(TestScene::new("first", first_probe.clone())),
        Box::new(TestScene::new("second", second_probe.clone())),
    ];
    let mut host = MockHost {
        cancel_after: Some((3, cancel.clone())),
        ..Default::default()
    };

    let mut runner = SceneRunner::new(cancel).with_budget(Duration::from_secs(15));
    let results = runner.run_all(&mut host, &mut scenes).unwrap();

    // A clean early stop, not a failure
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].frames, 3);
    assert_eq!(first_probe.deinitialized(), 1);
    assert_eq!(second_probe.initialized(), 0);
}

#[test]
fn close_request_is_treated_as_cancellation() {
    let first_probe = Arc::new(SceneProbe::default());
    let second_probe = Arc::new(SceneProbe::default());
    let mut scenes: Vec<Box<dyn Scene>> = vec![
        Box::new(TestScene::new("first", first_probe.clone())),
        Box::new(TestScene::new("second", second_probe.clone())),
    ];
    let mut host = MockHost {
        close_after: Some(5),
        ..Default::default()
    };

    let mut runner =
        SceneRunner::new(CancellationToken::new()).with_budget(Duration::from_secs(15));
    let results = runner.run_all(&mut host, &mut scenes).unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].frames, 5);
    assert_eq!(first_probe.deinitialized(), 1);
    assert_eq!(second_probe.initialized(), 0);
}

#[test]
fn pre_cancelled_runner_starts_nothing() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let probe = Arc::new(SceneProbe::default());
    let mut scenes: Vec<Box<dyn Scene>> =
        vec![Box::new(TestScene::new("unreached", probe.clone()))];
    let mut host = MockHost::default();

    let mut runner = SceneRunner::new(cancel).with_budget(Duration::from_millis(10));
    let results = runner.run_all(&mut host, &mut scenes).unwrap();

    assert!(results.is_empty());
    assert_eq!(probe.initialized(), 0);
}

#[test]
fn frame_count_tracks_simulated_frame_cost() {
    let budget = Duration::from_millis(100);
    let frame_cost = Duration::from_millis(5);

    let probe = Arc::new(SceneProbe::default());
    let mut scenes: Vec<Box<dyn Scene>> = vec![Box::new(TestScene::new("timed", probe.clone()))];
    let mut host = MockHost {
        frame_cost,
        ..Default::default()
    };

    let mut runner = SceneRunner::new(CancellationToken::new()).with_budget(budget);
    let results = runner.run_all(&mut host, &mut scenes).unwrap();
    let result = &results[0];

    // ~20 frames of 5ms fill a 100ms budget; leave slack for scheduling
    assert!(result.frames >= 10 && result.frames <= 40, "frames = {}", result.frames);
    assert!(result.elapsed >= budget);
    assert!(result.elapsed < budget + Duration::from_millis(200));

    // frames x cost lands near the elapsed time
    let simulated = frame_cost * result.frames as u32;
    let drift = result.elapsed.abs_diff(simulated);
    assert!(drift < Duration::from_millis(50), "drift = {:?}", drift);

    // FPS is the division, not a re-derivation from frame cost
    assert_eq!(
        result.fps(),
        result.frames as f64 / result.elapsed.as_secs_f64()
    );

    // One update per presented frame
    assert_eq!(probe.updated(), result.frames);
}
