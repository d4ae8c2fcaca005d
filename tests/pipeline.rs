//! End-to-end tests of the session tick loop, with every external collaborator faked out.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::{Duration, Instant};

use nalgebra::Point2;
use pawawwewism::Promise;

use yubisashi::detection::{Detection, Detections};
use yubisashi::gesture::{GestureResult, HandLandmarks, LandmarkIdx};
use yubisashi::rect::Rect;
use yubisashi::registry::ModelRegistry;
use yubisashi::render::{Align, Canvas, Color};
use yubisashi::session::Session;
use yubisashi::speech::Synthesizer;
use yubisashi::video::{Frame, Resolution};
use yubisashi::vision::{
    Category, DetectorLoader, DetectorOptions, GestureRecognizer, ObjectDetector, RunningMode,
};

/// Always reports one object, covering frame coordinates x in [300, 500], y in [100, 300].
struct ScriptedDetector {
    label: &'static str,
    detect_calls: Arc<AtomicUsize>,
}

impl ObjectDetector for ScriptedDetector {
    fn detect(&mut self, _frame: &Frame, _timestamp: Duration) -> anyhow::Result<Detections> {
        self.detect_calls.fetch_add(1, Ordering::SeqCst);
        Ok([Detection::new(
            Rect::from_top_left(300.0, 100.0, 200.0, 200.0),
            vec![Category::new(self.label, 0.9)],
        )]
        .into_iter()
        .collect())
    }

    fn set_score_threshold(&mut self, _threshold: f32) -> anyhow::Result<()> {
        Ok(())
    }

    fn set_running_mode(&mut self, _mode: RunningMode) -> anyhow::Result<()> {
        Ok(())
    }
}

struct ScriptedLoader {
    loads: Arc<Mutex<Vec<String>>>,
    detect_calls: Arc<AtomicUsize>,
    gate: Option<mpsc::Receiver<()>>,
}

impl DetectorLoader for ScriptedLoader {
    fn load(
        &mut self,
        model_path: &str,
        _options: &DetectorOptions,
    ) -> anyhow::Result<Box<dyn ObjectDetector>> {
        if let Some(gate) = &self.gate {
            gate.recv().ok();
        }
        self.loads.lock().unwrap().push(model_path.to_string());
        let label = if model_path.contains("mickey") {
            "mickey"
        } else {
            "cup"
        };
        Ok(Box::new(ScriptedDetector {
            label,
            detect_calls: self.detect_calls.clone(),
        }))
    }
}

#[derive(Clone)]
struct ScriptedRecognizer {
    result: Arc<Mutex<GestureResult>>,
}

impl ScriptedRecognizer {
    fn new() -> Self {
        Self {
            result: Arc::new(Mutex::new(GestureResult::default())),
        }
    }

    fn set(&self, result: GestureResult) {
        *self.result.lock().unwrap() = result;
    }
}

impl GestureRecognizer for ScriptedRecognizer {
    fn recognize(&mut self, _frame: &Frame, _timestamp: Duration) -> anyhow::Result<GestureResult> {
        Ok(self.result.lock().unwrap().clone())
    }
}

/// One hand holding `name`, index fingertip at normalized (0.5, 0.8).
fn pointing(name: &str) -> GestureResult {
    let mut points = vec![Point2::new(0.0, 0.0); HandLandmarks::NUM_LANDMARKS];
    points[LandmarkIdx::IndexFingerTip as usize] = Point2::new(0.5, 0.8);
    GestureResult::new(
        vec![vec![Category::new(name, 0.95)]],
        vec![HandLandmarks::new(points)],
    )
}

#[derive(Clone, Default)]
struct RecordingSynth {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl RecordingSynth {
    fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

impl Synthesizer for RecordingSynth {
    fn speak(&mut self, text: &str, done: Promise<()>) {
        self.spoken.lock().unwrap().push(text.to_string());
        done.fulfill(());
    }
}

struct TestCanvas {
    resolution: Resolution,
    rects: usize,
    texts: Vec<String>,
}

impl TestCanvas {
    fn new() -> Self {
        Self {
            resolution: Resolution::new(400, 400),
            rects: 0,
            texts: Vec::new(),
        }
    }
}

impl Canvas for TestCanvas {
    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn resize(&mut self, resolution: Resolution) {
        self.resolution = resolution;
    }

    fn rect(&mut self, _rect: Rect, _color: Color) {
        self.rects += 1;
    }

    fn text(&mut self, _x: f32, _y: f32, _size: f32, _align: Align, text: &str, _color: Color) {
        self.texts.push(text.to_string());
    }

    fn circle(&mut self, _x: f32, _y: f32, _radius: f32, _color: Color) {}
}

struct Rig {
    session: Session,
    recognizer: ScriptedRecognizer,
    synth: RecordingSynth,
    loads: Arc<Mutex<Vec<String>>>,
    detect_calls: Arc<AtomicUsize>,
    frame: Frame,
}

impl Rig {
    fn new(gate: Option<mpsc::Receiver<()>>) -> Self {
        let loads = Arc::new(Mutex::new(Vec::new()));
        let detect_calls = Arc::new(AtomicUsize::new(0));
        let loader = ScriptedLoader {
            loads: loads.clone(),
            detect_calls: detect_calls.clone(),
            gate,
        };
        let registry = ModelRegistry::new(loader, DetectorOptions::default()).unwrap();
        let recognizer = ScriptedRecognizer::new();
        let synth = RecordingSynth::default();
        let session = Session::new(registry, recognizer.clone(), synth.clone());

        Self {
            session,
            recognizer,
            synth,
            loads,
            detect_calls,
            frame: Frame::new(Resolution::new(800, 800), vec![0u8; 16]),
        }
    }

    fn wait_idle(&mut self) {
        let start = Instant::now();
        while self.session.registry().is_switching() {
            assert!(
                start.elapsed() < Duration::from_secs(5),
                "model switch did not complete in time",
            );
            std::thread::sleep(Duration::from_millis(1));
            self.session.registry_mut().poll();
        }
    }

    fn load_initial_model(&mut self) {
        self.session
            .registry_mut()
            .request_switch("./models/hanyou.tflite");
        self.wait_idle();
    }

    fn poll_at(&mut self, millis: u64) {
        let frame = self.frame.clone();
        self.session.poll(&frame, Duration::from_millis(millis));
    }

    fn render_at(&mut self, canvas: &mut TestCanvas, millis: u64) {
        self.session.render(canvas, Duration::from_millis(millis));
    }
}

#[test]
fn poll_without_a_model_does_nothing() {
    let mut rig = Rig::new(None);
    rig.poll_at(0);
    assert_eq!(rig.detect_calls.load(Ordering::SeqCst), 0);
    assert!(rig.loads.lock().unwrap().is_empty());
}

#[test]
fn victory_switches_to_mickey_exactly_once() {
    let mut rig = Rig::new(None);
    rig.load_initial_model();
    rig.recognizer.set(pointing("Victory"));

    // One observation at the default threshold of 1 requests the switch.
    rig.poll_at(0);
    rig.wait_idle();
    assert_eq!(
        rig.session.registry().active_model(),
        Some("./models/mickey.tflite"),
    );

    // A second consecutive Victory maps to the already-active model: no new load.
    rig.poll_at(800);
    rig.wait_idle();
    assert_eq!(
        *rig.loads.lock().unwrap(),
        ["./models/hanyou.tflite", "./models/mickey.tflite"],
    );
}

#[test]
fn poll_interval_gates_inference() {
    let mut rig = Rig::new(None);
    rig.load_initial_model();

    rig.poll_at(0);
    rig.poll_at(300);
    rig.poll_at(799);
    assert_eq!(rig.detect_calls.load(Ordering::SeqCst), 1);

    rig.poll_at(800);
    assert_eq!(rig.detect_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn no_detection_while_a_switch_is_in_flight() {
    let (tx, rx) = mpsc::channel();
    let mut rig = Rig::new(Some(rx));
    tx.send(()).unwrap();
    rig.load_initial_model();

    // This poll detects once, then fires the gated mickey switch.
    rig.recognizer.set(pointing("Victory"));
    rig.poll_at(0);
    assert_eq!(rig.detect_calls.load(Ordering::SeqCst), 1);
    assert!(rig.session.registry().is_switching());

    // While the switch is loading, polls are skipped entirely.
    rig.poll_at(800);
    rig.poll_at(1600);
    assert_eq!(rig.detect_calls.load(Ordering::SeqCst), 1);

    tx.send(()).unwrap();
    rig.wait_idle();
    rig.poll_at(2400);
    assert_eq!(rig.detect_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn pointing_announces_the_object() {
    let mut rig = Rig::new(None);
    rig.load_initial_model();
    rig.recognizer.set(pointing("Pointing_Up"));
    rig.poll_at(0);

    let mut canvas = TestCanvas::new();

    // Fingertip at canvas (200, 320); the box lands at x in (150, 250), bottom 150.
    rig.render_at(&mut canvas, 0);
    assert_eq!(rig.synth.spoken(), ["cup"]);
    assert_eq!(canvas.rects, 1);
    assert!(canvas.texts.iter().any(|t| t == "cup (0.90)"));
    assert!(canvas.texts.iter().any(|t| t == "Pointing_Up"));

    // Same label within the speak interval: suppressed.
    rig.render_at(&mut canvas, 500);
    assert_eq!(rig.synth.spoken(), ["cup"]);

    // Past the interval: announced again.
    rig.render_at(&mut canvas, 1001);
    assert_eq!(rig.synth.spoken(), ["cup", "cup"]);
}

#[test]
fn lowering_the_hand_resets_the_spoken_label() {
    let mut rig = Rig::new(None);
    rig.load_initial_model();
    // A huge interval, so only the label reset can explain a second utterance.
    rig.session.set_speak_interval(Duration::from_secs(600));

    rig.recognizer.set(pointing("Pointing_Up"));
    rig.poll_at(0);
    let mut canvas = TestCanvas::new();
    rig.render_at(&mut canvas, 0);
    assert_eq!(rig.synth.spoken(), ["cup"]);

    // Hand goes away; the arbiter reports "not pointing" and clears the label.
    rig.recognizer.set(GestureResult::default());
    rig.poll_at(800);
    rig.render_at(&mut canvas, 810);
    assert_eq!(rig.synth.spoken(), ["cup"]);

    // Pointing again announces immediately, interval notwithstanding.
    rig.recognizer.set(pointing("Pointing_Up"));
    rig.poll_at(1600);
    rig.render_at(&mut canvas, 1610);
    assert_eq!(rig.synth.spoken(), ["cup", "cup"]);
}

#[test]
fn non_pointing_gesture_stays_silent() {
    let mut rig = Rig::new(None);
    rig.load_initial_model();
    rig.recognizer.set(pointing("Open_Palm"));
    rig.poll_at(0);

    let mut canvas = TestCanvas::new();
    rig.render_at(&mut canvas, 0);
    assert!(rig.synth.spoken().is_empty());
    assert_eq!(canvas.rects, 0);
    // The gesture name is still shown, even without a model mapping.
    assert!(canvas.texts.iter().any(|t| t == "Open_Palm"));
}
