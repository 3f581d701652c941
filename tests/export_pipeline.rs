use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use futures::FutureExt;

use codecanvas::export::{
    CaptureTarget, Capturer, DirectorySink, DownloadSink, ExportConfig, Notification, NotificationKind, RecordingNotifier,
};
use codecanvas::panel::{ControlEvent, PanelKind};
use codecanvas::{
    compose, App, Error, ExportOutcome, ExportPipeline, ExportState, Highlighter, Settings, SettingsPatch, Snapshot,
};

/// Echoes the captured SVG back as the image bytes
#[derive(Default)]
struct FakeCapturer {
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl Capturer for FakeCapturer {
    fn capture(&self, target: CaptureTarget, _pixel_ratio: f32) -> BoxFuture<'static, codecanvas::Result<Snapshot>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let fail = self.fail.load(Ordering::SeqCst);
        async move {
            if fail {
                Err(Error::RenderError("capture blew up".into()))
            } else {
                Ok(Snapshot { width: 1, height: 1, png_data: target.svg.into_bytes() })
            }
        }
        .boxed()
    }
}

#[derive(Default)]
struct MemorySink {
    delivered: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    fn delivered(&self) -> Vec<(String, Vec<u8>)> {
        self.delivered.lock().unwrap().clone()
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&self, file_name: &str, snapshot: &Snapshot) -> codecanvas::Result<PathBuf> {
        self.delivered.lock().unwrap().push((file_name.to_string(), snapshot.png_data.clone()));
        Ok(PathBuf::from(file_name))
    }
}

struct Harness {
    capturer: Arc<FakeCapturer>,
    sink: Arc<MemorySink>,
    notifier: Arc<RecordingNotifier>,
    pipeline: ExportPipeline,
}

fn harness() -> Harness {
    let capturer = Arc::new(FakeCapturer::default());
    let sink = Arc::new(MemorySink::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let pipeline = ExportPipeline::new(capturer.clone(), sink.clone(), notifier.clone(), ExportConfig::default());
    Harness { capturer, sink, notifier, pipeline }
}

#[tokio::test]
async fn second_trigger_while_busy_is_ignored() {
    let h = harness();
    let app = App::new(h.pipeline.clone());

    let job = app.export().expect("first trigger starts a job");
    assert_eq!(h.pipeline.state(), ExportState::Capturing);
    assert!(app.is_exporting());
    assert!(app.export().is_none());
    assert!(h.pipeline.trigger(app.preview(), "other.js").is_none());

    let outcome = job.await;
    assert!(outcome.is_saved());
    assert_eq!(h.pipeline.state(), ExportState::Idle);
    assert_eq!(h.capturer.calls.load(Ordering::SeqCst), 1);

    let delivered = h.sink.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].0, "untitled-codecanvas.png");
    assert_eq!(h.notifier.notifications(), vec![Notification::success()]);
}

#[tokio::test]
async fn failure_notifies_and_returns_to_idle() {
    let h = harness();
    h.capturer.fail.store(true, Ordering::SeqCst);
    let app = App::new(h.pipeline.clone());

    let outcome = app.export().unwrap().await;
    assert!(matches!(outcome, ExportOutcome::Failed(Error::RenderError(_))));
    assert!(h.sink.delivered().is_empty());
    assert_eq!(h.pipeline.state(), ExportState::Idle);

    let seen = h.notifier.notifications();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].kind, NotificationKind::Failure);

    // a retry goes through once the capture works again
    h.capturer.fail.store(false, Ordering::SeqCst);
    assert!(app.export().unwrap().await.is_saved());
    assert_eq!(h.sink.delivered().len(), 1);
}

#[tokio::test]
async fn nothing_rendered_means_no_job() {
    let h = harness();
    assert!(h.pipeline.trigger(None, "untitled.js").is_none());
    assert_eq!(h.pipeline.state(), ExportState::Idle);
    assert_eq!(h.capturer.calls.load(Ordering::SeqCst), 0);
    assert!(h.notifier.notifications().is_empty());
}

#[tokio::test]
async fn dropped_job_releases_the_pipeline() {
    let h = harness();
    let app = App::new(h.pipeline.clone());
    let job = app.export().unwrap();
    assert!(app.is_exporting());
    drop(job);
    assert!(!app.is_exporting());
    assert!(app.export().is_some());
}

#[tokio::test]
async fn job_captures_the_preview_at_trigger_time() {
    let h = harness();
    let mut app = App::with_state("let a = 1;".to_string(), Settings::default(), h.pipeline.clone());
    let expected = compose("let a = 1;", app.settings(), Highlighter::shared()).to_svg();

    let job = app.export().unwrap();
    app.set_code("let b = 2;");
    app.update_settings(&SettingsPatch::file_name("renamed.py"));

    assert!(job.await.is_saved());
    let delivered = h.sink.delivered();
    assert_eq!(delivered[0].0, "untitled-codecanvas.png");
    assert_eq!(delivered[0].1, expected.into_bytes());
}

#[tokio::test]
async fn export_button_is_disabled_while_capturing() {
    let h = harness();
    let mut app = App::new(h.pipeline.clone());

    let job = app.dispatch(PanelKind::Side, ControlEvent::ExportClicked).expect("export starts");
    assert!(app.dispatch(PanelKind::Side, ControlEvent::ExportClicked).is_none());
    let label = app
        .panel_controls(PanelKind::Side)
        .into_iter()
        .find_map(|c| match c {
            codecanvas::panel::Control::ExportButton { enabled, label } => Some((enabled, label)),
            _ => None,
        })
        .unwrap();
    assert_eq!(label, (false, "Exporting..."));

    job.await;
    assert_eq!(h.capturer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn file_name_with_directories_still_saves() {
    let dir = std::env::temp_dir().join(format!("codecanvas-slashed-{}", std::process::id()));
    let capturer = Arc::new(FakeCapturer::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let pipeline = ExportPipeline::new(
        capturer.clone(),
        Arc::new(DirectorySink::new(&dir)),
        notifier.clone(),
        ExportConfig::default(),
    );
    let mut app = App::new(pipeline);
    app.update_settings(&SettingsPatch::file_name("src/main.rs"));

    match app.export().unwrap().await {
        ExportOutcome::Saved { file_name, location } => {
            assert_eq!(file_name, "src_main-codecanvas.png");
            assert_eq!(location, dir.join("src_main-codecanvas.png"));
            assert!(location.exists());
        }
        ExportOutcome::Failed(e) => panic!("export failed: {}", e),
    }
    assert_eq!(notifier.notifications(), vec![Notification::success()]);
    let _ = std::fs::remove_dir_all(&dir);
}
