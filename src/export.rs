//! Export pipeline: capture the current preview as a PNG and deliver it.
//!
//! The pipeline is Idle until [`ExportPipeline::trigger`] is called with a
//! rendered preview. Triggering flips the busy flag synchronously, snapshots
//! the preview as SVG and hands back an owned [`ExportJob`]. While that job is
//! in flight every further trigger is a no-op; nothing is queued. When the job
//! finishes (either way) the flag drops and the pipeline is Idle again.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use futures::FutureExt;
use log::{error, info, warn};

use crate::rendering::{raster, Preview, Snapshot};
use crate::{Error, Result};

/// Export settings that are not part of the visual settings
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Device pixels per CSS pixel
    pub pixel_ratio: f32,
    /// Appended to the base name of the exported file
    pub suffix: String,
    pub extension: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pixel_ratio: 2.0,
            suffix: "-codecanvas".to_string(),
            extension: "png".to_string(),
        }
    }
}

impl ExportConfig {
    /// Output file name for a snapshot of `file_name`: the final extension is
    /// stripped, path separators become `_` and the suffix and image
    /// extension are appended.
    pub fn export_file_name(&self, file_name: &str) -> String {
        let base = strip_extension(file_name).replace(['/', '\\'], "_");
        format!("{}{}.{}", base, self.suffix, self.extension)
    }
}

/// Remove a trailing `.ext` where `ext` holds no `.` or `/` and is not empty.
pub fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot) => {
            let ext = &file_name[dot + 1..];
            if ext.is_empty() || ext.contains('/') {
                file_name
            } else {
                &file_name[..dot]
            }
        }
        None => file_name,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    Capturing,
}

/// How a finished job ended
#[derive(Debug)]
pub enum ExportOutcome {
    Saved { file_name: String, location: PathBuf },
    Failed(Error),
}

impl ExportOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, ExportOutcome::Saved { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

/// A user-facing message about an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success() -> Self {
        Self {
            kind: NotificationKind::Success,
            title: "Export Successful! \u{2728}".to_string(),
            description: "Your code snapshot has been downloaded.".to_string(),
        }
    }

    pub fn failure() -> Self {
        Self {
            kind: NotificationKind::Failure,
            title: "Export Failed".to_string(),
            description: "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// The preview as it looked when the export was triggered
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureTarget {
    pub svg: String,
}

impl CaptureTarget {
    pub fn from_preview(preview: &Preview) -> Self {
        Self { svg: preview.to_svg() }
    }
}

/// Turns a capture target into an encoded image
pub trait Capturer: Send + Sync {
    fn capture(&self, target: CaptureTarget, pixel_ratio: f32) -> BoxFuture<'static, Result<Snapshot>>;
}

/// Receives the finished image, e.g. by writing it to disk
pub trait DownloadSink: Send + Sync {
    fn deliver(&self, file_name: &str, snapshot: &Snapshot) -> Result<PathBuf>;
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Rasterizes with resvg on tokio's blocking pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterCapturer;

impl Capturer for RasterCapturer {
    fn capture(&self, target: CaptureTarget, pixel_ratio: f32) -> BoxFuture<'static, Result<Snapshot>> {
        async move {
            tokio::task::spawn_blocking(move || raster::rasterize_svg(&target.svg, pixel_ratio))
                .await
                .map_err(|e| Error::RenderError(format!("capture task failed: {}", e)))?
        }
        .boxed()
    }
}

/// Writes snapshots into a directory.
///
/// Bytes go to a hidden temporary file that is renamed into place, so a
/// failed write never leaves a partial image under the final name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, file_name: &str, snapshot: &Snapshot) -> Result<PathBuf> {
        if file_name.contains('/') || file_name.contains('\\') {
            return Err(Error::ExportError(format!("'{}' is not a plain file name", file_name)));
        }
        std::fs::create_dir_all(&self.dir)?;
        let target = self.dir.join(file_name);
        let partial = self.dir.join(format!(".{}.part", file_name));
        if let Err(e) = std::fs::write(&partial, &snapshot.png_data) {
            let _ = std::fs::remove_file(&partial);
            return Err(e.into());
        }
        if let Err(e) = std::fs::rename(&partial, &target) {
            let _ = std::fs::remove_file(&partial);
            return Err(e.into());
        }
        Ok(target)
    }
}

/// Notifier that writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, n: Notification) {
        match n.kind {
            NotificationKind::Success => info!("{} {}", n.title, n.description),
            NotificationKind::Failure => warn!("{} {}", n.title, n.description),
        }
    }
}

/// Collects notifications in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification);
        }
    }
}

/// Resets the busy flag when the job ends or is dropped.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// An in-flight export. Await it to run the capture and delivery.
pub type ExportJob = BoxFuture<'static, ExportOutcome>;

#[derive(Clone)]
pub struct ExportPipeline {
    capturer: Arc<dyn Capturer>,
    sink: Arc<dyn DownloadSink>,
    notifier: Arc<dyn Notifier>,
    config: ExportConfig,
    busy: Arc<AtomicBool>,
}

impl ExportPipeline {
    pub fn new(
        capturer: Arc<dyn Capturer>,
        sink: Arc<dyn DownloadSink>,
        notifier: Arc<dyn Notifier>,
        config: ExportConfig,
    ) -> Self {
        Self {
            capturer,
            sink,
            notifier,
            config,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Raster capture into `dir`, notifications to the log.
    pub fn to_directory(dir: impl Into<PathBuf>) -> Self {
        Self::new(
            Arc::new(RasterCapturer),
            Arc::new(DirectorySink::new(dir)),
            Arc::new(LogNotifier),
            ExportConfig::default(),
        )
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn state(&self) -> ExportState {
        if self.is_busy() {
            ExportState::Capturing
        } else {
            ExportState::Idle
        }
    }

    /// Start an export of `target`. Returns `None` without side effects when
    /// there is nothing rendered or an export is already running.
    pub fn trigger(&self, target: Option<&Preview>, file_name: &str) -> Option<ExportJob> {
        let preview = target?;
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }
        let guard = BusyGuard(self.busy.clone());

        let capture = CaptureTarget::from_preview(preview);
        let out_name = self.config.export_file_name(file_name);
        let ratio = self.config.pixel_ratio;
        let capturer = self.capturer.clone();
        let sink = self.sink.clone();
        let notifier = self.notifier.clone();

        Some(
            async move {
                let _guard = guard;
                let result = match capturer.capture(capture, ratio).await {
                    Ok(snapshot) => sink.deliver(&out_name, &snapshot),
                    Err(e) => Err(e),
                };
                match result {
                    Ok(location) => {
                        info!("Exported {} to {}", out_name, location.display());
                        notifier.notify(Notification::success());
                        ExportOutcome::Saved { file_name: out_name, location }
                    }
                    Err(e) => {
                        error!("Export failed: {}", e);
                        notifier.notify(Notification::failure());
                        ExportOutcome::Failed(e)
                    }
                }
            }
            .boxed(),
        )
    }
}
