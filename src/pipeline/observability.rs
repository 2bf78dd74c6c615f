use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::SweepError;
use crate::format::TableFormat;
use crate::processing::Advisory;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal, or a file the pipeline does not handle).
    Warning,
    /// Error-level event (the file failed).
    Error,
    /// Critical error (I/O or other infrastructure failures).
    Critical,
}

impl PipelineSeverity {
    /// Severity of a file-scoped failure.
    pub fn for_error(err: &SweepError) -> Self {
        match err {
            SweepError::UnsupportedFormat { .. } => Self::Warning,
            SweepError::Decode { .. }
            | SweepError::UnknownColumn { .. }
            | SweepError::InvalidTable { .. }
            | SweepError::Encode { .. } => Self::Error,
            SweepError::Io(_) => Self::Critical,
        }
    }
}

/// Context about one file's pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// Name of the uploaded file.
    pub file_name: String,
    /// Resolved input format; `None` if it could not be resolved.
    pub source_format: Option<TableFormat>,
    /// Requested output format.
    pub target_format: TableFormat,
}

/// Minimal stats reported on a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    /// Rows decoded from the upload.
    pub input_rows: usize,
    /// Rows in the exported table.
    pub output_rows: usize,
    /// Columns in the exported table.
    pub output_columns: usize,
    /// Size of the encoded output.
    pub output_bytes: usize,
}

/// Observer interface for pipeline outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait PipelineObserver: Send + Sync {
    /// Called when a file converts successfully.
    fn on_success(&self, _ctx: &PipelineContext, _stats: PipelineStats) {}

    /// Called when a file fails.
    fn on_failure(&self, _ctx: &PipelineContext, _severity: PipelineSeverity, _error: &SweepError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &SweepError) {
        self.on_failure(ctx, severity, error)
    }

    /// Called for each advisory raised while processing a file.
    fn on_advisory(&self, _ctx: &PipelineContext, _advisory: Advisory) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_success(&self, ctx: &PipelineContext, stats: PipelineStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &SweepError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &SweepError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }

    fn on_advisory(&self, ctx: &PipelineContext, advisory: Advisory) {
        for o in &self.observers {
            o.on_advisory(ctx, advisory);
        }
    }
}

/// One observer callback, rendered as a single log line.
#[derive(Debug, Clone, Copy)]
enum Event<'a> {
    Converted(PipelineStats),
    Failed(PipelineSeverity, &'a SweepError),
    Alert(PipelineSeverity, &'a SweepError),
    Advised(Advisory),
}

impl Event<'_> {
    fn line(self, ctx: &PipelineContext) -> String {
        match self {
            Self::Converted(stats) => format!("ok {ctx} {stats}"),
            Self::Failed(sev, err) => format!("fail severity={sev:?} {ctx} err={err}"),
            Self::Alert(sev, err) => format!("ALERT severity={sev:?} {ctx} err={err}"),
            Self::Advised(advisory) => format!("advisory {ctx} {advisory}"),
        }
    }
}

impl fmt::Display for PipelineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file={} ", self.file_name)?;
        match self.source_format {
            Some(src) => write!(f, "{src}->{}", self.target_format),
            None => write!(f, "?->{}", self.target_format),
        }
    }
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows={}->{} columns={} bytes={}",
            self.input_rows, self.output_rows, self.output_columns, self.output_bytes
        )
    }
}

/// Logs pipeline events to stderr, one `[sweep]`-prefixed line each.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl StdErrObserver {
    fn log(&self, ctx: &PipelineContext, event: Event<'_>) {
        eprintln!("[sweep] {}", event.line(ctx));
    }
}

impl PipelineObserver for StdErrObserver {
    fn on_success(&self, ctx: &PipelineContext, stats: PipelineStats) {
        self.log(ctx, Event::Converted(stats));
    }

    fn on_failure(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &SweepError) {
        self.log(ctx, Event::Failed(severity, error));
    }

    fn on_alert(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &SweepError) {
        self.log(ctx, Event::Alert(severity, error));
    }

    fn on_advisory(&self, ctx: &PipelineContext, advisory: Advisory) {
        self.log(ctx, Event::Advised(advisory));
    }
}

/// Appends pipeline events to a local log file, prefixed with a unix timestamp (seconds).
///
/// Writes are best-effort: a log file that cannot be opened or written is skipped silently.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn log(&self, ctx: &PipelineContext, event: Event<'_>) {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let line = event.line(ctx);

        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{secs} {line}");
        }
    }
}

impl PipelineObserver for FileObserver {
    fn on_success(&self, ctx: &PipelineContext, stats: PipelineStats) {
        self.log(ctx, Event::Converted(stats));
    }

    fn on_failure(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &SweepError) {
        self.log(ctx, Event::Failed(severity, error));
    }

    fn on_alert(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &SweepError) {
        self.log(ctx, Event::Alert(severity, error));
    }

    fn on_advisory(&self, ctx: &PipelineContext, advisory: Advisory) {
        self.log(ctx, Event::Advised(advisory));
    }
}
