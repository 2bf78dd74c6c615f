//! Per-file pipeline orchestration.
//!
//! Most callers should use [`run_batch`], which runs every uploaded file through
//! decode → clean → project → encode and returns one [`FileReport`] per file, in input order.
//!
//! - If [`ConversionRequest::source_format`] is `None`, the input format is resolved from the
//!   file's declared extension.
//! - Errors are file-scoped: a failing file becomes [`ConversionResult::Failure`] and the batch
//!   moves on.
//! - If an [`observability::PipelineObserver`] is provided, success/failure/alerts/advisories are
//!   reported to it.

pub mod observability;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::decoding::{self, DecodeOptions};
use crate::encoding::{self, Encoded};
use crate::error::{ErrorKind, SweepError, SweepResult};
use crate::format::TableFormat;
use crate::processing::{
    Advisory, ChartSeries, CleaningOptions, ColumnSelection, DEFAULT_CHART_WIDTH, chart_series,
    clean, project_selection,
};
use crate::types::Table;

pub use observability::{
    CompositeObserver, FileObserver, PipelineContext, PipelineObserver, PipelineSeverity,
    PipelineStats, StdErrObserver,
};

/// Rows shown in a report preview unless configured otherwise.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// One uploaded file: its name, raw content and the extension it was declared with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// File name as uploaded, e.g. `sales.xlsx`.
    pub name: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
    /// Extension without the dot, if the name has one.
    pub declared_extension: Option<String>,
}

impl UploadedFile {
    /// Build an upload from a name and its content; the extension is taken from the name.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let declared_extension = Path::new(&name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_owned);
        Self {
            name,
            bytes,
            declared_extension,
        }
    }

    /// Read an upload from disk. The file name (without directories) becomes the upload name.
    ///
    /// # Errors
    ///
    /// [`SweepError::Io`] if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> SweepResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }
}

/// The user's choices for one conversion.
///
/// Every field has a default, so a partial JSON object is a valid request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionRequest {
    /// Input format. `None` resolves it from the file's declared extension.
    pub source_format: Option<TableFormat>,
    /// Output format.
    pub target_format: TableFormat,
    /// Columns to export; [`ColumnSelection::All`] keeps every column.
    pub selected_columns: ColumnSelection,
    /// Cleaning steps to apply before projection.
    pub cleaning: CleaningOptions,
    /// Number of rows in the report preview.
    pub preview_rows: usize,
    /// Maximum number of numeric columns in the report chart.
    pub chart_width: usize,
}

impl Default for ConversionRequest {
    fn default() -> Self {
        Self {
            source_format: None,
            target_format: TableFormat::default(),
            selected_columns: ColumnSelection::default(),
            cleaning: CleaningOptions::default(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            chart_width: DEFAULT_CHART_WIDTH,
        }
    }
}

impl ConversionRequest {
    /// Parse a request from JSON; missing fields take their defaults.
    ///
    /// ```rust
    /// use data_sweeper::format::TableFormat;
    /// use data_sweeper::pipeline::ConversionRequest;
    /// use data_sweeper::processing::ColumnSelection;
    ///
    /// let req = ConversionRequest::from_json(
    ///     r#"{"target_format":"excel","selected_columns":{"columns":["id"]}}"#,
    /// )
    /// .unwrap();
    /// assert_eq!(req.target_format, TableFormat::Excel);
    /// assert_eq!(req.selected_columns, ColumnSelection::columns(["id"]));
    /// assert_eq!(req.preview_rows, 5);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Options controlling a pipeline run.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct PipelineOptions {
    /// What to do with each file.
    pub request: ConversionRequest,
    /// Input parsing options.
    pub decode: DecodeOptions,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn PipelineObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: PipelineSeverity,
}

impl fmt::Debug for PipelineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineOptions")
            .field("request", &self.request)
            .field("decode", &self.decode)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            request: ConversionRequest::default(),
            decode: DecodeOptions::default(),
            observer: None,
            alert_at_or_above: PipelineSeverity::Critical,
        }
    }
}

impl PipelineOptions {
    /// Options running `request` with default decoding and no observer.
    pub fn with_request(request: ConversionRequest) -> Self {
        Self {
            request,
            ..Default::default()
        }
    }
}

/// Outcome of converting one file.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    /// The file was converted; `bytes` are ready to be served for download.
    Success {
        bytes: Vec<u8>,
        mime_type: &'static str,
        suggested_file_name: String,
    },
    /// The file could not be converted.
    Failure {
        file_name: String,
        error_kind: ErrorKind,
        message: String,
    },
}

impl ConversionResult {
    fn failure(file_name: &str, err: &SweepError) -> Self {
        Self::Failure {
            file_name: file_name.to_owned(),
            error_kind: err.kind(),
            message: err.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The failure category, or `None` on success.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error_kind, .. } => Some(*error_kind),
        }
    }
}

/// Everything the caller needs to render one processed file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    /// Name of the uploaded file.
    pub file_name: String,
    /// Exported bytes or the failure.
    pub result: ConversionResult,
    /// First rows of the exported table; `None` if the file failed.
    pub preview: Option<Table>,
    /// Numeric columns for charting.
    pub chart: Vec<ChartSeries>,
    /// Advisories raised while processing, in order.
    pub advisories: Vec<Advisory>,
}

impl FileReport {
    fn failed(file_name: &str, err: &SweepError, advisories: Vec<Advisory>) -> Self {
        Self {
            file_name: file_name.to_owned(),
            result: ConversionResult::failure(file_name, err),
            preview: None,
            chart: Vec::new(),
            advisories,
        }
    }
}

/// Run every file through the pipeline, in input order.
///
/// A failing file never stops the batch; the returned list always has one report per file.
///
/// # Examples
///
/// ```rust
/// use data_sweeper::pipeline::{run_batch, ConversionResult, PipelineOptions, UploadedFile};
///
/// let files = vec![
///     UploadedFile::new("people.csv", b"id,name\n1,Ada\n2,Grace\n".to_vec()),
///     UploadedFile::new("notes.txt", b"hello".to_vec()),
/// ];
/// let reports = run_batch(&files, &PipelineOptions::default());
///
/// assert_eq!(reports.len(), 2);
/// match &reports[0].result {
///     ConversionResult::Success { suggested_file_name, .. } => {
///         assert_eq!(suggested_file_name, "people.csv");
///     }
///     other => panic!("unexpected {other:?}"),
/// }
/// assert!(!reports[1].result.is_success());
/// ```
pub fn run_batch(files: &[UploadedFile], options: &PipelineOptions) -> Vec<FileReport> {
    files.iter().map(|f| run_pipeline(f, options)).collect()
}

/// Run one file through decode → clean → project → encode.
///
/// When an observer is configured, this function reports:
///
/// - `on_advisory` for each advisory raised
/// - `on_success` on success, with row/column/byte stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
pub fn run_pipeline(file: &UploadedFile, options: &PipelineOptions) -> FileReport {
    let request = &options.request;
    let source = resolve_source_format(file, request);
    let ctx = PipelineContext {
        file_name: file.name.clone(),
        source_format: source.as_ref().ok().copied(),
        target_format: request.target_format,
    };

    let mut advisories = Vec::new();
    let outcome = source.and_then(|format| convert(file, format, options, &mut advisories));

    if let Some(obs) = options.observer.as_ref() {
        for advisory in &advisories {
            obs.on_advisory(&ctx, *advisory);
        }
    }

    match outcome {
        Ok(converted) => {
            if let Some(obs) = options.observer.as_ref() {
                obs.on_success(&ctx, converted.stats());
            }
            let Converted {
                table,
                encoded,
                chart,
                ..
            } = converted;
            FileReport {
                file_name: file.name.clone(),
                result: ConversionResult::Success {
                    bytes: encoded.bytes,
                    mime_type: encoded.mime_type,
                    suggested_file_name: suggested_file_name(&file.name, encoded.format),
                },
                preview: Some(table.head(request.preview_rows)),
                chart,
                advisories,
            }
        }
        Err(err) => {
            report_failure(options, &ctx, &err);
            FileReport::failed(&file.name, &err, advisories)
        }
    }
}

/// Read `path` and run it through [`run_pipeline`].
///
/// A read failure is reported as [`ConversionResult::Failure`] with [`ErrorKind::Io`] and is
/// treated as [`PipelineSeverity::Critical`].
pub fn run_path(path: impl AsRef<Path>, options: &PipelineOptions) -> FileReport {
    let path = path.as_ref();
    match UploadedFile::from_path(path) {
        Ok(file) => run_pipeline(&file, options),
        Err(err) => {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let ctx = PipelineContext {
                file_name: file_name.clone(),
                source_format: options.request.source_format.or_else(|| {
                    path.extension()
                        .and_then(|e| e.to_str())
                        .and_then(TableFormat::from_extension)
                }),
                target_format: options.request.target_format,
            };
            report_failure(options, &ctx, &err);
            FileReport::failed(&file_name, &err, Vec::new())
        }
    }
}

/// The download name for `file_name` converted to `format`.
///
/// The original extension is replaced; a name without one gets the new extension appended.
///
/// ```rust
/// use data_sweeper::format::TableFormat;
/// use data_sweeper::pipeline::suggested_file_name;
///
/// assert_eq!(suggested_file_name("sales.xlsx", TableFormat::Csv), "sales.csv");
/// assert_eq!(suggested_file_name("report", TableFormat::Excel), "report.xlsx");
/// ```
pub fn suggested_file_name(file_name: &str, format: TableFormat) -> String {
    if file_name.is_empty() {
        return format!("output.{}", format.extension());
    }
    Path::new(file_name)
        .with_extension(format.extension())
        .to_string_lossy()
        .into_owned()
}

fn resolve_source_format(file: &UploadedFile, request: &ConversionRequest) -> SweepResult<TableFormat> {
    if let Some(format) = request.source_format {
        return Ok(format);
    }
    let ext = file.declared_extension.as_deref().unwrap_or_default();
    TableFormat::from_extension(ext).ok_or_else(|| SweepError::UnsupportedFormat {
        format: if ext.is_empty() {
            format!("{} (no extension)", file.name)
        } else {
            ext.to_owned()
        },
    })
}

struct Converted {
    input_rows: usize,
    table: Table,
    encoded: Encoded,
    chart: Vec<ChartSeries>,
}

impl Converted {
    fn stats(&self) -> PipelineStats {
        PipelineStats {
            input_rows: self.input_rows,
            output_rows: self.table.row_count(),
            output_columns: self.table.column_count(),
            output_bytes: self.encoded.bytes.len(),
        }
    }
}

fn convert(
    file: &UploadedFile,
    source: TableFormat,
    options: &PipelineOptions,
    advisories: &mut Vec<Advisory>,
) -> SweepResult<Converted> {
    let request = &options.request;
    let decoded = decoding::decode(&file.bytes, source, &options.decode)?;
    let input_rows = decoded.row_count();

    let cleaned = clean(&decoded, &request.cleaning);
    advisories.extend(cleaned.advisories);

    let table = project_selection(&cleaned.value, &request.selected_columns)?;

    let chart = chart_series(&table, request.chart_width);
    advisories.extend(chart.advisories);

    let encoded = encoding::encode(&table, request.target_format)?;

    Ok(Converted {
        input_rows,
        table,
        encoded,
        chart: chart.value,
    })
}

fn report_failure(options: &PipelineOptions, ctx: &PipelineContext, err: &SweepError) {
    if let Some(obs) = options.observer.as_ref() {
        let sev = PipelineSeverity::for_error(err);
        obs.on_failure(ctx, sev, err);
        if sev >= options.alert_at_or_above {
            obs.on_alert(ctx, sev, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ConversionRequest, ConversionResult, PipelineOptions, UploadedFile, resolve_source_format,
        run_pipeline, suggested_file_name,
    };
    use crate::error::ErrorKind;
    use crate::format::TableFormat;
    use crate::processing::{Advisory, ColumnSelection};

    #[test]
    fn declared_extension_comes_from_name() {
        assert_eq!(
            UploadedFile::new("a.b.CSV", Vec::new()).declared_extension.as_deref(),
            Some("CSV")
        );
        assert_eq!(UploadedFile::new("README", Vec::new()).declared_extension, None);
    }

    #[test]
    fn source_format_resolution() {
        let req = ConversionRequest::default();
        let f = UploadedFile::new("Data.XLSX", Vec::new());
        assert_eq!(resolve_source_format(&f, &req).unwrap(), TableFormat::Excel);

        let f = UploadedFile::new("data.json", Vec::new());
        let err = resolve_source_format(&f, &req).unwrap_err();
        assert_eq!(err.to_string(), "unsupported format 'json'");

        let forced = ConversionRequest {
            source_format: Some(TableFormat::Csv),
            ..Default::default()
        };
        assert_eq!(resolve_source_format(&f, &forced).unwrap(), TableFormat::Csv);
    }

    #[test]
    fn suggested_names() {
        assert_eq!(suggested_file_name("a.csv", TableFormat::Excel), "a.xlsx");
        assert_eq!(suggested_file_name("a.b.xlsx", TableFormat::Csv), "a.b.csv");
        assert_eq!(suggested_file_name("noext", TableFormat::Csv), "noext.csv");
        assert_eq!(suggested_file_name("", TableFormat::Csv), "output.csv");
    }

    #[test]
    fn request_defaults() {
        let req = ConversionRequest::from_json("{}").unwrap();
        assert_eq!(req, ConversionRequest::default());
        assert_eq!(req.preview_rows, 5);
        assert_eq!(req.chart_width, 2);
        assert_eq!(req.target_format, TableFormat::Csv);
        assert_eq!(req.selected_columns, ColumnSelection::All);
    }

    #[test]
    fn options_debug_hides_observer() {
        let s = format!("{:?}", PipelineOptions::default());
        assert!(s.contains("observer_set: false"));
    }

    #[test]
    fn text_only_file_reports_advisories() {
        let opts = PipelineOptions::with_request(ConversionRequest {
            cleaning: crate::processing::CleaningOptions {
                remove_duplicates: false,
                fill_missing_numeric: true,
            },
            ..Default::default()
        });
        let file = UploadedFile::new("names.csv", b"name\nAda\nGrace\n".to_vec());
        let report = run_pipeline(&file, &opts);
        assert!(report.result.is_success());
        assert_eq!(
            report.advisories,
            vec![Advisory::NoNumericColumns, Advisory::NoNumericData]
        );
        assert!(report.chart.is_empty());
    }

    #[test]
    fn unknown_column_is_file_scoped_failure() {
        let opts = PipelineOptions::with_request(ConversionRequest {
            selected_columns: ColumnSelection::columns(["missing"]),
            ..Default::default()
        });
        let report = run_pipeline(&UploadedFile::new("a.csv", b"x\n1\n".to_vec()), &opts);
        match report.result {
            ConversionResult::Failure {
                file_name,
                error_kind,
                message,
            } => {
                assert_eq!(file_name, "a.csv");
                assert_eq!(error_kind, ErrorKind::UnknownColumn);
                assert_eq!(message, "unknown column 'missing'");
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(report.preview.is_none());
    }
}
