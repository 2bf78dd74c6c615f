//! `data-sweeper` converts uploaded tables between CSV and Excel (`.xlsx`), with optional light
//! cleaning and column selection on the way.
//!
//! The primary entrypoint is [`pipeline::run_batch`], which runs each uploaded file through
//! decode → clean → project → encode and returns one [`pipeline::FileReport`] per file. A file
//! that fails never stops the others.
//!
//! ## What you can convert
//!
//! **File formats (resolved from the declared extension, case-insensitive):**
//!
//! - **CSV**: `.csv`
//! - **Excel** (requires the Cargo feature `excel`, on by default): `.xlsx`, first sheet only
//!
//! **Column types:**
//!
//! Decoding produces a [`types::Table`] whose columns are either
//! [`types::ColumnData::Numeric`] or [`types::ColumnData::Text`]. A column is numeric when every
//! present cell is a number; anything mixed is text. Empty cells and the usual NA markers
//! (`NA`, `NaN`, `null`, ...) are missing.
//!
//! ## Quick example: convert a batch
//!
//! ```rust
//! use data_sweeper::format::TableFormat;
//! use data_sweeper::pipeline::{
//!     run_batch, ConversionRequest, ConversionResult, PipelineOptions, UploadedFile,
//! };
//! use data_sweeper::processing::{CleaningOptions, ColumnSelection};
//!
//! let files = vec![UploadedFile::new(
//!     "scores.csv",
//!     b"name,score\nAda,1\nAda,1\nGrace,\n".to_vec(),
//! )];
//! let options = PipelineOptions::with_request(ConversionRequest {
//!     target_format: TableFormat::Csv,
//!     selected_columns: ColumnSelection::columns(["score"]),
//!     cleaning: CleaningOptions { remove_duplicates: true, fill_missing_numeric: true },
//!     ..Default::default()
//! });
//!
//! let reports = run_batch(&files, &options);
//! match &reports[0].result {
//!     ConversionResult::Success { bytes, mime_type, suggested_file_name } => {
//!         assert_eq!(*mime_type, "text/csv");
//!         assert_eq!(suggested_file_name, "scores.csv");
//!         assert_eq!(std::str::from_utf8(bytes).unwrap(), "score\n1\n1\n");
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```
//!
//! ## Observability (stderr logging + alert threshold)
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use data_sweeper::pipeline::{run_path, PipelineOptions, PipelineSeverity, StdErrObserver};
//!
//! let opts = PipelineOptions {
//!     observer: Some(Arc::new(StdErrObserver::default())),
//!     alert_at_or_above: PipelineSeverity::Critical,
//!     ..Default::default()
//! };
//!
//! // Missing files are treated as Critical and will trigger `on_alert` at this threshold.
//! let report = run_path("does_not_exist.csv", &opts);
//! assert!(!report.result.is_success());
//! ```
//!
//! ## Modules
//!
//! - [`pipeline`]: per-file orchestration, requests, reports and observers
//! - [`decoding`]: CSV / xlsx bytes into a [`types::Table`]
//! - [`processing`]: cleaning, projection and numeric summaries
//! - [`encoding`]: a [`types::Table`] back into CSV / xlsx bytes
//! - [`types`]: column-major table model
//! - [`format`]: supported formats and mime types
//! - [`error`]: error types used across the crate

pub mod decoding;
pub mod encoding;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod processing;
pub mod types;

pub use error::{SweepError, SweepResult};
