use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use data_sweeper::SweepError;
use data_sweeper::format::TableFormat;
use data_sweeper::pipeline::{
    CompositeObserver, ConversionRequest, FileObserver, PipelineContext, PipelineObserver,
    PipelineOptions, PipelineSeverity, PipelineStats, UploadedFile, run_batch, run_path,
    run_pipeline,
};
use data_sweeper::processing::{Advisory, ColumnSelection};

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(String, PipelineStats)>>,
    failures: Mutex<Vec<(String, PipelineSeverity)>>,
    alerts: Mutex<Vec<PipelineSeverity>>,
    advisories: Mutex<Vec<Advisory>>,
}

impl PipelineObserver for RecordingObserver {
    fn on_success(&self, ctx: &PipelineContext, stats: PipelineStats) {
        self.successes
            .lock()
            .unwrap()
            .push((ctx.file_name.clone(), stats));
    }

    fn on_failure(&self, ctx: &PipelineContext, severity: PipelineSeverity, _error: &SweepError) {
        self.failures
            .lock()
            .unwrap()
            .push((ctx.file_name.clone(), severity));
    }

    fn on_alert(&self, _ctx: &PipelineContext, severity: PipelineSeverity, _error: &SweepError) {
        self.alerts.lock().unwrap().push(severity);
    }

    fn on_advisory(&self, _ctx: &PipelineContext, advisory: Advisory) {
        self.advisories.lock().unwrap().push(advisory);
    }
}

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("data-sweeper-{name}-{nanos}.log"))
}

fn options_with(obs: Arc<dyn PipelineObserver>) -> PipelineOptions {
    PipelineOptions {
        observer: Some(obs),
        alert_at_or_above: PipelineSeverity::Critical,
        ..Default::default()
    }
}

#[test]
fn observer_receives_success_stats() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone());

    let file = UploadedFile::from_path("tests/fixtures/people.csv").unwrap();
    let report = run_pipeline(&file, &opts);
    assert!(report.result.is_success());

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(successes.len(), 1);
    let (name, stats) = &successes[0];
    assert_eq!(name, "people.csv");
    assert_eq!(stats.input_rows, 4);
    assert_eq!(stats.output_rows, 4);
    assert_eq!(stats.output_columns, 4);
    assert!(stats.output_bytes > 0);
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone());

    // Missing file -> Io error -> Critical
    let _ = run_path("tests/fixtures/does_not_exist.csv", &opts);

    let failures = obs.failures.lock().unwrap().clone();
    let alerts = obs.alerts.lock().unwrap().clone();
    assert_eq!(
        failures,
        vec![("does_not_exist.csv".to_string(), PipelineSeverity::Critical)]
    );
    assert_eq!(alerts, vec![PipelineSeverity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_non_critical_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = PipelineOptions {
        request: ConversionRequest {
            selected_columns: ColumnSelection::columns(["definitely_missing"]),
            ..Default::default()
        },
        ..options_with(obs.clone())
    };

    let files = vec![
        UploadedFile::new("a.csv", b"x\n1\n".to_vec()),
        UploadedFile::new("b.txt", b"x\n1\n".to_vec()),
    ];
    let _ = run_batch(&files, &opts);

    let failures = obs.failures.lock().unwrap().clone();
    assert_eq!(
        failures,
        vec![
            ("a.csv".to_string(), PipelineSeverity::Error),
            ("b.txt".to_string(), PipelineSeverity::Warning),
        ]
    );
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn alert_threshold_is_configurable() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = PipelineOptions {
        alert_at_or_above: PipelineSeverity::Warning,
        ..options_with(obs.clone())
    };

    let _ = run_pipeline(&UploadedFile::new("b.txt", Vec::new()), &opts);
    assert_eq!(
        obs.alerts.lock().unwrap().clone(),
        vec![PipelineSeverity::Warning]
    );
}

#[test]
fn observer_receives_advisories() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = PipelineOptions {
        request: ConversionRequest {
            cleaning: data_sweeper::processing::CleaningOptions {
                remove_duplicates: false,
                fill_missing_numeric: true,
            },
            ..Default::default()
        },
        ..options_with(obs.clone())
    };

    let _ = run_pipeline(&UploadedFile::new("names.csv", b"name\nAda\n".to_vec()), &opts);
    assert_eq!(
        obs.advisories.lock().unwrap().clone(),
        vec![Advisory::NoNumericColumns, Advisory::NoNumericData]
    );
    assert_eq!(obs.successes.lock().unwrap().len(), 1);
}

#[test]
fn composite_and_file_observers_log_events() {
    let path = tmp_file("pipeline");
    let recording = Arc::new(RecordingObserver::default());
    let observers: Vec<Arc<dyn PipelineObserver>> =
        vec![Arc::new(FileObserver::new(&path)), recording.clone()];
    let composite = CompositeObserver::new(observers);
    let opts = PipelineOptions {
        request: ConversionRequest {
            source_format: Some(TableFormat::Csv),
            ..Default::default()
        },
        ..options_with(Arc::new(composite))
    };

    let files = vec![
        UploadedFile::new("ok.csv", b"x\n1\n".to_vec()),
        UploadedFile::new("bad.csv", b"x\n1,2\n".to_vec()),
    ];
    let _ = run_batch(&files, &opts);

    assert_eq!(recording.successes.lock().unwrap().len(), 1);
    assert_eq!(recording.failures.lock().unwrap().len(), 1);

    let log = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("ok file=ok.csv CSV->CSV"));
    assert!(lines[1].contains("fail severity=Error file=bad.csv"));

    let _ = std::fs::remove_file(&path);
}
