//! Benchmarks for the decode → clean → project → encode pipeline on generated CSV input.
//!
//! Run with: cargo bench --bench pipeline

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use data_sweeper::decoding::{DecodeOptions, decode};
use data_sweeper::format::TableFormat;
use data_sweeper::pipeline::{ConversionRequest, PipelineOptions, UploadedFile, run_pipeline};
use data_sweeper::processing::{CleaningOptions, ColumnSelection, clean};

/// CSV with `rows` rows; every tenth row repeats its predecessor and every seventh score is blank.
fn generated_csv(rows: usize) -> Vec<u8> {
    let mut out = String::from("id,name,score,city\n");
    for i in 0..rows {
        let id = if i % 10 == 9 { i - 1 } else { i };
        let score = if id % 7 == 0 {
            String::new()
        } else {
            format!("{}.5", id % 100)
        };
        out.push_str(&format!("{id},name-{id},{score},city-{}\n", id % 13));
    }
    out.into_bytes()
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_csv");
    for rows in [1_000usize, 10_000] {
        let bytes = generated_csv(rows);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &bytes, |b, bytes| {
            b.iter(|| decode(black_box(bytes), TableFormat::Csv, &DecodeOptions::default()))
        });
    }
    group.finish();
}

fn bench_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean");
    let options = CleaningOptions {
        remove_duplicates: true,
        fill_missing_numeric: true,
    };
    for rows in [1_000usize, 10_000] {
        let Ok(table) = decode(&generated_csv(rows), TableFormat::Csv, &DecodeOptions::default())
        else {
            panic!("generated input must decode");
        };
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &table, |b, table| {
            b.iter(|| clean(black_box(table), &options))
        });
    }
    group.finish();
}

fn bench_run_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_pipeline");
    for target in [TableFormat::Csv, TableFormat::Excel] {
        let file = UploadedFile::new("bench.csv", generated_csv(5_000));
        let options = PipelineOptions::with_request(ConversionRequest {
            target_format: target,
            selected_columns: ColumnSelection::columns(["score", "id", "city"]),
            cleaning: CleaningOptions {
                remove_duplicates: true,
                fill_missing_numeric: true,
            },
            ..Default::default()
        });
        group.bench_with_input(BenchmarkId::from_parameter(target), &file, |b, file| {
            b.iter(|| run_pipeline(black_box(file), &options))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode, bench_clean, bench_run_pipeline);
criterion_main!(benches);
