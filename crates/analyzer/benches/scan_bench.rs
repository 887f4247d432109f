//! 라인 스캔 벤치마크
//!
//! 라인 분류, WLS 프레임 파싱, 센서 스캔 전체의 처리량을 측정합니다.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use fieldlog_analyzer::line::classify;
use fieldlog_analyzer::wls::{WlsProtocol, parse_payload_bytes};
use fieldlog_analyzer::{AnalyzerConfigBuilder, SensorScan, TargetDate};
use fieldlog_core::types::SensorType;

const SEND_LINE: &str = "2026-01-19 10:00:00.000 snd: STATUS";
const RECEIVE_LINE: &str = "2026-01-19 10:00:00.250 rcv: (02, 30, 31, 32, 00, 2A, 00, 00, 00, 00, 03)";
const TIMEOUT_LINE: &str = "2026-01-19 10:00:01.000 read timeout on /dev/ttyS1";
const FRAME: &str = "(02, 30, 31, 32, 00, 2A, 00, 00, 00, 00, 03)";

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    group.throughput(Throughput::Elements(1));

    for (name, line) in [
        ("send", SEND_LINE),
        ("receive", RECEIVE_LINE),
        ("timeout", TIMEOUT_LINE),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), line, |b, line| {
            b.iter(|| classify(black_box(line)))
        });
    }

    group.finish();
}

fn bench_wls_frame(c: &mut Criterion) {
    let protocol = WlsProtocol::standard();
    let mut group = c.benchmark_group("wls_frame");
    group.throughput(Throughput::Elements(1));

    group.bench_function("parse_bytes", |b| {
        b.iter(|| parse_payload_bytes(black_box(FRAME)))
    });
    group.bench_function("parse_and_decode", |b| {
        b.iter(|| {
            parse_payload_bytes(black_box(FRAME)).map(|bytes| protocol.decode(&bytes))
        })
    });

    group.finish();
}

fn bench_sensor_scan(c: &mut Criterion) {
    let config = AnalyzerConfigBuilder::new()
        .log_root("/data/logs")
        .build()
        .unwrap();
    let date = TargetDate::parse("20260119").unwrap();

    let mut group = c.benchmark_group("sensor_scan");
    for lines in [1_000usize, 5_000] {
        group.throughput(Throughput::Elements(lines as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, &lines| {
            b.iter(|| {
                let mut scan = SensorScan::new("WLS01", SensorType::Wls, &config, &date, lines);
                scan.begin_file();
                for i in 0..lines {
                    let line = match i % 3 {
                        0 => SEND_LINE,
                        1 => RECEIVE_LINE,
                        _ => TIMEOUT_LINE,
                    };
                    scan.feed(black_box(line));
                }
                scan.finish()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_classify, bench_wls_frame, bench_sensor_scan);
criterion_main!(benches);
