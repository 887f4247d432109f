//! 일일 분석 실행
//!
//! 센서 디렉토리 탐색 → 파일 선택 → 라인 스캔 → 센서 결과 집계 → 이슈 순위의
//! 전체 흐름을 동기적으로 실행합니다. 센서는 경로 순, 파일은 선택 순,
//! 라인은 파일 순서대로 한 번만 읽습니다.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::time::Instant;

use chrono::{Local, SecondsFormat};
use fieldlog_core::metrics as m;
use fieldlog_core::types::IssueKind;
use tracing::{debug, info, warn};

use crate::config::AnalyzerConfig;
use crate::date::TargetDate;
use crate::error::AnalyzerError;
use crate::ranking::build_top_issues;
use crate::report::{DailySummary, SensorResult};
use crate::resolver::{SensorDirectory, find_sensor_dirs};
use crate::scan::{Feed, SensorScan};
use crate::selector::select_files;

/// 하루치 로그를 분석해 요약을 만듭니다.
///
/// `date`는 `YYYYMMDD`, `max_lines`가 `0`이면 설정의 센서당 라인 예산을
/// 사용합니다. 날짜/설정 오류와 디렉토리·파일 I/O 실패는 실행 전체를
/// 실패시키며 부분 요약은 반환하지 않습니다.
pub fn analyze_daily(
    config: &AnalyzerConfig,
    date: &str,
    max_lines: usize,
) -> Result<DailySummary, AnalyzerError> {
    let started = Instant::now();
    let target = TargetDate::parse(date)?;
    config.validate()?;

    let max_lines = if max_lines == 0 {
        config.max_lines_per_sensor
    } else {
        max_lines
    };

    let dirs = find_sensor_dirs(&config.log_root, &config.include_globs, &config.exclude_dirs)?;
    debug!(
        log_root = %config.log_root.display(),
        sensors = dirs.len(),
        "sensor directories resolved"
    );

    let mut sensors = Vec::with_capacity(dirs.len());
    for dir in &dirs {
        sensors.push(analyze_sensor(config, &target, dir, max_lines)?);
    }
    let top_issues = build_top_issues(&sensors);

    metrics::histogram!(m::ANALYZER_RUN_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
    info!(
        date = %target.compact(),
        sensors = sensors.len(),
        top_issues = top_issues.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "daily analysis completed"
    );

    Ok(DailySummary {
        site_id: config.site_id.clone(),
        device_id: config.device_id.clone(),
        date: target.compact().to_owned(),
        generated_at: Local::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        log_root: config.log_root.display().to_string(),
        sensors,
        top_issues,
    })
}

/// 센서 디렉토리 하나를 분석합니다.
pub fn analyze_sensor(
    config: &AnalyzerConfig,
    date: &TargetDate,
    dir: &SensorDirectory,
    max_lines: usize,
) -> Result<SensorResult, AnalyzerError> {
    let selection = select_files(&dir.path, date, config.fallback_to_latest_file)?;
    if selection.used_fallback
        && let Some(file) = selection.files.first()
    {
        info!(
            sensor_id = %dir.sensor_id,
            file = %file.display(),
            "no log file for date, using latest modified file"
        );
    }
    debug!(
        sensor_id = %dir.sensor_id,
        files = selection.files.len(),
        "log files selected"
    );

    let mut scan = SensorScan::new(&dir.sensor_id, dir.sensor_type, config, date, max_lines);
    let mut buf = Vec::new();

    'files: for path in &selection.files {
        scan.begin_file();
        let file = File::open(path).map_err(|e| AnalyzerError::io(path, e))?;
        let mut reader = BufReader::new(file);

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| AnalyzerError::io(path, e))?;
            if read == 0 {
                break;
            }
            let line = String::from_utf8_lossy(trim_line_end(&buf));
            if scan.feed(&line) == Feed::Exhausted {
                warn!(
                    sensor_id = %dir.sensor_id,
                    max_lines,
                    file = %path.display(),
                    "line budget exhausted, remaining lines skipped"
                );
                metrics::counter!(m::ANALYZER_LINE_BUDGET_EXHAUSTED_TOTAL).increment(1);
                break 'files;
            }
        }
    }

    let lines = scan.lines();
    let result = scan.finish();
    record_metrics(&result, lines);

    debug!(
        sensor_id = %result.sensor_id,
        status = %result.status,
        lines,
        timeout = result.metrics.timeout,
        no_response = result.metrics.no_response,
        zero_data = result.metrics.zero_data,
        duplicates = result.metrics.duplicates,
        pairs = result.metrics.pairs_total,
        missing = result.metrics.missing_total,
        "sensor analyzed"
    );
    Ok(result)
}

fn record_metrics(result: &SensorResult, lines: usize) {
    let sensor_type = result.sensor_type.as_str();
    metrics::counter!(m::ANALYZER_LINES_PROCESSED_TOTAL, m::LABEL_SENSOR_TYPE => sensor_type)
        .increment(lines as u64);
    metrics::counter!(
        m::ANALYZER_SENSORS_ANALYZED_TOTAL,
        m::LABEL_SENSOR_TYPE => sensor_type,
        m::LABEL_STATUS => result.status.to_string()
    )
    .increment(1);

    for kind in IssueKind::ALL {
        let count = result.metrics.issue_count(kind);
        if count > 0 {
            metrics::counter!(m::ANALYZER_ISSUES_TOTAL, m::LABEL_ISSUE => kind.as_str())
                .increment(count as u64);
        }
    }
}

/// 줄 끝의 `\n`, `\r\n`을 제거합니다.
fn trim_line_end(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfigBuilder;
    use std::path::Path;

    fn write_log(root: &Path, sensor: &str, file: &str, content: &[u8]) {
        let dir = root.join(sensor);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn trims_crlf() {
        assert_eq!(trim_line_end(b"abc\r\n"), b"abc");
        assert_eq!(trim_line_end(b"abc\n"), b"abc");
        assert_eq!(trim_line_end(b"abc"), b"abc");
    }

    #[test]
    fn invalid_date_fails_before_touching_filesystem() {
        let config = AnalyzerConfigBuilder::new()
            .log_root("/nonexistent/root")
            .build()
            .unwrap();
        let err = analyze_daily(&config, "2026-01-19", 0).unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidDate { .. }));
    }

    #[test]
    fn empty_log_root_is_config_error() {
        let config = AnalyzerConfig::default();
        let err = analyze_daily(&config, "20260119", 0).unwrap_err();
        assert!(matches!(err, AnalyzerError::Config { .. }));
    }

    #[test]
    fn non_utf8_bytes_are_replaced() {
        let tmp = tempfile::tempdir().unwrap();
        write_log(
            tmp.path(),
            "GATE01",
            "2026-01-19.log",
            b"2026-01-19 00:00:01.000 \xff\xfe timeout\r\n",
        );
        let config = AnalyzerConfigBuilder::new()
            .log_root(tmp.path())
            .build()
            .unwrap();
        let summary = analyze_daily(&config, "20260119", 0).unwrap();
        assert_eq!(summary.sensors[0].metrics.timeout, 1);
    }

    #[test]
    fn budget_spans_files_and_stops_mid_file() {
        let tmp = tempfile::tempdir().unwrap();
        write_log(
            tmp.path(),
            "GATE01",
            "a_2026-01-19.log",
            b"2026-01-19 00:00:01.000 timeout\n2026-01-19 00:00:02.000 timeout\n",
        );
        write_log(
            tmp.path(),
            "GATE01",
            "b_2026-01-19.log",
            b"2026-01-19 00:00:03.000 timeout\n2026-01-19 00:00:04.000 timeout\n",
        );
        let config = AnalyzerConfigBuilder::new()
            .log_root(tmp.path())
            .build()
            .unwrap();
        let summary = analyze_daily(&config, "20260119", 3).unwrap();
        assert_eq!(summary.sensors[0].metrics.lines, 3);
        assert_eq!(summary.sensors[0].metrics.timeout, 3);
    }
}
