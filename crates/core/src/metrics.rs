//! 메트릭 상수 및 설명 등록
//!
//! 분석 엔진이 기록하는 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 엔진은 이 상수를 사용하여 `metrics::counter!()`, `metrics::histogram!()`
//! 매크로를 호출합니다. 레코더가 설치되지 않았다면 기록은 무시됩니다.
//!
//! `fieldlog` CLI는 한 번 실행하고 끝나므로 레코더를 설치하지 않습니다.
//! 엔진을 라이브러리로 포함하는 쪽에서 레코더(예: Prometheus exporter)를
//! 설치한 뒤 [`describe_all`]을 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `fieldlog_analyzer_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(fieldlog_core::metrics::ANALYZER_LINES_PROCESSED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 센서 종류 레이블 키 (GATE, WLS, PUMP, TEMP)
pub const LABEL_SENSOR_TYPE: &str = "sensor_type";

/// 이슈 분류 레이블 키 (timeout, no_response, zero_data, duplicates)
pub const LABEL_ISSUE: &str = "issue";

/// 상태 레이블 키 (NORMAL, WARNING, ERROR)
pub const LABEL_STATUS: &str = "status";

// ─── Analyzer 메트릭 ───────────────────────────────────────────────

/// Analyzer: 분석된 센서 수 (counter, label: sensor_type, status)
pub const ANALYZER_SENSORS_ANALYZED_TOTAL: &str = "fieldlog_analyzer_sensors_analyzed_total";

/// Analyzer: 날짜 게이트를 통과해 처리된 라인 수 (counter, label: sensor_type)
pub const ANALYZER_LINES_PROCESSED_TOTAL: &str = "fieldlog_analyzer_lines_processed_total";

/// Analyzer: 라인 예산 초과로 중단된 센서 수 (counter)
pub const ANALYZER_LINE_BUDGET_EXHAUSTED_TOTAL: &str =
    "fieldlog_analyzer_line_budget_exhausted_total";

/// Analyzer: 분류된 이슈 이벤트 수 (counter, label: issue)
pub const ANALYZER_ISSUES_TOTAL: &str = "fieldlog_analyzer_issues_total";

/// Analyzer: 일일 분석 1회 소요 시간 (histogram, 초)
pub const ANALYZER_RUN_DURATION_SECONDS: &str = "fieldlog_analyzer_run_duration_seconds";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        ANALYZER_SENSORS_ANALYZED_TOTAL,
        "Total number of sensor directories analyzed"
    );
    describe_counter!(
        ANALYZER_LINES_PROCESSED_TOTAL,
        "Total number of log lines matching the target date that were processed"
    );
    describe_counter!(
        ANALYZER_LINE_BUDGET_EXHAUSTED_TOTAL,
        "Number of sensors whose scan stopped at the per-sensor line budget"
    );
    describe_counter!(
        ANALYZER_ISSUES_TOTAL,
        "Classified issue events per category"
    );
    describe_histogram!(
        ANALYZER_RUN_DURATION_SECONDS,
        "Wall-clock duration of one daily analysis run in seconds"
    );
}
