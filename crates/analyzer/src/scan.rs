//! 센서 단위 스캔 상태와 결과 집계
//!
//! [`SensorScan`]은 센서 하나의 모든 실행 상태(페어링, 중복 추적, WLS 통계,
//! 페이로드 빈도, 관측 시간 범위, 예시 라인)를 소유합니다. 엔진은 센서마다
//! 새 인스턴스를 만들어 선택된 파일의 라인을 순서대로 [`SensorScan::feed`]에
//! 넣고, 끝에서 [`SensorScan::finish`]로 [`SensorResult`]를 얻습니다.
//! 인스턴스는 센서 간에 공유되거나 재사용되지 않습니다.

use std::collections::HashMap;

use chrono::{DateTime, Local, SecondsFormat};
use fieldlog_core::types::SensorType;

use crate::config::{AnalyzerConfig, IssueCounts};
use crate::date::TargetDate;
use crate::duplicate::DuplicateTracker;
use crate::line::{self, LineFacts};
use crate::pairing::PairingMachine;
use crate::report::{Examples, Metrics, PayloadCount, SensorResult, TimeRange};
use crate::wls::{WlsStats, parse_payload_bytes};

/// 반복 페이로드 목록 크기
pub const TOP_PAYLOADS: usize = 5;

pub const NOTE_NO_FILE: &str = "no log file for date";
pub const NOTE_NO_DATA: &str = "no data for date";
pub const NOTE_NO_TIMESTAMPS: &str = "no timestamps found for date; time range estimated as full day";
pub const NOTE_NO_PAYLOAD: &str = "no payload for date";
pub const NOTE_NO_RCV: &str = "no rcv events found for date; cannot compute response time";

/// [`SensorScan::feed`] 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// 날짜 게이트에서 걸러짐
    Ignored,
    /// 처리됨
    Accepted,
    /// 라인 예산 소진. 호출자는 이 센서의 읽기를 중단해야 합니다.
    Exhausted,
}

/// 센서 하나의 스캔 상태
pub struct SensorScan<'a> {
    sensor_id: String,
    sensor_type: SensorType,
    config: &'a AnalyzerConfig,
    date: &'a TargetDate,
    max_lines: usize,
    files_seen: usize,

    metrics: Metrics,
    examples: Examples,
    pairing: PairingMachine,
    duplicates: DuplicateTracker,
    payload_counts: HashMap<String, usize>,
    wls: WlsStats,
    first_seen: Option<DateTime<Local>>,
    last_seen: Option<DateTime<Local>>,
    last_rcv_at: Option<DateTime<Local>>,
}

impl<'a> SensorScan<'a> {
    /// 새 스캔 상태를 만듭니다. `max_lines`는 날짜 게이트 통과 라인 기준 예산입니다.
    pub fn new(
        sensor_id: impl Into<String>,
        sensor_type: SensorType,
        config: &'a AnalyzerConfig,
        date: &'a TargetDate,
        max_lines: usize,
    ) -> Self {
        let delay_threshold_ms = config.delay_threshold_for(sensor_type);
        Self {
            sensor_id: sensor_id.into(),
            sensor_type,
            config,
            date,
            max_lines,
            files_seen: 0,
            metrics: Metrics {
                delay_threshold_ms,
                delay_max_gap_lines: config.delay_max_gap_lines,
                ..Default::default()
            },
            examples: Examples::default(),
            pairing: PairingMachine::new(delay_threshold_ms, config.delay_max_gap_lines),
            duplicates: DuplicateTracker::new(config.duplicate_run_threshold),
            payload_counts: HashMap::new(),
            wls: WlsStats::default(),
            first_seen: None,
            last_seen: None,
            last_rcv_at: None,
        }
    }

    /// 새 파일을 읽기 시작할 때 호출합니다. 라인 번호는 파일 간에 이어집니다.
    pub fn begin_file(&mut self) {
        self.files_seen += 1;
    }

    /// 지금까지 처리한 라인 수
    pub fn lines(&self) -> usize {
        self.metrics.lines
    }

    /// 라인 하나를 처리합니다.
    pub fn feed(&mut self, raw: &str) -> Feed {
        let Some(text) = line::gate(raw, self.date.prefix()) else {
            return Feed::Ignored;
        };
        if self.metrics.lines >= self.max_lines {
            return Feed::Exhausted;
        }
        self.metrics.lines += 1;
        let line_no = self.metrics.lines;

        let facts = line::classify(text);
        self.record_failures(&facts);
        self.record_events(&facts, line_no);

        match facts.payload {
            Some(payload) => self.record_payload(payload, text),
            None => self.duplicates.reset(),
        }
        Feed::Accepted
    }

    fn record_failures(&mut self, facts: &LineFacts<'_>) {
        if facts.timeout {
            self.metrics.timeout += 1;
            self.examples
                .first_timeout_line
                .get_or_insert_with(|| facts.text.to_owned());
        }
        if facts.no_response {
            self.metrics.no_response += 1;
            self.examples
                .first_no_response_line
                .get_or_insert_with(|| facts.text.to_owned());
        }
    }

    fn record_events(&mut self, facts: &LineFacts<'_>, line_no: usize) {
        let Some(at) = facts.timestamp else {
            return;
        };
        if facts.send {
            self.metrics.sample_count += 1;
            self.observe_time(at);
            self.pairing.on_send(at, line_no);
        }
        if facts.receive {
            self.metrics.sample_count += 1;
            self.observe_time(at);
            self.last_rcv_at = Some(at);
            self.pairing.on_receive(at, line_no);
        }
    }

    /// 관측 시간 범위는 송수신 이벤트 시각으로만 넓어집니다.
    fn observe_time(&mut self, at: DateTime<Local>) {
        self.first_seen = Some(self.first_seen.map_or(at, |t| t.min(at)));
        self.last_seen = Some(self.last_seen.map_or(at, |t| t.max(at)));
    }

    fn record_payload(&mut self, payload: &str, text: &str) {
        let decoded = match self.sensor_type {
            SensorType::Wls => Some(
                parse_payload_bytes(payload).and_then(|bytes| self.config.wls.decode(&bytes).ok()),
            ),
            _ => None,
        };
        let invalid_frame = matches!(decoded, Some(None));

        if invalid_frame || line::is_zero_payload(payload) {
            self.metrics.zero_data += 1;
            self.examples
                .first_zero_data_line
                .get_or_insert_with(|| text.to_owned());
            return;
        }

        self.metrics.total_payloads += 1;
        *self.payload_counts.entry(payload.to_owned()).or_insert(0) += 1;
        if self.duplicates.observe(payload) {
            self.metrics.duplicates += 1;
        }

        if let Some(Some(value)) = decoded
            && self.config.wls.in_range(value)
        {
            self.wls.record(value);
        }
    }

    /// 스트림을 닫고 결과를 집계합니다.
    pub fn finish(mut self) -> SensorResult {
        self.pairing.finish();

        let mut metrics = self.metrics;
        metrics.pairs_total = self.pairing.pairs_total();
        metrics.missing_total = self.pairing.missing_total();
        metrics.delayed_samples = self.pairing.delayed_samples();
        metrics.response_time = self.pairing.response_time();
        metrics.last_rcv_at = self.last_rcv_at.map(rfc3339);

        let observed = self.first_seen.zip(self.last_seen);
        let estimated = observed.is_none() && metrics.lines > 0;
        let range = if estimated {
            self.date.full_day()
        } else {
            observed
        };
        if let Some((from, to)) = range {
            metrics.time_range = TimeRange {
                from: Some(rfc3339(from)),
                to: Some(rfc3339(to)),
            };
        }

        metrics.unique_payloads = self.payload_counts.len();
        metrics.unique_ratio_pct = (metrics.total_payloads > 0).then(|| {
            metrics.unique_payloads as f64 * 100.0 / metrics.total_payloads as f64
        });
        metrics.top_payloads = top_payloads(&self.payload_counts);

        if !self.wls.is_empty() {
            metrics.wls_last_value_cm = self.wls.last();
            metrics.wls_min_value_cm = self.wls.min();
            metrics.wls_max_value_cm = self.wls.max();
            metrics.wls_top_values = self.wls.top_values();
        }

        let mut examples = self.examples;
        examples.top_duplicate_payload = metrics.top_payloads.first().map(|p| p.payload.clone());
        examples.note = [
            (self.files_seen == 0, NOTE_NO_FILE),
            (metrics.lines == 0, NOTE_NO_DATA),
            (estimated, NOTE_NO_TIMESTAMPS),
            (metrics.total_payloads == 0, NOTE_NO_PAYLOAD),
            (
                metrics.pairs_total == 0 && metrics.last_rcv_at.is_none(),
                NOTE_NO_RCV,
            ),
        ]
        .into_iter()
        .find_map(|(hit, note)| hit.then(|| note.to_owned()));

        let status = self.config.status_thresholds.evaluate(&IssueCounts {
            timeout: metrics.timeout,
            no_response: metrics.no_response,
            zero_data: metrics.zero_data,
            duplicates: metrics.duplicates,
        });

        SensorResult {
            sensor_id: self.sensor_id,
            sensor_type: self.sensor_type,
            status,
            metrics,
            examples,
        }
    }
}

fn rfc3339(at: DateTime<Local>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// 2회 이상 나온 페이로드: 빈도 내림차순, 페이로드 오름차순, 상위 5개
fn top_payloads(counts: &HashMap<String, usize>) -> Vec<PayloadCount> {
    let mut repeated: Vec<PayloadCount> = counts
        .iter()
        .filter(|(_, count)| **count >= 2)
        .map(|(payload, &count)| PayloadCount {
            payload: payload.clone(),
            count,
        })
        .collect();
    repeated.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.payload.cmp(&b.payload)));
    repeated.truncate(TOP_PAYLOADS);
    repeated
}
