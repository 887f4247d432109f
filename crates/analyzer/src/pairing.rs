//! 송신/수신 페어링 상태 머신
//!
//! `snd:` 라인이 요청, `rcv:` 라인이 응답입니다. 응답 대기 중 새 요청이
//! 오면 이전 요청은 누락으로 집계되고, 스트림 끝까지 응답이 없는 요청도
//! 누락 하나로 집계됩니다.
//!
//! ```text
//!          send                      send (missing + 1)
//!   Idle ────────► AwaitingResponse ◄──────────────┐
//!    ▲                   │   └────────────────────┘
//!    └───── receive ─────┘  (pairs + 1, latency)
//! ```

use chrono::{DateTime, Local};

use crate::report::ResponseTime;

/// 페어링 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairingState {
    /// 대기 중인 요청 없음
    #[default]
    Idle,
    /// 응답 대기
    AwaitingResponse {
        /// 요청 시각
        sent_at: DateTime<Local>,
        /// 요청 라인 번호 (날짜 게이트 통과 라인 기준)
        line: usize,
    },
}

/// 한 번의 페어링 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    /// 응답 지연 (밀리초)
    pub latency_ms: i64,
    /// 요청과 응답 사이 라인 간격
    pub line_gap: usize,
    /// 지연 기준 초과 여부
    pub delayed: bool,
}

/// 센서 하나의 페어링 상태와 지연 통계
#[derive(Debug, Clone)]
pub struct PairingMachine {
    state: PairingState,
    threshold_ms: u64,
    max_gap_lines: usize,
    pairs_total: usize,
    missing_total: usize,
    delayed_samples: usize,
    latencies: Vec<i64>,
}

impl PairingMachine {
    /// 지연 기준과 최대 라인 간격으로 생성합니다.
    pub fn new(threshold_ms: u64, max_gap_lines: usize) -> Self {
        Self {
            state: PairingState::Idle,
            threshold_ms,
            max_gap_lines,
            pairs_total: 0,
            missing_total: 0,
            delayed_samples: 0,
            latencies: Vec::new(),
        }
    }

    /// 현재 상태
    pub fn state(&self) -> PairingState {
        self.state
    }

    /// 타임스탬프가 있는 송신 라인
    pub fn on_send(&mut self, sent_at: DateTime<Local>, line: usize) {
        if matches!(self.state, PairingState::AwaitingResponse { .. }) {
            self.missing_total += 1;
        }
        self.state = PairingState::AwaitingResponse { sent_at, line };
    }

    /// 타임스탬프가 있는 수신 라인. 대기 중인 요청이 없으면 `None`입니다.
    pub fn on_receive(&mut self, received_at: DateTime<Local>, line: usize) -> Option<Pairing> {
        let PairingState::AwaitingResponse { sent_at, line: sent_line } = self.state else {
            return None;
        };

        let latency_ms = (received_at - sent_at).num_milliseconds();
        let line_gap = line.saturating_sub(sent_line);
        let delayed = latency_ms >= self.threshold_ms as i64 || line_gap > self.max_gap_lines;

        self.pairs_total += 1;
        if delayed {
            self.delayed_samples += 1;
        }
        self.latencies.push(latency_ms);
        self.state = PairingState::Idle;

        Some(Pairing {
            latency_ms,
            line_gap,
            delayed,
        })
    }

    /// 스트림 종료. 대기 중인 요청이 있으면 누락 하나를 더합니다.
    pub fn finish(&mut self) {
        if matches!(self.state, PairingState::AwaitingResponse { .. }) {
            self.missing_total += 1;
        }
        self.state = PairingState::Idle;
    }

    pub fn pairs_total(&self) -> usize {
        self.pairs_total
    }

    pub fn missing_total(&self) -> usize {
        self.missing_total
    }

    pub fn delayed_samples(&self) -> usize {
        self.delayed_samples
    }

    /// 지연 통계 (최소/평균/최대, 평균은 버림)
    pub fn response_time(&self) -> ResponseTime {
        let (Some(min), Some(max)) = (
            self.latencies.iter().copied().min(),
            self.latencies.iter().copied().max(),
        ) else {
            return ResponseTime::default();
        };
        let sum: i64 = self.latencies.iter().sum();
        let avg = sum / self.latencies.len() as i64;

        ResponseTime {
            min_ms: Some(min),
            avg_ms: Some(avg),
            max_ms: Some(max),
            max_human: Some(format_duration(max)),
        }
    }
}

/// 밀리초를 사람이 읽는 형식으로 표시합니다.
///
/// `1000` 미만은 `"{n}ms"`, 60초 미만은 `"{s:.1}s"`, 그 이상은 `"{m}m {s}s"`.
pub fn format_duration(ms: i64) -> String {
    if ms < 1000 {
        return format!("{ms}ms");
    }
    let seconds = ms / 1000;
    if seconds < 60 {
        return format!("{:.1}s", ms as f64 / 1000.0);
    }
    format!("{}m {}s", seconds / 60, seconds % 60)
}
