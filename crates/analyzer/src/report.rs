//! 리포트 타입: 일일 요약 JSON의 구조
//!
//! 선택적 숫자는 `Option`으로 표현하며 `null`로 직렬화됩니다.
//! `0`과 "값 없음"은 구분됩니다 (예: `unique_ratio_pct`).

use fieldlog_core::types::{IssueKind, SensorStatus, SensorType};
use serde::{Deserialize, Serialize};

/// 관측 시간 범위 (RFC3339)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

/// 응답 지연 통계
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseTime {
    pub min_ms: Option<i64>,
    pub avg_ms: Option<i64>,
    pub max_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_human: Option<String>,
}

/// 반복 페이로드와 빈도
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadCount {
    pub payload: String,
    pub count: usize,
}

/// WLS 값과 빈도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WlsValue {
    pub value: u16,
    pub count: usize,
}

/// 센서별 지표
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// 날짜 게이트를 통과해 처리된 라인 수
    #[serde(skip)]
    pub lines: usize,
    pub timeout: usize,
    pub no_response: usize,
    pub zero_data: usize,
    pub duplicates: usize,
    pub pairs_total: usize,
    pub missing_total: usize,
    pub delayed_samples: usize,
    pub last_rcv_at: Option<String>,
    pub time_range: TimeRange,
    /// 타임스탬프가 있는 송수신 이벤트 수
    pub sample_count: usize,
    pub response_time: ResponseTime,
    /// 이 센서에 적용된 지연 기준
    pub delay_threshold_ms: u64,
    pub delay_max_gap_lines: usize,
    pub unique_ratio_pct: Option<f64>,
    #[serde(default)]
    pub top_payloads: Vec<PayloadCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wls_last_value_cm: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wls_min_value_cm: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wls_max_value_cm: Option<u16>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wls_top_values: Vec<WlsValue>,
    /// 유효 페이로드 총수
    #[serde(skip)]
    pub total_payloads: usize,
    /// 서로 다른 유효 페이로드 수
    #[serde(skip)]
    pub unique_payloads: usize,
}

impl Metrics {
    /// 이슈 분류별 카운터
    pub fn issue_count(&self, kind: IssueKind) -> usize {
        match kind {
            IssueKind::Timeout => self.timeout,
            IssueKind::NoResponse => self.no_response,
            IssueKind::ZeroData => self.zero_data,
            IssueKind::Duplicates => self.duplicates,
        }
    }
}

/// 대표 라인 예시와 안내 문구
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Examples {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_timeout_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_no_response_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_zero_data_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_duplicate_payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// 센서 하나의 분석 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorResult {
    pub sensor_id: String,
    pub sensor_type: SensorType,
    pub status: SensorStatus,
    pub metrics: Metrics,
    pub examples: Examples,
}

/// 센서 간 이슈 순위 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub sensor_id: String,
    pub count: usize,
}

/// 일일 요약
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub site_id: String,
    pub device_id: String,
    /// 입력 그대로의 `YYYYMMDD`
    pub date: String,
    /// 생성 시각 (RFC3339)
    pub generated_at: String,
    pub log_root: String,
    pub sensors: Vec<SensorResult>,
    pub top_issues: Vec<TopIssue>,
}

impl DailySummary {
    /// 가장 심각한 센서 상태
    pub fn worst_status(&self) -> SensorStatus {
        self.sensors
            .iter()
            .map(|s| s.status)
            .max()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> SensorResult {
        SensorResult {
            sensor_id: "GATE01".to_owned(),
            sensor_type: SensorType::Gate,
            status: SensorStatus::Normal,
            metrics: Metrics::default(),
            examples: Examples::default(),
        }
    }

    #[test]
    fn optional_fields_serialize_as_null_or_are_omitted() {
        let json = serde_json::to_value(sample_result()).unwrap();
        let metrics = &json["metrics"];
        assert!(metrics["unique_ratio_pct"].is_null());
        assert!(metrics["last_rcv_at"].is_null());
        assert!(metrics["response_time"]["min_ms"].is_null());
        assert!(metrics.get("wls_last_value_cm").is_none());
        assert!(metrics.get("wls_top_values").is_none());
        assert!(metrics.get("lines").is_none());
        assert!(metrics.get("total_payloads").is_none());
        assert_eq!(json["examples"], serde_json::json!({}));
    }

    #[test]
    fn zero_ratio_is_not_null() {
        let mut result = sample_result();
        result.metrics.unique_ratio_pct = Some(0.0);
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["metrics"]["unique_ratio_pct"], serde_json::json!(0.0));
    }

    #[test]
    fn top_issue_uses_type_key() {
        let issue = TopIssue {
            kind: IssueKind::ZeroData,
            sensor_id: "WLS01".to_owned(),
            count: 4,
        };
        let json = serde_json::to_value(issue).unwrap();
        assert_eq!(json["type"], "zero_data");
        assert_eq!(json["sensor_id"], "WLS01");
    }

    #[test]
    fn summary_roundtrips_through_json() {
        let summary = DailySummary {
            site_id: "site-a".to_owned(),
            device_id: "dev-1".to_owned(),
            date: "20260119".to_owned(),
            generated_at: "2026-01-20T00:00:00+09:00".to_owned(),
            log_root: "/data/logs".to_owned(),
            sensors: vec![sample_result()],
            top_issues: vec![],
        };
        let text = serde_json::to_string_pretty(&summary).unwrap();
        let back: DailySummary = serde_json::from_str(&text).unwrap();
        assert_eq!(back, summary);
        assert_eq!(back.worst_status(), SensorStatus::Normal);
    }
}
