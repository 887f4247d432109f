//! 도메인 타입 -- 센서 종류, 상태 등급, 이슈 분류
//!
//! 분석 엔진과 CLI가 공유하는 열거형을 정의합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 센서 종류
///
/// 센서 디렉토리 이름의 접두어(대소문자 무시)로 결정됩니다.
/// 네 가지 접두어 외의 디렉토리는 분석 대상이 아닙니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SensorType {
    /// 수문/밸브 제어기
    Gate,
    /// 수위 센서 (바이너리 프로토콜 디코딩 대상)
    Wls,
    /// 펌프
    Pump,
    /// 온도 프로브
    Temp,
}

impl SensorType {
    /// 인식 가능한 모든 센서 종류
    pub const ALL: [SensorType; 4] = [Self::Gate, Self::Wls, Self::Pump, Self::Temp];

    /// 센서 ID(디렉토리 이름)의 접두어로 센서 종류를 판별합니다.
    ///
    /// 대소문자를 구분하지 않으며, 일치하는 접두어가 없으면 `None`을 반환합니다.
    pub fn from_sensor_id(sensor_id: &str) -> Option<Self> {
        let upper = sensor_id.to_uppercase();
        Self::ALL
            .into_iter()
            .find(|ty| upper.starts_with(ty.as_str()))
    }

    /// 문자열에서 센서 종류를 파싱합니다 (정확한 이름, 대소문자 무시).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GATE" => Some(Self::Gate),
            "WLS" => Some(Self::Wls),
            "PUMP" => Some(Self::Pump),
            "TEMP" => Some(Self::Temp),
            _ => None,
        }
    }

    /// 대문자 이름을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gate => "GATE",
            Self::Wls => "WLS",
            Self::Pump => "PUMP",
            Self::Temp => "TEMP",
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 센서 상태 등급
///
/// `Ord` 구현으로 비교가 가능합니다 (`Normal < Warning < Error`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum SensorStatus {
    /// 정상
    #[default]
    Normal,
    /// 경고 임계값 이상
    Warning,
    /// 에러 임계값 이상
    Error,
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// 장애 이슈 분류
///
/// 상태 판정과 센서 간 이슈 순위에 사용되는 네 가지 카운터입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// 타임아웃 문구
    Timeout,
    /// 무응답 문구
    NoResponse,
    /// 0 데이터 또는 잘못된 프레임
    ZeroData,
    /// 동일 페이로드 반복
    Duplicates,
}

impl IssueKind {
    /// 순위 집계 시 사용하는 고정 순서
    pub const ALL: [IssueKind; 4] = [
        Self::Timeout,
        Self::NoResponse,
        Self::ZeroData,
        Self::Duplicates,
    ];

    /// 리포트에 쓰이는 snake_case 이름을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::NoResponse => "no_response",
            Self::ZeroData => "zero_data",
            Self::Duplicates => "duplicates",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_type_from_prefix_is_case_insensitive() {
        assert_eq!(SensorType::from_sensor_id("GATE01"), Some(SensorType::Gate));
        assert_eq!(SensorType::from_sensor_id("wls_north"), Some(SensorType::Wls));
        assert_eq!(SensorType::from_sensor_id("Pump-3"), Some(SensorType::Pump));
        assert_eq!(SensorType::from_sensor_id("temp"), Some(SensorType::Temp));
    }

    #[test]
    fn unknown_prefix_is_not_a_sensor() {
        assert_eq!(SensorType::from_sensor_id("ALL"), None);
        assert_eq!(SensorType::from_sensor_id("server"), None);
        assert_eq!(SensorType::from_sensor_id("XGATE"), None);
    }

    #[test]
    fn from_str_loose_requires_exact_name() {
        assert_eq!(SensorType::from_str_loose("wls"), Some(SensorType::Wls));
        assert_eq!(SensorType::from_str_loose("WLS1"), None);
    }

    #[test]
    fn status_ordering() {
        assert!(SensorStatus::Normal < SensorStatus::Warning);
        assert!(SensorStatus::Warning < SensorStatus::Error);
    }

    #[test]
    fn serde_names_match_report_format() {
        assert_eq!(
            serde_json::to_string(&SensorType::Wls).unwrap(),
            "\"WLS\""
        );
        assert_eq!(
            serde_json::to_string(&SensorStatus::Warning).unwrap(),
            "\"WARNING\""
        );
        assert_eq!(
            serde_json::to_string(&IssueKind::NoResponse).unwrap(),
            "\"no_response\""
        );
    }
}
