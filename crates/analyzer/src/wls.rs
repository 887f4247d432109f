//! WLS(수위 센서) 바이너리 프레임 디코더
//!
//! 수신 페이로드는 `(02, 30, 31, 00, 00, 2A, ...)`처럼 바이트를 텍스트로
//! 나열한 형태입니다. 디코딩 단계:
//!
//! 1. [`parse_payload_bytes`]: 토큰을 `u8`로 변환 (하나라도 실패하면 무효)
//! 2. [`WlsProtocol::decode`]: 길이/시작/종료 마커 검증 후 값 필드의
//!    빅엔디언 `u16` 추출
//! 3. [`WlsProtocol::in_range`]: 물리적 범위(기본 0..=96cm) 밖의 값은
//!    통계에서만 제외
//!
//! 무효 프레임은 0 데이터로 집계되며 값 통계에 반영되지 않습니다.

use std::collections::HashMap;

use fieldlog_core::config::WlsProtocolConfig;

use crate::report::WlsValue;

/// 표준 프레임 길이
pub const STANDARD_FRAME_LEN: usize = 11;
/// 표준 시작 마커 (STX)
pub const STANDARD_START_MARKER: u8 = 0x02;
/// 표준 종료 마커 (ETX)
pub const STANDARD_END_MARKER: u8 = 0x03;
/// 표준 값 필드 오프셋
pub const STANDARD_VALUE_OFFSET: usize = 4;
/// 유효 수위 최솟값 (cm)
pub const MIN_VALUE_CM: u16 = 0;
/// 유효 수위 최댓값 (cm)
pub const MAX_VALUE_CM: u16 = 96;

/// 상위 값 목록 크기
pub const TOP_VALUES: usize = 5;

/// 프레임 검증 실패 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// 프레임 길이 불일치
    #[error("frame length {actual}, expected {expected}")]
    Length { expected: usize, actual: usize },

    /// 시작 마커 불일치
    #[error("start marker {actual:#04x}, expected {expected:#04x}")]
    StartMarker { expected: u8, actual: u8 },

    /// 종료 마커 불일치
    #[error("end marker {actual:#04x}, expected {expected:#04x}")]
    EndMarker { expected: u8, actual: u8 },

    /// 값 필드를 담기에 프레임이 짧음
    #[error("frame of {len} bytes too short for value at offset {offset}")]
    TooShort { len: usize, offset: usize },
}

/// WLS 프레임 규격
///
/// `None`인 검사 항목은 생략됩니다. [`WlsProtocol::relaxed`]는 길이와
/// 마커 검사를 모두 생략하는 진단용 규격입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WlsProtocol {
    pub frame_len: Option<usize>,
    pub start_marker: Option<u8>,
    pub end_marker: Option<u8>,
    pub value_offset: usize,
    pub min_value_cm: u16,
    pub max_value_cm: u16,
}

impl Default for WlsProtocol {
    fn default() -> Self {
        Self::standard()
    }
}

impl WlsProtocol {
    /// 11바이트, STX/ETX, 오프셋 4 표준 규격
    pub fn standard() -> Self {
        Self {
            frame_len: Some(STANDARD_FRAME_LEN),
            start_marker: Some(STANDARD_START_MARKER),
            end_marker: Some(STANDARD_END_MARKER),
            value_offset: STANDARD_VALUE_OFFSET,
            min_value_cm: MIN_VALUE_CM,
            max_value_cm: MAX_VALUE_CM,
        }
    }

    /// 길이/마커 검사 없이 `value_offset`에서 값만 읽는 규격
    pub fn relaxed(value_offset: usize) -> Self {
        Self {
            frame_len: None,
            start_marker: None,
            end_marker: None,
            value_offset,
            ..Self::standard()
        }
    }

    /// 설정 파일 값으로 표준 규격의 항목을 덮어씁니다.
    pub fn from_core(core: &WlsProtocolConfig) -> Self {
        let standard = Self::standard();
        Self {
            frame_len: core.frame_len.or(standard.frame_len),
            start_marker: core.start_marker.or(standard.start_marker),
            end_marker: core.end_marker.or(standard.end_marker),
            value_offset: core.value_offset.unwrap_or(standard.value_offset),
            min_value_cm: core.min_value_cm.unwrap_or(standard.min_value_cm),
            max_value_cm: core.max_value_cm.unwrap_or(standard.max_value_cm),
        }
    }

    /// 프레임을 검증하고 값 필드를 빅엔디언으로 읽습니다.
    pub fn decode(&self, frame: &[u8]) -> Result<u16, FrameError> {
        if let Some(expected) = self.frame_len
            && frame.len() != expected
        {
            return Err(FrameError::Length {
                expected,
                actual: frame.len(),
            });
        }
        if let Some(expected) = self.start_marker
            && let Some(&actual) = frame.first()
            && actual != expected
        {
            return Err(FrameError::StartMarker { expected, actual });
        }
        if let Some(expected) = self.end_marker
            && let Some(&actual) = frame.last()
            && actual != expected
        {
            return Err(FrameError::EndMarker { expected, actual });
        }

        match frame.get(self.value_offset..self.value_offset.saturating_add(2)) {
            Some(&[hi, lo]) => Ok(u16::from_be_bytes([hi, lo])),
            _ => Err(FrameError::TooShort {
                len: frame.len(),
                offset: self.value_offset,
            }),
        }
    }

    /// 물리적 유효 범위 안인지 검사합니다.
    pub fn in_range(&self, value: u16) -> bool {
        (self.min_value_cm..=self.max_value_cm).contains(&value)
    }
}

/// 텍스트 바이트 나열을 `u8` 목록으로 변환합니다.
///
/// 바깥 괄호와 공백을 벗기고 쉼표/공백/탭으로 나눈 뒤, 각 토큰을 소문자로
/// 바꾸고 `0x` 접두어를 제거합니다. `a-f`를 포함하거나 정확히 두 글자면
/// 16진수, 그 외에는 10진수로 읽습니다. 토큰이 없거나 하나라도 실패하면
/// `None`입니다.
pub fn parse_payload_bytes(payload: &str) -> Option<Vec<u8>> {
    let inner = payload.trim_matches(|c: char| "()[]{}".contains(c) || c.is_whitespace());
    let mut bytes = Vec::new();
    for token in inner
        .split([',', ' ', '\t'])
        .filter(|token| !token.is_empty())
    {
        let lower = token.to_ascii_lowercase();
        let digits = lower.strip_prefix("0x").unwrap_or(&lower);
        if digits.is_empty() {
            return None;
        }
        let is_hex = digits.len() == 2 || digits.bytes().any(|b| (b'a'..=b'f').contains(&b));
        let radix = if is_hex { 16 } else { 10 };
        bytes.push(u8::from_str_radix(digits, radix).ok()?);
    }
    (!bytes.is_empty()).then_some(bytes)
}

/// 센서 하나의 WLS 값 통계
#[derive(Debug, Clone, Default)]
pub struct WlsStats {
    last: Option<u16>,
    min: Option<u16>,
    max: Option<u16>,
    histogram: HashMap<u16, usize>,
}

impl WlsStats {
    /// 유효 범위 값을 기록합니다.
    pub fn record(&mut self, value: u16) {
        self.last = Some(value);
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
        *self.histogram.entry(value).or_insert(0) += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.histogram.is_empty()
    }

    pub fn last(&self) -> Option<u16> {
        self.last
    }

    pub fn min(&self) -> Option<u16> {
        self.min
    }

    pub fn max(&self) -> Option<u16> {
        self.max
    }

    /// 빈도 내림차순, 동률이면 값 오름차순으로 상위 5개
    pub fn top_values(&self) -> Vec<WlsValue> {
        let mut values: Vec<WlsValue> = self
            .histogram
            .iter()
            .map(|(&value, &count)| WlsValue { value, count })
            .collect();
        values.sort_by(|a, b| b.count.cmp(&a.count).then(a.value.cmp(&b.value)));
        values.truncate(TOP_VALUES);
        values
    }
}
