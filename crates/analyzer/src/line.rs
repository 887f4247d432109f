//! 라인 분류기와 페이로드 추출
//!
//! 날짜 게이트를 통과한 라인 하나에서 장애 문구, 송수신 마커, 타임스탬프,
//! 수신 페이로드를 한 번에 뽑아 [`LineFacts`]로 돌려줍니다.
//! 각 항목은 독립적으로 판정되므로 타임스탬프 파싱이 실패해도
//! 나머지 분류는 그대로 적용됩니다.

use chrono::{DateTime, Local};

use crate::date::parse_line_time;

/// 송신 마커
pub const SEND_MARKER: &str = "snd:";
/// 수신 마커
pub const RECEIVE_MARKER: &str = "rcv:";

const TIMEOUT_PHRASE: &str = "timeout";
const NO_RESPONSE_PHRASE: &str = "no response";
const NO_RESPONSE_PHRASES_KO: [&str; 2] = ["응답없음", "응답 없음"];

/// 분류 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFacts<'a> {
    /// 선행 공백을 제거한 라인
    pub text: &'a str,
    /// `timeout` 문구 포함
    pub timeout: bool,
    /// 무응답 문구 포함
    pub no_response: bool,
    /// 송신 마커 포함
    pub send: bool,
    /// 수신 마커 포함
    pub receive: bool,
    /// 선두 타임스탬프
    pub timestamp: Option<DateTime<Local>>,
    /// 첫 수신 마커 뒤의 페이로드 (공백 제거, 비어 있으면 `None`)
    pub payload: Option<&'a str>,
}

/// 라인 선두의 공백과 탭을 제거합니다.
pub fn strip_leading(line: &str) -> &str {
    line.trim_start_matches([' ', '\t'])
}

/// 날짜 게이트: 선행 공백 제거 후 `YYYY-MM-DD`로 시작하는지 검사합니다.
///
/// 통과하면 공백이 제거된 라인을 돌려줍니다.
pub fn gate<'a>(line: &'a str, date_prefix: &str) -> Option<&'a str> {
    let trimmed = strip_leading(line);
    trimmed.starts_with(date_prefix).then_some(trimmed)
}

/// 게이트를 통과한 라인을 분류합니다.
pub fn classify(text: &str) -> LineFacts<'_> {
    LineFacts {
        text,
        timeout: find_ignore_ascii_case(text, TIMEOUT_PHRASE).is_some(),
        no_response: has_no_response(text),
        send: find_ignore_ascii_case(text, SEND_MARKER).is_some(),
        receive: find_ignore_ascii_case(text, RECEIVE_MARKER).is_some(),
        timestamp: parse_line_time(text),
        payload: extract_payload(text),
    }
}

/// 무응답 문구(영문은 대소문자 무시, 한글은 그대로) 포함 여부
pub fn has_no_response(text: &str) -> bool {
    find_ignore_ascii_case(text, NO_RESPONSE_PHRASE).is_some()
        || NO_RESPONSE_PHRASES_KO.iter().any(|p| text.contains(p))
}

/// 첫 `rcv:`(대소문자 무시) 뒤의 텍스트를 공백 제거해 반환합니다.
pub fn extract_payload(text: &str) -> Option<&str> {
    let idx = find_ignore_ascii_case(text, RECEIVE_MARKER)?;
    let payload = text[idx + RECEIVE_MARKER.len()..].trim();
    (!payload.is_empty()).then_some(payload)
}

/// 모든 토큰이 0인 페이로드인지 판정합니다.
///
/// 바깥 괄호와 공백을 벗기고 쉼표를 공백으로 바꾼 뒤 공백으로 나눕니다.
/// 토큰이 하나 이상이고, 모든 토큰이 (`0x` 접두어 제거 후) `0`으로만
/// 이루어져 있어야 합니다. 접두어만 있는 `0x` 토큰도 0으로 봅니다.
pub fn is_zero_payload(payload: &str) -> bool {
    let inner = payload.trim_matches(|c: char| "()[]{}".contains(c) || c.is_whitespace());
    let normalized = inner.replace(',', " ");
    let mut tokens = normalized.split_whitespace().peekable();
    if tokens.peek().is_none() {
        return false;
    }
    tokens.all(|token| {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        digits.bytes().all(|b| b == b'0')
    })
}

/// ASCII 대소문자를 무시한 부분 문자열 검색 (바이트 오프셋 반환)
///
/// `needle`은 ASCII여야 하며, 반환된 오프셋은 항상 문자 경계입니다.
pub fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}
