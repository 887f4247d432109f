//! 분석 날짜와 라인 타임스탬프 처리

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::error::AnalyzerError;

/// 라인 선두 타임스탬프 길이 (`YYYY-MM-DD HH:MM:SS.mmm`)
pub const LINE_TIMESTAMP_LEN: usize = 23;

const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// 분석 대상 날짜
///
/// `YYYYMMDD` 입력을 검증해 보관하며 라인 게이트용 `YYYY-MM-DD`
/// 접두어를 미리 만들어 둡니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDate {
    compact: String,
    prefix: String,
    date: NaiveDate,
}

impl TargetDate {
    /// `YYYYMMDD` 문자열을 파싱합니다.
    ///
    /// 정확히 8자리 ASCII 숫자이면서 실제 달력 날짜여야 합니다.
    pub fn parse(value: &str) -> Result<Self, AnalyzerError> {
        let invalid = |reason: &str| AnalyzerError::InvalidDate {
            value: value.to_owned(),
            reason: reason.to_owned(),
        };

        if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected 8 digits in YYYYMMDD form"));
        }

        // 8자리 ASCII 숫자임이 확인되었으므로 슬라이스와 파싱은 실패하지 않음
        let field = |range: std::ops::Range<usize>| value[range].parse::<u32>().unwrap_or(0);
        let date = NaiveDate::from_ymd_opt(field(0..4) as i32, field(4..6), field(6..8))
            .ok_or_else(|| invalid("not a calendar date"))?;

        Ok(Self {
            compact: value.to_owned(),
            prefix: date.format("%Y-%m-%d").to_string(),
            date,
        })
    }

    /// 입력 그대로의 `YYYYMMDD` 형식
    pub fn compact(&self) -> &str {
        &self.compact
    }

    /// 라인 게이트에 쓰이는 `YYYY-MM-DD` 형식
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// 타임스탬프가 없는 센서에 적용하는 하루 전체 구간 (로컬 시각)
    pub fn full_day(&self) -> Option<(DateTime<Local>, DateTime<Local>)> {
        let start = self.date.and_time(NaiveTime::MIN);
        let end = self.date.and_hms_opt(23, 59, 59)?;
        let from = Local.from_local_datetime(&start).earliest()?;
        let to = Local.from_local_datetime(&end).latest()?;
        Some((from, to))
    }
}

/// 라인 선두 23자를 로컬 시각 타임스탬프로 파싱합니다.
///
/// 라인이 짧거나 형식이 맞지 않으면 `None`입니다.
pub fn parse_line_time(line: &str) -> Option<DateTime<Local>> {
    let head = line.get(..LINE_TIMESTAMP_LEN)?;
    let naive = NaiveDateTime::parse_from_str(head, LINE_TIMESTAMP_FORMAT).ok()?;
    Local.from_local_datetime(&naive).earliest()
}
