//! 분석 엔진 에러 타입
//!
//! [`AnalyzerError`]는 일일 분석 실행을 중단시키는 에러만 표현합니다.
//! 라인 단위 파싱 실패(타임스탬프, 페이로드 토큰)는 에러가 아니라
//! 해당 기능만 건너뛰는 것으로 처리되므로 여기에 나타나지 않습니다.
//!
//! `From<AnalyzerError> for FieldlogError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use fieldlog_core::error::{AnalysisError, ConfigError, FieldlogError};

/// 분석 엔진 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// 분석 날짜가 `YYYYMMDD` 형식의 유효한 날짜가 아님
    #[error("invalid date '{value}': {reason}")]
    InvalidDate {
        /// 입력된 날짜 문자열
        value: String,
        /// 거부 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 디렉토리 나열, 파일 메타데이터 조회, 파일 읽기 실패
    #[error("io error: {path}: {source}")]
    Io {
        /// 관련 경로
        path: String,
        /// 원본 I/O 에러
        #[source]
        source: std::io::Error,
    },
}

impl AnalyzerError {
    /// 경로 정보를 붙여 I/O 에러를 생성합니다.
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

impl From<AnalyzerError> for FieldlogError {
    fn from(err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::InvalidDate { .. } => {
                FieldlogError::Analysis(AnalysisError::InvalidDate(err.to_string()))
            }
            AnalyzerError::Config { field, reason } => {
                FieldlogError::Config(ConfigError::InvalidValue { field, reason })
            }
            AnalyzerError::Io { .. } => {
                FieldlogError::Analysis(AnalysisError::Failed(err.to_string()))
            }
        }
    }
}
