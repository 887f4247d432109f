//! 에러 타입 -- 도메인별 에러 정의

/// fieldlog 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum FieldlogError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 로그 분석 에러
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 로그 분석 에러
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// 분석 대상 날짜가 올바르지 않음
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// 분석 실행 실패 (디렉토리 나열, 파일 읽기 등)
    #[error("analysis failed: {0}")]
    Failed(String),
}
