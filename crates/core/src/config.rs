//! 설정 관리 -- fieldlog.toml 파싱 및 런타임 설정
//!
//! [`FieldlogConfig`]는 현장 장비, 로그 루트, 분석 엔진 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`FIELDLOG_SITE_LOG_ROOT=/data/logs` 형식)
//! 3. 설정 파일 (`fieldlog.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! 숫자 필드의 `0`은 "미설정"을 뜻하며, 분석 엔진이 기본값을 채웁니다.
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), fieldlog_core::error::FieldlogError> {
//! use fieldlog_core::config::FieldlogConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = FieldlogConfig::load("fieldlog.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = FieldlogConfig::parse("[site]\nlog_root = \"/data/logs\"")?;
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, FieldlogError};
use crate::types::SensorType;

/// fieldlog 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldlogConfig {
    /// 일반 설정 (로깅)
    #[serde(default)]
    pub general: GeneralConfig,
    /// 현장/장비 식별자와 경로
    #[serde(default)]
    pub site: SiteConfig,
    /// 분석 엔진 설정
    #[serde(default)]
    pub analyzer: AnalysisConfig,
}

impl FieldlogConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, FieldlogError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, FieldlogError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FieldlogError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                FieldlogError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, FieldlogError> {
        toml::from_str(toml_str).map_err(|e| {
            FieldlogError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `FIELDLOG_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "FIELDLOG_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "FIELDLOG_GENERAL_LOG_FORMAT");

        // Site
        override_string(&mut self.site.site_id, "FIELDLOG_SITE_SITE_ID");
        override_string(&mut self.site.device_id, "FIELDLOG_SITE_DEVICE_ID");
        override_string(&mut self.site.outbox_dir, "FIELDLOG_SITE_OUTBOX_DIR");
        override_string(&mut self.site.log_root, "FIELDLOG_SITE_LOG_ROOT");

        // Analyzer
        override_csv(
            &mut self.analyzer.include_globs,
            "FIELDLOG_ANALYZER_INCLUDE_GLOBS",
        );
        override_csv(
            &mut self.analyzer.exclude_dirs,
            "FIELDLOG_ANALYZER_EXCLUDE_DIRS",
        );
        override_usize(
            &mut self.analyzer.duplicate_run_threshold,
            "FIELDLOG_ANALYZER_DUPLICATE_RUN_THRESHOLD",
        );
        override_bool(
            &mut self.analyzer.fallback_to_latest_file,
            "FIELDLOG_ANALYZER_FALLBACK_TO_LATEST_FILE",
        );
        override_u64(
            &mut self.analyzer.delay_threshold_ms,
            "FIELDLOG_ANALYZER_DELAY_THRESHOLD_MS",
        );
        override_usize(
            &mut self.analyzer.delay_max_gap_lines,
            "FIELDLOG_ANALYZER_DELAY_MAX_GAP_LINES",
        );
        override_usize(
            &mut self.analyzer.max_lines_per_sensor,
            "FIELDLOG_ANALYZER_MAX_LINES_PER_SENSOR",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// `site.log_root`는 CLI 인자로 덮어쓸 수 있으므로 여기서 검사하지 않습니다.
    pub fn validate(&self) -> Result<(), FieldlogError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        for key in self.analyzer.delay_threshold_by_type_ms.keys() {
            if SensorType::from_str_loose(key).is_none() {
                return Err(ConfigError::InvalidValue {
                    field: format!("analyzer.delay_threshold_by_type_ms.{key}"),
                    reason: "key must be one of: GATE, WLS, PUMP, TEMP".to_owned(),
                }
                .into());
            }
        }

        if let Some(frame_len) = self.analyzer.wls.frame_len
            && frame_len < self.analyzer.wls.value_offset.unwrap_or(0) + 2
        {
            return Err(ConfigError::InvalidValue {
                field: "analyzer.wls.frame_len".to_owned(),
                reason: "frame must be long enough to hold the 16-bit value field".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 현장/장비 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// 현장 식별자
    pub site_id: String,
    /// 장비 식별자
    pub device_id: String,
    /// 리포트 출력 디렉토리
    pub outbox_dir: String,
    /// 센서 디렉토리들이 위치한 로그 루트
    pub log_root: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_id: String::new(),
            device_id: String::new(),
            outbox_dir: "outbox".to_owned(),
            log_root: String::new(),
        }
    }
}

/// 분석 엔진 설정 (파일 표현)
///
/// 숫자 필드가 `0`이면 분석 엔진의 기본값이 적용됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 센서 디렉토리 include 글롭 (비어 있으면 `GATE*`, `WLS*`, `PUMP*`, `TEMP*`)
    pub include_globs: Vec<String>,
    /// 제외할 디렉토리 이름 (대소문자 무시, 비어 있으면 `ALL`, `PING`)
    pub exclude_dirs: Vec<String>,
    /// 중복으로 판정하는 연속 반복 횟수
    pub duplicate_run_threshold: usize,
    /// 날짜 일치 파일이 없을 때 최신 파일 사용 여부
    pub fallback_to_latest_file: bool,
    /// 응답 지연 판정 기준 (밀리초)
    pub delay_threshold_ms: u64,
    /// 송신-수신 사이 허용 최대 라인 간격
    pub delay_max_gap_lines: usize,
    /// 센서 종류별 지연 기준 (밀리초, 키: GATE/WLS/PUMP/TEMP)
    pub delay_threshold_by_type_ms: BTreeMap<String, u64>,
    /// 센서당 최대 처리 라인 수
    pub max_lines_per_sensor: usize,
    /// 상태 판정 임계값
    pub status_thresholds: StatusThresholdsConfig,
    /// WLS 프로토콜 프레임 설정
    pub wls: WlsProtocolConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            include_globs: vec![
                "GATE*".to_owned(),
                "WLS*".to_owned(),
                "PUMP*".to_owned(),
                "TEMP*".to_owned(),
            ],
            exclude_dirs: vec!["ALL".to_owned(), "PING".to_owned()],
            duplicate_run_threshold: 3,
            fallback_to_latest_file: false,
            delay_threshold_ms: 2000,
            delay_max_gap_lines: 5,
            delay_threshold_by_type_ms: BTreeMap::new(),
            max_lines_per_sensor: 5000,
            status_thresholds: StatusThresholdsConfig::default(),
            wls: WlsProtocolConfig::default(),
        }
    }
}

/// 상태 판정 임계값 (카테고리별 에러/경고)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusThresholdsConfig {
    pub error_timeout: usize,
    pub error_no_response: usize,
    pub error_zero_data: usize,
    pub error_duplicates: usize,
    pub warning_timeout: usize,
    pub warning_no_response: usize,
    pub warning_zero_data: usize,
    pub warning_duplicates: usize,
}

impl Default for StatusThresholdsConfig {
    fn default() -> Self {
        Self {
            error_timeout: 3,
            error_no_response: 3,
            error_zero_data: 10,
            error_duplicates: 50,
            warning_timeout: 1,
            warning_no_response: 1,
            warning_zero_data: 1,
            warning_duplicates: 10,
        }
    }
}

/// WLS 프레임 설정
///
/// 필드가 비어 있으면 분석 엔진의 표준 프레임(11바이트, 0x02..0x03, 오프셋 4) 값이 쓰입니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WlsProtocolConfig {
    /// 프레임 길이 (바이트)
    pub frame_len: Option<usize>,
    /// 시작 마커
    pub start_marker: Option<u8>,
    /// 종료 마커
    pub end_marker: Option<u8>,
    /// 16비트 빅엔디언 값의 바이트 오프셋
    pub value_offset: Option<usize>,
    /// 유효 수위 최솟값 (cm)
    pub min_value_cm: Option<u16>,
    /// 유효 수위 최댓값 (cm)
    pub max_value_cm: Option<u16>,
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}
