//! 분석 엔진 설정
//!
//! [`AnalyzerConfig`]는 core의 [`FieldlogConfig`](fieldlog_core::config::FieldlogConfig)에서
//! 파생되는, 기본값이 모두 채워진 실행 설정입니다. 설정 파일의 `0`/빈 값은
//! [`AnalyzerConfig::apply_defaults`]에서 한 번에 기본값으로 치환되므로
//! 라인 처리 경로에는 기본값 분기가 없습니다.
//!
//! # 사용 예시
//! ```ignore
//! use fieldlog_core::config::FieldlogConfig;
//! use fieldlog_analyzer::config::AnalyzerConfig;
//!
//! let core_config = FieldlogConfig::default();
//! let config = AnalyzerConfig::from_core(&core_config);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use fieldlog_core::config::{FieldlogConfig, StatusThresholdsConfig};
use fieldlog_core::types::{SensorStatus, SensorType};
use tracing::warn;

use crate::error::AnalyzerError;
use crate::wls::WlsProtocol;

/// 기본 include 글롭 (센서 종류 접두어)
pub const DEFAULT_INCLUDE_GLOBS: [&str; 4] = ["GATE*", "WLS*", "PUMP*", "TEMP*"];
/// 기본 제외 디렉토리 (집계용, 진단 전용)
pub const DEFAULT_EXCLUDE_DIRS: [&str; 2] = ["ALL", "PING"];
/// 설정과 무관하게 항상 제외되는 서버 제어 디렉토리
pub const ALWAYS_EXCLUDED_DIR: &str = "server";

pub const DEFAULT_DUPLICATE_RUN_THRESHOLD: usize = 3;
pub const DEFAULT_DELAY_THRESHOLD_MS: u64 = 2000;
pub const DEFAULT_DELAY_MAX_GAP_LINES: usize = 5;
pub const DEFAULT_MAX_LINES_PER_SENSOR: usize = 5000;

/// 상태 판정에 쓰이는 네 가지 카운터
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueCounts {
    pub timeout: usize,
    pub no_response: usize,
    pub zero_data: usize,
    pub duplicates: usize,
}

/// 한 등급(에러 또는 경고)의 카테고리별 임계값
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierThresholds {
    pub timeout: usize,
    pub no_response: usize,
    pub zero_data: usize,
    pub duplicates: usize,
}

impl TierThresholds {
    /// 어느 한 카테고리라도 같은 카테고리의 임계값 이상이면 `true`입니다.
    pub fn reached_by(&self, counts: &IssueCounts) -> bool {
        counts.timeout >= self.timeout
            || counts.no_response >= self.no_response
            || counts.zero_data >= self.zero_data
            || counts.duplicates >= self.duplicates
    }
}

/// 상태 판정 임계값
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusThresholds {
    pub error: TierThresholds,
    pub warning: TierThresholds,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            error: TierThresholds {
                timeout: 3,
                no_response: 3,
                zero_data: 10,
                duplicates: 50,
            },
            warning: TierThresholds {
                timeout: 1,
                no_response: 1,
                zero_data: 1,
                duplicates: 10,
            },
        }
    }
}

impl StatusThresholds {
    /// 설정 파일 표현에서 변환합니다. `0`인 값은 기본값으로 채웁니다.
    pub fn from_core(core: &StatusThresholdsConfig) -> Self {
        let d = Self::default();
        let or = |value: usize, default: usize| if value == 0 { default } else { value };
        Self {
            error: TierThresholds {
                timeout: or(core.error_timeout, d.error.timeout),
                no_response: or(core.error_no_response, d.error.no_response),
                zero_data: or(core.error_zero_data, d.error.zero_data),
                duplicates: or(core.error_duplicates, d.error.duplicates),
            },
            warning: TierThresholds {
                timeout: or(core.warning_timeout, d.warning.timeout),
                no_response: or(core.warning_no_response, d.warning.no_response),
                zero_data: or(core.warning_zero_data, d.warning.zero_data),
                duplicates: or(core.warning_duplicates, d.warning.duplicates),
            },
        }
    }

    /// 카운터로 센서 상태를 판정합니다.
    ///
    /// 에러 임계값을 먼저 검사하고, 각 카테고리는 자기 카테고리의 임계값과만 비교됩니다.
    pub fn evaluate(&self, counts: &IssueCounts) -> SensorStatus {
        if self.error.reached_by(counts) {
            SensorStatus::Error
        } else if self.warning.reached_by(counts) {
            SensorStatus::Warning
        } else {
            SensorStatus::Normal
        }
    }
}

/// 분석 엔진 실행 설정 (기본값 적용 완료)
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// 현장 식별자 (리포트에 그대로 기록)
    pub site_id: String,
    /// 장비 식별자 (리포트에 그대로 기록)
    pub device_id: String,
    /// 센서 디렉토리 루트
    pub log_root: PathBuf,
    /// 센서 디렉토리 include 글롭
    pub include_globs: Vec<String>,
    /// 제외 디렉토리 이름 (대소문자 무시)
    pub exclude_dirs: Vec<String>,
    /// 중복 판정 연속 반복 횟수
    pub duplicate_run_threshold: usize,
    /// 날짜 일치 파일이 없을 때 최신 파일 사용
    pub fallback_to_latest_file: bool,
    /// 전역 지연 기준 (밀리초)
    pub delay_threshold_ms: u64,
    /// 송신-수신 허용 최대 라인 간격
    pub delay_max_gap_lines: usize,
    /// 센서 종류별 지연 기준 (밀리초)
    pub delay_threshold_by_type_ms: HashMap<SensorType, u64>,
    /// 센서당 최대 처리 라인 수
    pub max_lines_per_sensor: usize,
    /// 상태 판정 임계값
    pub status_thresholds: StatusThresholds,
    /// WLS 프레임 규격
    pub wls: WlsProtocol,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            site_id: String::new(),
            device_id: String::new(),
            log_root: PathBuf::new(),
            include_globs: DEFAULT_INCLUDE_GLOBS.iter().map(|s| (*s).to_owned()).collect(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| (*s).to_owned()).collect(),
            duplicate_run_threshold: DEFAULT_DUPLICATE_RUN_THRESHOLD,
            fallback_to_latest_file: false,
            delay_threshold_ms: DEFAULT_DELAY_THRESHOLD_MS,
            delay_max_gap_lines: DEFAULT_DELAY_MAX_GAP_LINES,
            delay_threshold_by_type_ms: HashMap::new(),
            max_lines_per_sensor: DEFAULT_MAX_LINES_PER_SENSOR,
            status_thresholds: StatusThresholds::default(),
            wls: WlsProtocol::default(),
        }
    }
}

impl AnalyzerConfig {
    /// core 설정에서 분석 설정을 생성하고 기본값을 채웁니다.
    pub fn from_core(core: &FieldlogConfig) -> Self {
        let analysis = &core.analyzer;

        let mut by_type = HashMap::new();
        for (key, value) in &analysis.delay_threshold_by_type_ms {
            match SensorType::from_str_loose(key) {
                Some(sensor_type) => {
                    by_type.insert(sensor_type, *value);
                }
                None => warn!(key = %key, "unknown sensor type in delay_threshold_by_type_ms, ignoring"),
            }
        }

        Self {
            site_id: core.site.site_id.clone(),
            device_id: core.site.device_id.clone(),
            log_root: PathBuf::from(&core.site.log_root),
            include_globs: analysis.include_globs.clone(),
            exclude_dirs: analysis.exclude_dirs.clone(),
            duplicate_run_threshold: analysis.duplicate_run_threshold,
            fallback_to_latest_file: analysis.fallback_to_latest_file,
            delay_threshold_ms: analysis.delay_threshold_ms,
            delay_max_gap_lines: analysis.delay_max_gap_lines,
            delay_threshold_by_type_ms: by_type,
            max_lines_per_sensor: analysis.max_lines_per_sensor,
            status_thresholds: StatusThresholds::from_core(&analysis.status_thresholds),
            wls: WlsProtocol::from_core(&analysis.wls),
        }
        .apply_defaults()
    }

    /// 비어 있거나 `0`인 값을 기본값으로 치환합니다.
    pub fn apply_defaults(mut self) -> Self {
        if self.include_globs.is_empty() {
            self.include_globs = DEFAULT_INCLUDE_GLOBS.iter().map(|s| (*s).to_owned()).collect();
        }
        if self.exclude_dirs.is_empty() {
            self.exclude_dirs = DEFAULT_EXCLUDE_DIRS.iter().map(|s| (*s).to_owned()).collect();
        }
        if self.duplicate_run_threshold == 0 {
            self.duplicate_run_threshold = DEFAULT_DUPLICATE_RUN_THRESHOLD;
        }
        if self.delay_threshold_ms == 0 {
            self.delay_threshold_ms = DEFAULT_DELAY_THRESHOLD_MS;
        }
        if self.delay_max_gap_lines == 0 {
            self.delay_max_gap_lines = DEFAULT_DELAY_MAX_GAP_LINES;
        }
        if self.max_lines_per_sensor == 0 {
            self.max_lines_per_sensor = DEFAULT_MAX_LINES_PER_SENSOR;
        }
        self
    }

    /// 센서 종류에 적용되는 지연 기준을 반환합니다.
    pub fn delay_threshold_for(&self, sensor_type: SensorType) -> u64 {
        self.delay_threshold_by_type_ms
            .get(&sensor_type)
            .copied()
            .unwrap_or(self.delay_threshold_ms)
    }

    /// 실행 전 필수 값을 검증합니다.
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        if self.log_root.as_os_str().is_empty() {
            return Err(AnalyzerError::Config {
                field: "log_root".to_owned(),
                reason: "log_root is required".to_owned(),
            });
        }
        if self.duplicate_run_threshold == 0 {
            return Err(AnalyzerError::Config {
                field: "duplicate_run_threshold".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }
        if self.max_lines_per_sensor == 0 {
            return Err(AnalyzerError::Config {
                field: "max_lines_per_sensor".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }
        Ok(())
    }
}

/// 분석 설정 빌더
#[derive(Default)]
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 현장/장비 식별자를 설정합니다.
    pub fn site(mut self, site_id: impl Into<String>, device_id: impl Into<String>) -> Self {
        self.config.site_id = site_id.into();
        self.config.device_id = device_id.into();
        self
    }

    /// 로그 루트를 설정합니다.
    pub fn log_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.log_root = root.into();
        self
    }

    /// include 글롭을 설정합니다.
    pub fn include_globs(mut self, globs: Vec<String>) -> Self {
        self.config.include_globs = globs;
        self
    }

    /// 제외 디렉토리를 설정합니다.
    pub fn exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        self.config.exclude_dirs = dirs;
        self
    }

    /// 중복 판정 임계값을 설정합니다.
    pub fn duplicate_run_threshold(mut self, threshold: usize) -> Self {
        self.config.duplicate_run_threshold = threshold;
        self
    }

    /// 최신 파일 폴백 여부를 설정합니다.
    pub fn fallback_to_latest_file(mut self, enabled: bool) -> Self {
        self.config.fallback_to_latest_file = enabled;
        self
    }

    /// 전역 지연 기준(밀리초)을 설정합니다.
    pub fn delay_threshold_ms(mut self, ms: u64) -> Self {
        self.config.delay_threshold_ms = ms;
        self
    }

    /// 센서 종류별 지연 기준(밀리초)을 설정합니다.
    pub fn delay_threshold_for(mut self, sensor_type: SensorType, ms: u64) -> Self {
        self.config.delay_threshold_by_type_ms.insert(sensor_type, ms);
        self
    }

    /// 송신-수신 허용 최대 라인 간격을 설정합니다.
    pub fn delay_max_gap_lines(mut self, lines: usize) -> Self {
        self.config.delay_max_gap_lines = lines;
        self
    }

    /// 센서당 최대 처리 라인 수를 설정합니다.
    pub fn max_lines_per_sensor(mut self, lines: usize) -> Self {
        self.config.max_lines_per_sensor = lines;
        self
    }

    /// 상태 판정 임계값을 설정합니다.
    pub fn status_thresholds(mut self, thresholds: StatusThresholds) -> Self {
        self.config.status_thresholds = thresholds;
        self
    }

    /// WLS 프레임 규격을 설정합니다.
    pub fn wls_protocol(mut self, protocol: WlsProtocol) -> Self {
        self.config.wls = protocol;
        self
    }

    /// 기본값을 채우고 검증한 뒤 `AnalyzerConfig`를 생성합니다.
    pub fn build(self) -> Result<AnalyzerConfig, AnalyzerError> {
        let config = self.config.apply_defaults();
        config.validate()?;
        Ok(config)
    }
}
