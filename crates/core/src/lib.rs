#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{AnalysisError, ConfigError, FieldlogError};

// 설정
pub use config::{
    AnalysisConfig, FieldlogConfig, GeneralConfig, SiteConfig, StatusThresholdsConfig,
    WlsProtocolConfig,
};

// 도메인 타입
pub use types::{IssueKind, SensorStatus, SensorType};
