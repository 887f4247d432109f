#![doc = include_str!("../README.md")]

pub mod config;
pub mod date;
pub mod duplicate;
pub mod engine;
pub mod error;
pub mod line;
pub mod pairing;
pub mod ranking;
pub mod report;
pub mod resolver;
pub mod scan;
pub mod selector;
pub mod wls;

// --- 주요 타입 re-export ---

// 에러
pub use error::AnalyzerError;

// 설정
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder, StatusThresholds, TierThresholds};

// 실행
pub use engine::{analyze_daily, analyze_sensor};

// 리포트
pub use report::{
    DailySummary, Examples, Metrics, PayloadCount, ResponseTime, SensorResult, TimeRange,
    TopIssue, WlsValue,
};

// 구성 요소
pub use date::TargetDate;
pub use resolver::{SensorDirectory, find_sensor_dirs};
pub use scan::{Feed, SensorScan};
pub use selector::{FileSelection, select_files};
pub use wls::{FrameError, WlsProtocol};
