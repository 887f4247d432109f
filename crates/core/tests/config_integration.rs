//! fieldlog.toml 통합 설정 테스트
//!
//! - fieldlog.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 잘못된 형식 에러 테스트

use fieldlog_core::config::FieldlogConfig;
use fieldlog_core::error::{ConfigError, FieldlogError};

// =============================================================================
// fieldlog.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../fieldlog.toml.example");
    let config = FieldlogConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "json");
    assert_eq!(config.site.site_id, "site-a");
    assert_eq!(config.site.device_id, "edge-01");
    assert_eq!(config.site.log_root, "/var/log/fieldlog");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../fieldlog.toml.example");
    let config = FieldlogConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_code_defaults() {
    let content = include_str!("../../../fieldlog.toml.example");
    let from_file = FieldlogConfig::parse(content).expect("should parse");
    let from_code = FieldlogConfig::default();

    assert_eq!(from_file.site.outbox_dir, from_code.site.outbox_dir);

    let (f, c) = (&from_file.analyzer, &from_code.analyzer);
    assert_eq!(f.include_globs, c.include_globs);
    assert_eq!(f.exclude_dirs, c.exclude_dirs);
    assert_eq!(f.duplicate_run_threshold, c.duplicate_run_threshold);
    assert_eq!(f.fallback_to_latest_file, c.fallback_to_latest_file);
    assert_eq!(f.delay_threshold_ms, c.delay_threshold_ms);
    assert_eq!(f.delay_max_gap_lines, c.delay_max_gap_lines);
    assert_eq!(f.max_lines_per_sensor, c.max_lines_per_sensor);
    assert!(f.delay_threshold_by_type_ms.is_empty());

    let (fs, cs) = (&f.status_thresholds, &c.status_thresholds);
    assert_eq!(fs.error_timeout, cs.error_timeout);
    assert_eq!(fs.error_duplicates, cs.error_duplicates);
    assert_eq!(fs.warning_zero_data, cs.warning_zero_data);
    assert_eq!(fs.warning_duplicates, cs.warning_duplicates);

    assert!(f.wls.frame_len.is_none());
    assert!(f.wls.value_offset.is_none());
}

// =============================================================================
// 부분 설정 테스트
// =============================================================================

#[test]
fn partial_config_site_only() {
    let toml = r#"
[site]
log_root = "/data/logs"
"#;
    let config = FieldlogConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");

    assert_eq!(config.site.log_root, "/data/logs");
    // 나머지는 기본값
    assert_eq!(config.site.outbox_dir, "outbox");
    assert_eq!(config.analyzer.delay_threshold_ms, 2000);
}

#[test]
fn partial_config_nested_thresholds_only() {
    let toml = r#"
[analyzer.status_thresholds]
error_timeout = 7
"#;
    let config = FieldlogConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");

    assert_eq!(config.analyzer.status_thresholds.error_timeout, 7);
    // 같은 테이블의 다른 필드는 기본값
    assert_eq!(config.analyzer.status_thresholds.warning_timeout, 1);
    assert_eq!(config.analyzer.duplicate_run_threshold, 3);
}

#[test]
fn partial_config_relaxed_wls_frame() {
    let toml = r#"
[analyzer.wls]
value_offset = 0
frame_len = 2
"#;
    let config = FieldlogConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");

    assert_eq!(config.analyzer.wls.value_offset, Some(0));
    assert_eq!(config.analyzer.wls.frame_len, Some(2));
    assert!(config.analyzer.wls.start_marker.is_none());
}

#[test]
fn per_type_delay_keys_accept_any_case() {
    let toml = r#"
[analyzer.delay_threshold_by_type_ms]
wls = 8000
GATE = 1500
"#;
    let config = FieldlogConfig::parse(toml).expect("should parse");
    config.validate().expect("mixed-case type keys should validate");
    assert_eq!(config.analyzer.delay_threshold_by_type_ms.len(), 2);
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_toml() {
    let toml = r#"
[site]
log_root = "/from/toml"
"#;

    let original = std::env::var("FIELDLOG_SITE_LOG_ROOT").ok();
    // SAFETY: serial 테스트로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("FIELDLOG_SITE_LOG_ROOT", "/from/env");
    }

    let mut config = FieldlogConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();
    let result = config.site.log_root.clone();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("FIELDLOG_SITE_LOG_ROOT", val),
            None => std::env::remove_var("FIELDLOG_SITE_LOG_ROOT"),
        }
    }

    assert_eq!(result, "/from/env");
}

#[test]
#[serial_test::serial]
fn env_override_csv_for_vec_fields() {
    let original = std::env::var("FIELDLOG_ANALYZER_EXCLUDE_DIRS").ok();
    // SAFETY: serial 테스트로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("FIELDLOG_ANALYZER_EXCLUDE_DIRS", "ALL, PING, BACKUP");
    }

    let mut config = FieldlogConfig::parse("").expect("should parse");
    config.apply_env_overrides();
    let result = config.analyzer.exclude_dirs.clone();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("FIELDLOG_ANALYZER_EXCLUDE_DIRS", val),
            None => std::env::remove_var("FIELDLOG_ANALYZER_EXCLUDE_DIRS"),
        }
    }

    assert_eq!(result, vec!["ALL", "PING", "BACKUP"]);
}

#[test]
#[serial_test::serial]
fn env_override_bool_field() {
    let original = std::env::var("FIELDLOG_ANALYZER_FALLBACK_TO_LATEST_FILE").ok();
    // SAFETY: serial 테스트로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("FIELDLOG_ANALYZER_FALLBACK_TO_LATEST_FILE", "true");
    }

    let mut config = FieldlogConfig::parse("").expect("should parse");
    config.apply_env_overrides();
    let result = config.analyzer.fallback_to_latest_file;

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("FIELDLOG_ANALYZER_FALLBACK_TO_LATEST_FILE", val),
            None => std::env::remove_var("FIELDLOG_ANALYZER_FALLBACK_TO_LATEST_FILE"),
        }
    }

    assert!(result);
}

#[test]
#[serial_test::serial]
fn env_override_numeric_field() {
    let original = std::env::var("FIELDLOG_ANALYZER_DELAY_THRESHOLD_MS").ok();
    // SAFETY: serial 테스트로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("FIELDLOG_ANALYZER_DELAY_THRESHOLD_MS", "4500");
    }

    let mut config = FieldlogConfig::parse("").expect("should parse");
    config.apply_env_overrides();
    let result = config.analyzer.delay_threshold_ms;

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("FIELDLOG_ANALYZER_DELAY_THRESHOLD_MS", val),
            None => std::env::remove_var("FIELDLOG_ANALYZER_DELAY_THRESHOLD_MS"),
        }
    }

    assert_eq!(result, 4500);
}

// =============================================================================
// 에러 테스트
// =============================================================================

#[test]
fn malformed_toml_is_parse_error() {
    let result = FieldlogConfig::parse("[site\nlog_root = 1");
    assert!(matches!(
        result,
        Err(FieldlogError::Config(ConfigError::ParseFailed { .. }))
    ));
}

#[test]
fn wrong_value_type_is_parse_error() {
    let toml = r#"
[analyzer]
delay_threshold_ms = "fast"
"#;
    let result = FieldlogConfig::parse(toml);
    assert!(matches!(
        result,
        Err(FieldlogError::Config(ConfigError::ParseFailed { .. }))
    ));
}

#[test]
fn invalid_log_format_is_rejected() {
    let toml = r#"
[general]
log_format = "xml"
"#;
    let config = FieldlogConfig::parse(toml).expect("should parse");
    let err = config.validate().expect_err("xml format should be rejected");
    assert!(matches!(
        err,
        FieldlogError::Config(ConfigError::InvalidValue { ref field, .. })
            if field == "general.log_format"
    ));
}
