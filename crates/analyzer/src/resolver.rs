//! 센서 디렉토리 탐색
//!
//! 로그 루트의 직계 하위 항목 이름을 include 글롭과 매칭하고, 제외 목록과
//! 센서 종류 접두어로 걸러 [`SensorDirectory`] 목록을 만듭니다.
//! 글롭(`*`, `?`, `[...]`, `{a,b}`)은 `globset`으로 매칭합니다 (대소문자 구분).

use std::path::{Path, PathBuf};

use fieldlog_core::types::SensorType;
use globset::{Glob, GlobMatcher, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::config::ALWAYS_EXCLUDED_DIR;
use crate::error::AnalyzerError;

/// 분석 대상 센서 디렉토리
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorDirectory {
    /// 디렉토리 경로
    pub path: PathBuf,
    /// 센서 ID (디렉토리 이름)
    pub sensor_id: String,
    /// 센서 종류
    pub sensor_type: SensorType,
}

/// 로그 루트에서 센서 디렉토리를 찾습니다.
///
/// 결과는 경로 순으로 정렬되며, 여러 패턴에 매칭된 디렉토리도 한 번만
/// 나타납니다. 루트를 나열할 수 없으면 I/O 에러입니다.
pub fn find_sensor_dirs(
    root: &Path,
    include_globs: &[String],
    exclude_dirs: &[String],
) -> Result<Vec<SensorDirectory>, AnalyzerError> {
    if root.as_os_str().is_empty() {
        return Err(AnalyzerError::Config {
            field: "log_root".to_owned(),
            reason: "log_root is required".to_owned(),
        });
    }

    let patterns = compile_globs(include_globs)?;

    let entries = std::fs::read_dir(root).map_err(|e| AnalyzerError::io(root, e))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(root = %root.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().into_owned();

        if !patterns.is_match(&name) {
            continue;
        }
        if is_excluded(&name, exclude_dirs) {
            debug!(name = %name, "excluded sensor directory");
            continue;
        }

        let path = entry.path();
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => continue,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "skipping entry, stat failed");
                continue;
            }
        }

        let Some(sensor_type) = SensorType::from_sensor_id(&name) else {
            debug!(name = %name, "unrecognized sensor type prefix");
            continue;
        };

        dirs.push(SensorDirectory {
            path,
            sensor_id: name,
            sensor_type,
        });
    }

    dirs.sort_by(|a, b| a.path.cmp(&b.path));
    dirs.dedup_by(|a, b| a.path == b.path);
    Ok(dirs)
}

/// 제외 목록(대소문자 무시) 또는 `server`인지 검사합니다.
fn is_excluded(name: &str, exclude_dirs: &[String]) -> bool {
    name.eq_ignore_ascii_case(ALWAYS_EXCLUDED_DIR)
        || exclude_dirs.iter().any(|d| d.eq_ignore_ascii_case(name))
}

/// 글롭 패턴 하나를 컴파일합니다. 잘못된 패턴은 설정 에러입니다.
pub fn compile_glob(glob: &str) -> Result<GlobMatcher, AnalyzerError> {
    parse_glob(glob).map(|g| g.compile_matcher())
}

/// include 글롭 전체를 하나의 [`GlobSet`]으로 컴파일합니다.
pub fn compile_globs(globs: &[String]) -> Result<GlobSet, AnalyzerError> {
    let mut builder = GlobSetBuilder::new();
    for glob in globs {
        builder.add(parse_glob(glob)?);
    }
    builder.build().map_err(|e| AnalyzerError::Config {
        field: "include_globs".to_owned(),
        reason: e.to_string(),
    })
}

fn parse_glob(glob: &str) -> Result<Glob, AnalyzerError> {
    Glob::new(glob).map_err(|e| AnalyzerError::Config {
        field: "include_globs".to_owned(),
        reason: format!("invalid glob '{glob}': {e}"),
    })
}
