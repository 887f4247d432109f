//! 센서 디렉토리 내 로그 파일 선택

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::date::TargetDate;
use crate::error::AnalyzerError;

/// 파일 선택 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    /// 읽을 파일 (읽기 순서)
    pub files: Vec<PathBuf>,
    /// 날짜 일치 파일이 없어 최신 파일로 대체했는지 여부
    pub used_fallback: bool,
}

/// 이름에 대상 날짜(`YYYY-MM-DD` 또는 `YYYYMMDD`)가 들어간 파일을
/// 이름순으로 선택합니다.
///
/// 디렉토리는 건너뛰며 이름 매칭에는 메타데이터를 조회하지 않습니다.
/// 일치하는 파일이 없고 `fallback`이 켜져 있으면 수정 시각이 가장 늦은
/// 파일 하나를 선택합니다. 이때 메타데이터를 읽을 수 없는 후보(끊어진
/// 심볼릭 링크 등)는 건너뜁니다. 디렉토리 나열 실패는 I/O 에러입니다.
pub fn select_files(
    dir: &Path,
    date: &TargetDate,
    fallback: bool,
) -> Result<FileSelection, AnalyzerError> {
    let entries = std::fs::read_dir(dir).map_err(|e| AnalyzerError::io(dir, e))?;

    let mut candidates: Vec<(PathBuf, String)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AnalyzerError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| AnalyzerError::io(&entry.path(), e))?;
        if file_type.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        candidates.push((entry.path(), name));
    }
    candidates.sort_by(|a, b| a.1.cmp(&b.1));

    let matched: Vec<PathBuf> = candidates
        .iter()
        .filter(|(_, name)| name.contains(date.prefix()) || name.contains(date.compact()))
        .map(|(path, _)| path.clone())
        .collect();

    if !matched.is_empty() {
        return Ok(FileSelection {
            files: matched,
            used_fallback: false,
        });
    }

    if !fallback {
        return Ok(FileSelection::default());
    }

    Ok(match latest_file(candidates) {
        Some(path) => FileSelection {
            files: vec![path],
            used_fallback: true,
        },
        None => FileSelection::default(),
    })
}

/// 수정 시각이 가장 늦은 일반 파일 (같으면 이름이 큰 쪽)
fn latest_file(candidates: Vec<(PathBuf, String)>) -> Option<PathBuf> {
    let mut latest: Option<(SystemTime, String, PathBuf)> = None;
    for (path, name) in candidates {
        let modified = match std::fs::metadata(&path).and_then(|meta| {
            if meta.is_file() {
                meta.modified().map(Some)
            } else {
                Ok(None)
            }
        }) {
            Ok(Some(modified)) => modified,
            Ok(None) => continue,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "skipping unreadable fallback candidate");
                continue;
            }
        };
        let newer = latest
            .as_ref()
            .is_none_or(|(t, n, _)| (modified, &name) > (*t, n));
        if newer {
            latest = Some((modified, name, path));
        }
    }
    latest.map(|(_, _, path)| path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{File, FileTimes};
    use std::time::Duration;

    fn date() -> TargetDate {
        TargetDate::parse("20260119").unwrap()
    }

    fn touch(dir: &Path, name: &str, age_secs: u64) {
        let file = File::create(dir.join(name)).unwrap();
        let mtime = SystemTime::now() - Duration::from_secs(age_secs);
        file.set_times(FileTimes::new().set_modified(mtime)).unwrap();
    }

    fn names(selection: &FileSelection) -> Vec<String> {
        selection
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn selects_both_date_forms_sorted_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "gate_2026-01-19_b.log", 10);
        touch(tmp.path(), "gate_20260119_a.log", 10);
        touch(tmp.path(), "gate_2026-01-18.log", 10);
        std::fs::create_dir(tmp.path().join("2026-01-19_dir")).unwrap();

        let selection = select_files(tmp.path(), &date(), false).unwrap();
        assert_eq!(
            names(&selection),
            vec!["gate_2026-01-19_b.log", "gate_20260119_a.log"]
        );
        assert!(!selection.used_fallback);
    }

    #[test]
    fn no_match_without_fallback_selects_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "gate_2026-01-18.log", 10);
        let selection = select_files(tmp.path(), &date(), false).unwrap();
        assert!(selection.files.is_empty());
    }

    #[test]
    fn fallback_picks_latest_modified() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "old.log", 3600);
        touch(tmp.path(), "new.log", 60);
        touch(tmp.path(), "older.log", 7200);
        let selection = select_files(tmp.path(), &date(), true).unwrap();
        assert_eq!(names(&selection), vec!["new.log"]);
        assert!(selection.used_fallback);
    }

    #[test]
    fn fallback_on_empty_directory_selects_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let selection = select_files(tmp.path(), &date(), true).unwrap();
        assert_eq!(selection, FileSelection::default());
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_next_to_dated_log_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "g_2026-01-19.log", 10);
        std::os::unix::fs::symlink(tmp.path().join("gone.log"), tmp.path().join("current.log"))
            .unwrap();

        let selection = select_files(tmp.path(), &date(), false).unwrap();
        assert_eq!(names(&selection), vec!["g_2026-01-19.log"]);
    }

    #[cfg(unix)]
    #[test]
    fn fallback_skips_dangling_symlink() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "old.log", 3600);
        std::os::unix::fs::symlink(tmp.path().join("gone.log"), tmp.path().join("zz.log"))
            .unwrap();

        let selection = select_files(tmp.path(), &date(), true).unwrap();
        assert_eq!(names(&selection), vec!["old.log"]);
        assert!(selection.used_fallback);
    }

    #[test]
    fn unreadable_directory_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = select_files(&tmp.path().join("missing"), &date(), false).unwrap_err();
        assert!(matches!(err, AnalyzerError::Io { .. }));
    }
}
