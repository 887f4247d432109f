//! 센서 간 이슈 순위

use fieldlog_core::types::IssueKind;

use crate::report::{SensorResult, TopIssue};

/// 순위 목록 크기
pub const TOP_ISSUES: usize = 5;

/// 모든 센서의 이슈 카운터를 펼쳐 상위 5개를 고릅니다.
///
/// 0건은 제외하고, 건수 내림차순 후 센서 ID 오름차순으로 정렬합니다.
/// 안정 정렬이므로 같은 센서·같은 건수는 timeout, no_response, zero_data,
/// duplicates 순서를 유지합니다.
pub fn build_top_issues(results: &[SensorResult]) -> Vec<TopIssue> {
    let mut issues: Vec<TopIssue> = results
        .iter()
        .flat_map(|result| {
            IssueKind::ALL.into_iter().filter_map(move |kind| {
                let count = result.metrics.issue_count(kind);
                (count > 0).then(|| TopIssue {
                    kind,
                    sensor_id: result.sensor_id.clone(),
                    count,
                })
            })
        })
        .collect();

    issues.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.sensor_id.cmp(&b.sensor_id)));
    issues.truncate(TOP_ISSUES);
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Examples, Metrics};
    use fieldlog_core::types::{SensorStatus, SensorType};

    fn result(id: &str, timeout: usize, zero_data: usize, duplicates: usize) -> SensorResult {
        SensorResult {
            sensor_id: id.to_owned(),
            sensor_type: SensorType::from_sensor_id(id).unwrap_or(SensorType::Gate),
            status: SensorStatus::Normal,
            metrics: Metrics {
                timeout,
                zero_data,
                duplicates,
                ..Default::default()
            },
            examples: Examples::default(),
        }
    }

    #[test]
    fn zero_counts_are_omitted() {
        let issues = build_top_issues(&[result("GATE01", 0, 0, 0)]);
        assert!(issues.is_empty());
    }

    #[test]
    fn sorted_by_count_then_sensor() {
        let issues = build_top_issues(&[
            result("WLS01", 2, 0, 0),
            result("GATE01", 2, 0, 7),
        ]);
        let order: Vec<(&str, IssueKind, usize)> = issues
            .iter()
            .map(|i| (i.sensor_id.as_str(), i.kind, i.count))
            .collect();
        assert_eq!(
            order,
            vec![
                ("GATE01", IssueKind::Duplicates, 7),
                ("GATE01", IssueKind::Timeout, 2),
                ("WLS01", IssueKind::Timeout, 2),
            ]
        );
    }

    #[test]
    fn equal_counts_on_one_sensor_keep_category_order() {
        let issues = build_top_issues(&[result("PUMP01", 3, 3, 3)]);
        let kinds: Vec<IssueKind> = issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![IssueKind::Timeout, IssueKind::ZeroData, IssueKind::Duplicates]
        );
    }

    #[test]
    fn truncated_to_five() {
        let results: Vec<SensorResult> = (1..=4)
            .map(|i| result(&format!("TEMP{i:02}"), i, i, 0))
            .collect();
        let issues = build_top_issues(&results);
        assert_eq!(issues.len(), 5);
        assert_eq!(issues[0].count, 4);
        assert!(issues.windows(2).all(|w| w[0].count >= w[1].count));
    }
}
