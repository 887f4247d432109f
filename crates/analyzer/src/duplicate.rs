//! 동일 페이로드 연속 반복 추적

/// 연속 반복 추적기
///
/// 직전 유효 페이로드와 연속 횟수만 보관합니다. 연속 횟수가 임계값에
/// 도달한 라인부터 반복이 끝날 때까지 라인마다 중복 이벤트가 하나씩
/// 발생하므로, 길이 `L`의 반복은 `L - T + 1`개의 중복을 만듭니다 (`L >= T`).
#[derive(Debug, Clone)]
pub struct DuplicateTracker {
    threshold: usize,
    last: Option<String>,
    run: usize,
}

impl DuplicateTracker {
    /// 임계값 `threshold`(1 이상)로 추적기를 생성합니다.
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold: threshold.max(1),
            last: None,
            run: 0,
        }
    }

    /// 페이로드를 관찰하고 이 라인이 중복 이벤트인지 반환합니다.
    pub fn observe(&mut self, payload: &str) -> bool {
        if self.last.as_deref() == Some(payload) {
            self.run += 1;
        } else {
            self.last = Some(payload.to_owned());
            self.run = 1;
        }
        self.run >= self.threshold
    }

    /// 페이로드가 없는 라인: 반복을 끊습니다.
    pub fn reset(&mut self) {
        self.last = None;
        self.run = 0;
    }

    /// 현재 연속 횟수
    pub fn run_len(&self) -> usize {
        self.run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn four_repeats_then_change_with_threshold_three() {
        let mut tracker = DuplicateTracker::new(3);
        let flags: Vec<bool> = ["(01)", "(01)", "(01)", "(01)", "(02)"]
            .iter()
            .map(|p| tracker.observe(p))
            .collect();
        assert_eq!(flags, vec![false, false, true, true, false]);
    }

    #[test]
    fn reset_breaks_run() {
        let mut tracker = DuplicateTracker::new(2);
        assert!(!tracker.observe("(01)"));
        tracker.reset();
        assert!(!tracker.observe("(01)"));
        assert!(tracker.observe("(01)"));
        assert_eq!(tracker.run_len(), 2);
    }

    #[test]
    fn threshold_zero_behaves_as_one() {
        let mut tracker = DuplicateTracker::new(0);
        assert!(tracker.observe("(01)"));
    }

    proptest! {
        #[test]
        fn run_of_length_l_yields_l_minus_t_plus_one(t in 1usize..20, extra in 0usize..40) {
            let l = t + extra;
            let mut tracker = DuplicateTracker::new(t);
            let count = (0..l).filter(|_| tracker.observe("(7F)")).count();
            prop_assert_eq!(count, l - t + 1);
        }

        #[test]
        fn runs_shorter_than_threshold_yield_nothing(t in 2usize..20, short in 1usize..20) {
            prop_assume!(short < t);
            let mut tracker = DuplicateTracker::new(t);
            let count = (0..short).filter(|_| tracker.observe("(7F)")).count();
            prop_assert_eq!(count, 0);
        }
    }
}
