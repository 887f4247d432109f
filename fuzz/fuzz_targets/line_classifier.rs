#![no_main]

use fieldlog_analyzer::line::{classify, gate, is_zero_payload};
use fieldlog_analyzer::{AnalyzerConfigBuilder, SensorScan, TargetDate};
use fieldlog_core::types::SensorType;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    // 분류기는 어떤 입력에도 패닉 없이 결과를 내야 한다
    for line in text.lines() {
        let facts = classify(line);
        if let Some(payload) = facts.payload {
            let _ = is_zero_payload(payload);
        }
        let _ = gate(line, "2026-01-19");
    }

    let Ok(config) = AnalyzerConfigBuilder::new().log_root("/fuzz").build() else {
        return;
    };
    let Ok(date) = TargetDate::parse("20260119") else {
        return;
    };
    for sensor_type in SensorType::ALL {
        let mut scan = SensorScan::new("FUZZ", sensor_type, &config, &date, 64);
        scan.begin_file();
        for line in text.lines() {
            scan.feed(line);
        }
        let result = scan.finish();
        assert!(result.metrics.lines <= 64);
        if let Some(ratio) = result.metrics.unique_ratio_pct {
            assert!((0.0..=100.0).contains(&ratio));
        }
    }
});
