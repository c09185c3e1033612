#![no_main]

use std::collections::BTreeSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use fieldlearn_learner::{FieldLearner, LearnerConfig};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 이벤트 코퍼스 (최대 8개로 제한)
    events: Vec<String>,
    examples: Vec<String>,
    counter_examples: Vec<String>,
    just_top_rule: bool,
}

fuzz_target!(|input: FuzzInput| {
    let events: Vec<String> = input
        .events
        .into_iter()
        .take(8)
        .map(|e| e.chars().take(256).collect())
        .collect();
    let examples: BTreeSet<String> = input.examples.into_iter().take(4).collect();
    let counter: BTreeSet<String> = input.counter_examples.into_iter().take(4).collect();

    let config = LearnerConfig {
        just_top_rule: input.just_top_rule,
        max_iterations: 2,
        ..Default::default()
    };

    // 수렴 실패는 Err, 그 외에는 모든 패턴이 컴파일되고 반례를 추출하지 않아야 함
    if let Ok(result) = FieldLearner::new(config).learn(&events, &examples, &counter) {
        for pattern in &result.patterns {
            let regex = regex::Regex::new(pattern).expect("learned pattern must compile");
            for event in &events {
                if let Some(value) = regex.captures(event).and_then(|c| c.name("FIELDNAME")) {
                    assert!(
                        value.as_str().is_empty() || !counter.contains(value.as_str()),
                        "{pattern} extracted counter-example {}",
                        value.as_str()
                    );
                }
            }
        }
    }
});
