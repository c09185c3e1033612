//! 규칙 생성 -- 모든 이벤트 × 예시 × 출현 위치에서 후보 규칙을 모읍니다

use std::collections::BTreeSet;

use metrics::counter;
use tracing::debug;

use fieldlearn_core::metrics as m;

use crate::context::LearnContext;
use crate::pattern::candidates_for_occurrence;
use crate::rule::{Rule, RuleSet};

/// `event` 안에서 `needle`이 등장하는 모든 바이트 위치 (겹침 허용)
pub fn occurrences(event: &str, needle: &str) -> Vec<usize> {
    let mut positions = Vec::new();
    if needle.is_empty() {
        return positions;
    }

    let mut from = 0;
    while let Some(offset) = event[from..].find(needle) {
        let pos = from + offset;
        positions.push(pos);
        from = pos + event[pos..].chars().next().map_or(1, char::len_utf8);
    }
    positions
}

/// 코퍼스에서 후보 규칙 집합을 생성합니다.
///
/// 같은 패턴 문자열은 하나의 규칙으로 합쳐지며, 출현 위치마다
/// 매칭 횟수와 원본 예시가 기록됩니다. 빈 예시는 무시합니다.
pub fn generate_rules<E: AsRef<str>>(
    ctx: &mut LearnContext,
    events: &[E],
    examples: &BTreeSet<String>,
) -> RuleSet {
    let mut rules = RuleSet::new();

    for event in events {
        let event = event.as_ref();
        for example in examples.iter().filter(|e| !e.is_empty()) {
            for start in occurrences(event, example) {
                for candidate in candidates_for_occurrence(ctx, event, example, start) {
                    counter!(
                        m::LEARNER_CANDIDATES_GENERATED_TOTAL,
                        m::LABEL_FAMILY => candidate.family.as_str()
                    )
                    .increment(1);
                    let key = candidate.pattern.clone();
                    rules
                        .entry(key)
                        .or_insert_with(|| Rule::new(candidate, example, examples))
                        .record_match(example);
                }
            }
        }
    }

    debug!(
        events = events.len(),
        examples = examples.len(),
        rules = rules.len(),
        cached_signatures = ctx.cached_signatures(),
        "candidate rules generated"
    );
    rules
}
