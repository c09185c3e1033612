//! 규칙 검증 및 가지치기
//!
//! 후보 규칙을 코퍼스 전체에 대해 실행하여 반례를 추출하는 규칙과
//! 아무것도 추출하지 못하는 규칙을 제거하고, 살아남은 규칙이 새로
//! 발견한 값을 반환합니다.

use std::collections::BTreeSet;

use metrics::counter;
use tracing::debug;

use fieldlearn_core::metrics as m;
use fieldlearn_core::types::FIELD_GROUP_NAME;

use crate::context::LearnContext;
use crate::rule::{RuleSet, rank};

/// 캡처 그룹 본문이 그룹 바로 앞의 텍스트와 같은 `X(X)` 형태인지 검사합니다.
///
/// 이런 패턴은 값의 시작 위치가 모호하므로 제거 대상입니다.
pub fn is_ambiguous(pattern: &str) -> bool {
    let open = format!("(?P<{FIELD_GROUP_NAME}>");
    let Some(group_start) = pattern.find(&open) else {
        return false;
    };
    let body_start = group_start + open.len();
    let Some(body_end) = group_end(pattern, body_start) else {
        return false;
    };

    let body = &pattern[body_start..body_end];
    !body.is_empty() && pattern[..group_start].ends_with(body)
}

/// `from`부터 시작하는 그룹 본문의 닫는 괄호 위치
fn group_end(pattern: &str, from: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut escaped = false;
    let mut in_class = false;

    for (idx, c) in pattern[from..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '(' if !in_class => depth += 1,
            ')' if !in_class => {
                depth -= 1;
                if depth == 0 {
                    return Some(from + idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// 규칙 집합을 검증하고 새로 추출된 값을 반환합니다.
///
/// 새 값은 기록되는 즉시 수집되므로, 이후 반례로 탈락한 규칙이
/// 그 전에 추출한 값도 포함됩니다.
///
/// 1. 모호한 `X(X)` 형태의 규칙 제거
/// 2. 점수순 정렬 후 `max_candidate_rules`개로 절단, 점수 초기화
/// 3. 규칙마다 모든 이벤트에서 추출: 반례를 추출하면 즉시 탈락
/// 4. 이번 검증에서 아무것도 추출하지 못한 규칙 탈락
///
/// `rules`에는 살아남은 규칙만 점수순으로 남습니다.
pub fn validate<E: AsRef<str>>(
    ctx: &LearnContext,
    events: &[E],
    examples: &BTreeSet<String>,
    counter_examples: &BTreeSet<String>,
    rules: &mut RuleSet,
) -> BTreeSet<String> {
    let before = rules.len();
    rules.retain(|pattern, _| {
        if is_ambiguous(pattern) {
            debug!(pattern = %pattern, "rule rejected: ambiguous capture");
            counter!(m::LEARNER_AMBIGUOUS_REJECTED_TOTAL).increment(1);
            false
        } else {
            true
        }
    });

    let mut ranked = rank(rules.drain(..).map(|(_, rule)| rule));
    ranked.truncate(ctx.config().max_candidate_rules);
    for rule in &mut ranked {
        rule.reset_score();
    }

    let mut learned = BTreeSet::new();
    'rules: for mut rule in ranked {
        let mut accepted = 0usize;

        for event in events {
            let Some(value) = rule.find_extraction_in(event.as_ref()) else {
                continue;
            };
            if counter_examples.contains(value) {
                debug!(
                    pattern = rule.pattern(),
                    counter_example = value,
                    "rule disqualified: extracted counter-example"
                );
                counter!(m::LEARNER_COUNTER_EXAMPLE_DISQUALIFIED_TOTAL).increment(1);
                continue 'rules;
            }
            rule.record_extraction(value);
            accepted += 1;
            if !examples.contains(value) {
                learned.insert(value.to_owned());
            }
        }

        if accepted == 0 {
            debug!(pattern = rule.pattern(), "rule disqualified: no extraction");
            counter!(m::LEARNER_DEAD_RULES_TOTAL).increment(1);
            continue;
        }

        rules.insert(rule.pattern().to_owned(), rule);
    }

    debug!(
        candidates = before,
        survivors = rules.len(),
        learned = learned.len(),
        "rules validated"
    );
    learned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LearnerConfig;
    use crate::pattern::Candidate;
    use crate::rule::{Rule, RuleFamily};

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    fn rule_set(patterns: &[&str], examples: &BTreeSet<String>) -> RuleSet {
        patterns
            .iter()
            .map(|p| {
                let candidate = Candidate::compile((*p).to_owned(), RuleFamily::Forward).unwrap();
                ((*p).to_owned(), Rule::new(candidate, "x", examples))
            })
            .collect()
    }

    #[test]
    fn ambiguous_shapes() {
        assert!(is_ambiguous(r"\d+(?P<FIELDNAME>\d+)"));
        assert!(is_ambiguous(r"^a=\w+(?P<FIELDNAME>\w+)$"));
        assert!(!is_ambiguous(r"=(?P<FIELDNAME>\d+)\s"));
        assert!(!is_ambiguous(r"(?P<FIELDNAME>\d+)"));
        assert!(!is_ambiguous(r"no group here"));
    }

    #[test]
    fn group_end_skips_classes_and_escapes() {
        let pattern = r"x(?P<FIELDNAME>[^)\n]+\))y";
        let open = "x(?P<FIELDNAME>".len();
        let end = group_end(pattern, open).unwrap();
        assert_eq!(&pattern[open..end], r"[^)\n]+\)");
    }

    #[test]
    fn counter_example_disqualifies_rule() {
        let examples = set(&["alice"]);
        let mut rules = rule_set(&[r"user=(?P<FIELDNAME>\w+)", r"name=(?P<FIELDNAME>\w+)"], &examples);
        let events = ["user=alice", "user=bob", "name=alice"];
        let ctx = LearnContext::new(LearnerConfig::default());

        let learned = validate(&ctx, &events, &examples, &set(&["bob"]), &mut rules);
        assert!(learned.is_empty());
        let survivors: Vec<&String> = rules.keys().collect();
        assert_eq!(survivors, vec![r"name=(?P<FIELDNAME>\w+)"]);
    }

    #[test]
    fn dead_rules_are_removed() {
        let examples = set(&["1"]);
        let mut rules = rule_set(&[r"a=(?P<FIELDNAME>\d+)", r"zzz=(?P<FIELDNAME>\d+)"], &examples);
        let ctx = LearnContext::new(LearnerConfig::default());

        validate(&ctx, &["a=1"], &examples, &BTreeSet::new(), &mut rules);
        assert_eq!(rules.len(), 1);
        assert!(rules.contains_key(r"a=(?P<FIELDNAME>\d+)"));
    }

    #[test]
    fn learned_values_are_collected_as_recorded() {
        let examples = set(&["200"]);
        let mut rules = rule_set(&[r"status=(?P<FIELDNAME>\d+)", r"=(?P<FIELDNAME>\w+)"], &examples);
        let events = ["status=200", "status=500", "user=bob"];
        let ctx = LearnContext::new(LearnerConfig::default());

        let learned = validate(&ctx, &events, &examples, &set(&["bob"]), &mut rules);
        assert_eq!(learned, set(&["500"]));
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn disqualified_rule_still_contributes_learned_values() {
        let examples = set(&["200"]);
        let mut rules = rule_set(&[r"=(?P<FIELDNAME>\w+)"], &examples);
        let events = ["a=200", "a=500", "b=bob"];
        let ctx = LearnContext::new(LearnerConfig::default());

        let learned = validate(&ctx, &events, &examples, &set(&["bob"]), &mut rules);
        assert_eq!(learned, set(&["500"]));
        assert!(rules.is_empty(), "the rule extracted a counter-example");
    }

    #[test]
    fn ambiguous_rules_are_rejected() {
        let examples = set(&["12"]);
        let mut rules = rule_set(&[r"\d(?P<FIELDNAME>\d)", r"n=(?P<FIELDNAME>\d+)"], &examples);
        let ctx = LearnContext::new(LearnerConfig::default());

        validate(&ctx, &["n=12"], &examples, &BTreeSet::new(), &mut rules);
        assert!(!rules.contains_key(r"\d(?P<FIELDNAME>\d)"));
        assert!(rules.contains_key(r"n=(?P<FIELDNAME>\d+)"));
    }

    #[test]
    fn candidate_cap_keeps_best_rules() {
        let examples = set(&["1"]);
        let mut rules = rule_set(
            &[r"a=(?P<FIELDNAME>\d+)", r"b=(?P<FIELDNAME>\d+)", r"c=(?P<FIELDNAME>\d+)"],
            &examples,
        );
        let config = LearnerConfig {
            max_candidate_rules: 2,
            ..Default::default()
        };
        let ctx = LearnContext::new(config);

        validate(&ctx, &["a=1 b=1 c=1"], &examples, &BTreeSet::new(), &mut rules);
        // 동점이면 패턴 사전순으로 앞선 두 규칙
        let survivors: Vec<&String> = rules.keys().collect();
        assert_eq!(
            survivors,
            vec![r"a=(?P<FIELDNAME>\d+)", r"b=(?P<FIELDNAME>\d+)"]
        );
    }
}
