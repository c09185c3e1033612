//! 학습 루프 -- 생성, 검증, 값 확장을 반복하여 최종 규칙을 선택합니다
//!
//! [`FieldLearner`]는 불변 설정만 보유하며, 호출마다 새 [`LearnContext`]를
//! 만들어 사용합니다. 따라서 여러 스레드에서 독립적으로 호출할 수 있습니다.
//!
//! # 사용 예시
//! ```ignore
//! use std::collections::BTreeSet;
//! use fieldlearn_learner::FieldLearner;
//!
//! let events = vec!["2020-01-01 status=200 user=alice".to_owned()];
//! let examples = BTreeSet::from(["200".to_owned()]);
//! let result = FieldLearner::with_defaults().learn(&events, &examples, &BTreeSet::new())?;
//! assert_eq!(result.top_pattern(), Some(r"status=(?P<FIELDNAME>\d+)\s"));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{debug, info, warn};

use fieldlearn_core::error::FieldLearnError;
use fieldlearn_core::metrics as m;
use fieldlearn_core::pipeline::RuleLearner;
use fieldlearn_core::types::ExtractionResult;

use crate::config::LearnerConfig;
use crate::context::LearnContext;
use crate::error::LearnerError;
use crate::generate::generate_rules;
use crate::rule::{Rule, RuleSet, rank};
use crate::validate::validate;

/// 예시 기반 필드 추출 규칙 학습기
#[derive(Debug, Clone, Default)]
pub struct FieldLearner {
    config: LearnerConfig,
}

impl FieldLearner {
    /// 설정으로 학습기를 생성합니다.
    pub fn new(config: LearnerConfig) -> Self {
        Self { config }
    }

    /// 기본 설정으로 학습기를 생성합니다.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// 학습기 설정
    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    /// 이벤트 코퍼스에서 예시 값을 추출하는 규칙을 학습합니다.
    ///
    /// 빈 코퍼스나 빈 예시 집합은 빈 결과를 반환합니다.
    /// 검증 후 남은 규칙이 `max_rules`를 넘으면 `TooManyRules`를 반환합니다.
    pub fn learn<E: AsRef<str>>(
        &self,
        events: &[E],
        examples: &BTreeSet<String>,
        counter_examples: &BTreeSet<String>,
    ) -> Result<ExtractionResult, LearnerError> {
        let started = Instant::now();
        let result = self.run(events, examples, counter_examples);
        let elapsed = started.elapsed();
        histogram!(m::LEARNER_LEARN_DURATION_SECONDS).record(elapsed.as_secs_f64());

        match &result {
            Ok(extraction) => {
                counter!(m::LEARNER_RUNS_TOTAL, m::LABEL_RESULT => "success").increment(1);
                info!(
                    events = events.len(),
                    examples = examples.len(),
                    counter_examples = counter_examples.len(),
                    rules = extraction.patterns.len(),
                    values = extraction.extractions.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "field rules learned"
                );
            }
            Err(e) => {
                counter!(m::LEARNER_RUNS_TOTAL, m::LABEL_RESULT => "failure").increment(1);
                warn!(error = %e, "field rule learning failed");
            }
        }
        result
    }

    fn run<E: AsRef<str>>(
        &self,
        events: &[E],
        examples: &BTreeSet<String>,
        counter_examples: &BTreeSet<String>,
    ) -> Result<ExtractionResult, LearnerError> {
        let mut ctx = LearnContext::new(self.config.clone());
        let mut working: BTreeSet<String> =
            examples.iter().filter(|e| !e.is_empty()).cloned().collect();
        let mut rules = RuleSet::new();

        for iteration in 1..=self.config.max_iterations {
            rules = generate_rules(&mut ctx, events, &working);
            let learned = validate(&ctx, events, &working, counter_examples, &mut rules);
            debug!(
                iteration,
                rules = rules.len(),
                learned = learned.len(),
                "learning iteration finished"
            );

            if learned.is_empty() {
                break;
            }
            counter!(m::LEARNER_VALUES_LEARNED_TOTAL).increment(learned.len() as u64);
            working.extend(learned);
        }

        let mut ranked = rank(rules.into_values());
        if ranked.len() > self.config.max_rules {
            return Err(LearnerError::TooManyRules {
                count: ranked.len(),
                max: self.config.max_rules,
            });
        }
        if let Some(top) = ranked.first() {
            debug!(
                pattern = top.pattern(),
                family = %top.family(),
                origin = top.origin(),
                "top rule selected"
            );
        }
        if self.config.just_top_rule {
            ranked.truncate(1);
        }

        Ok(build_result(&ranked))
    }
}

/// 규칙 목록과 규칙별 통계로 결과 인덱스를 만듭니다.
fn build_result(rules: &[Rule]) -> ExtractionResult {
    let mut extractions: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
    for (idx, rule) in rules.iter().enumerate() {
        for value in rule.stats().extracted_values() {
            extractions.entry(value.to_owned()).or_default().insert(idx);
        }
    }
    ExtractionResult {
        patterns: rules.iter().map(|r| r.pattern().to_owned()).collect(),
        extractions,
    }
}

impl RuleLearner for FieldLearner {
    fn name(&self) -> &str {
        "fieldlearn-regex"
    }

    fn learn(
        &self,
        events: &[String],
        examples: &BTreeSet<String>,
        counter_examples: &BTreeSet<String>,
    ) -> Result<ExtractionResult, FieldLearnError> {
        FieldLearner::learn(self, events, examples, counter_examples).map_err(Into::into)
    }
}

/// 기본 설정에 `just_top_rule`만 지정하여 규칙을 학습합니다.
pub fn learn<E: AsRef<str>>(
    events: &[E],
    examples: &BTreeSet<String>,
    counter_examples: &BTreeSet<String>,
    just_top_rule: bool,
) -> Result<ExtractionResult, LearnerError> {
    let config = LearnerConfig {
        just_top_rule,
        ..Default::default()
    };
    FieldLearner::new(config).learn(events, examples, counter_examples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    const EVENTS: [&str; 2] = [
        "2020-01-01 status=200 user=alice",
        "2020-01-02 status=404 user=bob",
    ];

    #[test]
    fn learns_status_rule() {
        let result = learn(&EVENTS, &set(&["200", "404"]), &BTreeSet::new(), true).unwrap();
        assert_eq!(result.patterns, vec![r"status=(?P<FIELDNAME>\d+)\s"]);
        assert_eq!(result.rules_for("200"), Some(&BTreeSet::from([0])));
        assert_eq!(result.rules_for("404"), Some(&BTreeSet::from([0])));
    }

    #[test]
    fn all_rules_mode_returns_ranked_rules() {
        let result = learn(&EVENTS, &set(&["200", "404"]), &BTreeSet::new(), false).unwrap();
        assert_eq!(result.patterns.len(), 5);
        assert_eq!(result.top_pattern(), Some(r"status=(?P<FIELDNAME>\d+)\s"));
        for indices in result.extractions.values() {
            assert!(indices.iter().all(|i| *i < result.patterns.len()));
        }
    }

    #[test]
    fn counter_example_removes_every_rule() {
        let result = learn(&EVENTS, &set(&["alice"]), &set(&["bob"]), true).unwrap();
        assert!(result.is_empty());
        assert!(result.extractions.is_empty());
    }

    #[test]
    fn empty_corpus_is_empty_result() {
        let events: Vec<String> = Vec::new();
        let result = learn(&events, &set(&["200"]), &BTreeSet::new(), true).unwrap();
        assert_eq!(result, ExtractionResult::default());
    }

    #[test]
    fn empty_examples_is_empty_result() {
        let result = learn(&EVENTS, &BTreeSet::new(), &BTreeSet::new(), true).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn too_many_rules_fails_in_both_modes() {
        let events: Vec<String> = (0..60).map(|i| format!("field{i}=a")).collect();
        for just_top_rule in [true, false] {
            let err = learn(&events, &set(&["a"]), &BTreeSet::new(), just_top_rule).unwrap_err();
            assert!(
                matches!(err, LearnerError::TooManyRules { max: 50, .. }),
                "unexpected: {err}"
            );
        }
    }

    #[test]
    fn learns_new_values_over_iterations() {
        let events = [
            "2020-01-01 status=200 user=alice",
            "2020-01-02 status=404 user=bob",
            "2020-01-03 status=500 user=carol",
        ];
        let config = LearnerConfig {
            max_iterations: 2,
            ..Default::default()
        };
        let result = FieldLearner::new(config)
            .learn(&events, &set(&["200", "404"]), &BTreeSet::new())
            .unwrap();
        assert_eq!(result.top_pattern(), Some(r"status=(?P<FIELDNAME>\d+)\s"));
        assert!(result.rules_for("500").is_some());
    }

    #[test]
    fn index_only_lists_values_a_rule_extracts() {
        let events = ["100"];
        let result = learn(&events, &set(&["1"]), &BTreeSet::new(), false).unwrap();
        for (value, indices) in &result.extractions {
            for idx in indices {
                let regex = regex::Regex::new(&result.patterns[*idx]).unwrap();
                let extracted = regex
                    .captures(events[0])
                    .and_then(|c| c.name(fieldlearn_core::types::FIELD_GROUP_NAME))
                    .map(|m| m.as_str());
                assert_eq!(extracted, Some(value.as_str()), "{}", result.patterns[*idx]);
            }
        }
    }

    #[test]
    fn trait_object_learns() {
        let learner: Box<dyn RuleLearner> = Box::new(FieldLearner::with_defaults());
        let events: Vec<String> = EVENTS.iter().map(|e| (*e).to_owned()).collect();
        let result = learner
            .learn(&events, &set(&["200", "404"]), &BTreeSet::new())
            .unwrap();
        assert_eq!(learner.name(), "fieldlearn-regex");
        assert_eq!(result.patterns.len(), 1);
    }

    #[test]
    fn trait_maps_convergence_failure() {
        let learner = FieldLearner::with_defaults();
        let events: Vec<String> = (0..60).map(|i| format!("field{i}=a")).collect();
        let err = RuleLearner::learn(&learner, &events, &set(&["a"]), &BTreeSet::new()).unwrap_err();
        assert!(err.is_convergence_failure());
    }
}
