//! 추출 규칙 -- 컴파일된 패턴과 추출 통계
//!
//! 하나의 [`Rule`]은 `FIELDNAME` 캡처 그룹을 가진 정규식 하나에 대응합니다.
//! 같은 패턴 문자열을 만든 출현 위치들은 하나의 규칙으로 합쳐지고,
//! 규칙 집합([`RuleSet`])은 패턴 문자열을 키로 삽입 순서를 유지합니다.
//!
//! # 아키텍처
//! - [`Rule`]: 패턴, 계열, 원본 예시, 통계
//! - [`stats`]: 추출 통계 누적 및 점수 계산
//! - [`types`]: 규칙 계열과 값 형태 분류

pub mod stats;
pub mod types;

pub use stats::ExtractionStats;
pub use types::{RuleFamily, ValueKind};

use std::collections::BTreeSet;

use indexmap::IndexMap;
use regex::Regex;

use fieldlearn_core::types::FIELD_GROUP_NAME;

use crate::pattern::Candidate;

/// 패턴 문자열 → 규칙 (삽입 순서 유지)
pub type RuleSet = IndexMap<String, Rule>;

/// 필드 추출 규칙
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: String,
    family: RuleFamily,
    regex: Regex,
    /// 이 규칙을 처음 만든 예시 값
    origin: String,
    stats: ExtractionStats,
}

impl Rule {
    /// 후보 패턴으로 규칙을 생성합니다.
    pub fn new(candidate: Candidate, origin: &str, examples: &BTreeSet<String>) -> Self {
        let Candidate {
            pattern,
            family,
            regex,
        } = candidate;
        Self {
            pattern,
            family,
            regex,
            origin: origin.to_owned(),
            stats: ExtractionStats::new(examples),
        }
    }

    /// 정규식 패턴 문자열
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// 규칙 계열
    pub fn family(&self) -> RuleFamily {
        self.family
    }

    /// 규칙을 처음 만든 예시 값
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// 추출 통계
    pub fn stats(&self) -> &ExtractionStats {
        &self.stats
    }

    /// 생성 단계의 출현 위치 하나를 기록합니다.
    pub fn record_match(&mut self, example: &str) {
        self.stats.record_match(example);
    }

    /// 검증 단계에서 추출된 값을 기록합니다.
    pub fn record_extraction(&mut self, value: &str) {
        self.stats.record_extraction(value);
    }

    /// 규칙 점수 (메모이즈)
    pub fn score(&mut self) -> f64 {
        self.stats
            .score(self.family.score_bias(), self.pattern.chars().count())
    }

    /// 메모이즈된 점수를 버립니다.
    pub fn reset_score(&mut self) {
        self.stats.reset_score();
    }

    /// 이벤트에서 가장 왼쪽 매칭의 `FIELDNAME` 캡처를 반환합니다.
    ///
    /// 빈 캡처는 추출하지 않은 것으로 취급합니다.
    pub fn find_extraction_in<'e>(&self, event: &'e str) -> Option<&'e str> {
        self.regex
            .captures(event)?
            .name(FIELD_GROUP_NAME)
            .map(|m| m.as_str())
            .filter(|value| !value.is_empty())
    }
}

/// 점수 내림차순(동점이면 패턴 오름차순)으로 규칙을 정렬합니다.
pub fn rank(rules: impl IntoIterator<Item = Rule>) -> Vec<Rule> {
    let mut scored: Vec<(f64, Rule)> = rules
        .into_iter()
        .map(|mut rule| (rule.score(), rule))
        .collect();
    scored.sort_by(|(sa, ra), (sb, rb)| sb.total_cmp(sa).then_with(|| ra.pattern.cmp(&rb.pattern)));
    scored.into_iter().map(|(_, rule)| rule).collect()
}
