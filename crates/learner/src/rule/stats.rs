//! 규칙별 추출 통계와 점수 계산
//!
//! [`ExtractionStats`]는 규칙이 어떤 예시 값과 새 값을 몇 번 추출했는지
//! 누적하고, 그로부터 규칙 점수를 계산합니다. 점수는 통계가 바뀔 때까지
//! 메모이즈됩니다.

use std::collections::{BTreeMap, BTreeSet};

use super::types::ValueKind;

/// 예시 커버리지 가중치
const COVERAGE_WEIGHT: f64 = 10_000.0;
/// 학습 값 수 종형 함수 가중치
const LEARNED_WEIGHT: f64 = 100.0;
/// 패턴 길이 역수 가중치
const COMPLEXITY_WEIGHT: f64 = 300.0;
/// 예시 매칭 횟수 가중치
const EXAMPLE_MATCH_WEIGHT: f64 = 100.0;
/// 값 형태 일관성 보너스
const CONSISTENCY_BONUS: f64 = 500.0;
/// 종형 함수의 정점 (가장 선호되는 학습 값 수)
const BELL_CENTER: usize = 20;

/// 학습 값 수에 대한 종형 점수
///
/// 0개면 0, 그 외에는 `max(1, 20 - |n - 20|)`.
pub fn bell(learned: usize) -> f64 {
    if learned == 0 {
        return 0.0;
    }
    let peak = BELL_CENTER as f64;
    let offset = (learned as f64 - peak).abs();
    (peak - offset).max(1.0)
}

/// 규칙의 추출 통계
#[derive(Debug, Clone, Default)]
pub struct ExtractionStats {
    /// 예시 값별 추출 횟수 (현재 예시 집합 전체가 키로 존재)
    example_counts: BTreeMap<String, usize>,
    /// 예시가 아닌 값별 추출 횟수
    learned_counts: BTreeMap<String, usize>,
    /// 생성 단계에서 이 규칙을 만들어낸 출현 위치 수
    match_count: usize,
    /// 메모이즈된 점수
    score: Option<f64>,
}

impl ExtractionStats {
    /// 현재 예시 집합으로 빈 통계를 생성합니다.
    pub fn new(examples: &BTreeSet<String>) -> Self {
        Self {
            example_counts: examples.iter().map(|e| (e.clone(), 0)).collect(),
            ..Default::default()
        }
    }

    /// 생성 단계의 출현 위치 하나를 기록합니다.
    pub fn record_match(&mut self, example: &str) {
        self.match_count += 1;
        self.record_extraction(example);
    }

    /// 추출된 값 하나를 기록합니다.
    pub fn record_extraction(&mut self, value: &str) {
        match self.example_counts.get_mut(value) {
            Some(count) => *count += 1,
            None => *self.learned_counts.entry(value.to_owned()).or_insert(0) += 1,
        }
        self.score = None;
    }

    /// 생성 단계 매칭 횟수
    pub fn match_count(&self) -> usize {
        self.match_count
    }

    /// 한 번 이상 추출된 예시 수의 비율
    pub fn coverage(&self) -> f64 {
        if self.example_counts.is_empty() {
            return 0.0;
        }
        let covered = self.example_counts.values().filter(|c| **c > 0).count();
        covered as f64 / self.example_counts.len() as f64
    }

    /// 예시 값 추출 횟수 합계
    pub fn example_matches(&self) -> usize {
        self.example_counts.values().sum()
    }

    /// 예시가 아닌 서로 다른 추출 값 수
    pub fn learned_count(&self) -> usize {
        self.learned_counts.len()
    }

    /// 학습 값의 주된 형태가 예시의 주된 형태와 같은지 여부
    ///
    /// 학습 값이 없으면 일관된 것으로 봅니다.
    pub fn is_consistent(&self) -> bool {
        if self.learned_counts.is_empty() {
            return true;
        }
        let learned = ValueKind::dominant(self.learned_counts.keys().map(String::as_str));
        let examples = ValueKind::dominant(self.example_counts.keys().map(String::as_str));
        learned == examples
    }

    /// 이 규칙이 추출한 모든 값 (예시 포함, 사전순)
    pub fn extracted_values(&self) -> impl Iterator<Item = &str> {
        let examples = self
            .example_counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(value, _)| value.as_str());
        let mut values: Vec<&str> = examples
            .chain(self.learned_counts.keys().map(String::as_str))
            .collect();
        values.sort_unstable();
        values.into_iter()
    }

    /// 점수를 계산합니다. 통계가 바뀌기 전까지 결과를 재사용합니다.
    pub fn score(&mut self, bias: f64, pattern_len: usize) -> f64 {
        if let Some(score) = self.score {
            return score;
        }

        let complexity = COMPLEXITY_WEIGHT / pattern_len.max(1) as f64;
        let base = COVERAGE_WEIGHT * self.coverage()
            + LEARNED_WEIGHT * bell(self.learned_count())
            + complexity
            + EXAMPLE_MATCH_WEIGHT * self.example_matches() as f64;
        let mut score = bias * base;
        if self.is_consistent() {
            score += CONSISTENCY_BONUS;
        }

        self.score = Some(score);
        score
    }

    /// 메모이즈된 점수를 버립니다.
    pub fn reset_score(&mut self) {
        self.score = None;
    }
}
