//! 도메인 타입 -- 학습 엔진과 호출자가 공유하는 공통 타입
//!
//! 학습 결과([`ExtractionResult`])는 CLI 출력, 외부 도구 연동 등
//! 엔진 바깥에서 소비되므로 core에 정의합니다.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// 정규식 패턴에서 추출 필드를 담는 이름 있는 캡처 그룹 이름
pub const FIELD_GROUP_NAME: &str = "FIELDNAME";

/// 규칙 학습 결과
///
/// 채택된 규칙 패턴 목록(점수 내림차순)과, 각 값(예시 또는 새로 학습된 값)을
/// 추출하는 규칙 인덱스 집합을 담습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// 채택된 규칙 패턴 (각각 `FIELDNAME` 그룹을 정확히 하나 포함)
    pub patterns: Vec<String>,
    /// 값 -> 해당 값을 추출하는 패턴 인덱스 집합
    pub extractions: BTreeMap<String, BTreeSet<usize>>,
}

impl ExtractionResult {
    /// 채택된 규칙이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// 가장 점수가 높은 규칙 패턴을 반환합니다.
    pub fn top_pattern(&self) -> Option<&str> {
        self.patterns.first().map(String::as_str)
    }

    /// 주어진 값을 추출하는 패턴 인덱스 집합을 반환합니다.
    pub fn rules_for(&self, value: &str) -> Option<&BTreeSet<usize>> {
        self.extractions.get(value)
    }

    /// 추출된 모든 값을 정렬 순서로 순회합니다.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.extractions.keys().map(String::as_str)
    }
}

impl fmt::Display for ExtractionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rule(s), {} value(s)",
            self.patterns.len(),
            self.extractions.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> ExtractionResult {
        let mut extractions = BTreeMap::new();
        extractions.insert("200".to_owned(), BTreeSet::from([0]));
        extractions.insert("404".to_owned(), BTreeSet::from([0, 1]));
        ExtractionResult {
            patterns: vec![
                r"status=(?P<FIELDNAME>\d+)\s".to_owned(),
                r"=(?P<FIELDNAME>\d+)\s".to_owned(),
            ],
            extractions,
        }
    }

    #[test]
    fn default_result_is_empty() {
        let result = ExtractionResult::default();
        assert!(result.is_empty());
        assert_eq!(result.top_pattern(), None);
        assert_eq!(result.values().count(), 0);
    }

    #[test]
    fn top_pattern_is_first() {
        let result = sample_result();
        assert_eq!(result.top_pattern(), Some(r"status=(?P<FIELDNAME>\d+)\s"));
    }

    #[test]
    fn rules_for_value() {
        let result = sample_result();
        assert_eq!(result.rules_for("404"), Some(&BTreeSet::from([0, 1])));
        assert_eq!(result.rules_for("500"), None);
    }

    #[test]
    fn display_summarizes_counts() {
        assert_eq!(sample_result().to_string(), "2 rule(s), 2 value(s)");
    }

    #[test]
    fn result_json_roundtrip() {
        let result = sample_result();
        let json = serde_json::to_string(&result).unwrap();
        let parsed: ExtractionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }
}
