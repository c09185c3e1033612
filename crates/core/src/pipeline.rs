//! 학습 엔진 trait -- 모듈 확장 포인트 정의

use std::collections::BTreeSet;

use crate::error::FieldLearnError;
use crate::types::ExtractionResult;

/// 예시 값으로부터 추출 규칙을 학습하는 trait
///
/// 구현체는 호출 간 가변 상태를 공유하지 않아야 하며,
/// 여러 스레드에서 독립적으로 `learn`을 호출할 수 있어야 합니다.
pub trait RuleLearner: Send + Sync {
    /// 학습기 이름
    fn name(&self) -> &str;

    /// 이벤트 코퍼스와 예시/반례로부터 추출 규칙을 학습
    fn learn(
        &self,
        events: &[String],
        examples: &BTreeSet<String>,
        counter_examples: &BTreeSet<String>,
    ) -> Result<ExtractionResult, FieldLearnError>;
}
