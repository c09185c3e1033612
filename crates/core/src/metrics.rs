//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 학습 엔진은 이 상수를 사용하여 `metrics::counter!()`, `metrics::histogram!()`
//! 매크로를 호출합니다. 레코더가 설치되지 않은 프로세스에서는 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `fieldlearn_`
//! - 모듈명: `learner_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(fieldlearn_core::metrics::LEARNER_VALUES_LEARNED_TOTAL).increment(3);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 규칙 계열 레이블 키 (forward, backward, forward-literal, forward-delimiter)
pub const LABEL_FAMILY: &str = "family";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── Learner 메트릭 ─────────────────────────────────────────────────

/// Learner: 생성된 후보 규칙 수 (counter, label: family)
pub const LEARNER_CANDIDATES_GENERATED_TOTAL: &str =
    "fieldlearn_learner_candidates_generated_total";

/// Learner: 구조적 모호성으로 제거된 규칙 수 (counter)
pub const LEARNER_AMBIGUOUS_REJECTED_TOTAL: &str = "fieldlearn_learner_ambiguous_rejected_total";

/// Learner: 반례 추출로 탈락한 규칙 수 (counter)
pub const LEARNER_COUNTER_EXAMPLE_DISQUALIFIED_TOTAL: &str =
    "fieldlearn_learner_counter_example_disqualified_total";

/// Learner: 아무것도 추출하지 못해 제거된 규칙 수 (counter)
pub const LEARNER_DEAD_RULES_TOTAL: &str = "fieldlearn_learner_dead_rules_total";

/// Learner: 새로 학습된 값 수 (counter)
pub const LEARNER_VALUES_LEARNED_TOTAL: &str = "fieldlearn_learner_values_learned_total";

/// Learner: 학습 호출 수 (counter, label: result)
pub const LEARNER_RUNS_TOTAL: &str = "fieldlearn_learner_runs_total";

/// Learner: 학습 호출 소요 시간 (histogram, 초)
pub const LEARNER_LEARN_DURATION_SECONDS: &str = "fieldlearn_learner_learn_duration_seconds";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 레코더가 없으면 no-op입니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        LEARNER_CANDIDATES_GENERATED_TOTAL,
        "Candidate extraction rules generated per rule family"
    );
    describe_counter!(
        LEARNER_AMBIGUOUS_REJECTED_TOTAL,
        "Rules rejected for an ambiguous repeated-class capture"
    );
    describe_counter!(
        LEARNER_COUNTER_EXAMPLE_DISQUALIFIED_TOTAL,
        "Rules disqualified because they extracted a counter-example"
    );
    describe_counter!(
        LEARNER_DEAD_RULES_TOTAL,
        "Rules removed because they extracted nothing from the corpus"
    );
    describe_counter!(
        LEARNER_VALUES_LEARNED_TOTAL,
        "Values discovered that were not supplied as examples"
    );
    describe_counter!(LEARNER_RUNS_TOTAL, "Learn invocations by result");
    describe_histogram!(
        LEARNER_LEARN_DURATION_SECONDS,
        "Wall-clock duration of one learn invocation in seconds"
    );
}
