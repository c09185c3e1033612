//! 학습 엔진 설정
//!
//! [`LearnerConfig`]는 core의 [`LearnConfig`](fieldlearn_core::config::LearnConfig)를
//! 기반으로 학습 엔진 전용 설정을 제공합니다.
//!
//! # 사용 예시
//! ```ignore
//! use fieldlearn_core::config::FieldLearnConfig;
//! use fieldlearn_learner::config::LearnerConfig;
//!
//! let core_config = FieldLearnConfig::default();
//! let config = LearnerConfig::from_core(&core_config.learner);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::LearnerError;

/// 학습 엔진 설정
///
/// core의 `LearnConfig`에서 파생되며, 엔진 내부에서만 사용하는
/// 추가 설정을 포함합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerConfig {
    /// 학습 루프 최대 반복 횟수
    pub max_iterations: usize,
    /// 코퍼스 전체 검증 전에 남길 최대 후보 규칙 수
    pub max_candidate_rules: usize,
    /// 검증 후 허용되는 최대 규칙 수
    pub max_rules: usize,
    /// 최상위 규칙 하나만 반환할지 여부
    pub just_top_rule: bool,
    /// 시그니처 최대 요소 수
    pub max_signature_elements: usize,
    /// 값 시그니처 단축을 시도하는 복잡도 임계값
    pub max_value_complexity: usize,
    /// 앵커 문자가 경계에서 떨어질 수 있는 최대 거리
    pub max_anchor_distance: usize,
    /// 앵커 후보 문자의 최대 등장 횟수
    pub max_anchor_repeat: usize,

    // --- 확장 설정 (core에 없는 추가 필드) ---
    /// 반환할 앵커 후보 위치 최대 개수
    pub max_anchor_candidates: usize,
    /// 값 단축 시 시도할 접미 컷오프 최대 길이 (문자 수)
    pub max_cutoff_len: usize,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self::from_core(&fieldlearn_core::config::LearnConfig::default())
    }
}

impl LearnerConfig {
    /// core의 `LearnConfig`에서 엔진 설정을 생성합니다.
    ///
    /// core 설정에 없는 확장 필드는 기본값이 적용됩니다.
    pub fn from_core(core: &fieldlearn_core::config::LearnConfig) -> Self {
        Self {
            max_iterations: core.max_iterations,
            max_candidate_rules: core.max_candidate_rules,
            max_rules: core.max_rules,
            just_top_rule: core.just_top_rule,
            max_signature_elements: core.max_signature_elements,
            max_value_complexity: core.max_value_complexity,
            max_anchor_distance: core.max_anchor_distance,
            max_anchor_repeat: core.max_anchor_repeat,
            max_anchor_candidates: 5,
            max_cutoff_len: 10,
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LearnerError> {
        const MAX_ITERATIONS: usize = 100;
        const MAX_CANDIDATE_RULES: usize = 100_000;

        if self.max_iterations == 0 || self.max_iterations > MAX_ITERATIONS {
            return Err(LearnerError::Config {
                field: "max_iterations".to_owned(),
                reason: format!("must be 1-{}", MAX_ITERATIONS),
            });
        }

        if self.max_candidate_rules == 0 || self.max_candidate_rules > MAX_CANDIDATE_RULES {
            return Err(LearnerError::Config {
                field: "max_candidate_rules".to_owned(),
                reason: format!("must be 1-{}", MAX_CANDIDATE_RULES),
            });
        }

        if self.max_rules == 0 {
            return Err(LearnerError::Config {
                field: "max_rules".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        let positive = [
            ("max_signature_elements", self.max_signature_elements),
            ("max_value_complexity", self.max_value_complexity),
            ("max_anchor_distance", self.max_anchor_distance),
            ("max_anchor_repeat", self.max_anchor_repeat),
            ("max_anchor_candidates", self.max_anchor_candidates),
            ("max_cutoff_len", self.max_cutoff_len),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(LearnerError::Config {
                    field: field.to_owned(),
                    reason: "must be greater than 0".to_owned(),
                });
            }
        }

        Ok(())
    }
}

/// 학습 엔진 설정 빌더
#[derive(Default)]
pub struct LearnerConfigBuilder {
    config: LearnerConfig,
}

impl LearnerConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 학습 루프 최대 반복 횟수를 설정합니다.
    pub fn max_iterations(mut self, n: usize) -> Self {
        self.config.max_iterations = n;
        self
    }

    /// 검증 전 최대 후보 규칙 수를 설정합니다.
    pub fn max_candidate_rules(mut self, n: usize) -> Self {
        self.config.max_candidate_rules = n;
        self
    }

    /// 수렴 실패 임계값(최대 규칙 수)을 설정합니다.
    pub fn max_rules(mut self, n: usize) -> Self {
        self.config.max_rules = n;
        self
    }

    /// 최상위 규칙만 반환할지 설정합니다.
    pub fn just_top_rule(mut self, yes: bool) -> Self {
        self.config.just_top_rule = yes;
        self
    }

    /// 시그니처 최대 요소 수를 설정합니다.
    pub fn max_signature_elements(mut self, n: usize) -> Self {
        self.config.max_signature_elements = n;
        self
    }

    /// 값 복잡도 임계값을 설정합니다.
    pub fn max_value_complexity(mut self, n: usize) -> Self {
        self.config.max_value_complexity = n;
        self
    }

    /// 설정을 검증하고 `LearnerConfig`를 생성합니다.
    pub fn build(self) -> Result<LearnerConfig, LearnerError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
