//! 학습 엔진 에러 타입
//!
//! [`LearnerError`]는 학습 엔진 내부에서 발생하는 모든 에러를 표현합니다.
//! 후보 패턴 생성 단계의 에러(`PatternTooLong`, `NoCandidate`, `Regex`)는
//! 생성기 내부에서 흡수되며, 호출자에게 전파되는 것은 `TooManyRules`뿐입니다.
//! `From<LearnerError> for FieldLearnError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use fieldlearn_core::error::{ConfigError, FieldLearnError, LearnError};

/// 학습 엔진 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum LearnerError {
    /// 시그니처 요소 수가 상한을 초과
    #[error("pattern too long: {len} elements (max: {max})")]
    PatternTooLong {
        /// 상한을 넘은 시점의 요소 수
        len: usize,
        /// 허용 최대 요소 수
        max: usize,
    },

    /// 전략이 이 출현 위치에 대해 후보를 만들 수 없음
    #[error("no candidate: {0}")]
    NoCandidate(&'static str),

    /// 검증 후 남은 규칙 수가 상한을 초과 (수렴 실패)
    #[error("too many candidate rules ({count} > {max}): provide more specific examples")]
    TooManyRules {
        /// 남은 규칙 수
        count: usize,
        /// 허용 최대 규칙 수
        max: usize,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<LearnerError> for FieldLearnError {
    fn from(err: LearnerError) -> Self {
        match err {
            LearnerError::TooManyRules { count, max } => {
                FieldLearnError::Learn(LearnError::TooManyRules { count, max })
            }
            LearnerError::Config { field, reason } => {
                FieldLearnError::Config(ConfigError::InvalidValue { field, reason })
            }
            other => FieldLearnError::Learn(LearnError::Engine(other.to_string())),
        }
    }
}
