//! 에러 타입 -- 도메인별 에러 정의

/// fieldlearn 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum FieldLearnError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 규칙 학습 에러 (수렴 실패 등)
    #[error("learn error: {0}")]
    Learn(#[from] LearnError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 규칙 학습 에러
///
/// 학습 엔진이 호출자에게 노출하는 유일한 실패는 수렴 실패입니다.
/// 개별 후보 패턴의 생성 실패는 엔진 내부에서 흡수됩니다.
#[derive(Debug, thiserror::Error)]
pub enum LearnError {
    /// 살아남은 규칙 수가 상한을 초과 (예시가 충분히 구체적이지 않음)
    #[error("too many candidate rules ({count} > {max}): provide more specific examples")]
    TooManyRules { count: usize, max: usize },

    /// 학습 엔진 내부 에러
    #[error("{0}")]
    Engine(String),
}

impl FieldLearnError {
    /// 사용자에게 "예시를 더 구체적으로" 요청해야 하는 에러인지 확인합니다.
    pub fn is_convergence_failure(&self) -> bool {
        matches!(self, Self::Learn(LearnError::TooManyRules { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_many_rules_display() {
        let err = LearnError::TooManyRules { count: 73, max: 50 };
        let msg = err.to_string();
        assert!(msg.contains("73"));
        assert!(msg.contains("50"));
        assert!(msg.contains("more specific examples"));
    }

    #[test]
    fn convergence_failure_is_detected() {
        let err: FieldLearnError = LearnError::TooManyRules { count: 2, max: 1 }.into();
        assert!(err.is_convergence_failure());

        let err: FieldLearnError = ConfigError::ParseFailed {
            reason: "bad".to_owned(),
        }
        .into();
        assert!(!err.is_convergence_failure());
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidValue {
            field: "learner.max_rules".to_owned(),
            reason: "must be greater than 0".to_owned(),
        };
        assert!(err.to_string().contains("learner.max_rules"));
    }
}
