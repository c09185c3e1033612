//! 설정 관리 -- fieldlearn.toml 파싱 및 런타임 설정
//!
//! [`FieldLearnConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`FIELDLEARN_LEARNER_MAX_RULES=20` 형식)
//! 3. 설정 파일 (`fieldlearn.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), fieldlearn_core::error::FieldLearnError> {
//! use fieldlearn_core::config::FieldLearnConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = FieldLearnConfig::load("fieldlearn.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = FieldLearnConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, FieldLearnError};

/// fieldlearn 통합 설정
///
/// `fieldlearn.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldLearnConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 규칙 학습 엔진 설정
    #[serde(default)]
    pub learner: LearnConfig,
}

impl FieldLearnConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, FieldLearnError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, FieldLearnError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FieldLearnError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                FieldLearnError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, FieldLearnError> {
        toml::from_str(toml_str).map_err(|e| {
            FieldLearnError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `FIELDLEARN_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "FIELDLEARN_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "FIELDLEARN_GENERAL_LOG_FORMAT");

        // Learner
        override_usize(
            &mut self.learner.max_iterations,
            "FIELDLEARN_LEARNER_MAX_ITERATIONS",
        );
        override_usize(
            &mut self.learner.max_candidate_rules,
            "FIELDLEARN_LEARNER_MAX_CANDIDATE_RULES",
        );
        override_usize(&mut self.learner.max_rules, "FIELDLEARN_LEARNER_MAX_RULES");
        override_bool(
            &mut self.learner.just_top_rule,
            "FIELDLEARN_LEARNER_JUST_TOP_RULE",
        );
        override_usize(
            &mut self.learner.max_signature_elements,
            "FIELDLEARN_LEARNER_MAX_SIGNATURE_ELEMENTS",
        );
        override_usize(
            &mut self.learner.max_value_complexity,
            "FIELDLEARN_LEARNER_MAX_VALUE_COMPLEXITY",
        );
        override_usize(
            &mut self.learner.max_anchor_distance,
            "FIELDLEARN_LEARNER_MAX_ANCHOR_DISTANCE",
        );
        override_usize(
            &mut self.learner.max_anchor_repeat,
            "FIELDLEARN_LEARNER_MAX_ANCHOR_REPEAT",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), FieldLearnError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        let positive = [
            ("learner.max_iterations", self.learner.max_iterations),
            ("learner.max_candidate_rules", self.learner.max_candidate_rules),
            ("learner.max_rules", self.learner.max_rules),
            (
                "learner.max_signature_elements",
                self.learner.max_signature_elements,
            ),
            ("learner.max_value_complexity", self.learner.max_value_complexity),
            ("learner.max_anchor_distance", self.learner.max_anchor_distance),
            ("learner.max_anchor_repeat", self.learner.max_anchor_repeat),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_owned(),
                    reason: "must be greater than 0".to_owned(),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 규칙 학습 엔진 설정
///
/// 학습 루프의 반복 횟수, 후보 규칙 상한, 시그니처 길이 제한 등
/// 엔진의 고정 상수를 조정할 수 있게 노출합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnConfig {
    /// 학습 루프 최대 반복 횟수
    pub max_iterations: usize,
    /// 코퍼스 전체 검증 전에 남길 최대 후보 규칙 수
    pub max_candidate_rules: usize,
    /// 검증 후 허용되는 최대 규칙 수 (초과 시 수렴 실패)
    pub max_rules: usize,
    /// 최상위 규칙 하나만 반환할지 여부
    pub just_top_rule: bool,
    /// 시그니처 최대 요소 수
    pub max_signature_elements: usize,
    /// 값 시그니처가 이 요소 수를 넘으면 단축을 시도
    pub max_value_complexity: usize,
    /// 앵커 문자가 경계에서 떨어질 수 있는 최대 거리
    pub max_anchor_distance: usize,
    /// 앵커 후보 문자의 최대 등장 횟수
    pub max_anchor_repeat: usize,
}

impl Default for LearnConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1,
            max_candidate_rules: 100,
            max_rules: 50,
            just_top_rule: true,
            max_signature_elements: 64,
            max_value_complexity: 5,
            max_anchor_distance: 30,
            max_anchor_repeat: 10,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}
