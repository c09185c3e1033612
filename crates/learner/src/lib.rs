#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`signature`]: 텍스트를 문자 클래스 정규식 조각으로 추상화
//! - [`anchor`]: 값 경계 근처의 구분 문자(앵커) 선택
//! - [`pattern`]: 출현 위치 하나에서 다섯 가지 전략으로 후보 패턴 생성
//! - [`rule`]: 규칙, 추출 통계, 점수
//! - [`generate`]: 코퍼스 전체에서 후보 규칙 수집
//! - [`validate`]: 반례/무추출 규칙 제거 및 새 값 발견
//! - [`learner`]: 학습 루프 ([`RuleLearner`](fieldlearn_core::RuleLearner) 구현)
//! - [`config`]: 엔진 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! events x examples -> generate_rules -> validate -> fold learned values -> rank -> result
//!                          |                |
//!                 anchor + signature   counter-examples
//! ```

pub mod anchor;
pub mod config;
pub mod context;
pub mod error;
pub mod generate;
pub mod learner;
pub mod pattern;
pub mod rule;
pub mod signature;
pub mod validate;

// --- 주요 타입 re-export ---

// 학습기
pub use learner::{FieldLearner, learn};

// 설정
pub use config::{LearnerConfig, LearnerConfigBuilder};

// 에러
pub use error::LearnerError;

// 규칙
pub use rule::{Rule, RuleFamily, RuleSet};

// 시그니처
pub use signature::{SignatureCache, simplify_classes};
