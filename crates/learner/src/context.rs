//! 학습 호출 단위 상태

use crate::config::LearnerConfig;
use crate::error::LearnerError;
use crate::signature::{Signature, SignatureCache};

/// 한 번의 `learn` 호출이 소유하는 상태
///
/// 설정과 시그니처 캐시를 묶어 생성기/검증기에 전달합니다.
/// 전역 상태가 없으므로 독립적인 호출은 서로 간섭하지 않습니다.
pub struct LearnContext {
    config: LearnerConfig,
    signatures: SignatureCache,
}

impl LearnContext {
    /// 설정으로 새 컨텍스트를 생성합니다.
    pub fn new(config: LearnerConfig) -> Self {
        let signatures = SignatureCache::new(config.max_signature_elements);
        Self { config, signatures }
    }

    /// 엔진 설정
    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    /// 캐시를 거쳐 시그니처를 계산합니다.
    pub fn signature(&mut self, text: &str, multiline: bool) -> Result<Signature, LearnerError> {
        self.signatures.signature(text, multiline)
    }

    /// 시그니처 캐시 항목 수
    pub fn cached_signatures(&self) -> usize {
        self.signatures.len()
    }
}
