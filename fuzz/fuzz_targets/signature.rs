#![no_main]

use libfuzzer_sys::fuzz_target;
use fieldlearn_learner::{SignatureCache, simplify_classes};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let mut cache = SignatureCache::new(64);
        for multiline in [false, true] {
            // 요소 수 초과는 에러, 그 외에는 항상 컴파일 가능한 패턴
            if let Ok(signature) = cache.signature(text, multiline) {
                assert!(regex::Regex::new(&signature.pattern).is_ok());
                let simplified = simplify_classes(&signature.pattern);
                assert!(regex::Regex::new(&simplified).is_ok());
            }
        }
    }
});
