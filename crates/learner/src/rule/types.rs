//! 규칙 분류 타입

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 규칙 계열 -- 후보 패턴을 만든 전략의 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleFamily {
    /// 줄 시작부터 추상화된 접두를 따라가는 규칙
    Forward,
    /// 값과 추상화된 접미로 끝을 잡는 규칙
    Backward,
    /// 값 앞의 리터럴 단어를 기준으로 하는 규칙
    ForwardLiteral,
    /// 값 양쪽의 구분 문자로 값을 잘라내는 규칙
    ForwardDelimiter,
}

impl RuleFamily {
    /// 메트릭/출력용 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::ForwardLiteral => "forward-literal",
            Self::ForwardDelimiter => "forward-delimiter",
        }
    }

    /// 점수 가중치
    ///
    /// 리터럴 단어 기반 규칙을 우선합니다.
    pub fn score_bias(&self) -> f64 {
        match self {
            Self::ForwardLiteral => 1.3,
            Self::Forward => 1.0,
            Self::Backward | Self::ForwardDelimiter => 0.7,
        }
    }

    /// 값 뒤쪽이 비어있을 때 줄 끝까지 값을 넓히는 계열인지 여부
    pub fn reads_forward(&self) -> bool {
        matches!(self, Self::Forward | Self::ForwardLiteral)
    }
}

impl fmt::Display for RuleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 추출 값의 대략적인 형태
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValueKind {
    /// 숫자와 숫자 구분 기호로만 구성
    Numeric,
    /// 10자 이하 텍스트
    ShortText,
    /// 10자 초과 텍스트
    LongText,
    /// 문자와 숫자가 섞인 값
    Mixed,
}

/// 짧은 텍스트로 간주하는 최대 문자 수
const SHORT_TEXT_MAX_CHARS: usize = 10;

impl ValueKind {
    /// 값의 형태를 분류합니다.
    pub fn classify(value: &str) -> Self {
        let has_digit = value.chars().any(|c| c.is_ascii_digit());
        let has_alpha = value.chars().any(char::is_alphabetic);
        let numeric = has_digit
            && value
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+' | ':'));

        if numeric {
            Self::Numeric
        } else if has_digit && has_alpha {
            Self::Mixed
        } else if value.chars().count() <= SHORT_TEXT_MAX_CHARS {
            Self::ShortText
        } else {
            Self::LongText
        }
    }

    /// 값 집합에서 가장 많이 등장하는 형태를 반환합니다.
    ///
    /// 동률이면 선언 순서가 앞선 형태를 택합니다. 빈 집합이면 `None`.
    pub fn dominant<'a, I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts: BTreeMap<Self, usize> = BTreeMap::new();
        for value in values {
            *counts.entry(Self::classify(value)).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .max_by(|(ka, a), (kb, b)| a.cmp(b).then(kb.cmp(ka)))
            .map(|(kind, _)| kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_bias_order() {
        assert!(RuleFamily::ForwardLiteral.score_bias() > RuleFamily::Forward.score_bias());
        assert!(RuleFamily::Forward.score_bias() > RuleFamily::Backward.score_bias());
        assert_eq!(
            RuleFamily::Backward.score_bias(),
            RuleFamily::ForwardDelimiter.score_bias()
        );
    }

    #[test]
    fn family_display() {
        assert_eq!(RuleFamily::ForwardLiteral.to_string(), "forward-literal");
        assert_eq!(RuleFamily::Backward.to_string(), "backward");
    }

    #[test]
    fn classify_values() {
        assert_eq!(ValueKind::classify("200"), ValueKind::Numeric);
        assert_eq!(ValueKind::classify("1.5"), ValueKind::Numeric);
        assert_eq!(ValueKind::classify("alice"), ValueKind::ShortText);
        assert_eq!(
            ValueKind::classify("a rather long value"),
            ValueKind::LongText
        );
        assert_eq!(ValueKind::classify("user42"), ValueKind::Mixed);
        assert_eq!(ValueKind::classify("-"), ValueKind::ShortText);
    }

    #[test]
    fn dominant_kind() {
        assert_eq!(
            ValueKind::dominant(["1", "2", "bob"]),
            Some(ValueKind::Numeric)
        );
        assert_eq!(ValueKind::dominant(Vec::<&str>::new()), None);
        // 동률이면 선언 순서가 앞선 형태
        assert_eq!(
            ValueKind::dominant(["bob", "7"]),
            Some(ValueKind::Numeric)
        );
    }
}
