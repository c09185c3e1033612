//! 시그니처 추상화 -- 텍스트를 문자 클래스 정규식 조각으로 변환
//!
//! [`SignatureCache`]는 텍스트의 각 문자를 문자 클래스(`\d`, `\w`, `\s`,
//! 이스케이프된 구두점)로 매핑하고 연속 구간을 축약하여 정규식 조각을 만듭니다.
//! 같은 입력은 항상 같은 시그니처를 생성하며, 결과는 호출 단위로 캐싱됩니다.
//!
//! # 예시
//! ```ignore
//! let mut cache = SignatureCache::new(64);
//! let sig = cache.signature("2020-01-01 status", false)?;
//! assert_eq!(sig.pattern, r"\d+\-\d+\-\d+\s+\w+");
//! ```

use std::collections::HashMap;

use crate::error::LearnerError;

/// 16진수 토큰으로 취급하는 최소 길이
pub const HEX_TOKEN_MIN_LEN: usize = 6;

/// 정규식 메타 구두점 -- 이스케이프 후 그대로 유지됩니다 (병합 불가).
const META_PUNCTUATION: &[char] = &[
    '\\', '.', '+', '*', '?', '(', ')', '|', '[', ']', '{', '}', '^', '$', '#', '&', '-', '~',
];

/// 단일 문자의 클래스
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// ASCII 숫자
    Digit,
    /// 알파벳 및 `_`
    Word,
    /// 공백, 탭, 개행
    Space,
    /// 그 외 문자 (메타 문자는 렌더링 시 이스케이프)
    Literal(char),
}

impl CharClass {
    /// 문자의 클래스를 판별합니다. 입력은 소문자화되어 있다고 가정합니다.
    pub fn of(c: char) -> Self {
        if c.is_ascii_digit() {
            Self::Digit
        } else if c.is_alphabetic() || c == '_' {
            Self::Word
        } else if matches!(c, ' ' | '\t' | '\n') {
            Self::Space
        } else {
            Self::Literal(c)
        }
    }

    /// 연속 구간을 `X+`로 병합할 수 있는지 여부
    pub fn is_mergeable(self) -> bool {
        !matches!(self, Self::Literal(_))
    }

    /// 반복 없이 단일 요소로 렌더링합니다.
    pub fn fragment(self, multiline: bool) -> String {
        match self {
            Self::Digit => r"\d".to_owned(),
            Self::Word => r"\w".to_owned(),
            Self::Space => space_class(multiline).to_owned(),
            Self::Literal(c) => escape_char(c),
        }
    }
}

/// 공백 클래스 표기. 멀티라인 모드에서는 개행을 넘지 않습니다.
pub fn space_class(multiline: bool) -> &'static str {
    if multiline { r"[^\S\n]" } else { r"\s" }
}

/// 단일 문자를 정규식 리터럴로 이스케이프합니다.
pub fn escape_char(c: char) -> String {
    if META_PUNCTUATION.contains(&c) {
        format!("\\{c}")
    } else {
        let mut buf = [0u8; 4];
        regex::escape(c.encode_utf8(&mut buf))
    }
}

/// 문자 하나를 클래스 조각으로 렌더링합니다 (경계 표현용).
pub fn class_fragment(c: char, multiline: bool) -> String {
    CharClass::of(c.to_lowercase().next().unwrap_or(c)).fragment(multiline)
}

/// 축약된 시그니처 요소
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Element {
    class: CharClass,
    run: usize,
}

impl Element {
    fn render(self, multiline: bool, out: &mut String) {
        out.push_str(&self.class.fragment(multiline));
        if self.class.is_mergeable() {
            out.push('+');
        } else if self.run > 1 {
            out.push_str(&format!("{{{}}}", self.run));
        }
    }
}

/// 추상화된 시그니처
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// 정규식 조각
    pub pattern: String,
    /// 단순화 후 요소 수 (값 복잡도 판단에 사용)
    pub elements: usize,
}

impl Signature {
    /// 빈 텍스트의 시그니처
    pub fn empty() -> Self {
        Self {
            pattern: String::new(),
            elements: 0,
        }
    }
}

/// 시그니처 캐시
///
/// 성공한 시그니처와 `PatternTooLong` 실패를 모두 캐싱합니다.
/// 키는 (텍스트, 멀티라인 여부)입니다.
pub struct SignatureCache {
    max_elements: usize,
    entries: HashMap<(String, bool), Result<Signature, usize>>,
}

impl SignatureCache {
    /// 요소 상한을 지정하여 빈 캐시를 생성합니다.
    pub fn new(max_elements: usize) -> Self {
        Self {
            max_elements,
            entries: HashMap::new(),
        }
    }

    /// 캐싱된 항목 수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 캐시가 비어있는지 여부
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 텍스트의 시그니처를 계산합니다.
    ///
    /// 축약된 요소 수가 상한을 넘으면 `LearnerError::PatternTooLong`을 반환합니다.
    pub fn signature(&mut self, text: &str, multiline: bool) -> Result<Signature, LearnerError> {
        let max = self.max_elements;
        let key = (text.to_owned(), multiline);
        let cached = self
            .entries
            .entry(key)
            .or_insert_with(|| compute_signature(text, multiline, max));
        match cached {
            Ok(sig) => Ok(sig.clone()),
            Err(len) => Err(LearnerError::PatternTooLong { len: *len, max }),
        }
    }
}

fn compute_signature(text: &str, multiline: bool, max: usize) -> Result<Signature, usize> {
    if text.is_empty() {
        return Ok(Signature::empty());
    }

    let lowered = text.to_lowercase();
    let classes = classify(&lowered);

    let mut elements: Vec<Element> = Vec::new();
    for class in classes {
        match elements.last_mut() {
            Some(last) if last.class == class => last.run += 1,
            _ => {
                if elements.len() == max {
                    return Err(max + 1);
                }
                elements.push(Element { class, run: 1 });
            }
        }
    }

    let elements = simplify_elements(elements);
    let mut pattern = String::new();
    for element in &elements {
        element.render(multiline, &mut pattern);
    }

    Ok(Signature {
        pattern,
        elements: elements.len(),
    })
}

/// 문자별 클래스를 계산합니다. 16진수 토큰은 단어 클래스 하나로 대체됩니다.
fn classify(lowered: &str) -> Vec<CharClass> {
    let chars: Vec<char> = lowered.chars().collect();
    let mut classes = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i].is_ascii_alphanumeric() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_alphanumeric() {
                i += 1;
            }
            let token = &chars[start..i];
            if is_hex_token(token) {
                classes.push(CharClass::Word);
            } else {
                classes.extend(token.iter().map(|&c| CharClass::of(c)));
            }
        } else {
            classes.push(CharClass::of(chars[i]));
            i += 1;
        }
    }

    classes
}

fn is_hex_token(token: &[char]) -> bool {
    token.len() >= HEX_TOKEN_MIN_LEN
        && token.iter().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
        && token.iter().any(char::is_ascii_digit)
        && token.iter().any(char::is_ascii_alphabetic)
}

/// 요소 수준 클래스 단순화 (문자열 수준 [`simplify_classes`]와 같은 규칙)
fn simplify_elements(mut elements: Vec<Element>) -> Vec<Element> {
    use CharClass::{Digit, Word};

    let word = Element { class: Word, run: 1 };
    loop {
        let mut changed = false;
        let mut i = 0;
        while i < elements.len() {
            if matches!(
                classes_at(&elements, i, 3).as_deref(),
                Some([Word, Digit, Word] | [Digit, Word, Digit])
            ) {
                elements[i] = word;
                elements.drain(i + 1..i + 3);
                changed = true;
                continue;
            }
            if matches!(classes_at(&elements, i, 2).as_deref(), Some([Word, Word])) {
                elements[i] = word;
                elements.remove(i + 1);
                changed = true;
                continue;
            }
            i += 1;
        }
        if !changed {
            return elements;
        }
    }
}

fn classes_at(elements: &[Element], start: usize, n: usize) -> Option<Vec<CharClass>> {
    elements
        .get(start..start + n)
        .map(|window| window.iter().map(|e| e.class).collect())
}

/// 패턴 문자열에 클래스 단순화 규칙을 고정점까지 적용합니다.
///
/// `\w+\d+\w+` → `\w+`, `\d+\w+\d+` → `\w+`, `\w+\w+` → `\w+`.
/// 인접한 공백 클래스도 하나로 합칩니다.
pub fn simplify_classes(pattern: &str) -> String {
    const REWRITES: [(&str, &str); 5] = [
        (r"\w+\d+\w+", r"\w+"),
        (r"\d+\w+\d+", r"\w+"),
        (r"\w+\w+", r"\w+"),
        (r"\s+\s+", r"\s+"),
        (r"[^\S\n]+[^\S\n]+", r"[^\S\n]+"),
    ];

    let mut current = pattern.to_owned();
    loop {
        let mut next = current.clone();
        for (from, to) in REWRITES {
            next = next.replace(from, to);
        }
        if next == current {
            return current;
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(text: &str) -> String {
        SignatureCache::new(64).signature(text, false).unwrap().pattern
    }

    #[test]
    fn date_and_word() {
        assert_eq!(sig("2020-01-01 status"), r"\d+\-\d+\-\d+\s+\w+");
    }

    #[test]
    fn empty_text_has_empty_signature() {
        let s = SignatureCache::new(64).signature("", false).unwrap();
        assert_eq!(s, Signature::empty());
    }

    #[test]
    fn non_mergeable_run_uses_count() {
        assert_eq!(sig("a...b"), r"\w+\.{3}\w+");
        assert_eq!(sig("x==1"), r"\w+={2}\d+");
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(sig("Status"), sig("status"));
    }

    #[test]
    fn hex_token_collapses_to_word() {
        assert_eq!(sig("deadbeef42"), r"\w+");
        assert_eq!(sig("id=0a1b2c"), r"\w+=\w+");
    }

    #[test]
    fn short_or_pure_tokens_are_not_hex() {
        // 숫자만 있는 토큰은 16진수로 보지 않음
        assert_eq!(sig("123456"), r"\d+");
        // 너무 짧은 토큰은 문자별 분류 후 단순화
        assert_eq!(sig("a1b"), r"\w+");
    }

    #[test]
    fn mixed_alnum_simplifies_to_word() {
        assert_eq!(sig("user123abc"), r"\w+");
        assert_eq!(sig("12ab34"), r"\w+");
        assert_eq!(sig("xyz123"), r"\w+\d+");
    }

    #[test]
    fn literal_punctuation_is_kept() {
        assert_eq!(sig("a=b"), r"\w+=\w+");
        assert_eq!(sig("k:v,x"), r"\w+:\w+,\w+");
        assert_eq!(sig("(a)"), r"\(\w+\)");
    }

    #[test]
    fn multiline_space_class() {
        let mut cache = SignatureCache::new(64);
        let s = cache.signature("a b", true).unwrap();
        assert_eq!(s.pattern, r"\w+[^\S\n]+\w+");
    }

    #[test]
    fn element_count() {
        let s = SignatureCache::new(64).signature("a=1", false).unwrap();
        assert_eq!(s.elements, 3);
    }

    #[test]
    fn too_long_is_rejected_and_cached() {
        let text = "a=".repeat(40);
        let mut cache = SignatureCache::new(64);
        let err = cache.signature(&text, false).unwrap_err();
        assert!(matches!(err, LearnerError::PatternTooLong { max: 64, .. }));
        assert_eq!(cache.len(), 1);
        // 캐시된 실패도 같은 에러를 반환
        assert!(cache.signature(&text, false).is_err());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn signature_is_deterministic() {
        let mut cache = SignatureCache::new(64);
        let a = cache.signature("GET /index.html 200", false).unwrap();
        let b = SignatureCache::new(64)
            .signature("GET /index.html 200", false)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn simplify_classes_reaches_fixed_point() {
        assert_eq!(simplify_classes(r"\w+\d+\w+\d+\w+"), r"\w+");
        assert_eq!(simplify_classes(r"\d+\w+\d+"), r"\w+");
        assert_eq!(simplify_classes(r"^\w+\w+=(?P<FIELDNAME>\d+)"), r"^\w+=(?P<FIELDNAME>\d+)");
        assert_eq!(simplify_classes(r"\s+\s+"), r"\s+");
    }

    #[test]
    fn simplify_classes_keeps_unrelated_patterns() {
        let pattern = r"status=(?P<FIELDNAME>\d+)\s";
        assert_eq!(simplify_classes(pattern), pattern);
    }

    #[test]
    fn class_fragment_of_single_chars() {
        assert_eq!(class_fragment('7', false), r"\d");
        assert_eq!(class_fragment('Q', false), r"\w");
        assert_eq!(class_fragment(' ', true), r"[^\S\n]");
        assert_eq!(class_fragment('.', false), r"\.");
        assert_eq!(class_fragment('=', false), "=");
    }

    #[test]
    fn rendered_signature_compiles() {
        let text = "weird [chars] {here} ^$ | ~ & # *+?";
        let pattern = sig(text);
        let re = regex::Regex::new(&format!("^{pattern}$")).unwrap();
        assert!(re.is_match(text));
    }
}
