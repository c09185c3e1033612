//! 앵커 선택 -- 값 경계 근처의 구분 문자 탐색
//!
//! 앵커는 값의 앞(접두) 또는 뒤(접미) 텍스트에서 경계와 가까우면서 드물게
//! 등장하는 구분 문자(guidepost)입니다. 생성기는 앵커를 기준으로 접두/접미를
//! 리터럴과 추상 시그니처로 나누어 정규식 조각을 만듭니다.

use crate::config::LearnerConfig;
use crate::context::LearnContext;
use crate::error::LearnerError;
use crate::signature::{escape_char, space_class};

/// 앵커 후보 문자 집합
pub const GUIDEPOSTS: &[char] = &[
    '=', ':', ',', ';', '"', '\'', '[', ']', '(', ')', '{', '}', '<', '>', '|', '/', '@', '#',
    '-', ' ', '\t',
];

/// 리터럴 접두에서 단어 뒤에 허용되는 최대 구분 문자 수
pub const MAX_LITERAL_ANCHOR_LEN: usize = 3;

/// 리터럴 접두의 단어로 쓰기에 부적합한 단어 (요일, 월, 시간대)
const NOISY_WORDS: &[&str] = &[
    "mon", "tue", "wed", "thu", "fri", "sat", "sun", "monday", "tuesday", "wednesday",
    "thursday", "friday", "saturday", "sunday", "jan", "feb", "mar", "apr", "may", "jun", "jul",
    "aug", "sep", "sept", "oct", "nov", "dec", "january", "february", "march", "april", "june",
    "july", "august", "september", "october", "november", "december", "utc", "gmt", "z", "est",
    "edt", "cst", "cdt", "mst", "mdt", "pst", "pdt", "cet", "cest", "bst", "ist", "jst", "kst",
    "am", "pm",
];

/// 앵커를 찾는 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// 값 앞의 텍스트 (끝에서 가까운 앵커)
    Prefix,
    /// 값 뒤의 텍스트 (시작에서 가까운 앵커)
    Suffix,
}

/// 선택된 앵커와 같은 문자가 연속된 구간 (바이트 오프셋)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    /// 앵커 문자
    pub ch: char,
    /// 연속 구간 시작
    pub run_start: usize,
    /// 연속 구간 끝 (exclusive)
    pub run_end: usize,
}

impl Anchor {
    /// 연속 구간의 문자 수
    pub fn run_len(&self) -> usize {
        (self.run_end - self.run_start) / self.ch.len_utf8()
    }

    /// 앵커 구간의 정규식 조각
    ///
    /// 공백류는 `+` 반복, 구두점 연속 구간은 `{n}`으로 표현합니다.
    pub fn fragment(&self, multiline: bool) -> String {
        if self.ch == ' ' || self.ch == '\t' {
            return format!("{}+", space_class(multiline));
        }
        let escaped = escape_char(self.ch);
        match self.run_len() {
            1 => escaped,
            n => format!("{escaped}{{{n}}}"),
        }
    }
}

/// 단어 문자 여부 (영숫자 및 `_`)
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// 앵커 후보 문자 여부
pub fn is_guidepost(c: char) -> bool {
    GUIDEPOSTS.contains(&c)
}

/// 점수가 좋은 순서로 앵커 위치(바이트 오프셋)를 반환합니다.
///
/// 각 후보 문자는 경계에서 가장 가까운 등장 위치 하나로 평가됩니다.
/// 점수는 `거리² × 등장횟수²`이며 공백/탭은 4배 불리하게 계산합니다.
/// 등장 횟수가 `max_anchor_repeat`를 넘거나 거리가 `max_anchor_distance`를
/// 넘는 문자는 제외합니다.
pub fn best_anchor_positions(text: &str, side: Side, config: &LearnerConfig) -> Vec<usize> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let total = chars.len();
    let mut scored: Vec<(u64, usize, char, usize)> = Vec::new();

    for &guidepost in GUIDEPOSTS {
        let hits: Vec<usize> = chars
            .iter()
            .enumerate()
            .filter(|(_, (_, c))| *c == guidepost)
            .map(|(idx, _)| idx)
            .collect();
        let count = hits.len();
        if count > config.max_anchor_repeat {
            continue;
        }
        let (Some(&first), Some(&last)) = (hits.first(), hits.last()) else {
            continue;
        };

        let (nearest, distance) = match side {
            Side::Prefix => (last, total - last),
            Side::Suffix => (first, first + 1),
        };
        if distance > config.max_anchor_distance {
            continue;
        }

        let mut score = (distance * distance * count * count) as u64;
        if guidepost == ' ' || guidepost == '\t' {
            score *= 4;
        }
        scored.push((score, distance, guidepost, chars[nearest].0));
    }

    scored.sort_unstable();
    scored
        .into_iter()
        .take(config.max_anchor_candidates)
        .map(|(_, _, _, pos)| pos)
        .collect()
}

/// 가장 좋은 앵커를 연속 구간과 함께 반환합니다.
pub fn best_anchor(text: &str, side: Side, config: &LearnerConfig) -> Option<Anchor> {
    let pos = *best_anchor_positions(text, side, config).first()?;
    let ch = text[pos..].chars().next()?;
    Some(anchor_run(text, pos, ch))
}

fn anchor_run(text: &str, pos: usize, ch: char) -> Anchor {
    let width = ch.len_utf8();
    let mut run_start = pos;
    while text[..run_start].ends_with(ch) {
        run_start -= width;
    }
    let mut run_end = pos + width;
    while text[run_end..].starts_with(ch) {
        run_end += width;
    }
    Anchor {
        ch,
        run_start,
        run_end,
    }
}

/// 접두 텍스트의 정규식 조각을 만듭니다.
///
/// - `literal = false`: `sig(앵커 앞) + 앵커 + sig(앵커와 경계 사이)`
/// - `literal = true`: 경계 직전의 의미 있는 단어와 구분 문자를 리터럴로 사용
pub fn prefix_regex_fragment(
    ctx: &mut LearnContext,
    text: &str,
    multiline: bool,
    literal: bool,
) -> Result<String, LearnerError> {
    if literal {
        return literal_prefix(text);
    }

    let anchor = best_anchor(text, Side::Prefix, ctx.config())
        .ok_or(LearnerError::NoCandidate("no prefix anchor"))?;
    let before = ctx.signature(&text[..anchor.run_start], multiline)?;
    let between = ctx.signature(&text[anchor.run_end..], multiline)?;

    Ok(format!(
        "{}{}{}",
        before.pattern,
        anchor.fragment(multiline),
        between.pattern
    ))
}

/// 접미 텍스트의 정규식 조각을 만듭니다: `sig(앵커 앞) + 앵커`
pub fn suffix_regex_fragment(
    ctx: &mut LearnContext,
    text: &str,
    multiline: bool,
) -> Result<String, LearnerError> {
    let anchor = best_anchor(text, Side::Suffix, ctx.config())
        .ok_or(LearnerError::NoCandidate("no suffix anchor"))?;
    let before = ctx.signature(&text[..anchor.run_start], multiline)?;

    Ok(format!("{}{}", before.pattern, anchor.fragment(multiline)))
}

fn literal_prefix(text: &str) -> Result<String, LearnerError> {
    let chars: Vec<char> = text.chars().collect();
    let mut idx = chars.len();

    while idx > 0 && !is_word_char(chars[idx - 1]) {
        idx -= 1;
    }
    let anchor_start = idx;
    if chars.len() - anchor_start > MAX_LITERAL_ANCHOR_LEN {
        return Err(LearnerError::NoCandidate("literal anchor too long"));
    }

    while idx > 0 && is_word_char(chars[idx - 1]) {
        idx -= 1;
    }
    let word: String = chars[idx..anchor_start].iter().collect();
    let anchor: String = chars[anchor_start..].iter().collect();

    if word.is_empty() {
        return Err(LearnerError::NoCandidate("no word before value"));
    }
    if word.chars().all(|c| c.is_ascii_digit()) {
        return Err(LearnerError::NoCandidate("numeric word before value"));
    }
    if NOISY_WORDS.contains(&word.to_lowercase().as_str()) {
        return Err(LearnerError::NoCandidate("noisy word before value"));
    }

    Ok(format!("{}{}", regex::escape(&word), regex::escape(&anchor)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> LearnContext {
        LearnContext::new(LearnerConfig::default())
    }

    #[test]
    fn prefix_prefers_nearest_rare_char() {
        let text = "2020-01-01 status=";
        let positions = best_anchor_positions(text, Side::Prefix, &LearnerConfig::default());
        // '=' (거리 1), ' ' (거리 8, ×4), '-' (거리 11, 2회)
        assert_eq!(positions, vec![17, 10, 7]);
    }

    #[test]
    fn suffix_prefers_first_char() {
        let positions = best_anchor_positions(" user=alice", Side::Suffix, &LearnerConfig::default());
        assert_eq!(positions.first(), Some(&0));
        assert_eq!(positions.get(1), Some(&5));
    }

    #[test]
    fn too_frequent_char_is_ignored() {
        let text = format!("{}x", ",".repeat(11));
        let positions = best_anchor_positions(&text, Side::Prefix, &LearnerConfig::default());
        assert!(positions.is_empty());
    }

    #[test]
    fn too_distant_char_is_ignored() {
        let text = format!("={}", "a".repeat(40));
        let positions = best_anchor_positions(&text, Side::Prefix, &LearnerConfig::default());
        assert!(positions.is_empty());
    }

    #[test]
    fn positions_are_capped() {
        let text = "a=b:c,d;e|f/g@h";
        let positions = best_anchor_positions(text, Side::Prefix, &LearnerConfig::default());
        assert_eq!(positions.len(), 5);
    }

    #[test]
    fn anchor_run_covers_repeats() {
        let anchor = best_anchor("key==", Side::Prefix, &LearnerConfig::default()).unwrap();
        assert_eq!(anchor.ch, '=');
        assert_eq!(anchor.run_start, 3);
        assert_eq!(anchor.run_end, 5);
        assert_eq!(anchor.fragment(false), "={2}");
    }

    #[test]
    fn whitespace_anchor_fragment() {
        let anchor = Anchor {
            ch: ' ',
            run_start: 0,
            run_end: 3,
        };
        assert_eq!(anchor.fragment(false), r"\s+");
        assert_eq!(anchor.fragment(true), r"[^\S\n]+");
    }

    #[test]
    fn abstract_prefix_fragment() {
        let fragment = prefix_regex_fragment(&mut ctx(), "2020-01-01 status=", false, false).unwrap();
        assert_eq!(fragment, r"\d+\-\d+\-\d+\s+\w+=");
    }

    #[test]
    fn abstract_prefix_needs_anchor() {
        let err = prefix_regex_fragment(&mut ctx(), "abc", false, false).unwrap_err();
        assert!(matches!(err, LearnerError::NoCandidate(_)));
    }

    #[test]
    fn literal_prefix_uses_meaty_word() {
        let fragment = prefix_regex_fragment(&mut ctx(), "2020-01-01 status=", false, true).unwrap();
        assert_eq!(fragment, "status=");
        let fragment = prefix_regex_fragment(&mut ctx(), "[client 1.2.3.4] path: ", false, true).unwrap();
        assert_eq!(fragment, "path: ");
    }

    #[test]
    fn literal_prefix_escapes_meta() {
        let fragment = prefix_regex_fragment(&mut ctx(), "val(", false, true).unwrap();
        assert_eq!(fragment, r"val\(");
    }

    #[test]
    fn literal_prefix_rejects_noise() {
        assert!(literal_prefix("Mon ").is_err());
        assert!(literal_prefix("at 12:").is_err());
        assert!(literal_prefix("").is_err());
        assert!(literal_prefix("key :=> ").is_err());
    }

    #[test]
    fn suffix_fragment_ends_at_anchor() {
        let fragment = suffix_regex_fragment(&mut ctx(), " user=alice", false).unwrap();
        assert_eq!(fragment, r"\s+");
        let fragment = suffix_regex_fragment(&mut ctx(), "ms]", false).unwrap();
        assert_eq!(fragment, r"\w+\]");
    }
}
