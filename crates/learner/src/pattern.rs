//! 후보 패턴 생성 -- 예시 값의 출현 위치 하나에서 정규식 후보를 만듭니다
//!
//! 출현 위치마다 다섯 가지 전략을 적용합니다. 각 전략은 독립적이며,
//! 실패(`PatternTooLong`, `NoCandidate`, 정규식 컴파일 실패)는 해당 전략의
//! 후보만 버리고 나머지 전략에는 영향을 주지 않습니다.
//!
//! | 전략 | 계열 | 형태 |
//! |------|------|------|
//! | forward | `Forward` | `^` + 추상 접두 + 값 + 경계 |
//! | trivial-forward | `Forward` | `^` + `.*?`구분자 반복 + 값 + 경계 |
//! | backward | `Backward` | 앞 경계 + 값 + 추상 접미 |
//! | forward-literal | `ForwardLiteral` | 리터럴 단어 + 값 + 경계 |
//! | forward-delimiter | `ForwardDelimiter` | 구분자 + 부정 클래스 + 구분자 |

use regex::Regex;
use tracing::trace;

use fieldlearn_core::types::FIELD_GROUP_NAME;

use crate::anchor::{self, Side, is_guidepost, is_word_char};
use crate::context::LearnContext;
use crate::error::LearnerError;
use crate::rule::RuleFamily;
use crate::signature::{class_fragment, escape_char, simplify_classes};

/// 컴파일된 후보 패턴
#[derive(Debug, Clone)]
pub struct Candidate {
    /// 단순화된 패턴 문자열
    pub pattern: String,
    /// 생성 전략의 계열
    pub family: RuleFamily,
    /// 컴파일된 정규식
    pub regex: Regex,
}

impl Candidate {
    /// 패턴을 단순화한 뒤 컴파일합니다.
    pub fn compile(pattern: String, family: RuleFamily) -> Result<Self, LearnerError> {
        let pattern = simplify_classes(&pattern);
        let regex = Regex::new(&pattern)?;
        Ok(Self {
            pattern,
            family,
            regex,
        })
    }

    /// 이벤트의 첫 매치가 `event[start..end]`를 정확히 캡처하는지 확인합니다.
    ///
    /// 검증 단계와 같은 첫 매치 기준입니다.
    pub fn captures_span(&self, event: &str, start: usize, end: usize) -> bool {
        self.regex
            .captures(event)
            .and_then(|caps| caps.name(FIELD_GROUP_NAME))
            .is_some_and(|m| m.start() == start && m.end() == end)
    }
}

/// 이벤트 안에서 예시 값이 등장한 한 위치
///
/// 접두/접미는 값과 같은 줄로 제한됩니다.
#[derive(Debug, Clone, Copy)]
pub struct Occurrence<'e> {
    /// 값 앞의 같은 줄 텍스트
    pub prefix: &'e str,
    /// 예시 값
    pub value: &'e str,
    /// 값 뒤의 같은 줄 텍스트
    pub suffix: &'e str,
    /// 이벤트가 여러 줄인지 여부
    pub multiline: bool,
}

impl<'e> Occurrence<'e> {
    /// `event[start..]`에 `example`이 있다고 가정하고 출현 위치를 만듭니다.
    pub fn new(event: &'e str, example: &'e str, start: usize) -> Self {
        let end = start + example.len();
        let line_begin = event[..start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = event[end..].find('\n').map_or(event.len(), |i| end + i);
        Self {
            prefix: &event[line_begin..start],
            value: &event[start..end],
            suffix: &event[end..line_end],
            multiline: event.contains('\n'),
        }
    }

    fn line_start(&self) -> &'static str {
        "^"
    }

    /// 멀티라인 이벤트면 `(?m)` 플래그를 붙여 `^`/`$`가 줄 경계에 맞도록 합니다.
    fn finish(&self, body: String) -> String {
        if self.multiline {
            format!("(?m){body}")
        } else {
            body
        }
    }

    /// 값 직후의 경계: 접미가 비었으면 `$`, 아니면 첫 문자의 클래스
    fn closing_boundary(&self) -> String {
        match self.suffix.chars().next() {
            Some(c) => class_fragment(c, self.multiline),
            None => "$".to_owned(),
        }
    }
}

/// 값 캡처 그룹
fn group(value_fragment: &str) -> String {
    format!("(?P<{FIELD_GROUP_NAME}>{value_fragment})")
}

/// 개행과 구분 문자를 제외한 부정 클래스
fn negated_class(delimiter: char) -> String {
    format!(r"[^{}\n]+", escape_char(delimiter))
}

/// 값 조각과, 필요하면 값 뒤 경계를 대체하는 조각
struct ValueFragment {
    value: String,
    closing: Option<String>,
}

impl ValueFragment {
    fn plain(value: String) -> Self {
        Self {
            value,
            closing: None,
        }
    }
}

/// 값의 정규식 조각을 만듭니다.
///
/// 값 시그니처가 `max_value_complexity`보다 복잡하면 접미의 구분 문자나
/// 짧은 컷오프를 이용해 `[^c\n]+` 또는 `.+?컷오프` 형태로 단축합니다.
fn value_regex(
    ctx: &mut LearnContext,
    occ: &Occurrence<'_>,
    family: RuleFamily,
) -> Result<ValueFragment, LearnerError> {
    if family.reads_forward() && occ.suffix.is_empty() {
        return Ok(ValueFragment {
            value: ".+".to_owned(),
            closing: Some("$".to_owned()),
        });
    }

    let signature = ctx.signature(occ.value, occ.multiline)?;
    if signature.elements <= ctx.config().max_value_complexity {
        return Ok(ValueFragment::plain(signature.pattern));
    }

    if let Some(next) = occ.suffix.chars().next() {
        if is_guidepost(next) && !occ.value.contains(next) {
            return Ok(ValueFragment::plain(negated_class(next)));
        }
    }

    let max_cutoff = ctx.config().max_cutoff_len;
    for (len, (idx, c)) in occ.suffix.char_indices().enumerate() {
        if len >= max_cutoff {
            break;
        }
        let cutoff = &occ.suffix[..idx + c.len_utf8()];
        if occ.value.contains(cutoff) {
            continue;
        }
        let cutoff_sig = ctx.signature(cutoff, occ.multiline)?;
        if cutoff_sig.elements * 2 <= signature.elements {
            return Ok(ValueFragment {
                value: ".+?".to_owned(),
                closing: Some(cutoff_sig.pattern),
            });
        }
    }

    Ok(ValueFragment::plain(signature.pattern))
}

type Strategy = fn(&mut LearnContext, &Occurrence<'_>) -> Result<Vec<Candidate>, LearnerError>;

const STRATEGIES: [(&str, Strategy); 5] = [
    ("forward", forward),
    ("trivial-forward", trivial_forward),
    ("backward", backward),
    ("forward-literal", forward_literal),
    ("forward-delimiter", forward_delimiter),
];

/// 출현 위치 하나에 대해 모든 전략의 후보를 생성합니다.
///
/// 실패한 전략은 `trace` 레벨로 기록하고 건너뜁니다.
pub fn candidates_for_occurrence(
    ctx: &mut LearnContext,
    event: &str,
    example: &str,
    start: usize,
) -> Vec<Candidate> {
    let occ = Occurrence::new(event, example, start);
    let mut candidates = Vec::new();

    let end = start + example.len();

    for (name, strategy) in STRATEGIES {
        match strategy(ctx, &occ) {
            Ok(found) => {
                for candidate in found {
                    if candidate.captures_span(event, start, end) {
                        candidates.push(candidate);
                    } else {
                        trace!(
                            strategy = name,
                            pattern = %candidate.pattern,
                            example,
                            start,
                            "candidate does not extract its occurrence"
                        );
                    }
                }
            }
            Err(e) => trace!(strategy = name, example, start, error = %e, "strategy produced no candidate"),
        }
    }

    candidates
}

/// `^` + 추상 접두 + 값 + 경계
fn forward(ctx: &mut LearnContext, occ: &Occurrence<'_>) -> Result<Vec<Candidate>, LearnerError> {
    let prefix = if occ.prefix.is_empty() {
        String::new()
    } else {
        anchor::prefix_regex_fragment(ctx, occ.prefix, occ.multiline, false)?
    };
    let fragment = value_regex(ctx, occ, RuleFamily::Forward)?;
    let closing = fragment.closing.unwrap_or_else(|| occ.closing_boundary());

    let body = format!(
        "{}{prefix}{}{closing}",
        occ.line_start(),
        group(&fragment.value)
    );
    Ok(vec![Candidate::compile(occ.finish(body), RuleFamily::Forward)?])
}

/// `^` + 앵커까지의 구분 문자를 `.*?`로 이은 골격 + 값 + 경계
///
/// 값은 원래 시그니처와 문자 전용 변형(`\w` → `[a-zA-Z]`) 두 가지로 시도합니다.
fn trivial_forward(
    ctx: &mut LearnContext,
    occ: &Occurrence<'_>,
) -> Result<Vec<Candidate>, LearnerError> {
    let anchor = anchor::best_anchor(occ.prefix, Side::Prefix, ctx.config())
        .ok_or(LearnerError::NoCandidate("no prefix anchor"))?;

    let mut skeleton = String::new();
    let mut pieces = 0;
    for c in occ.prefix[..anchor.run_end].chars().filter(|c| is_guidepost(*c)) {
        pieces += 1;
        if pieces > ctx.config().max_signature_elements {
            return Err(LearnerError::PatternTooLong {
                len: pieces,
                max: ctx.config().max_signature_elements,
            });
        }
        skeleton.push_str(".*?");
        skeleton.push_str(&class_fragment(c, occ.multiline));
    }

    let between = ctx.signature(&occ.prefix[anchor.run_end..], occ.multiline)?;
    let value = ctx.signature(occ.value, occ.multiline)?;
    let closing = occ.closing_boundary();

    let mut variants = vec![value.pattern.clone()];
    let letters_only = value.pattern.replace(r"\w", "[a-zA-Z]");
    if letters_only != value.pattern {
        variants.push(letters_only);
    }

    let mut candidates = Vec::new();
    for variant in variants {
        let body = format!(
            "{}{skeleton}{}{}{closing}",
            occ.line_start(),
            between.pattern,
            group(&variant)
        );
        match Candidate::compile(occ.finish(body), RuleFamily::Forward) {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => trace!(error = %e, "trivial-forward variant rejected"),
        }
    }
    Ok(candidates)
}

/// 앞 경계 + 값 + 추상 접미
fn backward(ctx: &mut LearnContext, occ: &Occurrence<'_>) -> Result<Vec<Candidate>, LearnerError> {
    let opening = match occ.prefix.chars().next_back() {
        Some(c) => escape_char(c),
        None => occ.line_start().to_owned(),
    };
    let fragment = value_regex(ctx, occ, RuleFamily::Backward)?;
    let closing = match fragment.closing {
        Some(closing) => closing,
        None if occ.suffix.is_empty() => "$".to_owned(),
        None => anchor::suffix_regex_fragment(ctx, occ.suffix, occ.multiline)?,
    };

    let body = format!("{opening}{}{closing}", group(&fragment.value));
    Ok(vec![Candidate::compile(occ.finish(body), RuleFamily::Backward)?])
}

/// 리터럴 단어 접두 + 값 + 경계
fn forward_literal(
    ctx: &mut LearnContext,
    occ: &Occurrence<'_>,
) -> Result<Vec<Candidate>, LearnerError> {
    let literal = anchor::prefix_regex_fragment(ctx, occ.prefix, occ.multiline, true)?;
    let fragment = value_regex(ctx, occ, RuleFamily::ForwardLiteral)?;
    let closing = fragment.closing.unwrap_or_else(|| occ.closing_boundary());

    let body = format!("{literal}{}{closing}", group(&fragment.value));
    Ok(vec![Candidate::compile(
        occ.finish(body),
        RuleFamily::ForwardLiteral,
    )?])
}

/// 구분자 + 값 + 구분자
///
/// 값 양쪽 문자가 모두 단어 문자가 아니고 값 안에 없을 때만 적용됩니다.
fn forward_delimiter(
    ctx: &mut LearnContext,
    occ: &Occurrence<'_>,
) -> Result<Vec<Candidate>, LearnerError> {
    let usable = |c: char| !is_word_char(c) && !occ.value.contains(c);

    let open = occ.prefix.chars().next_back();
    let close = occ.suffix.chars().next();
    if open.is_some_and(|c| !usable(c)) || close.is_some_and(|c| !usable(c)) {
        return Err(LearnerError::NoCandidate("no usable delimiter"));
    }

    let value = match (open, close) {
        (_, Some(c)) => negated_class(c),
        (Some(c), None) => negated_class(c),
        (None, None) => ctx.signature(occ.value, occ.multiline)?.pattern,
    };
    let opening = open.map_or_else(|| occ.line_start().to_owned(), escape_char);
    let closing = close.map_or_else(|| "$".to_owned(), escape_char);

    let body = format!("{opening}{}{closing}", group(&value));
    Ok(vec![Candidate::compile(
        occ.finish(body),
        RuleFamily::ForwardDelimiter,
    )?])
}
