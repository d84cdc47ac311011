//! Verdict parser.
//!
//! Reduces the referee's free-form reply to a strict boolean with a two-stage
//! cascade:
//!
//! 1. the strict token the referee was asked to emit wins outright, provided
//!    it stands on its own (followed by end of text, whitespace or punctuation
//!    other than `/`);
//! 2. otherwise negative-intent patterns are scanned first (any hit is `false`),
//!    then positive-intent patterns (any hit is `true`).
//!
//! Anything else is `false`. Ambiguity never resolves in the player's favour
//! and never passes a patient message without scrutiny.
//!
//! The strict stage runs on the reply with only `*` dropped, full-width colons
//! folded and ASCII lowercased, so an echoed `[合理/不合理]` slot or a token
//! that merely prefixes a longer word (`是否`, `合理性存疑`) does not count.
//! The pattern stages run on a normalized form: full-width colons become `:`,
//! whitespace and the decoration characters `[ ] 【 】 *` are dropped and ASCII
//! is lowercased, so `**诊断正确：【是】**` and `诊断正确: 是` compare equal.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static PLAUSIBLE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"合理性\s*:\s*[\[【]?\s*合理\s*[\]】]?(?:$|[^\p{Han}\w/])")
        .expect("valid plausibility token regex")
});

static CORRECT_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"诊断正确\s*:\s*[\[【]?\s*是\s*[\]】]?(?:$|[^\p{Han}\w/])")
        .expect("valid diagnosis token regex")
});

/// Which judgment a reply answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    /// Is the latest patient message plausible and in role?
    Plausibility,
    /// Did the doctor name the hidden diagnosis?
    DiagnosisCorrectness,
}

const DIAGNOSIS_NEGATIVES: &[&str] = &[
    "诊断正确:否",
    "诊断不正确",
    "诊断错误",
    "不正确",
    "错误",
    "未给出",
    "不是",
    "incorrect",
    "wrong",
];

const DIAGNOSIS_POSITIVES: &[&str] = &["诊断正确", "正确诊断", "correct"];

const PLAUSIBILITY_NEGATIVES: &[&str] = &[
    "不合理",
    "不符合",
    "不恰当",
    "泄露",
    "implausible",
    "invalid",
    "unreasonable",
];

const PLAUSIBILITY_POSITIVES: &[&str] = &["合理", "符合", "plausible", "valid", "reasonable"];

impl VerdictKind {
    /// Matches the affirmative token requested in the referee prompt.
    fn strict_token(&self) -> &'static Regex {
        match self {
            Self::Plausibility => &PLAUSIBLE_TOKEN,
            Self::DiagnosisCorrectness => &CORRECT_TOKEN,
        }
    }

    fn negatives(&self) -> &'static [&'static str] {
        match self {
            Self::Plausibility => PLAUSIBILITY_NEGATIVES,
            Self::DiagnosisCorrectness => DIAGNOSIS_NEGATIVES,
        }
    }

    fn positives(&self) -> &'static [&'static str] {
        match self {
            Self::Plausibility => PLAUSIBILITY_POSITIVES,
            Self::DiagnosisCorrectness => DIAGNOSIS_POSITIVES,
        }
    }
}

/// Cascade stage that produced a verdict. Useful for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictRule {
    StrictToken,
    Negative,
    Positive,
    Default,
}

/// Parsed verdict with the rule that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub value: bool,
    pub rule: VerdictRule,
}

/// Normalizes judge text for pattern matching.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '[' | ']' | '【' | '】' | '*'))
        .map(|c| if c == '：' { ':' } else { c.to_ascii_lowercase() })
        .collect()
}

/// Light fold for the strict stage: layout and brackets survive.
fn fold(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '*')
        .map(|c| if c == '：' { ':' } else { c.to_ascii_lowercase() })
        .collect()
}

/// Runs the cascade and reports which stage decided.
pub fn evaluate(kind: VerdictKind, judge_text: &str) -> Verdict {
    if kind.strict_token().is_match(&fold(judge_text)) {
        return Verdict { value: true, rule: VerdictRule::StrictToken };
    }

    let text = normalize(judge_text);
    if kind.negatives().iter().any(|p| text.contains(p)) {
        return Verdict { value: false, rule: VerdictRule::Negative };
    }
    if kind.positives().iter().any(|p| text.contains(p)) {
        return Verdict { value: true, rule: VerdictRule::Positive };
    }
    Verdict { value: false, rule: VerdictRule::Default }
}

/// Pure `(judgeText) -> bool` reduction for the given judgment.
pub fn parse_verdict(kind: VerdictKind, judge_text: &str) -> bool {
    evaluate(kind, judge_text).value
}
