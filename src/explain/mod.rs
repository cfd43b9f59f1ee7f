pub mod advice;
pub mod contributions;
pub mod highlight;
pub mod risk;
pub mod rules;

use serde::Serialize;

/// One vocabulary term present in the scored message, with its contribution
/// toward the phishing class (document tf-idf weight times the model's
/// learned coefficient).
#[derive(Debug, Clone, Serialize)]
pub struct TermContribution {
    pub term: String,
    pub weight: f64,
}

/// A rule category with the literal phrases that matched the message.
#[derive(Debug, Clone, Serialize)]
pub struct RuleHit {
    pub category: String,
    pub phrases: Vec<String>,
}

/// A highlighted region of the original body text. Offsets are byte offsets
/// into the uncleaned body; `text` preserves the original casing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Legitimate,
    PhishingOrSpam,
}

impl Label {
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability >= threshold {
            Label::PhishingOrSpam
        } else {
            Label::Legitimate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Legitimate => "legitimate",
            Label::PhishingOrSpam => "phishing_or_spam",
        }
    }
}
