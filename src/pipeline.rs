use crate::explain::advice::{advise, summarize};
use crate::explain::contributions::{highlight_tokens, rank_contributions};
use crate::explain::highlight::{collect_phrases, highlight, MAX_SPANS};
use crate::explain::risk::{RiskCategory, RiskTable};
use crate::explain::rules::RuleTable;
use crate::explain::{HighlightSpan, Label, RuleHit, TermContribution};
use crate::model::LinearModel;
use crate::normalize::TextNormalizer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One email to score. Missing fields are treated as empty, never as errors.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Message {
    pub subject: Option<String>,
    pub body: Option<String>,
}

impl Message {
    pub fn new(subject: &str, body: &str) -> Self {
        Self {
            subject: Some(subject.to_string()),
            body: Some(body.to_string()),
        }
    }
}

/// Everything the caller gets for one scored message. Rebuilt per request;
/// every field is always populated, including for empty input.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub label: Label,
    pub probability_phishing: f64,
    pub explanations: Vec<TermContribution>,
    pub reasons: Vec<RuleHit>,
    pub risk_breakdown: BTreeMap<RiskCategory, f64>,
    pub highlight_spans: Vec<HighlightSpan>,
    pub summary: String,
    pub advice: Vec<String>,
}

/// The inference pipeline: normalizer, loaded model, and the two keyword
/// tables, all immutable after construction. Safe to share across threads;
/// `predict` is a pure function of its input plus this read-only state.
pub struct ScoringEngine {
    normalizer: TextNormalizer,
    model: LinearModel,
    rules: RuleTable,
    risk: RiskTable,
}

impl ScoringEngine {
    pub fn new(model: LinearModel, rules: RuleTable, risk: RiskTable) -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            model,
            rules,
            risk,
        }
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    /// Score one message and assemble the full explanation.
    pub fn predict(&self, message: &Message) -> PredictionResult {
        let subject = message.subject.as_deref().unwrap_or("");
        let body = message.body.as_deref().unwrap_or("");

        let normalized = self.normalizer.normalize(subject, body);
        let vector = self.model.vectorize(&normalized);
        let probability = self.model.probability_for(&vector);
        let label = Label::from_probability(probability, self.model.threshold());

        let explanations = rank_contributions(&vector, &self.model);
        let reasons = self.rules.match_rules(subject, body);
        let risk_breakdown = self.risk.breakdown(&explanations);

        let tokens = highlight_tokens(&explanations);
        let phrases = collect_phrases(&reasons, &tokens);
        let highlight_spans = highlight(body, &phrases, MAX_SPANS);

        let summary = summarize(probability, &reasons);
        let advice = advise(probability, label);

        log::debug!(
            "scored message: probability {probability:.4}, label {}, {} contributing terms, {} rule hits, {} spans",
            label.as_str(),
            explanations.len(),
            reasons.len(),
            highlight_spans.len()
        );

        PredictionResult {
            label,
            probability_phishing: probability,
            explanations,
            reasons,
            risk_breakdown,
            highlight_spans,
            summary,
            advice,
        }
    }
}
