use super::{Label, RuleHit};

/// Probabilities at or above this are medium risk regardless of label.
pub const MEDIUM_RISK_PROBABILITY: f64 = 0.35;
/// Probabilities at or above this are high risk.
pub const HIGH_RISK_PROBABILITY: f64 = 0.60;

/// One-line natural-language summary of the decision.
pub fn summarize(probability: f64, rule_hits: &[RuleHit]) -> String {
    if rule_hits.is_empty() {
        return format!(
            "No strong rule-based indicators found; the {probability:.2} phishing \
             probability comes mainly from learned term patterns."
        );
    }
    let top: Vec<&str> = rule_hits
        .iter()
        .take(2)
        .map(|hit| hit.category.as_str())
        .collect();
    format!(
        "High risk signals detected: {}. Predicted phishing probability: {probability:.2}.",
        top.join(", ")
    )
}

/// Three actionable next steps, tiered by probability and predicted label.
/// The low tier requires the legitimate label; a positive label under a
/// calibrated sub-0.35 threshold still gets the medium tier.
pub fn advise(probability: f64, label: Label) -> Vec<String> {
    let steps: [&str; 3] = if probability >= HIGH_RISK_PROBABILITY {
        [
            "Do not click any links or open any attachments in this message.",
            "Verify the request through a separate, known-good channel before acting.",
            "Report the message to your security team and delete it.",
        ]
    } else if probability >= MEDIUM_RISK_PROBABILITY || label == Label::PhishingOrSpam {
        [
            "Verify the sender and their domain through a channel you already trust.",
            "Do not click links or open attachments until the sender is confirmed.",
            "Watch for urgency or pressure language; it is a common manipulation tactic.",
        ]
    } else {
        [
            "Verify the sender address before replying or acting.",
            "Avoid clicking links you were not expecting, even from familiar senders.",
            "Escalate to your security team if anything still feels off.",
        ]
    };
    steps.iter().map(|s| s.to_string()).collect()
}
