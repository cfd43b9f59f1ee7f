use phishlens::explain::risk::RiskTable;
use phishlens::explain::rules::RuleTable;
use phishlens::model::{LinearModel, ModelArtifact};
use phishlens::pipeline::{Message, ScoringEngine};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("Testing the classic account-suspension phishing example...");

    // Small hand-built artifact standing in for a trained export
    let artifact = ModelArtifact {
        vocabulary: vec![
            "verify".to_string(),
            "password".to_string(),
            "account".to_string(),
            "suspended".to_string(),
            "click".to_string(),
            "login".to_string(),
            "urgent".to_string(),
            "url".to_string(),
            "meeting".to_string(),
            "agenda".to_string(),
        ],
        idf: vec![1.0; 10],
        coefficients: vec![1.8, 1.6, 1.2, 2.0, 1.5, 1.4, 1.7, 1.1, -1.0, -0.8],
        intercept: -1.2,
        ngram_range: (1, 2),
        stop_words: vec!["your".to_string(), "or".to_string(), "to".to_string()],
        threshold: None,
    };
    let model = LinearModel::from_artifact(artifact)?;
    let engine = ScoringEngine::new(model, RuleTable::default(), RiskTable::default());

    println!("\n=== Analyzing the account-suspension example ===");
    let phishing = Message::new(
        "URGENT: verify your password now",
        "Click here to confirm your login within 24 hours or your account will be suspended.",
    );
    println!("Subject: {}", phishing.subject.as_deref().unwrap_or(""));
    println!("Body: {}", phishing.body.as_deref().unwrap_or(""));

    let result = engine.predict(&phishing);

    println!("\n=== Results ===");
    println!("Label: {}", result.label.as_str());
    println!("Probability: {:.4}", result.probability_phishing);
    println!("Summary: {}", result.summary);
    for hit in &result.reasons {
        println!("  {}: {}", hit.category, hit.phrases.join(", "));
    }
    for span in &result.highlight_spans {
        println!("  highlighted [{}..{}] \"{}\"", span.start, span.end, span.text);
    }

    if result.label == phishlens::explain::Label::PhishingOrSpam {
        println!("\n✅ SUCCESS: This message would be flagged as phishing/spam");
    } else {
        println!("\n❌ MISSED: This message would be accepted (not caught)");
    }

    println!("\n\n=== Testing a legitimate meeting email ===");
    let legit = Message::new(
        "Team meeting agenda",
        "Sharing the agenda for Thursday's meeting. Please review before 10am.",
    );
    let legit_result = engine.predict(&legit);

    println!("Label: {}", legit_result.label.as_str());
    println!("Probability: {:.4}", legit_result.probability_phishing);
    println!("Rule hits: {}", legit_result.reasons.len());

    if legit_result.label == phishlens::explain::Label::Legitimate {
        println!("✅ GOOD: Legitimate email would pass through");
    } else {
        println!("⚠️  WARNING: Legitimate email would be flagged");
    }

    Ok(())
}
