use clap::{Arg, Command};
use log::LevelFilter;
use phishlens::config::Config;
use phishlens::explain::risk::RiskTable;
use phishlens::explain::rules::RuleTable;
use phishlens::model::LinearModel;
use phishlens::pipeline::{Message, PredictionResult, ScoringEngine};
use std::process;

fn main() {
    let matches = Command::new("phishlens")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Explainable phishing/spam email scoring")
        .long_about(
            "PhishLens scores email text with a trained linear model and explains the \
             decision: contributing terms, rule-based risk categories, a per-category \
             risk breakdown, highlighted evidence in the original text, and next-step \
             advice.",
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("/etc/phishlens.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Validate the configuration and model artifact, then exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .value_name("FILE")
                .help("Model artifact path (overrides the configured path)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("score")
                .long("score")
                .value_name("FILE")
                .help("Score a message file (Subject:/body text, or JSON with subject and body)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("subject")
                .long("subject")
                .value_name("TEXT")
                .help("Subject line to score (with --body)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("body")
                .long("body")
                .value_name("TEXT")
                .help("Body text to score (with --subject)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("demo")
                .long("demo")
                .help("Score built-in sample messages")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Emit the full prediction as JSON instead of a console report")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        match Config::default().to_file(generate_path) {
            Ok(()) => println!("✅ Default configuration written to {generate_path}"),
            Err(e) => {
                eprintln!("❌ Failed to write configuration: {e}");
                process::exit(1);
            }
        }
        return;
    }

    let config_path = matches.get_one::<String>("config").unwrap();
    let mut config = if std::path::Path::new(config_path).exists() {
        match Config::from_file(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Error loading configuration {config_path}: {e}");
                process::exit(1);
            }
        }
    } else {
        log::debug!("no configuration at {config_path}, using defaults");
        Config::default()
    };

    if let Some(model_path) = matches.get_one::<String>("model") {
        config.model.artifact_path = model_path.clone();
    }

    if matches.get_flag("test-config") {
        test_config(&config);
        return;
    }

    let engine = match build_engine(&config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("❌ Failed to initialize scoring engine: {e}");
            process::exit(1);
        }
    };

    let as_json = matches.get_flag("json");

    if let Some(message_file) = matches.get_one::<String>("score") {
        let message = match read_message_file(message_file) {
            Ok(message) => message,
            Err(e) => {
                eprintln!("❌ Error reading message file {message_file}: {e}");
                process::exit(1);
            }
        };
        report(&engine.predict(&message), as_json);
        return;
    }

    if matches.contains_id("subject") || matches.contains_id("body") {
        let message = Message {
            subject: matches.get_one::<String>("subject").cloned(),
            body: matches.get_one::<String>("body").cloned(),
        };
        report(&engine.predict(&message), as_json);
        return;
    }

    if matches.get_flag("demo") {
        run_demo(&engine, as_json);
        return;
    }

    eprintln!("Nothing to do. Use --score, --subject/--body, or --demo (see --help).");
    process::exit(2);
}

fn build_engine(config: &Config) -> anyhow::Result<ScoringEngine> {
    let mut model = LinearModel::from_file(&config.model.artifact_path)?;
    if let Some(threshold) = config.model.threshold {
        log::info!(
            "overriding artifact threshold {} with configured {threshold}",
            model.threshold()
        );
        model.set_threshold(threshold);
    }

    let tables = config.tables.as_ref();
    let rules = match tables.and_then(|t| t.rules_path.as_ref()) {
        Some(path) => RuleTable::from_file(path)?,
        None => RuleTable::default(),
    };
    let risk = match tables.and_then(|t| t.risk_path.as_ref()) {
        Some(path) => RiskTable::from_file(path)?,
        None => RiskTable::default(),
    };

    log::info!(
        "scoring engine ready: {} vocabulary terms, threshold {}",
        model.vocabulary_len(),
        model.threshold()
    );
    Ok(ScoringEngine::new(model, rules, risk))
}

fn test_config(config: &Config) {
    println!("🔍 Testing configuration...");
    println!();
    println!("Model artifact: {}", config.model.artifact_path);
    if let Some(threshold) = config.model.threshold {
        println!("Threshold override: {threshold}");
    }
    match build_engine(config) {
        Ok(engine) => {
            println!(
                "Vocabulary terms: {}",
                engine.model().vocabulary_len()
            );
            println!("Decision threshold: {}", engine.model().threshold());
            println!("✅ Configuration and artifact validated");
        }
        Err(e) => {
            println!("❌ Configuration validation failed:");
            println!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Reads a message from disk. JSON objects with `subject`/`body` fields are
/// accepted as-is; anything else is treated as header lines (Subject: plus
/// continuations) separated from the body by the first blank line. A file
/// with no header block is all body.
fn read_message_file(path: &str) -> anyhow::Result<Message> {
    let content = std::fs::read_to_string(path)?;

    if content.trim_start().starts_with('{') {
        let message: Message = serde_json::from_str(&content)?;
        return Ok(message);
    }

    let mut subject: Option<String> = None;
    let mut body_lines: Vec<&str> = Vec::new();
    let mut in_headers = content.lines().next().is_some_and(|l| l.contains(':'));
    let mut last_was_subject = false;

    for line in content.lines() {
        if in_headers {
            if line.trim().is_empty() {
                in_headers = false;
                continue;
            }
            if (line.starts_with(' ') || line.starts_with('\t')) && last_was_subject {
                if let Some(existing) = subject.as_mut() {
                    existing.push(' ');
                    existing.push_str(line.trim());
                }
                continue;
            }
            if let Some((key, value)) = line.split_once(':') {
                last_was_subject = key.trim().eq_ignore_ascii_case("subject");
                if last_was_subject {
                    subject = Some(value.trim().to_string());
                }
                continue;
            }
            // Not header-shaped after all; everything from here is body.
            in_headers = false;
        }
        body_lines.push(line);
    }

    Ok(Message {
        subject,
        body: Some(body_lines.join("\n")),
    })
}

fn run_demo(engine: &ScoringEngine, as_json: bool) {
    let samples = [
        Message::new(
            "URGENT: verify your password now",
            "Click here to confirm your login within 24 hours or your account will be suspended.",
        ),
        Message::new(
            "Invoice 4417 payment failed",
            "Your payment could not be processed. Update your account at http://billing-refresh.example to avoid suspension.",
        ),
        Message::new(
            "Team offsite agenda",
            "Sharing the agenda for Thursday. Lunch is booked for noon; slides are in the usual folder.",
        ),
    ];

    for (i, message) in samples.iter().enumerate() {
        println!("📧 Sample {}: {}", i + 1, message.subject.as_deref().unwrap_or(""));
        println!("═══════════════════════════════════════");
        report(&engine.predict(message), as_json);
        println!();
    }
}

fn report(result: &PredictionResult, as_json: bool) {
    if as_json {
        match serde_json::to_string_pretty(result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("❌ Failed to serialize result: {e}");
                process::exit(1);
            }
        }
        return;
    }

    println!("Label: {}", result.label.as_str());
    println!("Phishing probability: {:.2}", result.probability_phishing);
    println!("Summary: {}", result.summary);

    println!();
    println!("📊 Risk breakdown:");
    for (category, share) in &result.risk_breakdown {
        println!("  {:<12} {share:.2}", category.as_str());
    }

    if !result.explanations.is_empty() {
        println!();
        println!("🧩 Contributing terms:");
        for contribution in &result.explanations {
            println!("  {:<24} +{:.4}", contribution.term, contribution.weight);
        }
    }

    if !result.reasons.is_empty() {
        println!();
        println!("⚠️  Rule matches:");
        for hit in &result.reasons {
            println!("  {}: {}", hit.category, hit.phrases.join(", "));
        }
    }

    if !result.highlight_spans.is_empty() {
        println!();
        println!("🖍  Highlighted evidence:");
        for span in &result.highlight_spans {
            println!("  [{}..{}] \"{}\"", span.start, span.end, span.text);
        }
    }

    println!();
    println!("💡 Advice:");
    for (i, step) in result.advice.iter().enumerate() {
        println!("  {}. {step}", i + 1);
    }
}
