use super::RuleHit;
use serde::{Deserialize, Serialize};

/// One rule category: a display name and the literal phrases that evidence it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleCategory {
    pub name: String,
    pub phrases: Vec<String>,
}

/// Fixed keyword table mapping category names to literal phrases. Declaration
/// order is output order. Immutable after construction; a YAML override file
/// may replace the built-in table at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleTable {
    pub categories: Vec<RuleCategory>,
}

fn category(name: &str, phrases: &[&str]) -> RuleCategory {
    RuleCategory {
        name: name.to_string(),
        phrases: phrases.iter().map(|p| p.to_string()).collect(),
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            categories: vec![
                category(
                    "Urgency / Pressure",
                    &[
                        "urgent",
                        "immediately",
                        "asap",
                        "act now",
                        "right away",
                        "limited time",
                        "final warning",
                    ],
                ),
                category(
                    "Credential / Verification",
                    &[
                        "password",
                        "verify",
                        "login",
                        "sign in",
                        "confirm",
                        "credentials",
                        "update your account",
                    ],
                ),
                category(
                    "Link / Action Prompt",
                    &[
                        "click",
                        "link",
                        "open",
                        "download",
                        "attachment",
                        "verify here",
                        "reset",
                    ],
                ),
                category(
                    "Threat / Consequence",
                    &[
                        "suspended",
                        "locked",
                        "disabled",
                        "terminated",
                        "security alert",
                        "unauthorized",
                        "breach",
                    ],
                ),
                category(
                    "Money / Payment",
                    &[
                        "invoice",
                        "payment",
                        "bank",
                        "refund",
                        "transaction",
                        "wire",
                        "gift card",
                    ],
                ),
            ],
        }
    }
}

impl RuleTable {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let table: RuleTable = serde_yaml::from_str(&content)?;
        Ok(table)
    }

    /// Match every category's phrases against the lowercased subject+body.
    /// This is a lighter pass than the model normalizer: URLs keep their
    /// literal text, so phrases still match inside raw link markup. A
    /// category appears iff at least one phrase is a substring; its matched
    /// phrases come back deduplicated and sorted.
    pub fn match_rules(&self, subject: &str, body: &str) -> Vec<RuleHit> {
        let text = format!("{subject} {body}").to_lowercase();
        let mut hits = Vec::new();
        for category in &self.categories {
            let mut matched: Vec<String> = category
                .phrases
                .iter()
                .filter(|phrase| text.contains(phrase.as_str()))
                .cloned()
                .collect();
            if matched.is_empty() {
                continue;
            }
            matched.sort();
            matched.dedup();
            hits.push(RuleHit {
                category: category.name.clone(),
                phrases: matched,
            });
        }
        hits
    }
}
