use super::TermContribution;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value reported for every category when the document has no positive
/// contributions at all.
pub const NEUTRAL_SHARE: f64 = 0.10;
/// Lower clamp so no category ever displays as exactly empty.
pub const SHARE_FLOOR: f64 = 0.05;

/// Aggregation taxonomy for model-weight evidence. This is a separate,
/// differently-keyed set from the rule engine's display categories; the two
/// tables are maintained independently and are not merged.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum RiskCategory {
    Urgency,
    Credentials,
    Links,
    Threats,
    Money,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 5] = [
        RiskCategory::Urgency,
        RiskCategory::Credentials,
        RiskCategory::Links,
        RiskCategory::Threats,
        RiskCategory::Money,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Urgency => "Urgency",
            RiskCategory::Credentials => "Credentials",
            RiskCategory::Links => "Links",
            RiskCategory::Threats => "Threats",
            RiskCategory::Money => "Money",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFragments {
    pub category: RiskCategory,
    pub fragments: Vec<String>,
}

/// Maps each risk category to the substring fragments that pull a term into
/// it. Fragments are partial words ("verif" matches verify, verified,
/// verification); a term may credit several categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskTable {
    pub entries: Vec<RiskFragments>,
}

fn entry(category: RiskCategory, fragments: &[&str]) -> RiskFragments {
    RiskFragments {
        category,
        fragments: fragments.iter().map(|f| f.to_string()).collect(),
    }
}

impl Default for RiskTable {
    fn default() -> Self {
        Self {
            entries: vec![
                entry(
                    RiskCategory::Urgency,
                    &["urgent", "immediat", "asap", "expir", "act now", "hurry", "deadline", "warning"],
                ),
                entry(
                    RiskCategory::Credentials,
                    &["password", "verif", "login", "account", "credential", "confirm", "sign in", "reset"],
                ),
                entry(
                    RiskCategory::Links,
                    &["url", "click", "link", "http", "www", "download", "attach"],
                ),
                entry(
                    RiskCategory::Threats,
                    &["suspend", "lock", "disabl", "terminat", "unauthoriz", "breach", "alert"],
                ),
                entry(
                    RiskCategory::Money,
                    &["invoice", "payment", "bank", "refund", "card", "wire", "transaction", "money"],
                ),
            ],
        }
    }
}

impl RiskTable {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let table: RiskTable = serde_yaml::from_str(&content)?;
        Ok(table)
    }

    /// Blend the positive term contributions into per-category shares.
    /// share = (sum of matching contributions) / (sum of all positive
    /// contributions), clamped to [`SHARE_FLOOR`, 1.0]. With no positive
    /// contributions every category reports [`NEUTRAL_SHARE`]. Shares are a
    /// relative-strength indicator, not a distribution; they need not sum
    /// to 1.
    pub fn breakdown(&self, contributions: &[TermContribution]) -> BTreeMap<RiskCategory, f64> {
        let positive: Vec<&TermContribution> =
            contributions.iter().filter(|c| c.weight > 0.0).collect();
        let total: f64 = positive.iter().map(|c| c.weight).sum();

        if total <= 0.0 {
            return RiskCategory::ALL
                .iter()
                .map(|&category| (category, NEUTRAL_SHARE))
                .collect();
        }

        let mut sums: BTreeMap<RiskCategory, f64> = RiskCategory::ALL
            .iter()
            .map(|&category| (category, 0.0))
            .collect();
        for contribution in &positive {
            let term = contribution.term.to_lowercase();
            for entry in &self.entries {
                if entry.fragments.iter().any(|fragment| term.contains(fragment.as_str())) {
                    *sums.entry(entry.category).or_insert(0.0) += contribution.weight;
                }
            }
        }

        sums.into_iter()
            .map(|(category, sum)| (category, (sum / total).clamp(SHARE_FLOOR, 1.0)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contribution(term: &str, weight: f64) -> TermContribution {
        TermContribution {
            term: term.to_string(),
            weight,
        }
    }

    #[test]
    fn test_no_positive_contributions_gives_neutral_shares() {
        let table = RiskTable::default();
        for breakdown in [
            table.breakdown(&[]),
            table.breakdown(&[contribution("newsletter", -0.4)]),
        ] {
            assert_eq!(breakdown.len(), 5);
            for (_, share) in breakdown {
                assert_eq!(share, NEUTRAL_SHARE);
            }
        }
    }

    #[test]
    fn test_shares_stay_within_bounds() {
        let table = RiskTable::default();
        let breakdown = table.breakdown(&[
            contribution("verify", 0.8),
            contribution("click", 0.5),
            contribution("meeting", 0.3),
        ]);
        assert_eq!(breakdown.len(), 5);
        for (_, share) in breakdown {
            assert!((SHARE_FLOOR..=1.0).contains(&share));
        }
    }

    #[test]
    fn test_unmatched_categories_get_floor() {
        let table = RiskTable::default();
        let breakdown = table.breakdown(&[contribution("invoice", 1.0)]);
        assert_eq!(breakdown[&RiskCategory::Money], 1.0);
        assert_eq!(breakdown[&RiskCategory::Urgency], SHARE_FLOOR);
        assert_eq!(breakdown[&RiskCategory::Threats], SHARE_FLOOR);
    }

    #[test]
    fn test_fragment_matches_inflected_terms() {
        let table = RiskTable::default();
        let breakdown = table.breakdown(&[contribution("verification", 0.6)]);
        assert!(breakdown[&RiskCategory::Credentials] > SHARE_FLOOR);
    }

    #[test]
    fn test_term_can_credit_multiple_categories() {
        // "account suspended" (a bigram term) carries both a credentials
        // fragment and a threats fragment.
        let table = RiskTable::default();
        let breakdown = table.breakdown(&[
            contribution("account suspended", 0.5),
            contribution("refund", 0.5),
        ]);
        assert_eq!(breakdown[&RiskCategory::Credentials], 0.5);
        assert_eq!(breakdown[&RiskCategory::Threats], 0.5);
        assert_eq!(breakdown[&RiskCategory::Money], 0.5);
    }

    #[test]
    fn test_case_insensitive_fragment_match() {
        let table = RiskTable::default();
        let breakdown = table.breakdown(&[contribution("URL", 0.4)]);
        assert!(breakdown[&RiskCategory::Links] > SHARE_FLOOR);
    }
}
