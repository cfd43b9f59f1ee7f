use super::TermContribution;
use crate::model::LinearModel;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Explanation list cap.
pub const MAX_CONTRIBUTIONS: usize = 10;
/// Of the explained terms, how many may feed the highlighter.
pub const MAX_HIGHLIGHT_TOKENS: usize = 6;
/// Shorter terms are kept in the explanation but excluded from highlighting.
pub const MIN_HIGHLIGHT_LEN: usize = 4;

/// Rank the document's terms by their contribution toward the phishing
/// class. Only terms actually present in the document (strictly positive
/// document weight) are eligible, and only positive contributions are
/// emitted, capped at [`MAX_CONTRIBUTIONS`], descending.
pub fn rank_contributions(
    vector: &HashMap<usize, f64>,
    model: &LinearModel,
) -> Vec<TermContribution> {
    let mut ranked: Vec<(usize, f64)> = vector
        .iter()
        .filter(|(_, &doc_weight)| doc_weight > 0.0)
        .map(|(&index, &doc_weight)| (index, doc_weight * model.coefficient(index)))
        .filter(|(_, contribution)| *contribution > 0.0)
        .collect();

    // Term name breaks weight ties so output order never depends on map
    // iteration order.
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| model.term(a.0).cmp(model.term(b.0)))
    });
    ranked.truncate(MAX_CONTRIBUTIONS);

    ranked
        .into_iter()
        .map(|(index, contribution)| TermContribution {
            term: model.term(index).to_string(),
            weight: contribution,
        })
        .collect()
}

/// The subset of explained terms eligible for highlighting: anything under
/// four characters stays in the explanation list but out of the highlights.
pub fn highlight_tokens(contributions: &[TermContribution]) -> Vec<String> {
    contributions
        .iter()
        .filter(|c| c.term.chars().count() >= MIN_HIGHLIGHT_LEN)
        .take(MAX_HIGHLIGHT_TOKENS)
        .map(|c| c.term.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelArtifact;

    fn model(vocabulary: &[&str], coefficients: &[f64]) -> LinearModel {
        LinearModel::from_artifact(ModelArtifact {
            vocabulary: vocabulary.iter().map(|s| s.to_string()).collect(),
            idf: vec![1.0; vocabulary.len()],
            coefficients: coefficients.to_vec(),
            intercept: 0.0,
            ngram_range: (1, 1),
            stop_words: Vec::new(),
            threshold: None,
        })
        .unwrap()
    }

    #[test]
    fn test_absent_terms_never_emitted() {
        // "lottery" has a large coefficient but does not occur in the text.
        let model = model(&["verify", "lottery"], &[1.0, 9.0]);
        let vector = model.vectorize("please verify now");
        let ranked = rank_contributions(&vector, &model);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].term, "verify");
    }

    #[test]
    fn test_negative_contributions_excluded() {
        let model = model(&["verify", "newsletter"], &[2.0, -2.0]);
        let vector = model.vectorize("verify newsletter");
        let ranked = rank_contributions(&vector, &model);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].term, "verify");
        assert!(ranked[0].weight > 0.0);
    }

    #[test]
    fn test_ordered_descending_and_capped() {
        let vocabulary: Vec<String> = (0..15).map(|i| format!("term{i:02}")).collect();
        let vocab_refs: Vec<&str> = vocabulary.iter().map(|s| s.as_str()).collect();
        let coefficients: Vec<f64> = (1..=15).map(|i| i as f64).collect();
        let model = model(&vocab_refs, &coefficients);
        let text = vocabulary.join(" ");
        let ranked = rank_contributions(&model.vectorize(&text), &model);
        assert_eq!(ranked.len(), MAX_CONTRIBUTIONS);
        for pair in ranked.windows(2) {
            assert!(pair[0].weight >= pair[1].weight);
        }
        // Highest-coefficient term wins under uniform idf.
        assert_eq!(ranked[0].term, "term14");
    }

    #[test]
    fn test_empty_document_yields_empty_list() {
        let model = model(&["verify"], &[1.0]);
        let ranked = rank_contributions(&model.vectorize(""), &model);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_highlight_tokens_skip_short_terms() {
        let contributions = vec![
            TermContribution { term: "urgent".to_string(), weight: 0.9 },
            TermContribution { term: "url".to_string(), weight: 0.8 },
            TermContribution { term: "verify".to_string(), weight: 0.7 },
        ];
        let tokens = highlight_tokens(&contributions);
        assert_eq!(tokens, vec!["urgent", "verify"]);
    }

    #[test]
    fn test_highlight_tokens_capped_at_six() {
        let contributions: Vec<TermContribution> = (0..10)
            .map(|i| TermContribution { term: format!("token{i}"), weight: 1.0 })
            .collect();
        assert_eq!(highlight_tokens(&contributions).len(), MAX_HIGHLIGHT_TOKENS);
    }
}
