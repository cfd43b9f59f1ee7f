use anyhow::{bail, Context};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// On-disk form of a trained tf-idf + logistic-regression pair, exported by
/// the offline training process. Vocabulary, idf, and coefficients are
/// aligned by index; `ngram_range` and `stop_words` describe the tokenization
/// the vectorizer was fitted with so inference reproduces it exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub vocabulary: Vec<String>,
    pub idf: Vec<f64>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default)]
    pub threshold: Option<f64>,
}

/// Read-only handle over a loaded artifact. Built once at startup, shared
/// across requests without locking.
pub struct LinearModel {
    terms: Vec<String>,
    term_index: HashMap<String, usize>,
    idf: Vec<f64>,
    coefficients: Vec<f64>,
    intercept: f64,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    threshold: f64,
    token_pattern: Regex,
}

impl LinearModel {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read model artifact {path}"))?;
        let artifact: ModelArtifact = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse model artifact {path}"))?;
        Self::from_artifact(artifact)
    }

    /// Structural validation happens at load time, never per request.
    pub fn from_artifact(artifact: ModelArtifact) -> anyhow::Result<Self> {
        let vocab_len = artifact.vocabulary.len();
        if artifact.idf.len() != vocab_len || artifact.coefficients.len() != vocab_len {
            bail!(
                "artifact arrays misaligned: {vocab_len} vocabulary terms, {} idf values, {} coefficients",
                artifact.idf.len(),
                artifact.coefficients.len()
            );
        }
        let (lo, hi) = artifact.ngram_range;
        if lo == 0 || lo > hi {
            bail!("invalid ngram_range ({lo}, {hi})");
        }

        let term_index = artifact
            .vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();

        log::debug!(
            "loaded linear model: {vocab_len} terms, ngram_range ({lo}, {hi}), threshold {}",
            artifact.threshold.unwrap_or(DEFAULT_THRESHOLD)
        );

        Ok(Self {
            terms: artifact.vocabulary,
            term_index,
            idf: artifact.idf,
            coefficients: artifact.coefficients,
            intercept: artifact.intercept,
            ngram_range: artifact.ngram_range,
            stop_words: artifact.stop_words.into_iter().collect(),
            threshold: artifact.threshold.unwrap_or(DEFAULT_THRESHOLD),
            token_pattern: Regex::new(r"\b\w\w+\b").unwrap(),
        })
    }

    /// Sparse tf-idf vector for one document, keyed by vocabulary index.
    /// Lowercases first (the training vectorizer did, so the `URL`
    /// placeholder lands on the vocabulary term `url`), then tokens of two or
    /// more word characters, stop words dropped before n-gram assembly, raw
    /// counts weighted by idf, then L2-normalized. Terms outside the
    /// vocabulary contribute nothing; empty text yields an empty vector.
    pub fn vectorize(&self, text: &str) -> HashMap<usize, f64> {
        let text = text.to_lowercase();
        let tokens: Vec<&str> = self
            .token_pattern
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|token| !self.stop_words.contains(*token))
            .collect();

        let mut vector: HashMap<usize, f64> = HashMap::new();
        let (lo, hi) = self.ngram_range;
        for n in lo..=hi {
            for window in tokens.windows(n) {
                let gram = window.join(" ");
                if let Some(&index) = self.term_index.get(gram.as_str()) {
                    *vector.entry(index).or_insert(0.0) += 1.0;
                }
            }
        }

        for (index, value) in vector.iter_mut() {
            *value *= self.idf[*index];
        }
        let norm = vector.values().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in vector.values_mut() {
                *value /= norm;
            }
        }
        vector
    }

    pub fn predict_proba(&self, text: &str) -> f64 {
        self.probability_for(&self.vectorize(text))
    }

    /// Positive-class probability from an already-computed document vector.
    pub fn probability_for(&self, vector: &HashMap<usize, f64>) -> f64 {
        let z = self.intercept
            + vector
                .iter()
                .map(|(&index, &value)| self.coefficients[index] * value)
                .sum::<f64>();
        1.0 / (1.0 + (-z).exp())
    }

    pub fn term(&self, index: usize) -> &str {
        &self.terms[index]
    }

    pub fn coefficient(&self, index: usize) -> f64 {
        self.coefficients[index]
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Replace the artifact's decision threshold, e.g. from a config
    /// override. Called during startup, before the model is shared.
    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    pub fn vocabulary_len(&self) -> usize {
        self.terms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(vocabulary: &[&str], coefficients: &[f64]) -> ModelArtifact {
        ModelArtifact {
            vocabulary: vocabulary.iter().map(|s| s.to_string()).collect(),
            idf: vec![1.0; vocabulary.len()],
            coefficients: coefficients.to_vec(),
            intercept: 0.0,
            ngram_range: (1, 2),
            stop_words: vec!["your".to_string(), "the".to_string()],
            threshold: None,
        }
    }

    #[test]
    fn test_rejects_misaligned_arrays() {
        let mut bad = artifact(&["verify", "account"], &[1.0, 2.0]);
        bad.idf.pop();
        assert!(LinearModel::from_artifact(bad).is_err());

        let bad = artifact(&["verify", "account"], &[1.0]);
        assert!(LinearModel::from_artifact(bad).is_err());
    }

    #[test]
    fn test_rejects_bad_ngram_range() {
        let mut bad = artifact(&["verify"], &[1.0]);
        bad.ngram_range = (0, 1);
        assert!(LinearModel::from_artifact(bad).is_err());
        let mut bad = artifact(&["verify"], &[1.0]);
        bad.ngram_range = (2, 1);
        assert!(LinearModel::from_artifact(bad).is_err());
    }

    #[test]
    fn test_empty_vocabulary_is_tolerated() {
        let model = LinearModel::from_artifact(artifact(&[], &[])).unwrap();
        assert!(model.vectorize("verify your account now").is_empty());
        assert_eq!(model.predict_proba("verify your account now"), 0.5);
    }

    #[test]
    fn test_vectorize_counts_vocabulary_terms_only() {
        let model =
            LinearModel::from_artifact(artifact(&["verify", "account"], &[1.0, 1.0])).unwrap();
        let vector = model.vectorize("verify account verify unknown");
        assert_eq!(vector.len(), 2);
        // verify appears twice, account once; after L2 normalization the
        // ratio survives.
        let verify = vector[&0];
        let account = vector[&1];
        assert!(verify > account);
        assert!((verify / account - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_vector_is_l2_normalized() {
        let model =
            LinearModel::from_artifact(artifact(&["verify", "account"], &[1.0, 1.0])).unwrap();
        let vector = model.vectorize("verify account");
        let norm: f64 = vector.values().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_stop_words_removed_before_ngrams() {
        // "verify your account" with "your" stopped must produce the bigram
        // "verify account", matching the training-time vectorizer.
        let model =
            LinearModel::from_artifact(artifact(&["verify account"], &[1.0])).unwrap();
        let vector = model.vectorize("verify your account");
        assert_eq!(vector.len(), 1);
        assert!(vector.contains_key(&0));
    }

    #[test]
    fn test_url_placeholder_matches_lowercase_vocabulary() {
        // The normalizer injects an uppercase URL placeholder; the training
        // vectorizer lowercased it, so the vocabulary holds "url".
        let model = LinearModel::from_artifact(artifact(&["url"], &[2.0])).unwrap();
        let vector = model.vectorize("visit URL now");
        assert_eq!(vector.len(), 1);
        assert!(vector.contains_key(&0));
    }

    #[test]
    fn test_single_char_tokens_ignored() {
        let model = LinearModel::from_artifact(artifact(&["a"], &[5.0])).unwrap();
        assert!(model.vectorize("a a a").is_empty());
    }

    #[test]
    fn test_probability_moves_with_coefficient_sign() {
        let model =
            LinearModel::from_artifact(artifact(&["suspended", "newsletter"], &[3.0, -3.0]))
                .unwrap();
        assert!(model.predict_proba("account suspended") > 0.5);
        assert!(model.predict_proba("monthly newsletter") < 0.5);
    }

    #[test]
    fn test_threshold_default_and_override() {
        let model = LinearModel::from_artifact(artifact(&["verify"], &[1.0])).unwrap();
        assert_eq!(model.threshold(), DEFAULT_THRESHOLD);

        let mut calibrated = artifact(&["verify"], &[1.0]);
        calibrated.threshold = Some(0.42);
        let model = LinearModel::from_artifact(calibrated).unwrap();
        assert_eq!(model.threshold(), 0.42);
    }
}
