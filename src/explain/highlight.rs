use super::{HighlightSpan, RuleHit};
use regex::RegexBuilder;
use std::collections::HashSet;

/// Hard cap on returned spans.
pub const MAX_SPANS: usize = 12;

/// Phrase list for the highlighter: every rule-hit phrase (all categories,
/// flattened) followed by the highlight-eligible top tokens, deduplicated in
/// encounter order.
pub fn collect_phrases(rule_hits: &[RuleHit], tokens: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut phrases = Vec::new();
    for phrase in rule_hits
        .iter()
        .flat_map(|hit| hit.phrases.iter())
        .chain(tokens.iter())
    {
        if seen.insert(phrase.clone()) {
            phrases.push(phrase.clone());
        }
    }
    phrases
}

/// Locate every phrase in the original, uncleaned body and return ordered,
/// non-overlapping spans.
///
/// Each phrase is scanned case-insensitively left to right; within one phrase
/// the scanner advances past each match, so a phrase can never overlap
/// itself. Gathering stops once `max_spans` candidates exist. Candidates are
/// then sorted by start offset (longer span first on ties, preferring the
/// more specific match) and kept greedily: a span survives only if it begins
/// at or after the end of the last kept span.
pub fn highlight(body: &str, phrases: &[String], max_spans: usize) -> Vec<HighlightSpan> {
    if body.is_empty() || phrases.is_empty() || max_spans == 0 {
        return Vec::new();
    }

    let mut candidates: Vec<HighlightSpan> = Vec::new();
    'gather: for phrase in phrases {
        if phrase.is_empty() {
            continue;
        }
        let pattern = match RegexBuilder::new(&regex::escape(phrase))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => pattern,
            Err(_) => continue,
        };
        for found in pattern.find_iter(body) {
            candidates.push(HighlightSpan {
                start: found.start(),
                end: found.end(),
                text: found.as_str().to_string(),
            });
            if candidates.len() >= max_spans {
                break 'gather;
            }
        }
    }

    candidates.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut spans: Vec<HighlightSpan> = Vec::new();
    let mut last_end = 0;
    for candidate in candidates {
        if spans.is_empty() || candidate.start >= last_end {
            last_end = candidate.end;
            spans.push(candidate);
        }
    }
    spans.truncate(max_spans);
    spans
}
