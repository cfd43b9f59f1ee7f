use regex::Regex;

/// Canonicalizes raw subject/body text into the form the model was trained on.
/// Must stay identical to the training-time cleaning; the rules live only
/// here.
pub struct TextNormalizer {
    url_pattern: Regex,
    whitespace_pattern: Regex,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self {
            url_pattern: Regex::new(r"http\S+|www\.\S+").unwrap(),
            whitespace_pattern: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Concatenate subject and body, lowercase, replace URL-like runs with a
    /// single `URL` placeholder, and collapse whitespace.
    pub fn normalize(&self, subject: &str, body: &str) -> String {
        let combined = format!("{subject} {body}").to_lowercase();
        let replaced = self.url_pattern.replace_all(&combined, " URL ");
        let collapsed = self.whitespace_pattern.replace_all(&replaced, " ");
        collapsed.trim().to_string()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
