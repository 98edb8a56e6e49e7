//! Intent detection.
//!
//! The harness only requires a single `classify(text) -> intent`
//! capability, so real classifiers and the bundled keyword stub are
//! interchangeable at every call site.

/// Strategy interface for intent detection.
pub trait IntentClassifier: Send + Sync {
    fn name(&self) -> &str;

    /// Classify `text` into an intent name, or `"unknown"`.
    fn classify(&self, text: &str) -> String;
}

/// Keyword-substring intent matcher over a closed intent set.
///
/// This is an explicit placeholder for a real intent model: it returns the
/// first intent whose space-separated form appears in the lowercased text,
/// and `"unknown"` otherwise. Its behavior is pinned by tests as a
/// fixture; it is not a classifier design to build on.
pub struct KeywordIntentClassifier {
    intents: Vec<String>,
}

impl Default for KeywordIntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordIntentClassifier {
    /// Create the stub with the default rebate-domain intents.
    pub fn new() -> Self {
        Self {
            intents: vec![
                "check_eligibility".to_string(),
                "resolve_dispute".to_string(),
                "medication_query".to_string(),
            ],
        }
    }

    /// Create the stub with a custom intent set.
    pub fn with_intents(intents: Vec<String>) -> Self {
        Self { intents }
    }
}

impl IntentClassifier for KeywordIntentClassifier {
    fn name(&self) -> &str {
        "keyword_stub"
    }

    fn classify(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        for intent in &self.intents {
            if lowered.contains(&intent.replace('_', " ")) {
                return intent.clone();
            }
        }
        "unknown".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_intents() {
        let classifier = KeywordIntentClassifier::new();
        assert_eq!(classifier.classify("check eligibility please"), "check_eligibility");
        assert_eq!(classifier.classify("I want to RESOLVE DISPUTE #42"), "resolve_dispute");
        assert_eq!(classifier.classify("medication query about ibuprofen"), "medication_query");
    }

    #[test]
    fn test_unknown_fallback() {
        let classifier = KeywordIntentClassifier::new();
        assert_eq!(classifier.classify("what's the weather"), "unknown");
        assert_eq!(classifier.classify(""), "unknown");
    }

    #[test]
    fn test_custom_intent_set() {
        let classifier =
            KeywordIntentClassifier::with_intents(vec!["track_shipment".to_string()]);
        assert_eq!(classifier.classify("please track shipment 99"), "track_shipment");
        assert_eq!(classifier.classify("check eligibility please"), "unknown");
    }
}
