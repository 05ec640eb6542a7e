//! Operator-edited labels
//!
//! The host reports the key title whenever the operator edits it. Titles can
//! come back with a value we rendered earlier still attached ("Mic 1\n5dB",
//! "Mic 1 (5 dB)"), so only the label part is kept.

use regex::Regex;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

fn value_annotation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        #[allow(clippy::expect_used)] // literal pattern
        Regex::new(r"(?i)\s*\(?\s*[+-]?\d+\s*db\s*\)?\s*$").expect("valid annotation regex")
    })
}

/// First line of `raw` with any trailing dB annotation removed
pub fn clean_title(raw: &str) -> String {
    let first_line = raw.lines().next().unwrap_or("");
    value_annotation()
        .replace(first_line, "")
        .trim()
        .to_string()
}

/// In-memory labels per control. Not persisted; the host re-sends titles on appear.
#[derive(Debug, Default)]
pub struct TitleCache {
    labels: RwLock<HashMap<String, String>>,
}

impl TitleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the cleaned label for a control and return it
    pub fn update(&self, id: &str, raw_title: &str) -> String {
        let label = clean_title(raw_title);
        let mut labels = self.labels.write().unwrap_or_else(|e| e.into_inner());
        labels.insert(id.to_string(), label.clone());
        label
    }

    /// Label for a control, empty when none was captured
    pub fn label(&self, id: &str) -> String {
        let labels = self.labels.read().unwrap_or_else(|e| e.into_inner());
        labels.get(id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_plain_label() {
        assert_eq!(clean_title("Mic 1"), "Mic 1");
        assert_eq!(clean_title("  Stage  "), "Stage");
    }

    #[test]
    fn drops_trailing_lines() {
        assert_eq!(clean_title("Mic 1\n5dB"), "Mic 1");
        assert_eq!(clean_title("Mic 1\r\nextra\nmore"), "Mic 1");
    }

    #[test]
    fn strips_value_annotation() {
        assert_eq!(clean_title("Mic 1 -12dB"), "Mic 1");
        assert_eq!(clean_title("Mic 1 (5 dB)"), "Mic 1");
        assert_eq!(clean_title("Talkback +3 DB"), "Talkback");
    }

    #[test]
    fn annotation_only_title_becomes_empty() {
        assert_eq!(clean_title("0dB"), "");
        assert_eq!(clean_title(""), "");
    }

    #[test]
    fn digits_inside_label_survive() {
        assert_eq!(clean_title("Bus 2 Left"), "Bus 2 Left");
    }

    #[test]
    fn cache_is_keyed_by_control() {
        let cache = TitleCache::new();
        assert_eq!(cache.label("a"), "");

        assert_eq!(cache.update("a", "Mic\n3dB"), "Mic");
        cache.update("b", "Line");

        assert_eq!(cache.label("a"), "Mic");
        assert_eq!(cache.label("b"), "Line");

        cache.update("a", "Vocal");
        assert_eq!(cache.label("a"), "Vocal");
    }
}
