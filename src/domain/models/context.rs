//! Assembled context handed to the response generator.

use serde::{Deserialize, Serialize};

use super::profile::IntentObservation;
use super::signal::Signal;

/// A historical passage returned by the similarity index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarPassage {
    pub text: String,
    pub role: String,
    pub score: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssembledContext {
    /// Section-labelled profile text. Empty when nothing is known yet.
    pub profile_summary: String,
    pub relevant_passages: Vec<SimilarPassage>,
    pub recent_history_text: String,
    /// `ceil(total characters / 4)`, a rough token count.
    pub size_estimate: usize,
    pub support_style: Option<Signal>,
    pub current_intent: Option<IntentObservation>,
}

impl AssembledContext {
    /// Render the passages section, or an empty string if there are none.
    pub fn passages_text(&self) -> String {
        if self.relevant_passages.is_empty() {
            return String::new();
        }
        let mut text = String::from("## Relevant past conversation\n");
        for passage in &self.relevant_passages {
            text.push_str(&format!("- ({}) {}\n", passage.role, passage.text));
        }
        text
    }

    /// All sections joined for prompt injection.
    pub fn format_for_prompt(&self) -> String {
        [
            self.profile_summary.clone(),
            self.passages_text(),
            self.recent_history_text.clone(),
        ]
        .into_iter()
        .filter(|section| !section.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
    }
}

/// Rough token estimate: one token per four characters, rounded up.
pub fn estimate_size(text_chars: usize) -> usize {
    text_chars.div_ceil(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_size_rounds_up() {
        assert_eq!(estimate_size(0), 0);
        assert_eq!(estimate_size(1), 1);
        assert_eq!(estimate_size(4), 1);
        assert_eq!(estimate_size(9), 3);
    }

    #[test]
    fn test_empty_context_formats_to_nothing() {
        let context = AssembledContext::default();
        assert!(context.format_for_prompt().is_empty());
        assert!(context.passages_text().is_empty());
    }
}
