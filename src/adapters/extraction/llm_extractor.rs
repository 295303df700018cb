//! Observation extractor backed by a text generator.
//!
//! The generator is asked for a single JSON object matching
//! [`ExtractionBatch`]. Replies wrapped in a fenced code block, or with
//! chatter around the object, are tolerated.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Axis, ExtractionBatch, Message, BIG_FIVE_TRAITS, MORAL_FOUNDATIONS};
use crate::domain::ports::{Generator, ObservationExtractor};

pub struct LlmObservationExtractor {
    generator: Arc<dyn Generator>,
}

impl LlmObservationExtractor {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    fn build_prompt(message: &Message) -> String {
        let dimensions = Axis::ALL
            .iter()
            .filter(|axis| axis.is_single_signal())
            .map(|axis| axis.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"Extract psychological observations from the user message below.
Reply with one JSON object and nothing else, using these keys (omit empty lists):
  "signals":    [{{"dimension", "value", "quote", "increment"?}}]
  "values":     [{{"name", "value_type": "stated"|"revealed", "quote"}}]
  "challenges": [{{"description", "quote"}}]
  "goals":      [{{"description", "status"?: "active"|"in_progress"|"achieved"|"abandoned", "quote"}}]
  "maslow":     [{{"level", "observation_type": "concern"|"stable"|"aspiration", "description", "quote"}}]
  "intents":    [{{"intent_type", "description", "quote"}}]
Signal dimensions are one of: {dimensions}; "life_situation.<aspect>";
"moral.<foundation>" with foundation one of {foundations};
or "big_five.<trait>" with trait one of {traits}.
Every quote must be copied verbatim from the message. Do not guess.

User message:
"""
{content}
""""#,
            foundations = MORAL_FOUNDATIONS.join(", "),
            traits = BIG_FIVE_TRAITS.join(", "),
            content = message.content
        )
    }
}

/// Pull the JSON object out of a generator reply.
pub fn parse_batch(reply: &str) -> DomainResult<ExtractionBatch> {
    let body = strip_code_fence(reply.trim());
    let start = body.find('{');
    let end = body.rfind('}');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &body[start..=end],
        _ => {
            return Err(DomainError::SerializationError(
                "extractor reply contained no JSON object".to_string(),
            ))
        }
    };
    Ok(serde_json::from_str(json)?)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Skip the info string (e.g. `json`) on the opening fence line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.rfind("```").map_or(rest, |end| &rest[..end])
}

#[async_trait]
impl ObservationExtractor for LlmObservationExtractor {
    async fn extract(&self, message: &Message) -> DomainResult<ExtractionBatch> {
        let reply = self.generator.generate(&Self::build_prompt(message)).await?;
        let batch = parse_batch(&reply)?;
        tracing::debug!(message_id = %message.id, items = batch.len(), "Extracted observations");
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    struct CannedGenerator(String);

    #[async_trait]
    impl Generator for CannedGenerator {
        async fn generate(&self, _prompt: &str) -> DomainResult<String> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_parse_plain_json() {
        let batch = parse_batch(r#"{"values": [{"name": "family", "value_type": "stated", "quote": "family first"}]}"#)
            .unwrap();
        assert_eq!(batch.values.len(), 1);
        assert!(batch.signals.is_empty());
    }

    #[test]
    fn test_parse_fenced_json() {
        let reply = "```json\n{\"challenges\": [{\"description\": \"sleep\", \"quote\": \"I can't sleep\"}]}\n```";
        let batch = parse_batch(reply).unwrap();
        assert_eq!(batch.challenges[0].description, "sleep");
    }

    #[test]
    fn test_parse_with_surrounding_text() {
        let reply = "Here you go:\n{\"intents\": [{\"intent_type\": \"venting\", \"quote\": \"ugh\"}]}\nHope that helps.";
        let batch = parse_batch(reply).unwrap();
        assert_eq!(batch.intents.len(), 1);
        assert!(batch.intents[0].description.is_empty());
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(parse_batch("I could not find anything.").is_err());
    }

    #[tokio::test]
    async fn test_extract_uses_generator_reply() {
        let generator = Arc::new(CannedGenerator(
            r#"{"signals": [{"dimension": "risk_tolerance", "value": "low", "quote": "I play it safe"}]}"#.to_string(),
        ));
        let extractor = LlmObservationExtractor::new(generator);
        let message = Message::user(Uuid::new_v4(), "Honestly I play it safe with money.");

        let batch = extractor.extract(&message).await.unwrap();
        assert_eq!(batch.signals[0].dimension, "risk_tolerance");
        assert_eq!(batch.signals[0].increment, None);
    }

    #[test]
    fn test_prompt_embeds_message() {
        let message = Message::user(Uuid::new_v4(), "I want to change careers");
        let prompt = LlmObservationExtractor::build_prompt(&message);
        assert!(prompt.contains("I want to change careers"));
        assert!(prompt.contains("risk_tolerance"));
    }
}
