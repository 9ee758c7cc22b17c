use serde::Serialize;
use tracing::warn;

use crate::config::AppConfig;
use crate::therapy::remote::RemoteGenerator;
use crate::therapy::templates;

/// Phrases that betray how hard the response is roasting.
const ROAST_INDICATORS: [&str; 10] = [
    "really",
    "seriously",
    "honestly",
    "maybe try",
    "have you considered",
    "shocking",
    "revolutionary",
    "amazing",
    "stunning",
    "incredible",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdviceType {
    #[serde(rename = "Backhanded Suggestion")]
    BackhandedSuggestion,
    #[serde(rename = "Stating the Obvious")]
    StatingTheObvious,
    #[serde(rename = "Rhetorical Questioning")]
    RhetoricalQuestioning,
    #[serde(rename = "Emotional Invalidation")]
    EmotionalInvalidation,
    #[serde(rename = "General Roasting")]
    GeneralRoasting,
}

#[derive(Debug, Clone, Serialize)]
pub struct TherapyResponse {
    pub response: String,
    pub advice_type: AdviceType,
    pub roast_level: f64,
}

/// Text generation strategy, fixed at construction: either the local
/// templater, or a remote chat-completion model that falls back to the
/// local templater on any failure. Exactly one fallback attempt, never
/// a mixed response.
pub enum TextGenerator {
    Local,
    Remote(RemoteGenerator),
}

impl TextGenerator {
    pub fn from_config(config: &AppConfig) -> Self {
        match &config.therapy.remote {
            Some(remote) => TextGenerator::Remote(RemoteGenerator::new(
                remote,
                config.therapy.sarcasm_level,
                config.therapy.roast_intensity,
            )),
            None => TextGenerator::Local,
        }
    }

    pub async fn generate(&self, user_message: &str) -> TherapyResponse {
        match self {
            TextGenerator::Local => local_response(user_message),
            TextGenerator::Remote(remote) => match remote.complete(user_message).await {
                Ok(text) => annotate(text),
                Err(e) => {
                    warn!(error = %e, "remote generation failed, using local templates");
                    local_response(user_message)
                }
            },
        }
    }
}

fn local_response(user_message: &str) -> TherapyResponse {
    annotate(templates::compose(user_message))
}

/// Classification and roast level are derived from the generated text,
/// the same way on both the local and the remote path.
fn annotate(text: String) -> TherapyResponse {
    TherapyResponse {
        advice_type: classify_advice(&text),
        roast_level: roast_level(&text),
        response: text,
    }
}

/// First matching rule wins; the order is part of the contract.
pub fn classify_advice(text: &str) -> AdviceType {
    let lowered = text.to_lowercase();
    if ["try", "maybe", "consider"].iter().any(|w| lowered.contains(w)) {
        AdviceType::BackhandedSuggestion
    } else if ["obvious", "clearly", "obviously"]
        .iter()
        .any(|w| lowered.contains(w))
    {
        AdviceType::StatingTheObvious
    } else if text.contains('?') {
        AdviceType::RhetoricalQuestioning
    } else if ["feel", "emotion", "feeling"].iter().any(|w| lowered.contains(w)) {
        AdviceType::EmotionalInvalidation
    } else {
        AdviceType::GeneralRoasting
    }
}

/// `min(0.9, hits * 0.2 + 0.3)` over the fixed indicator phrases.
pub fn roast_level(text: &str) -> f64 {
    let lowered = text.to_lowercase();
    let hits = ROAST_INDICATORS
        .iter()
        .filter(|phrase| lowered.contains(*phrase))
        .count();
    (hits as f64 * 0.2 + 0.3).min(0.9)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_order_first_match_wins() {
        assert_eq!(
            classify_advice("Maybe clearly? You feel things."),
            AdviceType::BackhandedSuggestion
        );
        assert_eq!(
            classify_advice("That is obvious."),
            AdviceType::StatingTheObvious
        );
        assert_eq!(
            classify_advice("And how did that work out?"),
            AdviceType::RhetoricalQuestioning
        );
        assert_eq!(
            classify_advice("Your feelings are noted."),
            AdviceType::EmotionalInvalidation
        );
        assert_eq!(classify_advice("No."), AdviceType::GeneralRoasting);
    }

    #[test]
    fn classification_ignores_case() {
        assert_eq!(
            classify_advice("MAYBE SO"),
            AdviceType::BackhandedSuggestion
        );
    }

    #[test]
    fn roast_level_scales_and_clamps() {
        assert!((roast_level("nothing spicy here") - 0.3).abs() < 1e-9);
        assert!((roast_level("really shocking") - 0.7).abs() < 1e-9);
        // Four or more hits saturate at 0.9.
        assert!(
            (roast_level("really shocking revolutionary amazing stunning") - 0.9).abs() < 1e-9
        );
    }

    #[tokio::test]
    async fn local_generation_annotates_from_generated_text() {
        let generated = TextGenerator::Local.generate("I'm worried").await;
        // The anxiety branch always carries "just" and a question mark.
        assert!(generated.response.contains("Anxiety, you say?"));
        assert_eq!(generated.advice_type, classify_advice(&generated.response));
        assert!((generated.roast_level - roast_level(&generated.response)).abs() < 1e-9);
        assert!(generated.roast_level >= 0.3 && generated.roast_level <= 0.9);
    }
}
