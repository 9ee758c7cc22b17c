use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RemoteModelConfig;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
    presence_penalty: f64,
    frequency_penalty: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Chat-completion client for the remote therapy voice. One request,
/// no timeout, no retries; the caller falls back to the local templater
/// on any error.
pub struct RemoteGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    sarcasm_level: f64,
    roast_intensity: f64,
}

impl RemoteGenerator {
    pub fn new(config: &RemoteModelConfig, sarcasm_level: f64, roast_intensity: f64) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            sarcasm_level,
            roast_intensity,
        }
    }

    pub async fn complete(&self, user_message: &str) -> Result<String, ApiError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: self.system_prompt(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(user_message),
                },
            ],
            max_tokens: 200,
            temperature: 0.9,
            presence_penalty: 0.6,
            frequency_penalty: 0.6,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::ExternalService(format!("chat completion request: {e}")))?
            .error_for_status()
            .map_err(|e| ApiError::ExternalService(format!("chat completion status: {e}")))?
            .json::<ChatResponse>()
            .await
            .map_err(|e| ApiError::ExternalService(format!("chat completion body: {e}")))?;

        let text = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                ApiError::ExternalService("chat completion returned no choices".into())
            })?;

        debug!(model = %self.model, "remote therapy response generated");
        Ok(text)
    }

    fn system_prompt(&self) -> String {
        format!(
            "You are a therapist who is literally the user talking to themselves in a mirror. \
             You are sarcastic, slightly condescending, but oddly insightful. You give advice \
             that's technically correct but delivered with the emotional warmth of a refrigerator.\n\
             Rules:\n\
             1. Be sarcastic but not cruel\n\
             2. Mix genuine therapy concepts with humor\n\
             3. Use therapy cliches ironically\n\
             4. Act like you're the user's inner voice that's tired of their nonsense\n\
             5. Keep responses under 150 words\n\
             6. End with a backhanded compliment or obvious observation\n\
             Sarcasm Level: {}/1.0\n\
             Roast Intensity: {}/1.0",
            self.sarcasm_level, self.roast_intensity
        )
    }
}

fn user_prompt(user_message: &str) -> String {
    format!(
        "The user (who is also you) says: \"{user_message}\"\n\
         Respond as their own reflection giving therapy advice that's technically helpful \
         but delivered with maximum sarcasm and minimal emotional support."
    )
}
