//! Classifier backed by an OpenAI-compatible chat completions API.
//!
//! Each batch is one `POST {base}/chat/completions` request with structured
//! output enabled, so the model is asked to answer with the strict
//! `song_sentiment` schema. The answer is still validated locally.

use log::debug;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::{build_prompt, parse_classification, response_schema, ClassificationResult, Classifier, SYSTEM_PROMPT};
use crate::config::ClassifierSettings;
use crate::error::{ClassifyError, ServiceError};
use crate::track::LibraryEntry;

const SERVICE: &str = "OpenAI";
const SCHEMA_NAME: &str = "song_sentiment";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    refusal: Option<String>,
}

/// Blocking OpenAI chat completions client.
pub struct OpenAiClassifier {
    agent: ureq::Agent,
    settings: ClassifierSettings,
}

impl OpenAiClassifier {
    pub fn new(settings: ClassifierSettings, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent, settings }
    }

    fn request_body(&self, tracks: &[LibraryEntry]) -> Value {
        json!({
            "model": self.settings.model,
            "temperature": self.settings.temperature,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_prompt(tracks) }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": SCHEMA_NAME,
                    "schema": response_schema(),
                    "strict": true
                }
            }
        })
    }
}

/// Pulls the answer text out of a chat completion.
fn answer_content(response: ChatResponse) -> Result<String, ClassifyError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::decode(SERVICE, "response has no choices"))?;

    if let Some(refusal) = choice.message.refusal {
        return Err(ClassifyError::SchemaViolation(format!("model refused: {refusal}")));
    }

    choice
        .message
        .content
        .ok_or_else(|| ClassifyError::SchemaViolation("response has no content".to_string()))
}

impl Classifier for OpenAiClassifier {
    fn name(&self) -> &str {
        &self.settings.model
    }

    fn classify(&self, tracks: &[LibraryEntry]) -> Result<ClassificationResult, ClassifyError> {
        let url = format!("{}/chat/completions", self.settings.base_url);
        debug!("Classifying {} tracks with {}", tracks.len(), self.settings.model);

        let response: ChatResponse = self
            .agent
            .post(&url)
            .set("Authorization", &format!("Bearer {}", self.settings.api_key))
            .send_json(self.request_body(tracks))
            .map_err(|e| ServiceError::from_ureq(SERVICE, e))?
            .into_json()
            .map_err(|e| ServiceError::decode(SERVICE, e.to_string()))?;

        parse_classification(&answer_content(response)?)
    }
}
