use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::GenerationConfig;
use crate::models::itinerary::TripRequest;
use crate::services::prompt_templates::{PromptTemplate, CHAT_PROMPT, FLIGHTS_PROMPT, ITINERARY_PROMPT};

const DEFAULT_ORIGIN: &str = "Your nearest major airport";

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("request to the text generation service failed: {0}")]
    Request(String),

    #[error("text generation service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("text generation service returned an empty response")]
    EmptyResponse,

    #[error("prompt variable '{0}' was not provided")]
    MissingVariable(String),
}

/// Prompt in, text out. Implementations must never return an empty string as success.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    fn describe(&self) -> String;
}

#[derive(Debug, Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionContent,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionContent {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions endpoint (the Hugging Face router by default).
pub struct HttpTextGenerator {
    config: GenerationConfig,
    client: reqwest::Client,
}

impl HttpTextGenerator {
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![ChatCompletionMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.config.max_tokens,
        };

        let mut builder = self.client.post(&self.config.api_url).json(&request);
        if let Some(token) = &self.config.api_token {
            builder = builder.bearer_auth(token);
        }

        debug!("Sending {} character prompt to {}", prompt.len(), self.config.model);
        let response = builder
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GenerationError::Api { status, body });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }

    fn describe(&self) -> String {
        format!("{} via {}", self.config.model, self.config.api_url)
    }
}

/// Fills the prompt templates and hands them to a `TextGenerator`.
#[derive(Clone)]
pub struct ItineraryAssistant {
    generator: Arc<dyn TextGenerator>,
}

impl ItineraryAssistant {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn describe(&self) -> String {
        self.generator.describe()
    }

    async fn run(
        &self,
        template: &PromptTemplate,
        vars: HashMap<String, String>,
    ) -> Result<String, GenerationError> {
        let prompt = template.render(&vars)?;
        let text = self.generator.generate(&prompt).await?;
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }

    pub async fn generate_itinerary(&self, trip: &TripRequest) -> Result<String, GenerationError> {
        info!(
            "Generating {} day itinerary for {}",
            trip.duration_days, trip.destination
        );
        let vars = HashMap::from([
            ("destination".to_string(), trip.destination.trim().to_string()),
            ("duration_days".to_string(), trip.duration_days.to_string()),
            ("budget".to_string(), trip.budget.clone()),
            ("preferences".to_string(), trip.preferences.clone()),
            ("user_questions".to_string(), trip.user_questions.clone()),
            ("user_name".to_string(), trip.user_name.trim().to_string()),
            ("num_people".to_string(), trip.num_people.to_string()),
        ]);
        self.run(&ITINERARY_PROMPT, vars).await
    }

    /// Returns the origin actually used along with the suggestions.
    pub async fn suggest_flights(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<(String, String), GenerationError> {
        let origin = match origin.trim() {
            "" => DEFAULT_ORIGIN.to_string(),
            given => given.to_string(),
        };
        let vars = HashMap::from([
            ("origin".to_string(), origin.clone()),
            ("destination".to_string(), destination.to_string()),
        ]);
        let suggestions = self.run(&FLIGHTS_PROMPT, vars).await?;
        Ok((origin, suggestions.trim().to_string()))
    }

    pub async fn answer_question(
        &self,
        itinerary: &str,
        question: &str,
    ) -> Result<String, GenerationError> {
        let vars = HashMap::from([
            ("itinerary".to_string(), itinerary.to_string()),
            ("question".to_string(), question.to_string()),
        ]);
        Ok(self.run(&CHAT_PROMPT, vars).await?.trim().to_string())
    }
}
