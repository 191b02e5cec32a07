use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::error::Error;
use std::fmt;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o";
const REQUEST_TIMEOUT_SECS: u64 = 45;

/// The collaborator is unreachable, rejected the call, or answered with
/// something that is not a chat completion. Callers never surface this:
/// every consumer downgrades to deterministic fallback synthesis.
#[derive(Debug)]
pub enum GenerationUnavailable {
    Configuration(String),
    Http(String),
    Response(String),
}

impl fmt::Display for GenerationUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationUnavailable::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            GenerationUnavailable::Http(msg) => write!(f, "HTTP error: {}", msg),
            GenerationUnavailable::Response(msg) => write!(f, "Response error: {}", msg),
        }
    }
}

impl Error for GenerationUnavailable {}

/// One bounded request to the generative model.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
    /// Ask the model to emit a single JSON object. A hint, not a guarantee;
    /// the parser still treats the reply as untrusted text.
    pub json_response: bool,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            json_response: true,
            temperature: 0.7,
        }
    }
}

/// External generation collaborator. Injected everywhere so the engine can
/// be exercised without network access.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn complete(&self, request: GenerationRequest) -> Result<String, GenerationUnavailable>;
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageContent,
}

#[derive(Debug, Deserialize)]
struct ChatMessageContent {
    content: String,
}

/// OpenAI-compatible chat-completions client. Credentials come from the
/// environment at construction time, never from source.
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String) -> Result<Self, GenerationUnavailable> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| GenerationUnavailable::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: env::var("OPENAI_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            api_key,
            model,
        })
    }

    pub fn from_env() -> Result<Self, GenerationUnavailable> {
        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            GenerationUnavailable::Configuration("OPENAI_API_KEY not set".to_string())
        })?;
        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Self::new(api_key, model)
    }
}

#[async_trait]
impl GenerationClient for OpenAiClient {
    async fn complete(&self, request: GenerationRequest) -> Result<String, GenerationUnavailable> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.prompt,
                },
            ],
            temperature: request.temperature,
            response_format: request.json_response.then(|| ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationUnavailable::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GenerationUnavailable::Response(format!(
                "Completion request failed with status {}: {}",
                status, error_text
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationUnavailable::Response(format!("Failed to parse response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| GenerationUnavailable::Response("No choices in completion".to_string()))
    }
}

/// Placeholder used when no API key is configured. Every call fails, which
/// routes all generation through the deterministic fallback path.
pub struct UnconfiguredClient;

#[async_trait]
impl GenerationClient for UnconfiguredClient {
    async fn complete(&self, _request: GenerationRequest) -> Result<String, GenerationUnavailable> {
        Err(GenerationUnavailable::Configuration(
            "generation client not configured".to_string(),
        ))
    }
}
