//! OpenAI-compatible chat completions over HTTP.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::LlmError;

/// Environment variable for the API key. Absence disables the client.
const API_KEY_ENV: &str = "LLM_API_KEY";

/// Environment variable for the endpoint base URL.
const BASE_URL_ENV: &str = "LLM_BASE_URL";

/// Environment variable for the model name.
const MODEL_ENV: &str = "LLM_MODEL";

/// Environment variable for the request timeout in seconds.
const TIMEOUT_ENV: &str = "LLM_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Sampling temperature for sequence generation. Kept low: the output must
/// stay parseable JSON.
const TEMPERATURE: f32 = 0.7;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Connection settings for an OpenAI-compatible endpoint.
///
/// | Variable           | Default                  | Description                     |
/// |--------------------|--------------------------|---------------------------------|
/// | `LLM_API_KEY`      | (unset)                  | Bearer token; unset = disabled  |
/// | `LLM_BASE_URL`     | `https://api.openai.com` | Endpoint base URL               |
/// | `LLM_MODEL`        | `gpt-4o-mini`            | Model name                      |
/// | `LLM_TIMEOUT_SECS` | `60`                     | Per-request timeout             |
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Load configuration from the environment. Returns `None` when no API
    /// key is set, which the server treats as "run without a model".
    pub fn from_env() -> Option<Self> {
        let api_key = env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty())?;
        let base_url = env::var(BASE_URL_ENV)
            .ok()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = env::var(MODEL_ENV)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let timeout_secs = env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Some(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            timeout_secs,
        })
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Thin client over `POST {base_url}/v1/chat/completions`.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// The configured model name, for logging.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Run one chat completion with a system and a user message, returning
    /// the raw completion text.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
        };

        debug!(model = %self.config.model, "sending chat completion request");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "chat completion request failed");
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        extract_content(parsed)
    }
}

fn extract_content(response: ChatResponse) -> Result<String, LlmError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(LlmError::EmptyResponse)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
