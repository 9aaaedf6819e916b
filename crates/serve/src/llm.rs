use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ServeError};

/// Client for an Ollama-compatible `/api/generate` endpoint.
#[derive(Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    /// The prompt is already rendered with its conversation template
    raw: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate at most `max_new_tokens` tokens continuing `prompt`.
    pub async fn generate(&self, prompt: &str, max_new_tokens: u32) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            raw: true,
            options: GenerateOptions {
                num_predict: max_new_tokens,
            },
        };

        debug!(url = %url, model = %self.model, prompt_chars = prompt.len(), "Sending generation request");

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(ServeError::Status(response.status()));
        }

        let generated: GenerateResponse = response.json().await?;
        Ok(generated.response)
    }
}
