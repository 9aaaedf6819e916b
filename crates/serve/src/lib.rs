pub mod error;
pub mod llm;
pub mod retry;
pub mod template;

pub use error::{Result, ServeError};
pub use llm::OllamaClient;
pub use retry::{RetryConfig, RetryPolicy};
pub use template::{extract_response, get_template, render_prompt, ConversationTemplate};

use serde::Serialize;
use tracing::info;
use transcript::{inference_transcript, PromptSet};

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub prompt: String,
    pub response: String,
    /// Parsed entity values, when the response is a JSON array of strings
    pub entities: Option<Vec<String>>,
}

/// Asks the generation service for the values of one entity type in a text.
pub struct Inferencer {
    client: OllamaClient,
    retry: RetryPolicy,
    prompts: PromptSet,
    max_new_tokens: u32,
}

impl Inferencer {
    pub fn new(client: OllamaClient, retry: RetryPolicy, prompts: PromptSet, max_new_tokens: u32) -> Self {
        Self {
            client,
            retry,
            prompts,
            max_new_tokens,
        }
    }

    /// Render the single-question prompt without contacting the service.
    pub fn build_prompt(&self, text: &str, entity_type: &str) -> Result<String> {
        let transcript = inference_transcript(text, entity_type, &self.prompts);
        render_prompt(&transcript, &self.prompts.template_name)
    }

    pub async fn ask(&self, text: &str, entity_type: &str) -> Result<Answer> {
        let prompt = self.build_prompt(text, entity_type)?;

        let generated = self
            .retry
            .retry("generate", || self.client.generate(&prompt, self.max_new_tokens))
            .await?;

        let response = extract_response(&generated).to_string();
        let entities = serde_json::from_str::<Vec<String>>(&response).ok();

        info!(
            entity_type,
            model = self.client.model(),
            parsed = entities.is_some(),
            "Generated answer"
        );

        Ok(Answer {
            prompt,
            response,
            entities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn inferencer(base_url: String) -> Inferencer {
        Inferencer::new(
            OllamaClient::new(base_url, "test-model"),
            RetryPolicy::new(2, 1, 2),
            PromptSet::english(),
            256,
        )
    }

    #[test]
    fn test_build_prompt() {
        let prompt = inferencer("http://unused".to_string())
            .build_prompt("A met B.", "person")
            .unwrap();
        assert!(prompt.ends_with("USER: What describes person in the text? ASSISTANT:"));
    }

    #[tokio::test]
    async fn test_ask_parses_entities() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"response": " [\"A\", \"B\"]\n"})),
            )
            .mount(&mock_server)
            .await;

        let answer = inferencer(mock_server.uri()).ask("A met B.", "person").await.unwrap();
        assert_eq!(answer.response, "[\"A\", \"B\"]");
        assert_eq!(answer.entities, Some(vec!["A".to_string(), "B".to_string()]));
    }

    #[tokio::test]
    async fn test_ask_retries_server_errors() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "not json"})))
            .mount(&mock_server)
            .await;

        let answer = inferencer(mock_server.uri()).ask("text", "person").await.unwrap();
        assert_eq!(answer.response, "not json");
        assert_eq!(answer.entities, None);
    }
}
