use super::Transport;
use crate::{
    error::{Result, StudioError},
    models::{
        gemini::{Content, GenerateContentRequest, GenerationConfig, Part, SuggestionPayload},
        Credential, SuggestionCategory,
    },
    prompt::{suggestion_prompt, suggestion_schema},
    traits::SuggestionSource,
};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Clone)]
pub struct TextClient {
    transport: Arc<Transport>,
    model: String,
}

impl TextClient {
    pub(crate) fn new(transport: Arc<Transport>, model: String) -> Self {
        Self { transport, model }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Asks for JSON matching `schema` and returns the raw JSON text.
    pub async fn generate_json(
        &self,
        credential: &Credential,
        prompt: &str,
        schema: serde_json::Value,
    ) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::text(prompt)],
            }],
            generation_config: GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(schema),
                ..Default::default()
            },
        };

        log::info!("Invoking model: {}", self.model);
        let response = self
            .transport
            .generate_content(credential, &self.model, &request)
            .await?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(StudioError::ResponseError(
                "Gemini returned an empty text response".into(),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl SuggestionSource for TextClient {
    async fn suggest(
        &self,
        credential: &Credential,
        keyword: &str,
        category: SuggestionCategory,
    ) -> Result<Vec<String>> {
        let prompt = suggestion_prompt(keyword, category);
        let json_text = self
            .generate_json(credential, &prompt, suggestion_schema())
            .await?;
        let payload: SuggestionPayload = serde_json::from_str(json_text.trim())?;
        Ok(payload.suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::GeminiConfig, gemini::GeminiClient};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::new(
            GeminiConfig::new()
                .with_api_base(server.uri())
                .with_models("image-model", "text-model"),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn parses_structured_suggestions_in_service_order() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/text-model:generateContent"))
            .and(body_partial_json(json!({
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": { "type": "OBJECT" }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{
                        "text": "{\"suggestions\": [\"duduk bersila\", \"duduk santai\", \"duduk di kursi\"]}"
                    }]}
                }]
            })))
            .mount(&server)
            .await;

        let suggestions = client(&server)
            .text()
            .suggest(&Credential::new("k"), "duduk", SuggestionCategory::Pose)
            .await
            .unwrap();

        assert_eq!(
            suggestions,
            vec!["duduk bersila", "duduk santai", "duduk di kursi"]
        );
    }

    #[tokio::test]
    async fn malformed_json_is_a_serialization_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "not json" }] } }]
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .text()
            .suggest(&Credential::new("k"), "senyum", SuggestionCategory::Expression)
            .await
            .unwrap_err();

        assert!(matches!(err, StudioError::SerializationError(_)));
    }
}
