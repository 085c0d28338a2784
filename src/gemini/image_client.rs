use super::Transport;
use crate::{
    error::{Result, StudioError},
    models::{
        gemini::{Content, GenerateContentRequest, GenerationConfig, Part},
        Credential, GeneratedImage, SourceImage,
    },
    traits::ImageGenerator,
};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Clone)]
pub struct ImageClient {
    transport: Arc<Transport>,
    model: String,
}

impl ImageClient {
    pub(crate) fn new(transport: Arc<Transport>, model: String) -> Self {
        Self { transport, model }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(image: &SourceImage, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::inline(image.mime_type.clone(), image.to_base64()),
                    Part::text(prompt),
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: Some(vec!["IMAGE".to_string(), "TEXT".to_string()]),
                ..Default::default()
            },
        }
    }

    /// Sends the source image and one prompt, returning the first image part
    /// of the answer.
    pub async fn edit(
        &self,
        credential: &Credential,
        image: &SourceImage,
        prompt: &str,
        variant: usize,
    ) -> Result<GeneratedImage> {
        log::info!("Editing image with model: {} (variant {})", self.model, variant);

        let request = Self::build_request(image, prompt);
        let response = self
            .transport
            .generate_content(credential, &self.model, &request)
            .await?;

        match response.first_inline_data() {
            Some(inline) => Ok(GeneratedImage::from_base64(
                variant,
                inline.mime_type.clone(),
                &inline.data,
                prompt,
            )),
            None => {
                let reason = response.finish_reason().unwrap_or("none");
                Err(StudioError::ResponseError(format!(
                    "No image data found in the Gemini API response (finish reason: {})",
                    reason
                )))
            }
        }
    }
}

#[async_trait]
impl ImageGenerator for ImageClient {
    async fn generate(
        &self,
        credential: &Credential,
        image: &SourceImage,
        prompt: &str,
        variant: usize,
    ) -> Result<GeneratedImage> {
        self.edit(credential, image, prompt, variant).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::GeminiConfig, gemini::GeminiClient};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::new(
            GeminiConfig::new()
                .with_api_base(format!("{}/v1beta", server.uri()))
                .with_models("image-model", "text-model"),
        )
        .unwrap()
    }

    fn source() -> SourceImage {
        SourceImage::new(b"raw-photo".to_vec(), "image/jpeg")
    }

    #[tokio::test]
    async fn sends_image_and_prompt_and_returns_data_url() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/image-model:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "inlineData": { "mimeType": "image/jpeg", "data": "cmF3LXBob3Rv" } },
                        { "text": "Ubah pose" }
                    ]
                }],
                "generationConfig": { "responseModalities": ["IMAGE", "TEXT"] }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [
                        { "text": "Here you go" },
                        { "inlineData": { "mimeType": "image/png", "data": "aW1n" } }
                    ]},
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let image = client(&server)
            .image()
            .edit(&Credential::new("test-key"), &source(), "Ubah pose", 3)
            .await
            .unwrap();

        assert_eq!(image.url, "data:image/png;base64,aW1n");
        assert_eq!(image.prompt, "Ubah pose");
        assert_eq!(image.variant, 3);
        assert_eq!(image.decode().unwrap(), b"img");
    }

    #[tokio::test]
    async fn text_only_answer_is_a_response_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "I can't do that" }] },
                    "finishReason": "SAFETY"
                }]
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .image()
            .edit(&Credential::new("k"), &source(), "p", 1)
            .await
            .unwrap_err();

        assert!(matches!(err, StudioError::ResponseError(ref m) if m.contains("SAFETY")));
    }

    #[tokio::test]
    async fn rate_limit_maps_to_external_call_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {
                    "code": 429,
                    "message": "Resource has been exhausted",
                    "status": "RESOURCE_EXHAUSTED"
                }
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .image()
            .edit(&Credential::new("k"), &source(), "p", 1)
            .await
            .unwrap_err();

        match err {
            StudioError::ExternalCallFailure { status, message } => {
                assert_eq!(status, Some(429));
                assert_eq!(message, "RESOURCE_EXHAUSTED: Resource has been exhausted");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
