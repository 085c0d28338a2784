pub mod image_client;
pub mod text_client;

use crate::{
    config::GeminiConfig,
    error::{Result, StudioError},
    models::{
        gemini::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse},
        Credential,
    },
};
use reqwest::Client;
use std::sync::Arc;

pub use image_client::ImageClient;
pub use text_client::TextClient;

#[derive(Clone)]
pub struct GeminiClient {
    image_client: ImageClient,
    text_client: TextClient,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| StudioError::ConfigError(format!("failed to build HTTP client: {}", e)))?;
        let transport = Arc::new(Transport {
            http,
            api_base: config.api_base.clone(),
        });

        Ok(Self {
            image_client: ImageClient::new(transport.clone(), config.image_model),
            text_client: TextClient::new(transport, config.text_model),
        })
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn text(&self) -> &TextClient {
        &self.text_client
    }
}

pub(crate) struct Transport {
    http: Client,
    api_base: String,
}

impl Transport {
    fn endpoint(&self, model: &str) -> String {
        let model = model.trim();
        if model.starts_with("models/") {
            format!("{}/{}:generateContent", self.api_base, model)
        } else {
            format!("{}/models/{}:generateContent", self.api_base, model)
        }
    }

    pub(crate) async fn generate_content(
        &self,
        credential: &Credential,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let endpoint = self.endpoint(model);
        log::debug!("POST {}", endpoint);

        let response = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", credential.expose())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|parsed| match parsed.error.status {
                    Some(code) => format!("{}: {}", code, parsed.error.message),
                    None => parsed.error.message,
                })
                .unwrap_or(body);
            log::error!("Gemini returned {} for model {}", status, model);
            return Err(StudioError::ExternalCallFailure {
                status: Some(status.as_u16()),
                message,
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| StudioError::ResponseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(api_base: &str) -> Transport {
        Transport {
            http: Client::new(),
            api_base: api_base.to_string(),
        }
    }

    #[test]
    fn endpoint_accepts_bare_and_prefixed_model_names() {
        let t = transport("https://example.test/v1beta");
        assert_eq!(
            t.endpoint("gemini-2.5-flash"),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(
            t.endpoint("models/gemini-2.5-flash"),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
