use crate::{
    error::Result,
    models::{Credential, GeneratedImage, SourceImage, SuggestionCategory},
};
use async_trait::async_trait;
use std::time::Duration;

/// One image-edit call against the external service.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(
        &self,
        credential: &Credential,
        image: &SourceImage,
        prompt: &str,
        variant: usize,
    ) -> Result<GeneratedImage>;
}

/// One keyword lookup against the external service.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn suggest(
        &self,
        credential: &Credential,
        keyword: &str,
        category: SuggestionCategory,
    ) -> Result<Vec<String>>;
}

/// Waits out the cooldown between two variant calls.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
