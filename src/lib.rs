pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod prompt;
pub mod suggestion;
pub mod traits;

pub use config::{Config, GeminiConfig, OrchestratorConfig, SuggestionConfig};
pub use error::{Result, StudioError};
pub use gemini::{GeminiClient, ImageClient, TextClient};
pub use models::{
    progress_channel, Credential, EditRequest, GeneratedImage, GenerationOutcome,
    ProgressSignal, ProgressSink, Quality, SourceImage, StudioSettings, Style,
    SuggestionCategory, SuggestionOutcome, VariantFailure,
};
pub use orchestrator::Orchestrator;
pub use suggestion::SuggestionFetcher;
pub use traits::{ImageGenerator, Pacer, SuggestionSource, TokioPacer};
pub use tokio_util::sync::CancellationToken;
