use crate::{
    error::{Result, StudioError},
    models::Credential,
    prompt::VARIANT_DIRECTIVES,
};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_base: String,
    pub image_model: String,
    pub text_model: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub cooldown: Duration,
    pub variant_count: usize,
    pub call_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SuggestionConfig {
    pub limit: usize,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub orchestrator: OrchestratorConfig,
    pub suggestions: SuggestionConfig,
    pub credential: Option<Credential>,
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_non_empty(key).and_then(|value| value.parse().ok())
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_base: DEFAULT_API_BASE.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        GeminiConfig {
            api_base: env_non_empty("GEMINI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            image_model: env_non_empty("GEMINI_IMAGE_MODEL").unwrap_or(defaults.image_model),
            text_model: env_non_empty("GEMINI_TEXT_MODEL").unwrap_or(defaults.text_model),
            request_timeout: env_parse::<u64>("GEMINI_REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_models(
        mut self,
        image_model: impl Into<String>,
        text_model: impl Into<String>,
    ) -> Self {
        self.image_model = image_model.into();
        self.text_model = text_model.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        OrchestratorConfig {
            cooldown: Duration::from_secs(15),
            variant_count: VARIANT_DIRECTIVES.len(),
            call_timeout: Duration::from_secs(120),
        }
    }
}

impl OrchestratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        OrchestratorConfig {
            cooldown: env_parse::<u64>("ROUND_COOLDOWN_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.cooldown),
            variant_count: env_parse("ROUND_VARIANT_COUNT").unwrap_or(defaults.variant_count),
            call_timeout: env_parse::<u64>("ROUND_CALL_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.call_timeout),
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_variant_count(mut self, variant_count: usize) -> Self {
        self.variant_count = variant_count;
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.variant_count == 0 || self.variant_count > VARIANT_DIRECTIVES.len() {
            return Err(StudioError::ConfigError(format!(
                "variant count must be between 1 and {}, got {}",
                VARIANT_DIRECTIVES.len(),
                self.variant_count
            )));
        }
        if self.call_timeout.is_zero() {
            return Err(StudioError::ConfigError(
                "call timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        SuggestionConfig { limit: 5 }
    }
}

impl SuggestionConfig {
    pub fn from_env() -> Self {
        SuggestionConfig {
            limit: env_parse("SUGGESTION_LIMIT").unwrap_or(Self::default().limit),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gemini: GeminiConfig::default(),
            orchestrator: OrchestratorConfig::default(),
            suggestions: SuggestionConfig::default(),
            credential: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads settings from the process environment. A missing API key is not
    /// an error here; calls made without one fail their precondition check.
    pub fn from_env() -> Self {
        let credential = env_non_empty("GEMINI_API_KEY")
            .or_else(|| env_non_empty("API_KEY"))
            .map(Credential::new);

        Config {
            gemini: GeminiConfig::from_env(),
            orchestrator: OrchestratorConfig::from_env(),
            suggestions: SuggestionConfig::from_env(),
            credential,
        }
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_orchestrator(mut self, config: OrchestratorConfig) -> Self {
        self.orchestrator = config;
        self
    }

    pub fn with_suggestions(mut self, config: SuggestionConfig) -> Self {
        self.suggestions = config;
        self
    }

    pub fn with_credential(mut self, api_key: impl Into<String>) -> Self {
        self.credential = Some(Credential::new(api_key));
        self
    }
}
