use crate::{
    error::{Result, StudioError},
    models::Credential,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Style {
    #[default]
    #[serde(rename = "Fotorrealistis", alias = "Photorealistic")]
    Photorealistic,
    #[serde(rename = "Artistik", alias = "Artistic")]
    Artistic,
    #[serde(rename = "Sinematik", alias = "Cinematic")]
    Cinematic,
}

impl Style {
    pub fn label(&self) -> &'static str {
        match self {
            Style::Photorealistic => "Fotorrealistis",
            Style::Artistic => "Artistik",
            Style::Cinematic => "Sinematik",
        }
    }

    pub fn all() -> [Style; 3] {
        [Style::Photorealistic, Style::Artistic, Style::Cinematic]
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Style {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "fotorrealistis" | "photorealistic" => Ok(Style::Photorealistic),
            "artistik" | "artistic" => Ok(Style::Artistic),
            "sinematik" | "cinematic" => Ok(Style::Cinematic),
            other => Err(StudioError::ConfigError(format!("Unknown style: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Quality {
    #[default]
    #[serde(rename = "Standar", alias = "Standard")]
    Standard,
    #[serde(rename = "Tinggi", alias = "High")]
    High,
    #[serde(rename = "Sangat Tinggi", alias = "VeryHigh")]
    VeryHigh,
}

impl Quality {
    pub fn label(&self) -> &'static str {
        match self {
            Quality::Standard => "Standar",
            Quality::High => "Tinggi",
            Quality::VeryHigh => "Sangat Tinggi",
        }
    }

    pub fn all() -> [Quality; 3] {
        [Quality::Standard, Quality::High, Quality::VeryHigh]
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Quality {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "standar" | "standard" => Ok(Quality::Standard),
            "tinggi" | "high" => Ok(Quality::High),
            "sangat tinggi" | "very high" | "veryhigh" => Ok(Quality::VeryHigh),
            other => Err(StudioError::ConfigError(format!(
                "Unknown quality: {}",
                other
            ))),
        }
    }
}

/// Values a settings form holds for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StudioSettings {
    pub quality: Quality,
    pub style: Style,
}

#[derive(Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceImage")
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

impl SourceImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Parses a `data:<mime>;base64,<payload>` URL as produced by a browser
    /// file reader.
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        let rest = data_url
            .strip_prefix("data:")
            .ok_or_else(|| StudioError::PreconditionFailure("not a data URL".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| StudioError::PreconditionFailure("data URL has no payload".into()))?;
        let mime_type = header.strip_suffix(";base64").ok_or_else(|| {
            StudioError::PreconditionFailure("only base64 data URLs are supported".into())
        })?;
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| StudioError::PreconditionFailure(format!("invalid base64: {}", e)))?;
        Ok(Self::new(bytes, mime_type))
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mime_type = mime_from_extension(path).ok_or_else(|| {
            StudioError::PreconditionFailure(format!(
                "cannot infer image type of {}",
                path.display()
            ))
        })?;
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(bytes, mime_type))
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct EditRequest {
    pub image: SourceImage,
    pub base_prompt: String,
    pub style: Style,
    pub quality: Quality,
    pub credential: Credential,
}

impl EditRequest {
    pub fn new(
        image: SourceImage,
        base_prompt: impl Into<String>,
        settings: StudioSettings,
        credential: Credential,
    ) -> Self {
        Self {
            image,
            base_prompt: base_prompt.into(),
            style: settings.style,
            quality: settings.quality,
            credential,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.image.bytes.is_empty() {
            return Err(StudioError::PreconditionFailure(
                "source image is empty".into(),
            ));
        }
        if self.image.mime_type.trim().is_empty() {
            return Err(StudioError::PreconditionFailure(
                "source image has no MIME type".into(),
            ));
        }
        if self.credential.is_blank() {
            return Err(StudioError::PreconditionFailure(
                "API key is not set".into(),
            ));
        }
        Ok(())
    }
}
