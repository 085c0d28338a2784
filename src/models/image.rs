use crate::error::{Result, StudioError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,
    pub url: String, // data:<mime>;base64,<payload>
    pub prompt: String,
    pub variant: usize,
    pub mime_type: String,
}

impl GeneratedImage {
    pub fn from_base64(
        variant: usize,
        mime_type: impl Into<String>,
        base64_data: &str,
        prompt: impl Into<String>,
    ) -> Self {
        let mime_type = mime_type.into();
        Self {
            id: Uuid::new_v4().to_string(),
            url: format!("data:{};base64,{}", mime_type, base64_data),
            prompt: prompt.into(),
            variant,
            mime_type,
        }
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        let payload = self
            .url
            .split_once(";base64,")
            .map(|(_, payload)| payload)
            .ok_or_else(|| StudioError::ResponseError("image URL is not a base64 data URL".into()))?;
        STANDARD
            .decode(payload)
            .map_err(|e| StudioError::ResponseError(format!("invalid image payload: {}", e)))
    }

    pub fn file_extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            _ => "png",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantFailure {
    pub variant: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub images: Vec<GeneratedImage>,
    pub failures: Vec<VariantFailure>,
    pub cancelled: bool,
}

impl GenerationOutcome {
    pub fn attempted(&self) -> usize {
        self.images.len() + self.failures.len()
    }

    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty() || self.cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_decodes_back_to_bytes() {
        let image = GeneratedImage::from_base64(2, "image/jpeg", &STANDARD.encode(b"jpeg!"), "p");
        assert!(image.url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(image.decode().unwrap(), b"jpeg!");
        assert_eq!(image.file_extension(), "jpg");
        assert_eq!(image.variant, 2);
    }

    #[test]
    fn each_image_gets_a_fresh_id() {
        let a = GeneratedImage::from_base64(1, "image/png", "AA==", "p");
        let b = GeneratedImage::from_base64(1, "image/png", "AA==", "p");
        assert_ne!(a.id, b.id);
    }
}
