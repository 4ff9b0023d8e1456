//! Image generation collaborator trait and its result types.

use async_trait::async_trait;

use crate::error::ProviderError;

/// One generated image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImagePayload {
    #[cfg(test)]
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: "image/png".to_string(),
        }
    }
}

/// Everything a provider produced for a single prompt. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedImages {
    pub images: Vec<ImagePayload>,
}

impl GeneratedImages {
    pub fn into_first(self) -> Option<ImagePayload> {
        self.images.into_iter().next()
    }
}

/// Text-to-image provider. Shared by all in-flight requests.
#[async_trait]
pub trait ImageGenerationClient: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImages, ProviderError>;

    /// Model identifier shown by the liveness probe.
    fn model(&self) -> &str;
}
