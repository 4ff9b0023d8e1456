use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::provider::{GeneratedImages, ImageGenerationClient, ImagePayload};

enum Outcome {
    Images(Vec<ImagePayload>),
    Fail(String),
}

/// Stub provider for handler tests.
pub struct MockImageClient {
    outcome: Outcome,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockImageClient {
    pub fn returning_image(bytes: Vec<u8>) -> Self {
        Self::with_outcome(Outcome::Images(vec![ImagePayload::png(bytes)]))
    }

    pub fn returning_nothing() -> Self {
        Self::with_outcome(Outcome::Images(Vec::new()))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_outcome(Outcome::Fail(message.to_string()))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ImageGenerationClient for MockImageClient {
    async fn generate_image(&self, _prompt: &str) -> Result<GeneratedImages, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.outcome {
            Outcome::Images(images) => Ok(GeneratedImages {
                images: images.clone(),
            }),
            Outcome::Fail(message) => Err(ProviderError::Other(message.clone())),
        }
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}
