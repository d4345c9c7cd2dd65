pub mod image_client;
pub mod text_client;

use crate::{
    config::GeminiConfig,
    error::{GenerateError, Result},
    models::AnalysisResult,
    orchestrator::GenerationBackend,
};
use async_trait::async_trait;
use reqwest::Client;

pub use image_client::ImageClient;
pub use text_client::TextClient;

#[derive(Clone, Debug)]
pub struct GeminiClient {
    text_client: TextClient,
    image_client: ImageClient,
}

impl GeminiClient {
    /// Builds the client from config. Fails before any request is made if
    /// no API credential is present.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config.api_key.ok_or_else(|| {
            GenerateError::ConfigError(
                "GEMINI_API_KEY (or API_KEY) environment variable not set".into(),
            )
        })?;

        let client = Client::new();

        Ok(Self {
            text_client: TextClient::new(
                client.clone(),
                api_key.clone(),
                config.text_model,
                config.api_base.clone(),
            ),
            image_client: ImageClient::new(client, api_key, config.image_model, config.api_base),
        })
    }

    pub fn text(&self) -> &TextClient {
        &self.text_client
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn analyze(&self, article_text: &str) -> Result<AnalysisResult> {
        self.text_client.analyze(article_text).await
    }

    async fn render_image(&self, prompt: &str) -> Result<Vec<u8>> {
        self.image_client.render(prompt).await
    }
}
