use crate::{
    error::{GenerateError, Result},
    models::{AnalysisResult, GenerateContentResponse},
};
use reqwest::Client;
use serde_json::json;

#[derive(Clone, Debug)]
pub struct TextClient {
    client: Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl TextClient {
    pub fn new(client: Client, api_key: String, model: String, api_base: String) -> Self {
        Self {
            client,
            api_key,
            model,
            api_base,
        }
    }

    /// Runs the structured-output analysis call: a fixed instruction
    /// template embedding the article text, constrained by a response
    /// schema of `{imagePrompt, tags[5]}`.
    pub async fn analyze(&self, article_text: &str) -> Result<AnalysisResult> {
        let request_payload = json!({
            "contents": [{
                "parts": [{ "text": build_analysis_prompt(article_text) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": analysis_schema()
            }
        });

        log::info!("Invoking analysis model: {}", self.model);
        log::debug!("Article text length: {} chars", article_text.len());

        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_payload)
            .send()
            .await
            .map_err(|e| {
                log::error!("Analysis request failed: {}", e);
                GenerateError::transport(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            log::error!("Analysis call returned {}: {}", status, error_text);
            return Err(GenerateError::transport(format!(
                "analysis call returned {}",
                status
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::transport(e.to_string()))?;

        Self::parse_payload(body.first_text().unwrap_or_default())
    }

    /// Parses the model's JSON text payload into an [`AnalysisResult`].
    /// A payload that is not valid JSON counts as a malformed analysis.
    pub(crate) fn parse_payload(text: &str) -> Result<AnalysisResult> {
        serde_json::from_str(text).map_err(|e| {
            log::error!("Analysis payload was not valid JSON: {}", e);
            GenerateError::AnalysisError
        })
    }
}

fn build_analysis_prompt(article_text: &str) -> String {
    format!(
        "Analyze the following blog post content. Based on its core message, keywords, and \
         emotional tone (e.g., formal, technical, casual, inspirational, futuristic), generate \
         two things:\n\n\
         1. A detailed, evocative prompt for an image generation AI to create a 16:9 header \
         image. The prompt should describe a visually appealing scene, abstract concept, or \
         stylized typography. It should specify the style (e.g., 'minimalist vector art', \
         'photorealistic', 'abstract gradient background'), color palette (e.g., 'dark mode \
         with neon blue accents'), and overall mood. If the article has a clear title, \
         incorporate it as stylized text within the image description. Any text included in \
         the image must be in English.\n\n\
         2. An array of exactly 5 relevant tags for the blog post, optimized for SEO.\n\n\
         Blog Post Content:\n---\n{}\n---",
        article_text
    )
}

fn analysis_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "imagePrompt": {
                "type": "STRING",
                "description": "A detailed prompt for the image generation model."
            },
            "tags": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "minItems": 5,
                "maxItems": 5,
                "description": "An array of exactly 5 SEO-optimized tags."
            }
        },
        "required": ["imagePrompt", "tags"]
    })
}
