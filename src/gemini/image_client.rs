use crate::{
    error::{GenerateError, Result},
    models::PredictResponse,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use serde_json::json;

#[derive(Clone, Debug)]
pub struct ImageClient {
    client: Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl ImageClient {
    pub fn new(client: Client, api_key: String, model: String, api_base: String) -> Self {
        Self {
            client,
            api_key,
            model,
            api_base,
        }
    }

    /// Generates exactly one 16:9 PNG image from the prompt and returns the
    /// raw image bytes.
    pub async fn render(&self, prompt: &str) -> Result<Vec<u8>> {
        let request_payload = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": {
                "sampleCount": 1,
                "aspectRatio": "16:9",
                "outputMimeType": "image/png"
            }
        });

        log::info!("Generating image with model: {}", self.model);

        let url = format!("{}/models/{}:predict", self.api_base, self.model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_payload)
            .send()
            .await
            .map_err(|e| {
                log::error!("Image request failed: {}", e);
                GenerateError::transport(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            log::error!("Image call returned {}: {}", status, error_text);
            return Err(GenerateError::transport(format!(
                "image call returned {}",
                status
            )));
        }

        let body: PredictResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::transport(e.to_string()))?;

        Self::extract_bytes(&body)
    }

    /// Pulls the first prediction's base64 payload out of the response and
    /// decodes it. No prediction or an undecodable payload means the image
    /// step produced nothing usable.
    pub(crate) fn extract_bytes(response: &PredictResponse) -> Result<Vec<u8>> {
        let encoded = response
            .predictions
            .iter()
            .find_map(|p| p.bytes_base64_encoded.as_deref())
            .ok_or(GenerateError::ImageError)?;

        BASE64.decode(encoded).map_err(|e| {
            log::error!("Image payload was not valid base64: {}", e);
            GenerateError::ImageError
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bytes() {
        let response: PredictResponse = serde_json::from_str(
            r#"{"predictions": [{"bytesBase64Encoded": "iVBORw==", "mimeType": "image/png"}]}"#,
        )
        .unwrap();
        let bytes = ImageClient::extract_bytes(&response).unwrap();
        assert_eq!(bytes, vec![0x89, 0x50, 0x4e, 0x47]);
    }

    #[test]
    fn test_extract_bytes_empty_predictions() {
        let response: PredictResponse = serde_json::from_str(r#"{"predictions": []}"#).unwrap();
        let err = ImageClient::extract_bytes(&response).unwrap_err();
        assert_eq!(err.to_string(), "Image generation failed.");
    }

    #[test]
    fn test_extract_bytes_invalid_base64() {
        let response: PredictResponse = serde_json::from_str(
            r#"{"predictions": [{"bytesBase64Encoded": "not base64!!"}]}"#,
        )
        .unwrap();
        let err = ImageClient::extract_bytes(&response).unwrap_err();
        assert_eq!(err.to_string(), "Image generation failed.");
    }
}
