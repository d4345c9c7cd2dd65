use crate::{
    error::{GenerateError, Result},
    models::{AnalysisResult, GenerationResult},
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Narrow seam over the vendor service so the orchestration is testable
/// with a substitute implementation.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn analyze(&self, article_text: &str) -> Result<AnalysisResult>;
    async fn render_image(&self, prompt: &str) -> Result<Vec<u8>>;
}

/// Runs the two-step generation workflow: analyze the article into an image
/// prompt plus tags, then render the header image. The two calls are
/// strictly sequential; a failure at either step aborts the whole run and
/// no partial result is ever returned.
pub async fn generate(
    backend: &dyn GenerationBackend,
    article_text: &str,
) -> Result<GenerationResult> {
    let _timer = crate::logger::timer("generation");

    let analysis = backend.analyze(article_text).await?;

    if analysis.image_prompt.is_empty() || analysis.tags.is_empty() {
        log::error!(
            "Analysis response incomplete: prompt {} chars, {} tags",
            analysis.image_prompt.len(),
            analysis.tags.len()
        );
        return Err(GenerateError::AnalysisError);
    }

    log::info!(
        "Analysis complete: {} tags, prompt {} chars",
        analysis.tags.len(),
        analysis.image_prompt.len()
    );

    let image_bytes = backend.render_image(&analysis.image_prompt).await?;
    if image_bytes.is_empty() {
        return Err(GenerateError::ImageError);
    }

    let image_url = format!("data:image/png;base64,{}", BASE64.encode(&image_bytes));
    let tags = format_tags(&analysis.tags);

    log::info!("Generation complete: {} bytes of image data", image_bytes.len());

    Ok(GenerationResult { image_url, tags })
}

/// Strips internal whitespace from each tag, prefixes `#`, and joins with
/// single spaces.
pub fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("#{}", tag.split_whitespace().collect::<String>()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedBackend {
        analysis: Mutex<Option<Result<AnalysisResult>>>,
        image: Mutex<Option<Result<Vec<u8>>>>,
        image_calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn new(analysis: Result<AnalysisResult>, image: Result<Vec<u8>>) -> Self {
            Self {
                analysis: Mutex::new(Some(analysis)),
                image: Mutex::new(Some(image)),
                image_calls: AtomicUsize::new(0),
            }
        }

        fn analysis_of(prompt: &str, tags: &[&str]) -> AnalysisResult {
            AnalysisResult {
                image_prompt: prompt.to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl GenerationBackend for ScriptedBackend {
        async fn analyze(&self, _article_text: &str) -> Result<AnalysisResult> {
            self.analysis
                .lock()
                .unwrap()
                .take()
                .expect("analyze called more than once")
        }

        async fn render_image(&self, _prompt: &str) -> Result<Vec<u8>> {
            self.image_calls.fetch_add(1, Ordering::SeqCst);
            self.image
                .lock()
                .unwrap()
                .take()
                .expect("render_image called more than once")
        }
    }

    const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];

    #[tokio::test]
    async fn test_end_to_end_remote_work_scenario() {
        let backend = ScriptedBackend::new(
            Ok(ScriptedBackend::analysis_of(
                "a calm desk scene, minimalist vector art, 16:9",
                &[
                    "remote work",
                    "productivity",
                    "wfh",
                    "focus",
                    "time management",
                ],
            )),
            Ok(PNG_BYTES.to_vec()),
        );

        let article = "Remote work productivity has become a defining topic for modern teams, \
                       reshaping how we plan, focus, and measure output.";
        assert!(article.trim().chars().count() >= 100);

        let result = generate(&backend, article).await.unwrap();
        assert_eq!(
            result.tags,
            "#remotework #productivity #wfh #focus #timemanagement"
        );
        assert!(result.image_url.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_empty_tags_fails_before_image_step() {
        let backend = ScriptedBackend::new(
            Ok(ScriptedBackend::analysis_of("a scene", &[])),
            Ok(PNG_BYTES.to_vec()),
        );

        let err = generate(&backend, "article").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to get a valid analysis from the AI.");
        assert_eq!(backend.image_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_prompt_fails_before_image_step() {
        let backend = ScriptedBackend::new(
            Ok(ScriptedBackend::analysis_of("", &["a", "b", "c", "d", "e"])),
            Ok(PNG_BYTES.to_vec()),
        );

        let err = generate(&backend, "article").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to get a valid analysis from the AI.");
        assert_eq!(backend.image_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_image_bytes() {
        let backend = ScriptedBackend::new(
            Ok(ScriptedBackend::analysis_of("a scene", &["a", "b", "c", "d", "e"])),
            Ok(Vec::new()),
        );

        let err = generate(&backend, "article").await.unwrap_err();
        assert_eq!(err.to_string(), "Image generation failed.");
    }

    #[tokio::test]
    async fn test_transport_failure_is_wrapped() {
        let backend = ScriptedBackend::new(
            Err(GenerateError::transport("connection refused")),
            Ok(PNG_BYTES.to_vec()),
        );

        let err = generate(&backend, "article").await.unwrap_err();
        assert_eq!(err.to_string(), "AI generation failed: connection refused");
        assert_eq!(backend.image_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_at_image_step() {
        let backend = ScriptedBackend::new(
            Ok(ScriptedBackend::analysis_of("a scene", &["a", "b", "c", "d", "e"])),
            Err(GenerateError::transport("timed out")),
        );

        let err = generate(&backend, "article").await.unwrap_err();
        assert_eq!(err.to_string(), "AI generation failed: timed out");
    }

    #[test]
    fn test_format_tags_strips_whitespace() {
        let tags: Vec<String> = vec![
            "remote work".into(),
            "time  management".into(),
            " wfh ".into(),
        ];
        assert_eq!(format_tags(&tags), "#remotework #timemanagement #wfh");
    }
}
