use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::app::clipboard::Clipboard;
use crate::app::state::{AppEvent, CopyTarget, Effect};
use crate::orchestrator::{self, GenerationBackend};

pub const COPY_ACK_RESET: Duration = Duration::from_secs(2);

/// Executes the effects requested by state transitions: spawns the
/// generation workflow, writes the clipboard, runs the transient
/// acknowledgment timers, and saves the image file. Completions flow back
/// into the state machine through the event channel.
pub struct AppRuntime {
    backend: Arc<dyn GenerationBackend>,
    clipboard: Box<dyn Clipboard>,
    events: UnboundedSender<AppEvent>,
    ack_timers: HashMap<CopyTarget, JoinHandle<()>>,
}

impl AppRuntime {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        clipboard: Box<dyn Clipboard>,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            backend,
            clipboard,
            events,
            ack_timers: HashMap::new(),
        }
    }

    pub fn perform(&mut self, effect: Effect) {
        match effect {
            Effect::StartGeneration(article_text) => self.start_generation(article_text),
            Effect::WriteClipboard { text, target } => {
                if let Err(e) = self.clipboard.write_text(&text) {
                    log::warn!("Failed to copy {:?} to clipboard: {}", target, e);
                }
            }
            Effect::RestartAckTimer(target) => self.restart_ack_timer(target),
            Effect::SaveImage {
                data_uri,
                file_name,
            } => save_image(&data_uri, &file_name),
        }
    }

    fn start_generation(&self, article_text: String) {
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = orchestrator::generate(backend.as_ref(), &article_text).await;
            let _ = events.send(AppEvent::GenerationResolved(outcome));
        });
    }

    /// Retriggering a copy restarts its timer; the previous one is aborted
    /// so only the latest expiry fires. The two targets run independently.
    fn restart_ack_timer(&mut self, target: CopyTarget) {
        if let Some(handle) = self.ack_timers.remove(&target) {
            handle.abort();
        }

        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(COPY_ACK_RESET).await;
            let _ = events.send(AppEvent::CopyAckExpired(target));
        });
        self.ack_timers.insert(target, handle);
    }
}

impl Drop for AppRuntime {
    fn drop(&mut self) {
        for handle in self.ack_timers.values() {
            handle.abort();
        }
    }
}

fn save_image(data_uri: &str, file_name: &str) {
    let encoded = data_uri
        .strip_prefix("data:image/png;base64,")
        .unwrap_or(data_uri);

    match BASE64.decode(encoded) {
        Ok(image_bytes) => match std::fs::write(file_name, image_bytes) {
            Ok(_) => log::info!("💾 Image saved to: {}", file_name),
            Err(e) => log::error!("❌ Failed to save image: {}", e),
        },
        Err(e) => log::error!("❌ Failed to decode image data: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::models::{AnalysisResult, GenerationResult};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    struct FixedBackend;

    #[async_trait]
    impl GenerationBackend for FixedBackend {
        async fn analyze(&self, _article_text: &str) -> Result<AnalysisResult> {
            Ok(AnalysisResult {
                image_prompt: "a scene".to_string(),
                tags: vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()],
            })
        }

        async fn render_image(&self, _prompt: &str) -> Result<Vec<u8>> {
            Ok(vec![0x89, 0x50, 0x4e, 0x47])
        }
    }

    #[derive(Clone, Default)]
    struct RecordingClipboard {
        writes: Arc<Mutex<Vec<String>>>,
    }

    impl Clipboard for RecordingClipboard {
        fn write_text(&mut self, text: &str) -> Result<()> {
            self.writes.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn expected_result() -> GenerationResult {
        GenerationResult {
            image_url: format!(
                "data:image/png;base64,{}",
                BASE64.encode([0x89, 0x50, 0x4e, 0x47])
            ),
            tags: "#a #b #c #d #e".to_string(),
        }
    }

    #[tokio::test]
    async fn test_generation_effect_resolves_through_channel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut runtime = AppRuntime::new(
            Arc::new(FixedBackend),
            Box::new(RecordingClipboard::default()),
            tx,
        );

        runtime.perform(Effect::StartGeneration("article".to_string()));

        match rx.recv().await {
            Some(AppEvent::GenerationResolved(Ok(result))) => {
                assert_eq!(result, expected_result());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_clipboard_effect_records_text() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let clipboard = RecordingClipboard::default();
        let writes = Arc::clone(&clipboard.writes);
        let mut runtime = AppRuntime::new(Arc::new(FixedBackend), Box::new(clipboard), tx);

        runtime.perform(Effect::WriteClipboard {
            text: "#a #b".to_string(),
            target: CopyTarget::Tags,
        });

        assert_eq!(writes.lock().unwrap().as_slice(), ["#a #b".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ack_timer_fires_after_two_seconds() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut runtime = AppRuntime::new(
            Arc::new(FixedBackend),
            Box::new(RecordingClipboard::default()),
            tx,
        );

        let before = tokio::time::Instant::now();
        runtime.perform(Effect::RestartAckTimer(CopyTarget::Tags));

        match rx.recv().await {
            Some(AppEvent::CopyAckExpired(CopyTarget::Tags)) => {}
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(before.elapsed() >= COPY_ACK_RESET);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retrigger_aborts_previous_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut runtime = AppRuntime::new(
            Arc::new(FixedBackend),
            Box::new(RecordingClipboard::default()),
            tx,
        );

        runtime.perform(Effect::RestartAckTimer(CopyTarget::Tags));
        runtime.perform(Effect::RestartAckTimer(CopyTarget::Tags));

        // Only the restarted timer fires.
        assert!(matches!(
            rx.recv().await,
            Some(AppEvent::CopyAckExpired(CopyTarget::Tags))
        ));
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_timers_per_target() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut runtime = AppRuntime::new(
            Arc::new(FixedBackend),
            Box::new(RecordingClipboard::default()),
            tx,
        );

        runtime.perform(Effect::RestartAckTimer(CopyTarget::Tags));
        runtime.perform(Effect::RestartAckTimer(CopyTarget::Sheets));

        let mut expired = Vec::new();
        for _ in 0..2 {
            match rx.recv().await {
                Some(AppEvent::CopyAckExpired(target)) => expired.push(target),
                other => panic!("unexpected event: {:?}", other),
            }
        }
        assert!(expired.contains(&CopyTarget::Tags));
        assert!(expired.contains(&CopyTarget::Sheets));
    }

    #[tokio::test]
    async fn test_save_image_writes_png() {
        let dir = std::env::temp_dir().join("headergen-test-save");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("generated-header.png");
        let _ = std::fs::remove_file(&path);

        let data_uri = format!(
            "data:image/png;base64,{}",
            BASE64.encode([0x89, 0x50, 0x4e, 0x47])
        );
        save_image(&data_uri, path.to_str().unwrap());

        assert_eq!(std::fs::read(&path).unwrap(), vec![0x89, 0x50, 0x4e, 0x47]);
        let _ = std::fs::remove_file(&path);
    }
}
