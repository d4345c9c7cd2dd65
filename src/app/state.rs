use crate::error::GenerateError;
use crate::models::GenerationResult;

pub const MIN_ARTICLE_CHARS: usize = 100;
pub const VALIDATION_MESSAGE: &str =
    "Article content is too short. Please provide at least 100 characters.";
pub const DOWNLOAD_FILE_NAME: &str = "generated-header.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyTarget {
    Tags,
    Sheets,
}

/// Every way the application state is allowed to change.
#[derive(Debug)]
pub enum AppEvent {
    ArticleChanged(String),
    SubmitPressed,
    GenerationResolved(Result<GenerationResult, GenerateError>),
    CopyTagsPressed,
    CopySheetsPressed,
    CopyAckExpired(CopyTarget),
    DownloadPressed,
}

/// Side effects requested by a state transition; executed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    StartGeneration(String),
    WriteClipboard { text: String, target: CopyTarget },
    RestartAckTimer(CopyTarget),
    SaveImage { data_uri: String, file_name: String },
}

#[derive(Debug, Default)]
pub struct AppState {
    pub article_text: String,
    pub result: Option<GenerationResult>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub tags_copied: bool,
    pub sheets_copied: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event and returns the effects to execute. Pure: no IO
    /// happens here.
    pub fn update(&mut self, event: AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::ArticleChanged(text) => {
                // The input is disabled while a generation is in flight.
                if !self.is_loading {
                    self.article_text = text;
                }
                Vec::new()
            }
            AppEvent::SubmitPressed => self.submit(),
            AppEvent::GenerationResolved(outcome) => {
                self.is_loading = false;
                match outcome {
                    Ok(result) => self.result = Some(result),
                    Err(err) => self.error = Some(err.to_string()),
                }
                Vec::new()
            }
            AppEvent::CopyTagsPressed => self.copy_tags(),
            AppEvent::CopySheetsPressed => self.copy_for_sheets(),
            AppEvent::CopyAckExpired(target) => {
                match target {
                    CopyTarget::Tags => self.tags_copied = false,
                    CopyTarget::Sheets => self.sheets_copied = false,
                }
                Vec::new()
            }
            AppEvent::DownloadPressed => self.download(),
        }
    }

    fn submit(&mut self) -> Vec<Effect> {
        // Single outstanding request at a time.
        if self.is_loading {
            return Vec::new();
        }

        if let Err(e) = validate_article(&self.article_text) {
            self.error = Some(e.to_string());
            return Vec::new();
        }

        self.is_loading = true;
        self.error = None;
        self.result = None;
        vec![Effect::StartGeneration(self.article_text.clone())]
    }

    fn copy_tags(&mut self) -> Vec<Effect> {
        if let Some(result) = &self.result {
            self.tags_copied = true;
            vec![
                Effect::WriteClipboard {
                    text: result.tags.clone(),
                    target: CopyTarget::Tags,
                },
                Effect::RestartAckTimer(CopyTarget::Tags),
            ]
        } else {
            Vec::new()
        }
    }

    /// Copies a tab-separated `imageUrl<TAB>tags` row for spreadsheet
    /// pasting.
    fn copy_for_sheets(&mut self) -> Vec<Effect> {
        if let Some(result) = &self.result {
            self.sheets_copied = true;
            vec![
                Effect::WriteClipboard {
                    text: format!("{}\t{}", result.image_url, result.tags),
                    target: CopyTarget::Sheets,
                },
                Effect::RestartAckTimer(CopyTarget::Sheets),
            ]
        } else {
            Vec::new()
        }
    }

    fn download(&mut self) -> Vec<Effect> {
        if let Some(result) = &self.result {
            vec![Effect::SaveImage {
                data_uri: result.image_url.clone(),
                file_name: DOWNLOAD_FILE_NAME.to_string(),
            }]
        } else {
            Vec::new()
        }
    }
}

/// Pre-call check, synchronous and local; no external call is made for an
/// article under the minimum trimmed length.
pub fn validate_article(text: &str) -> crate::error::Result<()> {
    if text.trim().chars().count() < MIN_ARTICLE_CHARS {
        return Err(GenerateError::ValidationError(VALIDATION_MESSAGE.to_string()));
    }
    Ok(())
}
