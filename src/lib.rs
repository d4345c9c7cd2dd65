pub mod app;
pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod orchestrator;

pub use config::GeminiConfig;
pub use error::{GenerateError, Result};
pub use gemini::{GeminiClient, ImageClient, TextClient};
pub use models::{AnalysisResult, GenerationResult};
pub use orchestrator::{generate, GenerationBackend};
