use std::sync::Arc;

use headergen::app::clipboard::{Clipboard, EchoClipboard, SystemClipboard};
use headergen::app::runtime::AppRuntime;
use headergen::app::state::{AppEvent, AppState, MIN_ARTICLE_CHARS};
use headergen::app::view::{draw, render};
use headergen::{GeminiClient, GeminiConfig};
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

enum Command {
    Append(String),
    Submit,
    CopyTags,
    CopySheets,
    Save,
    Clear,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    match line.trim() {
        ":generate" | ":g" => Command::Submit,
        ":tags" | ":t" => Command::CopyTags,
        ":sheets" | ":s" => Command::CopySheets,
        ":save" | ":d" => Command::Save,
        ":clear" => Command::Clear,
        ":help" | ":h" => Command::Help,
        ":quit" | ":q" => Command::Quit,
        other if other.starts_with(':') => Command::Unknown(other.to_string()),
        _ => Command::Append(line.to_string()),
    }
}

fn print_banner() {
    println!("CHT-Gen: content-to-header & tag generator");
    println!("Paste your full blog article below (plain text or Markdown).");
    println!("The more content you provide, the better the results.");
    print_help();
}

fn print_help() {
    println!(
        "commands: :generate  :tags (copy tags)  :sheets (copy for sheets)  \
         :save (download image)  :clear  :help  :quit"
    );
}

fn print_frame(state: &AppState) {
    println!();
    println!(
        "article: {} chars (minimum {})",
        state.article_text.trim().chars().count(),
        MIN_ARTICLE_CHARS
    );
    println!("{}", draw(&render(state)));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    headergen::logger::init_with_config(
        headergen::logger::LoggerConfig::development()
            .with_level(headergen::logger::LogLevel::Info),
    )?;

    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    log::info!("🔍 Checking Gemini environment...");
    let config = GeminiConfig::from_env();
    match &config.api_key {
        Some(key) => {
            log::info!("✅ Gemini API key found in environment");
            log::debug!("API key starts with: {}...", &key[..4.min(key.len())]);
        }
        None => log::error!("❌ GEMINI_API_KEY (or API_KEY) is not set"),
    }

    let client = match GeminiClient::new(config) {
        Ok(client) => {
            log::info!("✅ Gemini client initialized");
            client
        }
        Err(e) => {
            log::error!("❌ Failed to initialize Gemini client: {}", e);
            return Err(e.into());
        }
    };

    let clipboard: Box<dyn Clipboard> = match SystemClipboard::new() {
        Ok(clipboard) => Box::new(clipboard),
        Err(e) => {
            log::warn!("⚠️  System clipboard unavailable ({}), copies will print instead", e);
            Box::new(EchoClipboard)
        }
    };

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut runtime = AppRuntime::new(Arc::new(client), clipboard, events_tx);
    let mut state = AppState::new();

    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if input_tx.send(line).is_err() {
                break;
            }
        }
    });

    print_banner();
    print_frame(&state);

    loop {
        tokio::select! {
            Some(line) = input_rx.recv() => {
                let event = match parse_command(&line) {
                    Command::Append(text) => {
                        let mut article = state.article_text.clone();
                        if !article.is_empty() {
                            article.push('\n');
                        }
                        article.push_str(&text);
                        Some(AppEvent::ArticleChanged(article))
                    }
                    Command::Submit => Some(AppEvent::SubmitPressed),
                    Command::CopyTags => Some(AppEvent::CopyTagsPressed),
                    Command::CopySheets => Some(AppEvent::CopySheetsPressed),
                    Command::Save => Some(AppEvent::DownloadPressed),
                    Command::Clear => Some(AppEvent::ArticleChanged(String::new())),
                    Command::Help => {
                        print_help();
                        None
                    }
                    Command::Quit => break,
                    Command::Unknown(cmd) => {
                        println!("unknown command: {}", cmd);
                        None
                    }
                };

                if let Some(event) = event {
                    for effect in state.update(event) {
                        runtime.perform(effect);
                    }
                    print_frame(&state);
                }
            }
            Some(event) = events_rx.recv() => {
                for effect in state.update(event) {
                    runtime.perform(effect);
                }
                print_frame(&state);
            }
            else => break,
        }
    }

    log::info!("👋 Goodbye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert!(matches!(parse_command(":generate"), Command::Submit));
        assert!(matches!(parse_command(":g"), Command::Submit));
        assert!(matches!(parse_command(":tags"), Command::CopyTags));
        assert!(matches!(parse_command(":nope"), Command::Unknown(_)));
        assert!(matches!(parse_command("plain text"), Command::Append(_)));
    }
}
