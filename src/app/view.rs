use super::state::AppState;

pub const PLACEHOLDER_TEXT: &str = "Your generated image and tags will appear here.";

/// What the user sees. Exactly one variant is visible at a time, selected
/// by (is_loading, error, result) in that priority order.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Spinner,
    ErrorBanner(String),
    Result(ResultView),
    Placeholder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub image_url: String,
    pub tags: String,
    pub tags_copy_label: &'static str,
    pub sheets_copy_label: &'static str,
}

/// Pure projection of state into a view.
pub fn render(state: &AppState) -> View {
    if state.is_loading {
        return View::Spinner;
    }
    if let Some(error) = &state.error {
        return View::ErrorBanner(error.clone());
    }
    if let Some(result) = &state.result {
        return View::Result(ResultView {
            image_url: result.image_url.clone(),
            tags: result.tags.clone(),
            tags_copy_label: if state.tags_copied {
                "Copied!"
            } else {
                "Copy Tags"
            },
            sheets_copy_label: if state.sheets_copied {
                "Copied!"
            } else {
                "Copy for Sheets"
            },
        });
    }
    View::Placeholder
}

/// Renders a view into a terminal frame.
pub fn draw(view: &View) -> String {
    match view {
        View::Spinner => "  ⏳ Generating assets...".to_string(),
        View::ErrorBanner(message) => format!("  ❌ {}", message),
        View::Result(result) => {
            let mut out = String::new();
            out.push_str("  Generated Assets\n");
            out.push_str(&format!(
                "  header image : {} ({} chars)\n",
                truncate(&result.image_url, 48),
                result.image_url.len()
            ));
            out.push_str(&format!("  seo tags     : {}\n", result.tags));
            out.push_str(&format!(
                "  :tags [{}]  :sheets [{}]  :save [Download Image]",
                result.tags_copy_label, result.sheets_copy_label
            ));
            out
        }
        View::Placeholder => format!("  {}", PLACEHOLDER_TEXT),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}…", head)
    }
}
