pub mod clipboard;
pub mod runtime;
pub mod state;
pub mod view;

pub use clipboard::{Clipboard, EchoClipboard, SystemClipboard};
pub use runtime::AppRuntime;
pub use state::{AppEvent, AppState, CopyTarget, Effect};
pub use view::{draw, render, ResultView, View};
