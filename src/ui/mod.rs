pub mod progress;
pub mod prompt;
pub mod report;

pub use progress::{create_spinner, Spinner};
pub use prompt::{select_menu, wait_for_enter, ConfirmPrompt, Prompter, TerminalPrompter};
