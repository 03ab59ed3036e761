use crate::error::{MaintError, Result};
use crate::executor::validator::is_affirmative;
use colored::*;
use dialoguer::{Input, Select};

/// "사람에게 묻고 문자열을 받는" 기능
///
/// 대화형 터미널 구현과 테스트용 스크립트 구현을 교체할 수 있도록 trait으로 분리합니다.
pub trait Prompter: Send + Sync {
    fn ask(&self, question: &str) -> Result<String>;
}

/// dialoguer 기반 터미널 입력
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&self, question: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(question)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| MaintError::PromptError(e.to_string()))
    }
}

pub struct ConfirmPrompt;

impl ConfirmPrompt {
    pub fn new() -> Self {
        Self
    }

    /// 위험 명령어 실행 확인
    ///
    /// 정확히 "yes"를 입력해야 승인됩니다. 빈 입력, 다른 입력, 입력 오류는 모두 거부로 처리합니다.
    pub fn confirm_dangerous(&self, prompter: &dyn Prompter, command: &str, pattern: &str) -> bool {
        eprintln!(
            "\n{} Potentially dangerous command detected: {}",
            "[!!!]".red().bold(),
            pattern.red().bold()
        );
        eprintln!("  {} {}", "Command:".bold(), command.red());

        match prompter.ask("Are you sure you want to continue? (yes/no)") {
            Ok(answer) => is_affirmative(&answer),
            Err(e) => {
                tracing::warn!(error = %e, "confirmation prompt failed; treating as refusal");
                false
            }
        }
    }
}

impl Default for ConfirmPrompt {
    fn default() -> Self {
        Self::new()
    }
}

/// 메뉴 선택 (Esc/q는 None)
pub fn select_menu(title: &str, items: &[String]) -> Result<Option<usize>> {
    Select::new()
        .with_prompt(title)
        .items(items)
        .default(0)
        .interact_opt()
        .map_err(|e| MaintError::PromptError(e.to_string()))
}

/// "계속하려면 Enter" 대기
pub fn wait_for_enter(prompter: &dyn Prompter) {
    if let Err(e) = prompter.ask("Press Enter to continue") {
        tracing::debug!(error = %e, "continue prompt closed");
    }
}
