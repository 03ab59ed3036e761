use crate::error::{MaintError, Result};
use crate::executor::interrupt::{CtrlC, InterruptSource};
use crate::executor::launcher::{BashLauncher, ProcessLauncher, ProcessOutput};
use crate::executor::validator::{is_affirmative, CommandValidator};
use crate::history::ActionLog;
use crate::ui::progress::Spinner;
use crate::ui::prompt::{ConfirmPrompt, Prompter, TerminalPrompter};
use colored::*;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 결과 출력 시 보여줄 최대 줄 수
const DISPLAY_LINES: usize = 20;

/// 명령어 실행 결과 분류
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    /// 0이 아닌 종료 코드
    Failed,
    NotFound,
    PermissionDenied,
    /// 위험 명령어 확인에서 거부됨 (프로세스 실행 안 함)
    Cancelled,
    TimedOut,
    Unexpected(String),
}

/// 한 번의 명령어 실행 결과
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// 실행하려던 명령어
    pub command: String,
    /// 로그에 쓰이는 설명
    pub description: Option<String>,
    pub outcome: Outcome,
    /// 프로세스를 시작하지 못했거나 시그널로 종료되면 None
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl ExecutionResult {
    fn new(command: &str, description: Option<&str>, outcome: Outcome) -> Self {
        Self {
            command: command.to_string(),
            description: description.map(str::to_string),
            outcome,
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
            duration: Duration::ZERO,
        }
    }

    fn from_output(command: &str, description: Option<&str>, output: ProcessOutput) -> Self {
        let outcome = match output.exit_code {
            Some(0) => Outcome::Succeeded,
            // bash: 127 = command not found, 126 = not executable
            Some(127) => Outcome::NotFound,
            Some(126) => Outcome::PermissionDenied,
            Some(_) => Outcome::Failed,
            None => Outcome::Unexpected("process terminated by signal".to_string()),
        };

        Self {
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
            ..Self::new(command, description, outcome)
        }
    }

    fn from_launch_error(command: &str, description: Option<&str>, err: std::io::Error) -> Self {
        let outcome = match err.kind() {
            std::io::ErrorKind::NotFound => Outcome::NotFound,
            std::io::ErrorKind::PermissionDenied => Outcome::PermissionDenied,
            _ => Outcome::Unexpected(err.to_string()),
        };

        Self {
            stderr: err.to_string(),
            ..Self::new(command, description, outcome)
        }
    }

    pub fn succeeded(&self) -> bool {
        self.outcome == Outcome::Succeeded
    }

    /// 설명이 있으면 설명, 없으면 명령어
    pub fn action(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.command)
    }

    /// 실패 원인을 에러 타입으로 변환 (성공이면 None)
    pub fn error(&self) -> Option<MaintError> {
        match &self.outcome {
            Outcome::Succeeded => None,
            Outcome::Failed => Some(MaintError::CommandFailed(self.exit_code.unwrap_or(-1))),
            Outcome::NotFound => Some(MaintError::CommandNotFound(self.command.clone())),
            Outcome::PermissionDenied => Some(MaintError::PermissionDenied(self.command.clone())),
            Outcome::Cancelled => Some(MaintError::UserCancelled),
            Outcome::TimedOut => Some(MaintError::TimedOut(self.duration.as_secs())),
            Outcome::Unexpected(message) => Some(MaintError::Unexpected(message.clone())),
        }
    }
}

enum Launched {
    Finished(std::io::Result<ProcessOutput>),
    TimedOut,
    Interrupted,
}

/// 셸 명령어 실행기
///
/// 1. 위험 명령어면 "yes" 확인을 받음
/// 2. 스피너를 띄우고 `bash -c`로 실행
/// 3. 결과를 분류하고 로그에 한 줄 기록한 뒤 반환
///
/// 인터럽트(Ctrl-C)는 `INTERRUPTED:` 로그를 남긴 뒤 `MaintError::Interrupted`로 전파합니다.
pub struct CommandRunner {
    launcher: Arc<dyn ProcessLauncher>,
    prompter: Arc<dyn Prompter>,
    interrupt: Arc<dyn InterruptSource>,
    validator: CommandValidator,
    log: ActionLog,
    timeout: Option<Duration>,
    quiet: bool,
    progress: bool,
}

impl CommandRunner {
    pub fn new(log: ActionLog) -> Self {
        Self {
            launcher: Arc::new(BashLauncher::new()),
            prompter: Arc::new(TerminalPrompter::new()),
            interrupt: Arc::new(CtrlC),
            validator: CommandValidator::new(),
            log,
            timeout: None,
            quiet: false,
            progress: true,
        }
    }

    pub fn with_launcher(mut self, launcher: Arc<dyn ProcessLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn with_prompter(mut self, prompter: Arc<dyn Prompter>) -> Self {
        self.prompter = prompter;
        self
    }

    pub fn with_interrupt(mut self, interrupt: Arc<dyn InterruptSource>) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// 스피너 표시 여부 (결과 출력은 유지)
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// 스피너와 결과 출력 끄기
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    /// 명령어 실행
    pub async fn execute(&self, command: &str, description: Option<&str>) -> Result<ExecutionResult> {
        let action = description.unwrap_or(command);

        if let Some(pattern) = self.validator.find_dangerous_pattern(command) {
            let approved =
                ConfirmPrompt::new().confirm_dangerous(self.prompter.as_ref(), command, pattern);
            if !approved {
                self.log
                    .record(&format!("CANCELLED: {} (dangerous command)", action), false)?;
                if !self.quiet {
                    println!("{} Command cancelled by user", "[X]".yellow());
                }
                tracing::info!(command, pattern, "dangerous command refused");
                return Ok(ExecutionResult::new(command, description, Outcome::Cancelled));
            }
        }

        if !self.quiet {
            println!("{} {}", "[>>] Starting:".cyan(), command);
        }
        tracing::debug!(command, "launching");

        let spinner = if self.quiet || !self.progress {
            Spinner::hidden()
        } else {
            Spinner::start(&format!("Running: {}...", action))
        };
        let started = Instant::now();
        let launched = self.launch_guarded(command).await;
        spinner.stop();
        let duration = started.elapsed();

        let mut result = match launched {
            Launched::Interrupted => {
                self.log.record(&format!("INTERRUPTED: {}", action), false)?;
                if !self.quiet {
                    println!("{} Interrupted: {}", "[!]".yellow(), action);
                    println!("    Operation cancelled by user (Ctrl+C)");
                }
                tracing::info!(command, "interrupted");
                return Err(MaintError::Interrupted);
            }
            Launched::TimedOut => ExecutionResult::new(command, description, Outcome::TimedOut),
            Launched::Finished(Ok(output)) => {
                ExecutionResult::from_output(command, description, output)
            }
            Launched::Finished(Err(e)) => {
                ExecutionResult::from_launch_error(command, description, e)
            }
        };
        result.duration = duration;

        self.log.record(result.action(), result.succeeded())?;
        tracing::debug!(
            command,
            exit_code = ?result.exit_code,
            outcome = ?result.outcome,
            elapsed_ms = duration.as_millis() as u64,
            "command finished"
        );

        if !self.quiet {
            self.report(&result);
        }
        Ok(result)
    }

    /// 조용한 조회용 실행 (확인, 스피너, 로그 없음)
    pub async fn probe(&self, command: &str) -> Result<ProcessOutput> {
        tracing::trace!(command, "probe");
        match self.launch_guarded(command).await {
            Launched::Finished(result) => Ok(result?),
            Launched::TimedOut => Err(MaintError::TimedOut(
                self.timeout.map(|t| t.as_secs()).unwrap_or_default(),
            )),
            Launched::Interrupted => Err(MaintError::Interrupted),
        }
    }

    /// 조회 결과의 비어 있지 않은 줄들
    ///
    /// 실패한 조회는 빈 목록으로 취급합니다 (표시용). 인터럽트만 전파합니다.
    pub async fn probe_lines(&self, command: &str) -> Result<Vec<String>> {
        match self.probe(command).await {
            Ok(output) if output.success() => Ok(output
                .stdout
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()),
            Ok(_) => Ok(Vec::new()),
            Err(MaintError::Interrupted) => Err(MaintError::Interrupted),
            Err(e) => {
                tracing::debug!(command, error = %e, "probe failed");
                Ok(Vec::new())
            }
        }
    }

    /// 선택적 후속 작업 확인 (정확히 "yes"만 승인)
    pub fn confirm(&self, question: &str) -> Result<bool> {
        let answer = self.prompter.ask(&format!("{} (yes/no)", question))?;
        Ok(is_affirmative(&answer))
    }

    /// 운영자 입력 그대로 받기
    pub fn ask(&self, question: &str) -> Result<String> {
        self.prompter.ask(question)
    }

    pub fn prompter(&self) -> &dyn Prompter {
        self.prompter.as_ref()
    }

    async fn launch_guarded(&self, command: &str) -> Launched {
        let run = async {
            match self.timeout {
                Some(limit) => {
                    match tokio::time::timeout(limit, self.launcher.launch(command)).await {
                        Ok(result) => Launched::Finished(result),
                        Err(_) => Launched::TimedOut,
                    }
                }
                None => Launched::Finished(self.launcher.launch(command).await),
            }
        };

        // 진행 중인 future가 drop되면 kill_on_drop으로 자식 프로세스도 종료됨
        tokio::select! {
            biased;
            _ = self.interrupt.interrupted() => Launched::Interrupted,
            launched = run => launched,
        }
    }

    fn report(&self, result: &ExecutionResult) {
        let action = result.action();
        match &result.outcome {
            Outcome::Succeeded => {
                println!("{} Completed: {}", "[OK]".green().bold(), action);
            }
            Outcome::Failed => {
                println!(
                    "{} Failed: {} (exit code {})",
                    "[X]".red().bold(),
                    action,
                    result.exit_code.unwrap_or(-1)
                );
                print_output_block("Output", &result.stdout);
                print_output_block("Error output", &result.stderr);
            }
            Outcome::NotFound => {
                println!("{} Command not found: {}", "[X]".red().bold(), action);
                println!("    The specified command is not available on this system");
                print_output_block("Error output", &result.stderr);
            }
            Outcome::PermissionDenied => {
                println!("{} Permission denied: {}", "[X]".red().bold(), action);
                println!("    This operation requires elevated privileges");
                println!("    {} Try running with sudo or check file permissions", "[i]".cyan());
            }
            Outcome::TimedOut => {
                println!(
                    "{} Timed out after {}s: {}",
                    "[X]".red().bold(),
                    result.duration.as_secs(),
                    action
                );
                println!(
                    "    {} Increase command_timeout_secs in ~/.archmaint/config.toml (0 disables it)",
                    "[i]".cyan()
                );
            }
            Outcome::Unexpected(message) => {
                println!("{} Unexpected error: {}", "[X]".red().bold(), message);
                println!("    {} Check system logs for more details", "[i]".cyan());
            }
            Outcome::Cancelled => {}
        }
    }
}

fn print_output_block(label: &str, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    println!("    {}:", label.dimmed());
    for line in truncate_for_display(text, DISPLAY_LINES).lines() {
        println!("      {}", line);
    }
}

/// 출력의 마지막 `max_lines`줄만 남김 (표시용)
pub fn truncate_for_display(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.trim_end().lines().collect();
    if lines.len() <= max_lines {
        return lines.join("\n");
    }
    let hidden = lines.len() - max_lines;
    format!(
        "... ({} more lines)\n{}",
        hidden,
        lines[hidden..].join("\n")
    )
}
