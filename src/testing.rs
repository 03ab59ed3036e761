//! 단위 테스트용 목(mock) 구현

use crate::error::{MaintError, Result};
use crate::executor::interrupt::{InterruptSource, NeverInterrupt};
use crate::executor::launcher::{ProcessLauncher, ProcessOutput};
use crate::executor::runner::CommandRunner;
use crate::history::ActionLog;
use crate::ui::prompt::Prompter;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockResponse {
    Exit(i32, &'static str, &'static str),
    NotFound,
    PermissionDenied,
    Other(&'static str),
    Hang,
}

/// 호출된 명령어를 기록하고 준비된 응답을 순서대로 돌려주는 실행기
///
/// 응답이 없거나 규칙이 없으면 exit 0.
pub struct MockLauncher {
    responses: Mutex<VecDeque<MockResponse>>,
    rules: Vec<(&'static str, MockResponse)>,
    calls: Mutex<Vec<String>>,
}

impl MockLauncher {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            rules: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        let launcher = Self::new();
        *launcher.responses.lock().unwrap() = responses.into();
        launcher
    }

    /// 명령어가 `prefix`로 시작하면 항상 `response`
    pub fn rule(mut self, prefix: &'static str, response: MockResponse) -> Self {
        self.rules.push((prefix, response));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ProcessLauncher for MockLauncher {
    async fn launch(&self, command: &str) -> std::io::Result<ProcessOutput> {
        self.calls.lock().unwrap().push(command.to_string());

        let ruled = self
            .rules
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix))
            .map(|(_, response)| response.clone());
        let response = match ruled {
            Some(response) => response,
            None => self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(MockResponse::Exit(0, "", "")),
        };

        match response {
            MockResponse::Exit(code, stdout, stderr) => Ok(ProcessOutput {
                exit_code: Some(code),
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            }),
            MockResponse::NotFound => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No such file or directory",
            )),
            MockResponse::PermissionDenied => Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "Permission denied",
            )),
            MockResponse::Other(message) => Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                message,
            )),
            MockResponse::Hang => std::future::pending().await,
        }
    }
}

/// 준비된 답을 순서대로 돌려주는 프롬프트 (답이 없으면 에러)
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    questions: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, question: &str) -> Result<String> {
        self.questions.lock().unwrap().push(question.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| MaintError::PromptError("no scripted answer".to_string()))
    }
}

/// 즉시 발생하는 인터럽트
pub struct AlreadyInterrupted;

#[async_trait]
impl InterruptSource for AlreadyInterrupted {
    async fn interrupted(&self) {}
}

/// 목 실행기와 스크립트 프롬프트를 쓰는 조용한 runner
pub fn mock_runner(
    log_dir: &Path,
    launcher: Arc<MockLauncher>,
    prompter: Arc<ScriptedPrompter>,
) -> CommandRunner {
    CommandRunner::new(ActionLog::new(log_dir.join("test.log")))
        .with_launcher(launcher)
        .with_prompter(prompter)
        .with_interrupt(Arc::new(NeverInterrupt))
        .quiet()
}
