use archmaint::executor::interrupt::InterruptSource;
use archmaint::executor::{CommandRunner, ProcessLauncher, ProcessOutput};
use archmaint::history::{ActionLog, LogStatus};
use archmaint::orchestrator::{Operation, RunState, Task, TaskOrchestrator};
use archmaint::ui::Prompter;
use archmaint::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// "fail"은 exit 1, "hang"은 인터럽트를 알린 뒤 멈춤, 나머지는 exit 0
struct FakeShell {
    calls: Mutex<Vec<String>>,
    hung: Arc<Notify>,
}

#[async_trait]
impl ProcessLauncher for FakeShell {
    async fn launch(&self, command: &str) -> std::io::Result<ProcessOutput> {
        self.calls.lock().unwrap().push(command.to_string());
        match command {
            "fail" => Ok(ProcessOutput {
                exit_code: Some(1),
                stdout: String::new(),
                stderr: "boom".to_string(),
            }),
            "hang" => {
                self.hung.notify_one();
                std::future::pending().await
            }
            _ => Ok(ProcessOutput {
                exit_code: Some(0),
                stdout: String::new(),
                stderr: String::new(),
            }),
        }
    }
}

/// 명령어가 멈추면 발생하는 Ctrl-C
struct CtrlCWhenHung(Arc<Notify>);

#[async_trait]
impl InterruptSource for CtrlCWhenHung {
    async fn interrupted(&self) {
        self.0.notified().await
    }
}

struct Answer(&'static str);

impl Prompter for Answer {
    fn ask(&self, _question: &str) -> Result<String> {
        Ok(self.0.to_string())
    }
}

struct Shell(&'static str);

#[async_trait]
impl Operation for Shell {
    async fn run(&self, runner: &CommandRunner) -> Result<bool> {
        Ok(runner.execute(self.0, None).await?.succeeded())
    }
}

fn setup(answer: &'static str) -> (tempfile::TempDir, CommandRunner, Arc<FakeShell>) {
    let dir = tempfile::tempdir().unwrap();
    let hung = Arc::new(Notify::new());
    let shell = Arc::new(FakeShell {
        calls: Mutex::new(Vec::new()),
        hung: hung.clone(),
    });
    let runner = CommandRunner::new(ActionLog::new(dir.path().join("maint.log")))
        .with_launcher(shell.clone())
        .with_prompter(Arc::new(Answer(answer)))
        .with_interrupt(Arc::new(CtrlCWhenHung(hung)))
        .quiet();
    (dir, runner, shell)
}

fn actions(runner: &CommandRunner) -> Vec<(String, LogStatus)> {
    runner
        .log()
        .entries()
        .unwrap()
        .into_iter()
        .map(|e| (e.action, e.status))
        .collect()
}

#[tokio::test]
async fn non_critical_failure_runs_every_task() {
    let (_dir, runner, shell) = setup("no");
    let tasks = vec![
        Task::new("A", Shell("ok")),
        Task::new("B", Shell("fail")),
        Task::new("C", Shell("ok")),
    ];

    let summary = TaskOrchestrator::new(&runner, "FULL_MAINTENANCE")
        .run_all(&tasks)
        .await;

    assert_eq!(shell.calls.lock().unwrap().len(), 3);
    assert_eq!(summary.success_count(), 2);
    assert_eq!(summary.failed(), vec!["B"]);
    assert!(summary.warnings.is_empty());
    assert!(!summary.all_succeeded());

    let logged = actions(&runner);
    assert!(logged.contains(&("FULL_MAINTENANCE: B".to_string(), LogStatus::Failed)));
    assert!(logged.contains(&("FULL_MAINTENANCE: C".to_string(), LogStatus::Success)));
}

#[tokio::test]
async fn critical_failure_adds_warning() {
    let (_dir, runner, _shell) = setup("no");
    let tasks = vec![
        Task::new("System Update", Shell("fail")).critical(),
        Task::new("Update Locate Database", Shell("ok")),
    ];

    let summary = TaskOrchestrator::new(&runner, "FULL_MAINTENANCE")
        .run_all(&tasks)
        .await;

    assert_eq!(summary.executed(), 2);
    assert_eq!(summary.critical_failures(), vec!["System Update"]);
    assert_eq!(summary.warnings, vec!["Critical task 'System Update' failed"]);
}

#[tokio::test]
async fn interrupt_stops_before_next_task() {
    let (_dir, runner, shell) = setup("no");
    let tasks = vec![
        Task::new("A", Shell("ok")),
        Task::new("B", Shell("hang")),
        Task::new("C", Shell("ok")),
    ];

    let summary = TaskOrchestrator::new(&runner, "FULL_MAINTENANCE")
        .run_all(&tasks)
        .await;

    assert_eq!(summary.state, RunState::Interrupted);
    assert_eq!(summary.interrupted_during.as_deref(), Some("B"));
    assert_eq!(summary.executed(), 1);
    assert!(!summary.all_succeeded());
    assert_eq!(*shell.calls.lock().unwrap(), vec!["ok", "hang"]);

    let logged = actions(&runner);
    assert!(logged.contains(&("INTERRUPTED: hang".to_string(), LogStatus::Failed)));
    assert_eq!(
        logged.last().unwrap(),
        &(
            "FULL_MAINTENANCE: INTERRUPTED during B".to_string(),
            LogStatus::Failed
        )
    );
}

#[tokio::test]
async fn refused_dangerous_command_never_reaches_shell() {
    let (_dir, runner, shell) = setup("n");
    let tasks = vec![Task::new("Wipe", Shell("dd if=/dev/zero of=/dev/sda"))];

    let summary = TaskOrchestrator::new(&runner, "MAINTENANCE")
        .run_all(&tasks)
        .await;

    assert!(shell.calls.lock().unwrap().is_empty());
    assert_eq!(summary.failed(), vec!["Wipe"]);
    let logged = actions(&runner);
    assert_eq!(
        logged[0],
        (
            "CANCELLED: dd if=/dev/zero of=/dev/sda (dangerous command)".to_string(),
            LogStatus::Failed
        )
    );
}

#[tokio::test]
async fn log_survives_across_runs() {
    let (dir, runner, _shell) = setup("no");
    TaskOrchestrator::new(&runner, "MAINTENANCE")
        .run_all(&[Task::new("A", Shell("ok"))])
        .await;

    let reopened = ActionLog::new(dir.path().join("maint.log"));
    let stats = reopened.stats().unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.success, 2);
    assert_eq!(stats.failed, 0);
}
