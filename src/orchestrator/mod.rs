pub mod summary;
pub mod task;

pub use summary::{Grade, RunState, Summary, TaskOutcome, TaskStatus};
pub use task::{FnOperation, Operation, Task};

use crate::error::{MaintError, Result};
use crate::executor::CommandRunner;
use colored::*;
use std::time::Instant;

/// 순차 작업 실행기
///
/// 작업은 주어진 순서대로 하나씩 실행됩니다. 실패한 작업은 기록만 하고 다음으로 넘어가며,
/// 인터럽트가 발생하면 그 자리에서 멈추고 부분 요약을 반환합니다. 재시도는 하지 않습니다.
pub struct TaskOrchestrator<'a> {
    runner: &'a CommandRunner,
    /// 로그 항목 접두사 (예: "FULL_MAINTENANCE")
    label: String,
    dry_run: bool,
}

impl<'a> TaskOrchestrator<'a> {
    pub fn new(runner: &'a CommandRunner, label: impl Into<String>) -> Self {
        Self {
            runner,
            label: label.into(),
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 계획에 따라 모든 작업 실행
    pub async fn run_all(&self, tasks: &[Task]) -> Summary {
        let start_time = Instant::now();
        let total = tasks.len();
        let mut summary = Summary::new(total);
        summary.dry_run = self.dry_run;

        if self.dry_run {
            for task in tasks {
                println!(
                    "{} Would execute: {}{}",
                    "[DRY RUN]".cyan().bold(),
                    task.name,
                    if task.critical { " (critical)" } else { "" }
                );
                summary.outcomes.push(TaskOutcome {
                    name: task.name.clone(),
                    critical: task.critical,
                    status: TaskStatus::Planned,
                    error: None,
                    duration: Default::default(),
                });
            }
            summary.state = RunState::Completed;
            return summary;
        }

        summary.state = RunState::Running;
        tracing::info!(label = %self.label, total, "run started");

        for (idx, task) in tasks.iter().enumerate() {
            println!(
                "\n{} TASK {}/{}: {}",
                "[>>]".cyan().bold(),
                idx + 1,
                total,
                task.name.bold()
            );
            println!("     {}", task.description.dimmed());
            println!(
                "     Critical: {}",
                if task.critical { "Yes".red() } else { "No".normal() }
            );

            let task_start = Instant::now();
            let result = task.operation.run(self.runner).await;
            let duration = task_start.elapsed();

            let (status, error) = match result {
                Ok(true) => {
                    println!(
                        "{} {} completed successfully in {:.1}s",
                        "[OK]".green().bold(),
                        task.name,
                        duration.as_secs_f64()
                    );
                    self.record(&format!("{}: {}", self.label, task.name), true);
                    (TaskStatus::Succeeded, None)
                }
                Ok(false) => {
                    println!(
                        "{} {} failed after {:.1}s",
                        "[X]".red().bold(),
                        task.name,
                        duration.as_secs_f64()
                    );
                    self.record(&format!("{}: {}", self.label, task.name), false);
                    (TaskStatus::Failed, None)
                }
                Err(MaintError::Interrupted) => {
                    println!(
                        "\n{} Interrupted by user during {}",
                        "[!]".yellow().bold(),
                        task.name
                    );
                    println!("    You can resume later or run individual tasks.");
                    self.record(
                        &format!("{}: INTERRUPTED during {}", self.label, task.name),
                        false,
                    );
                    summary.state = RunState::Interrupted;
                    summary.interrupted_during = Some(task.name.clone());
                    summary.elapsed = start_time.elapsed();
                    tracing::info!(label = %self.label, task = %task.name, "run interrupted");
                    return summary;
                }
                Err(e) => {
                    println!(
                        "{} Unexpected error in {}: {}",
                        "[X]".red().bold(),
                        task.name,
                        e.to_string().red()
                    );
                    self.record(
                        &format!("{}: {} - ERROR: {}", self.label, task.name, e),
                        false,
                    );
                    (TaskStatus::Failed, Some(e.to_string()))
                }
            };

            if status == TaskStatus::Failed && task.critical {
                println!(
                    "{} {} is a critical task. Consider reviewing the error.",
                    "[!]".yellow(),
                    task.name
                );
                summary
                    .warnings
                    .push(format!("Critical task '{}' failed", task.name));
            }

            summary.outcomes.push(TaskOutcome {
                name: task.name.clone(),
                critical: task.critical,
                status,
                error,
                duration,
            });
        }

        summary.state = RunState::Completed;
        summary.elapsed = start_time.elapsed();
        tracing::info!(
            label = %self.label,
            succeeded = summary.success_count(),
            failed = summary.failure_count(),
            "run completed"
        );
        summary
    }

    /// 작업 단위 로그 기록 (실패해도 실행은 계속)
    fn record(&self, action: &str, success: bool) {
        if let Err(e) = self.record_inner(action, success) {
            eprintln!("{} Failed to write log entry: {}", "[!]".yellow(), e);
        }
    }

    fn record_inner(&self, action: &str, success: bool) -> Result<()> {
        self.runner.log().record(action, success)
    }
}
