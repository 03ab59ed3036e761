use super::{list_preview, step, MaintenanceSettings};
use crate::error::{MaintError, Result};
use crate::executor::CommandRunner;
use colored::*;
use std::path::{Path, PathBuf};
use sysinfo::{Disks, System};

/// 마운트된 파일시스템 사용량
#[derive(Debug, Clone)]
pub struct DiskUsage {
    pub mount_point: PathBuf,
    pub total: u64,
    pub available: u64,
}

impl DiskUsage {
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.available)
    }

    pub fn used_percent(&self) -> f64 {
        usage_percent(self.used(), self.total)
    }
}

/// sysinfo에서 읽은 호스트 지표
#[derive(Debug, Clone, Default)]
pub struct HostMetrics {
    pub load_one: f64,
    pub cpu_count: usize,
    pub memory_used: u64,
    pub memory_total: u64,
    pub disks: Vec<DiskUsage>,
}

impl HostMetrics {
    pub fn collect() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu();

        let cpu_count = match sys.cpus().len() {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            n => n,
        };

        let disks = Disks::new_with_refreshed_list()
            .list()
            .iter()
            .filter(|disk| disk.total_space() > 0)
            .map(|disk| DiskUsage {
                mount_point: disk.mount_point().to_path_buf(),
                total: disk.total_space(),
                available: disk.available_space(),
            })
            .collect();

        Self {
            load_one: System::load_average().one,
            cpu_count,
            memory_used: sys.used_memory(),
            memory_total: sys.total_memory(),
            disks,
        }
    }

    pub fn root_disk(&self) -> Option<&DiskUsage> {
        self.disks
            .iter()
            .find(|disk| disk.mount_point == Path::new("/"))
    }
}

pub fn usage_percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    used as f64 / total as f64 * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UsageLevel {
    Healthy,
    Notice,
    Warning,
    Critical,
}

impl UsageLevel {
    /// 이슈로 집계되는 수준인지 확인
    pub fn is_issue(&self) -> bool {
        matches!(self, UsageLevel::Warning | UsageLevel::Critical)
    }
}

/// 디스크 사용률 분류 (>90 critical, >80 warning, >70 notice)
pub fn classify_disk_usage(percent: f64) -> UsageLevel {
    if percent > 90.0 {
        UsageLevel::Critical
    } else if percent > 80.0 {
        UsageLevel::Warning
    } else if percent > 70.0 {
        UsageLevel::Notice
    } else {
        UsageLevel::Healthy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadLevel {
    Normal,
    Elevated,
    High,
}

/// 1분 평균 부하를 CPU 수와 비교
pub fn classify_load(load_one: f64, cores: usize) -> LoadLevel {
    let cores = cores.max(1) as f64;
    if load_one > cores * 2.0 {
        LoadLevel::High
    } else if load_one > cores {
        LoadLevel::Elevated
    } else {
        LoadLevel::Normal
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Ok,
    Notice,
    Issue,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct HealthCheck {
    pub name: &'static str,
    pub status: CheckStatus,
    pub detail: String,
}

/// 상태 점검 결과 모음
#[derive(Debug, Clone, Default)]
pub struct HealthReport {
    pub checks: Vec<HealthCheck>,
}

impl HealthReport {
    fn push(&mut self, name: &'static str, status: CheckStatus, detail: impl Into<String>) {
        let detail = detail.into();
        let tag = match status {
            CheckStatus::Ok => "[OK]".green(),
            CheckStatus::Notice => "[i]".cyan(),
            CheckStatus::Issue => "[X]".red(),
            CheckStatus::Unknown => "[?]".yellow(),
        };
        println!("    {} {}", tag, detail);
        self.checks.push(HealthCheck {
            name,
            status,
            detail,
        });
    }

    pub fn issues(&self) -> usize {
        self.checks
            .iter()
            .filter(|check| check.status == CheckStatus::Issue)
            .count()
    }
}

/// 시스템 상태 점검 (6개 항목)
pub async fn check_system_health(
    runner: &CommandRunner,
    settings: &MaintenanceSettings,
    metrics: &HostMetrics,
) -> Result<bool> {
    let mut report = HealthReport::default();

    step("1. Checking failed services...");
    let failed = runner.probe_lines("systemctl --failed --no-legend").await?;
    if failed.is_empty() {
        report.push("services", CheckStatus::Ok, "No failed services");
        runner
            .log()
            .record("System health check: No failed services found", true)?;
    } else {
        list_preview(&failed, 10);
        report.push(
            "services",
            CheckStatus::Issue,
            format!("{} failed services", failed.len()),
        );
        runner
            .log()
            .record("System health check: Failed services found", false)?;
    }

    step("2. Checking system load...");
    let load = format!(
        "Load average {:.2} on {} CPUs",
        metrics.load_one, metrics.cpu_count
    );
    match classify_load(metrics.load_one, metrics.cpu_count) {
        LoadLevel::Normal => report.push("load", CheckStatus::Ok, load),
        LoadLevel::Elevated => report.push("load", CheckStatus::Notice, format!("{} (elevated)", load)),
        LoadLevel::High => report.push("load", CheckStatus::Issue, format!("{} (high)", load)),
    }

    step("3. Checking memory usage...");
    if metrics.memory_total == 0 {
        report.push("memory", CheckStatus::Unknown, "Memory usage unavailable");
    } else {
        let percent = usage_percent(metrics.memory_used, metrics.memory_total);
        let detail = format!("Memory usage {:.1}%", percent);
        // 메모리는 이슈로 세지 않음
        if percent > 90.0 {
            report.push("memory", CheckStatus::Notice, format!("{} (high)", detail));
        } else {
            report.push("memory", CheckStatus::Ok, detail);
        }
    }

    step("4. Checking root filesystem...");
    match metrics.root_disk() {
        Some(root) => {
            let percent = root.used_percent();
            let detail = format!("Root filesystem {:.0}% used", percent);
            match classify_disk_usage(percent) {
                UsageLevel::Healthy => report.push("disk", CheckStatus::Ok, detail),
                UsageLevel::Notice => report.push("disk", CheckStatus::Notice, detail),
                UsageLevel::Warning => {
                    report.push("disk", CheckStatus::Issue, format!("{} (warning)", detail))
                }
                UsageLevel::Critical => {
                    report.push("disk", CheckStatus::Issue, format!("{} (critical)", detail))
                }
            }
        }
        None => report.push("disk", CheckStatus::Unknown, "Root filesystem not found"),
    }

    step("5. Checking recent journal errors...");
    let errors = runner
        .probe_lines("journalctl -p err --since '1 hour ago' --no-pager -q | tail -n 10")
        .await?;
    if errors.is_empty() {
        report.push("journal", CheckStatus::Ok, "No errors in the last hour");
    } else {
        list_preview(&errors, 5);
        report.push(
            "journal",
            CheckStatus::Issue,
            format!("{} recent error entries", errors.len()),
        );
    }

    step("6. Checking network connectivity...");
    let ping = format!("ping -c 1 -W 3 {}", settings.ping_target);
    match runner.probe(&ping).await {
        Ok(output) if output.success() => report.push(
            "network",
            CheckStatus::Ok,
            format!("{} is reachable", settings.ping_target),
        ),
        Err(MaintError::Interrupted) => return Err(MaintError::Interrupted),
        _ => report.push(
            "network",
            CheckStatus::Issue,
            format!("{} is unreachable", settings.ping_target),
        ),
    }

    let issues = report.issues();
    println!();
    if issues == 0 {
        println!("{} System health: all checks passed", "[OK]".green().bold());
    } else {
        println!(
            "{} System health: {} issues found",
            "[!]".yellow().bold(),
            issues
        );
    }
    runner.log().record(
        &format!("System health check: {} issues found", issues),
        issues == 0,
    )?;

    Ok(issues == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::LogStatus;
    use crate::testing::{mock_runner, MockLauncher, MockResponse, ScriptedPrompter};
    use std::sync::Arc;

    const GIB: u64 = 1024 * 1024 * 1024;

    fn settings() -> MaintenanceSettings {
        MaintenanceSettings {
            journal_retention: "2w".to_string(),
            ping_target: "192.0.2.1".to_string(),
            pacman_cache_dir: PathBuf::from("/nonexistent"),
            aur_helper: None,
        }
    }

    fn healthy_metrics() -> HostMetrics {
        HostMetrics {
            load_one: 0.5,
            cpu_count: 4,
            memory_used: 2 * GIB,
            memory_total: 16 * GIB,
            disks: vec![DiskUsage {
                mount_point: PathBuf::from("/"),
                total: 100 * GIB,
                available: 60 * GIB,
            }],
        }
    }

    #[test]
    fn test_classify_disk_usage() {
        assert_eq!(classify_disk_usage(50.0), UsageLevel::Healthy);
        assert_eq!(classify_disk_usage(70.0), UsageLevel::Healthy);
        assert_eq!(classify_disk_usage(75.0), UsageLevel::Notice);
        assert_eq!(classify_disk_usage(85.0), UsageLevel::Warning);
        assert_eq!(classify_disk_usage(90.0), UsageLevel::Warning);
        assert_eq!(classify_disk_usage(91.0), UsageLevel::Critical);
        assert_eq!(classify_disk_usage(95.0), UsageLevel::Critical);
        assert!(UsageLevel::Warning.is_issue());
        assert!(!UsageLevel::Notice.is_issue());
    }

    #[test]
    fn test_classify_load() {
        assert_eq!(classify_load(3.0, 4), LoadLevel::Normal);
        assert_eq!(classify_load(5.0, 4), LoadLevel::Elevated);
        assert_eq!(classify_load(9.0, 4), LoadLevel::High);
        assert_eq!(classify_load(1.5, 0), LoadLevel::Elevated);
    }

    #[test]
    fn test_disk_usage_percent() {
        let disk = DiskUsage {
            mount_point: PathBuf::from("/"),
            total: 200,
            available: 50,
        };
        assert_eq!(disk.used(), 150);
        assert_eq!(disk.used_percent(), 75.0);
        assert_eq!(usage_percent(1, 0), 0.0);
    }

    #[tokio::test]
    async fn test_healthy_system() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = Arc::new(MockLauncher::new());
        let runner = mock_runner(dir.path(), launcher.clone(), Arc::new(ScriptedPrompter::new(&[])));

        let ok = check_system_health(&runner, &settings(), &healthy_metrics())
            .await
            .unwrap();

        assert!(ok);
        assert!(launcher.calls().contains(&"ping -c 1 -W 3 192.0.2.1".to_string()));
        let entries = runner.log().entries().unwrap();
        assert_eq!(entries[0].action, "System health check: No failed services found");
        assert_eq!(entries[1].action, "System health check: 0 issues found");
        assert_eq!(entries[1].status, LogStatus::Success);
    }

    #[tokio::test]
    async fn test_issues_are_counted() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = Arc::new(
            MockLauncher::new()
                .rule(
                    "systemctl --failed",
                    MockResponse::Exit(0, "nginx.service loaded failed failed nginx\n", ""),
                )
                .rule("ping", MockResponse::Exit(1, "", "")),
        );
        let runner = mock_runner(dir.path(), launcher, Arc::new(ScriptedPrompter::new(&[])));
        let mut metrics = healthy_metrics();
        metrics.load_one = 12.0;
        metrics.disks[0].available = 5 * GIB;

        let ok = check_system_health(&runner, &settings(), &metrics)
            .await
            .unwrap();

        assert!(!ok);
        let entries = runner.log().entries().unwrap();
        assert_eq!(entries[0].action, "System health check: Failed services found");
        assert_eq!(entries[0].status, LogStatus::Failed);
        // 서비스, 부하, 디스크, 네트워크
        assert_eq!(entries[1].action, "System health check: 4 issues found");
        assert_eq!(entries[1].status, LogStatus::Failed);
    }

    #[tokio::test]
    async fn test_journal_errors_count_as_issue() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = Arc::new(MockLauncher::new().rule(
            "journalctl -p err",
            MockResponse::Exit(
                0,
                "kernel: usb 1-1: device descriptor read/64, error -71\nsystemd[1]: Failed to start backup.service\n",
                "",
            ),
        ));
        let runner = mock_runner(dir.path(), launcher, Arc::new(ScriptedPrompter::new(&[])));

        let ok = check_system_health(&runner, &settings(), &healthy_metrics())
            .await
            .unwrap();

        assert!(!ok);
        let last = runner.log().entries().unwrap().pop().unwrap();
        assert_eq!(last.action, "System health check: 1 issues found");
        assert_eq!(last.status, LogStatus::Failed);
    }

    #[tokio::test]
    async fn test_high_memory_is_not_an_issue() {
        let dir = tempfile::tempdir().unwrap();
        let runner = mock_runner(
            dir.path(),
            Arc::new(MockLauncher::new()),
            Arc::new(ScriptedPrompter::new(&[])),
        );
        let mut metrics = healthy_metrics();
        metrics.memory_used = 15 * GIB;

        assert!(check_system_health(&runner, &settings(), &metrics)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_missing_root_disk_is_not_an_issue() {
        let dir = tempfile::tempdir().unwrap();
        let runner = mock_runner(
            dir.path(),
            Arc::new(MockLauncher::new()),
            Arc::new(ScriptedPrompter::new(&[])),
        );
        let mut metrics = healthy_metrics();
        metrics.disks.clear();

        assert!(check_system_health(&runner, &settings(), &metrics)
            .await
            .unwrap());
    }
}
