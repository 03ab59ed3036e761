pub mod disk;
pub mod health;
pub mod packages;

use crate::config::Config;
use crate::error::Result;
use crate::executor::CommandRunner;
use crate::orchestrator::{Operation, Task};
use async_trait::async_trait;
use colored::*;
use health::HostMetrics;
use std::path::PathBuf;
use std::sync::Arc;

/// 유지보수 작업 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaintenanceKind {
    SystemUpdate,
    PackageCache,
    AurUpdate,
    JournalCleanup,
    LocateDatabase,
    HealthCheck,
    DiskUsage,
}

impl MaintenanceKind {
    /// 전체 유지보수 순서
    pub const FULL_PLAN: [MaintenanceKind; 6] = [
        MaintenanceKind::SystemUpdate,
        MaintenanceKind::PackageCache,
        MaintenanceKind::AurUpdate,
        MaintenanceKind::JournalCleanup,
        MaintenanceKind::LocateDatabase,
        MaintenanceKind::HealthCheck,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MaintenanceKind::SystemUpdate => "System Update",
            MaintenanceKind::PackageCache => "Clean Packages Cache",
            MaintenanceKind::AurUpdate => "Update AUR Packages",
            MaintenanceKind::JournalCleanup => "Clean Systemd Logs",
            MaintenanceKind::LocateDatabase => "Update Locate Database",
            MaintenanceKind::HealthCheck => "Check System Health",
            MaintenanceKind::DiskUsage => "Check Disk Usage",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MaintenanceKind::SystemUpdate => "Update system packages and sync databases",
            MaintenanceKind::PackageCache => "Remove old packages and orphaned dependencies",
            MaintenanceKind::AurUpdate => "Update packages from AUR repositories",
            MaintenanceKind::JournalCleanup => "Clean old systemd journal logs",
            MaintenanceKind::LocateDatabase => "Update file location database",
            MaintenanceKind::HealthCheck => "Verify system services and overall health",
            MaintenanceKind::DiskUsage => "Analyze disk usage and large directories",
        }
    }

    /// 실패 시 요약에 따로 표시되는 작업
    pub fn critical(&self) -> bool {
        matches!(
            self,
            MaintenanceKind::SystemUpdate | MaintenanceKind::HealthCheck
        )
    }
}

/// 유지보수 동작에 필요한 설정
#[derive(Debug, Clone)]
pub struct MaintenanceSettings {
    pub journal_retention: String,
    pub ping_target: String,
    pub pacman_cache_dir: PathBuf,
    /// PATH에서 찾은 yay 경로 (없으면 AUR 작업 건너뜀)
    pub aur_helper: Option<PathBuf>,
}

impl MaintenanceSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            journal_retention: config.journal_retention.clone(),
            ping_target: config.ping_target.clone(),
            pacman_cache_dir: PathBuf::from("/var/cache/pacman/pkg"),
            aur_helper: which::which("yay").ok(),
        }
    }
}

/// Arch Linux 유지보수 작업 모음
pub struct Maintenance {
    settings: MaintenanceSettings,
}

impl Maintenance {
    pub fn new(settings: MaintenanceSettings) -> Arc<Self> {
        Arc::new(Self { settings })
    }

    /// 작업 하나 실행
    pub async fn run(&self, kind: MaintenanceKind, runner: &CommandRunner) -> Result<bool> {
        match kind {
            MaintenanceKind::SystemUpdate => packages::update_system(runner).await,
            MaintenanceKind::PackageCache => {
                packages::clean_package_cache(runner, &self.settings).await
            }
            MaintenanceKind::AurUpdate => packages::update_aur_packages(runner, &self.settings).await,
            MaintenanceKind::JournalCleanup => {
                packages::clean_systemd_logs(runner, &self.settings).await
            }
            MaintenanceKind::LocateDatabase => packages::update_locate_database(runner).await,
            MaintenanceKind::HealthCheck => {
                let metrics = HostMetrics::collect();
                health::check_system_health(runner, &self.settings, &metrics).await
            }
            MaintenanceKind::DiskUsage => {
                let metrics = HostMetrics::collect();
                disk::check_disk_usage(runner, &self.settings, &metrics).await
            }
        }
    }

    pub fn task(self: &Arc<Self>, kind: MaintenanceKind) -> Task {
        let task = Task::new(
            kind.name(),
            Step {
                maintenance: Arc::clone(self),
                kind,
            },
        )
        .with_description(kind.description());

        if kind.critical() {
            task.critical()
        } else {
            task
        }
    }

    pub fn plan(self: &Arc<Self>, kinds: &[MaintenanceKind]) -> Vec<Task> {
        kinds.iter().map(|kind| self.task(*kind)).collect()
    }

    pub fn full_plan(self: &Arc<Self>) -> Vec<Task> {
        self.plan(&MaintenanceKind::FULL_PLAN)
    }
}

/// 오케스트레이터에 넘기는 작업 단위
struct Step {
    maintenance: Arc<Maintenance>,
    kind: MaintenanceKind,
}

#[async_trait]
impl Operation for Step {
    async fn run(&self, runner: &CommandRunner) -> Result<bool> {
        self.maintenance.run(self.kind, runner).await
    }
}

pub(crate) fn step(message: &str) {
    println!("\n{} {}", "[*]".cyan(), message.bold());
}

pub(crate) fn hint(message: &str) {
    println!("    {} {}", "[i]".cyan(), message);
}

/// 목록 앞부분만 출력
pub(crate) fn list_preview(items: &[String], limit: usize) {
    for (i, item) in items.iter().take(limit).enumerate() {
        println!("    {:2}. {}", i + 1, item);
    }
    if items.len() > limit {
        println!("    ... and {} more", items.len() - limit);
    }
}
