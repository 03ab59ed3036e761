use anyhow::{Context, Result};
use archmaint::cli::MaintenanceCli;
use archmaint::config::Config;
use archmaint::executor::CommandRunner;
use archmaint::history::ActionLog;
use archmaint::logging::init_logging;
use archmaint::maintenance::{Maintenance, MaintenanceKind, MaintenanceSettings};
use archmaint::orchestrator::{Task, TaskOrchestrator};
use archmaint::ui::report::{print_banner, print_log_status, print_summary, print_system_info};
use archmaint::ui::{select_menu, wait_for_enter};
use clap::Parser;
use colored::*;
use std::sync::Arc;

/// 상태 화면에 보여줄 최근 로그 수
const RECENT_ENTRIES: usize = 5;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = MaintenanceCli::parse();
    init_logging(cli.log_level, cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;
    tracing::debug!(?config, "configuration loaded");

    let log = ActionLog::new(config.log_path())
        .with_rotation(config.log_max_bytes, config.log_backups);
    let runner = CommandRunner::new(log)
        .with_timeout(config.command_timeout())
        .with_progress(config.show_progress);
    let maintenance = Maintenance::new(MaintenanceSettings::from_config(&config));

    if cli.status {
        print_log_status(runner.log(), RECENT_ENTRIES);
        return Ok(());
    }

    let success = if cli.is_interactive() {
        interactive(&runner, &maintenance, cli.dry_run).await;
        true
    } else if cli.full {
        run_full(&runner, &maintenance, cli.dry_run).await
    } else {
        let tasks = maintenance.plan(&cli.selected());
        run_plan(&runner, &tasks, "MAINTENANCE", "MAINTENANCE SUMMARY", cli.dry_run).await
    };

    if !success {
        std::process::exit(1);
    }
    Ok(())
}

/// 전체 유지보수 후 디스크 보고서와 로그 상태 출력
async fn run_full(runner: &CommandRunner, maintenance: &Arc<Maintenance>, dry_run: bool) -> bool {
    print_banner(
        "ARCH LINUX FULL SYSTEM MAINTENANCE",
        &format!("Started {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")),
    );
    print_system_info();

    let tasks = maintenance.full_plan();
    let summary = TaskOrchestrator::new(runner, "FULL_MAINTENANCE")
        .with_dry_run(dry_run)
        .run_all(&tasks)
        .await;

    if dry_run {
        println!("\n{} {} tasks planned, nothing executed", "[i]".cyan(), summary.total);
        return true;
    }

    print_summary("FULL MAINTENANCE SUMMARY", &summary);

    if !summary.is_interrupted() && summary.success_count() > 0 {
        println!("\n{}", "Final system status".bold());
        if let Err(e) = maintenance.run(MaintenanceKind::DiskUsage, runner).await {
            println!("{} Disk report stopped: {}", "[!]".yellow(), e);
        }
        print_log_status(runner.log(), RECENT_ENTRIES);
    }

    summary.all_succeeded()
}

async fn run_plan(
    runner: &CommandRunner,
    tasks: &[Task],
    label: &str,
    title: &str,
    dry_run: bool,
) -> bool {
    let summary = TaskOrchestrator::new(runner, label)
        .with_dry_run(dry_run)
        .run_all(tasks)
        .await;

    if dry_run {
        return true;
    }
    if tasks.len() > 1 || summary.is_interrupted() {
        print_summary(title, &summary);
    }
    summary.all_succeeded()
}

enum MenuChoice {
    Full,
    Single(MaintenanceKind),
    Status,
    Exit,
}

const MENU: [(&str, MenuChoice); 10] = [
    ("Full system maintenance", MenuChoice::Full),
    ("System update (pacman)", MenuChoice::Single(MaintenanceKind::SystemUpdate)),
    ("Update AUR packages (yay)", MenuChoice::Single(MaintenanceKind::AurUpdate)),
    ("Clean package cache", MenuChoice::Single(MaintenanceKind::PackageCache)),
    ("Clean systemd logs", MenuChoice::Single(MaintenanceKind::JournalCleanup)),
    ("Update locate database", MenuChoice::Single(MaintenanceKind::LocateDatabase)),
    ("Check system health", MenuChoice::Single(MaintenanceKind::HealthCheck)),
    ("Check disk usage", MenuChoice::Single(MaintenanceKind::DiskUsage)),
    ("Show log status", MenuChoice::Status),
    ("Exit", MenuChoice::Exit),
];

/// 대화형 메뉴 (Exit, Esc, 입력 오류 시 종료)
async fn interactive(runner: &CommandRunner, maintenance: &Arc<Maintenance>, dry_run: bool) {
    print_banner(
        "ARCH LINUX MAINTENANCE",
        "Keep your system updated, clean and healthy",
    );
    let items: Vec<String> = MENU.iter().map(|(label, _)| label.to_string()).collect();

    loop {
        let selection = match select_menu("Select an option", &items) {
            Ok(Some(index)) => index,
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(error = %e, "menu closed");
                break;
            }
        };

        match &MENU[selection].1 {
            MenuChoice::Full => {
                run_full(runner, maintenance, dry_run).await;
            }
            MenuChoice::Single(kind) => {
                let tasks = maintenance.plan(&[*kind]);
                run_plan(runner, &tasks, "MAINTENANCE", "MAINTENANCE SUMMARY", dry_run).await;
            }
            MenuChoice::Status => print_log_status(runner.log(), RECENT_ENTRIES),
            MenuChoice::Exit => break,
        }

        wait_for_enter(runner.prompter());
    }

    println!("{} Goodbye!", "[OK]".green());
}
