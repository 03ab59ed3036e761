use anyhow::{Context, Result};
use archmaint::cli::DevEnvCli;
use archmaint::config::Config;
use archmaint::devenv::{ensure_root, is_arch_linux, print_catalog, print_status, Installer, ToolCatalog};
use archmaint::executor::CommandRunner;
use archmaint::history::ActionLog;
use archmaint::logging::init_logging;
use archmaint::orchestrator::{Task, TaskOrchestrator};
use archmaint::ui::report::{print_banner, print_log_status, print_summary};
use archmaint::ui::{select_menu, wait_for_enter};
use clap::Parser;
use colored::*;
use std::sync::Arc;

/// 로그 화면에 보여줄 최근 항목 수
const RECENT_ENTRIES: usize = 10;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DevEnvCli::parse();
    init_logging(cli.log_level, cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    let log = ActionLog::new(config.devenv_log_path())
        .with_rotation(config.log_max_bytes, config.log_backups);
    let runner = CommandRunner::new(log)
        .with_timeout(config.command_timeout())
        .with_progress(config.show_progress);
    let installer = Installer::new(ToolCatalog::default_catalog());

    if cli.list {
        print_catalog(installer.catalog());
        return Ok(());
    }
    if cli.log {
        print_log_status(runner.log(), RECENT_ENTRIES);
        return Ok(());
    }
    if cli.status {
        let status = installer
            .status(&runner)
            .await
            .context("Failed to query installed packages")?;
        print_status(&status);
        return Ok(());
    }

    if !cli.dry_run {
        preflight(&runner).await?;
    }

    let success = if cli.is_interactive() {
        interactive(&runner, &installer, cli.dry_run).await;
        true
    } else if cli.all {
        install(&runner, &installer.install_all_plan(), cli.dry_run).await
    } else {
        let tasks = installer.plan(&cli.install).with_context(|| {
            format!(
                "Available tools: {}",
                installer.catalog().keys().join(", ")
            )
        })?;
        install(&runner, &tasks, cli.dry_run).await
    };

    if !success {
        std::process::exit(1);
    }
    Ok(())
}

/// root 권한과 Arch 계열 여부 확인
async fn preflight(runner: &CommandRunner) -> Result<()> {
    ensure_root(runner)
        .await
        .context("Installing packages requires root privileges")?;

    if !is_arch_linux() {
        println!(
            "{} This tool is designed for Arch Linux; pacman and yay may not be available.",
            "[!]".yellow().bold()
        );
        wait_for_enter(runner.prompter());
    }
    Ok(())
}

async fn install(runner: &CommandRunner, tasks: &[Task], dry_run: bool) -> bool {
    let summary = TaskOrchestrator::new(runner, "DEVENV")
        .with_dry_run(dry_run)
        .run_all(tasks)
        .await;

    if dry_run {
        return true;
    }
    if tasks.len() > 1 || summary.is_interrupted() {
        print_summary("INSTALLATION SUMMARY", &summary);
    }
    println!(
        "\n{} Check the log file for details: {}",
        "[i]".cyan(),
        runner.log().path().display()
    );
    summary.all_succeeded()
}

/// 대화형 메뉴: 도구별 설치, 전체 설치, 목록, 상태, 로그
async fn interactive(runner: &CommandRunner, installer: &Arc<Installer>, dry_run: bool) {
    print_banner(
        "DEVELOPER ENVIRONMENT SETUP",
        "Install development tools on Arch Linux",
    );

    let keys: Vec<String> = installer
        .catalog()
        .iter()
        .map(|tool| tool.key.clone())
        .collect();
    let mut items: Vec<String> = installer
        .catalog()
        .iter()
        .map(|tool| format!("Install {}", tool.name))
        .collect();
    items.extend(
        [
            "Install all tools",
            "List available tools",
            "Show installation status",
            "Show installation log",
            "Exit",
        ]
        .map(str::to_string),
    );

    loop {
        let selection = match select_menu("Select an option", &items) {
            Ok(Some(index)) => index,
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(error = %e, "menu closed");
                break;
            }
        };

        if let Some(key) = keys.get(selection) {
            if let Ok(task) = installer.task(key) {
                install(runner, &[task], dry_run).await;
            }
        } else {
            match selection - keys.len() {
                0 => {
                    install(runner, &installer.install_all_plan(), dry_run).await;
                }
                1 => print_catalog(installer.catalog()),
                2 => match installer.status(runner).await {
                    Ok(status) => print_status(&status),
                    Err(e) => println!("{} {}", "[!]".yellow(), e),
                },
                3 => print_log_status(runner.log(), RECENT_ENTRIES),
                _ => break,
            }
        }

        wait_for_enter(runner.prompter());
    }

    println!("{} Your development environment is ready!", "[OK]".green());
}
