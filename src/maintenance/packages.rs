use super::disk::{directory_size, format_bytes};
use super::{hint, list_preview, step, MaintenanceSettings};
use crate::error::Result;
use crate::executor::CommandRunner;
use colored::*;

/// pacman으로 시스템 업데이트
pub async fn update_system(runner: &CommandRunner) -> Result<bool> {
    step("Step 1: Synchronizing package database...");
    let sync = runner
        .execute("sudo pacman -Sy", Some("Synchronizing package database"))
        .await?;
    if !sync.succeeded() {
        println!("{} Failed to sync package database. Aborting update.", "[X]".red());
        hint("Check your internet connection and mirrorlist");
        return Ok(false);
    }

    step("Step 2: Checking for available updates...");
    let updates = runner.probe_lines("pacman -Qu").await?;
    if updates.is_empty() {
        println!("{} System is already up to date", "[OK]".green());
        return Ok(true);
    }
    println!("    Found {} package updates:", updates.len());
    list_preview(&updates, 10);

    step("Step 3: Updating system packages...");
    let upgrade = runner
        .execute("sudo pacman -Syu --noconfirm", Some("Updating system packages"))
        .await?;
    if !upgrade.succeeded() {
        println!("{} System update failed", "[X]".red());
        hint("Review the pacman output above, then retry manually with 'sudo pacman -Syu'");
        return Ok(false);
    }

    step("Step 4: Checking kernel...");
    if kernel_updated(&updates) {
        if let Some(installed) = runner.probe_lines("pacman -Q linux").await?.first() {
            println!("    Installed kernel: {}", installed);
        }
        println!(
            "{} Kernel was updated. A reboot is recommended.",
            "[!]".yellow()
        );
    } else {
        println!("    Kernel unchanged");
    }

    step("Step 5: Final database sync...");
    runner
        .execute("sudo pacman -Sy", Some("Final database sync"))
        .await?;

    Ok(true)
}

/// `pacman -Qu` 출력에 linux 패키지가 있는지 확인
pub fn kernel_updated(updates: &[String]) -> bool {
    updates
        .iter()
        .any(|line| line.split_whitespace().next() == Some("linux"))
}

/// 패키지 캐시와 고아 패키지 정리
pub async fn clean_package_cache(
    runner: &CommandRunner,
    settings: &MaintenanceSettings,
) -> Result<bool> {
    step("Step 1: Analyzing package cache...");
    match directory_size(&settings.pacman_cache_dir) {
        Some(size) if size.files == 0 => {
            println!("{} Package cache is already clean", "[OK]".green());
            return Ok(true);
        }
        Some(size) => println!(
            "    Cache: {} files, {}",
            size.files,
            format_bytes(size.bytes)
        ),
        None => println!(
            "{} Could not read {}",
            "[!]".yellow(),
            settings.pacman_cache_dir.display()
        ),
    }

    step("Step 2: Cleaning package cache...");
    let cache = runner
        .execute("sudo pacman -Sc --noconfirm", Some("Cleaning package cache"))
        .await?;
    if !cache.succeeded() {
        println!("{} Failed to clean package cache", "[X]".red());
        return Ok(false);
    }

    step("Step 3: Checking for orphaned packages...");
    let orphans = runner.probe_lines("pacman -Qtdq").await?;
    let orphans_handled = if orphans.is_empty() {
        println!("{} No orphaned packages found", "[OK]".green());
        true
    } else {
        println!("    Found {} orphaned packages:", orphans.len());
        list_preview(&orphans, 10);
        // 거부하면 건너뛰기 (실패 아님)
        if runner
            .confirm("Do you want to remove orphaned packages?")
            .unwrap_or(false)
        {
            runner
                .execute(
                    "sudo pacman -Rns --noconfirm $(pacman -Qtdq)",
                    Some("Removing orphaned packages"),
                )
                .await?
                .succeeded()
        } else {
            println!("    Keeping orphaned packages");
            true
        }
    };

    step("Step 4: Cleaning AUR cache...");
    if settings.aur_helper.is_some() {
        let aur = runner
            .execute("yay -Sc --noconfirm", Some("Cleaning AUR package cache"))
            .await?;
        if !aur.succeeded() {
            println!("{} AUR cache cleanup failed (non-fatal)", "[!]".yellow());
        }
    } else {
        println!("    yay not found, skipping AUR cache");
    }

    if let Some(size) = directory_size(&settings.pacman_cache_dir) {
        println!(
            "\n    Cache now: {} files, {}",
            size.files,
            format_bytes(size.bytes)
        );
    }

    Ok(orphans_handled)
}

/// yay로 AUR 패키지 업데이트
pub async fn update_aur_packages(
    runner: &CommandRunner,
    settings: &MaintenanceSettings,
) -> Result<bool> {
    if settings.aur_helper.is_none() {
        println!("{} yay is not installed", "[X]".red());
        hint("Install it from https://aur.archlinux.org/packages/yay");
        runner.log().record("AUR Update: yay not installed", false)?;
        return Ok(false);
    }

    if let Some(version) = runner.probe_lines("yay --version").await?.first() {
        println!("    Using {}", version);
    }

    step("Step 1: Checking for AUR updates...");
    let updates = runner.probe_lines("yay -Qua").await?;
    if updates.is_empty() {
        println!("{} All AUR packages are up to date", "[OK]".green());
        runner.log().record("AUR Update: No updates available", true)?;
        return Ok(true);
    }
    println!("    Found {} AUR updates:", updates.len());
    list_preview(&updates, 5);

    step("Step 2: Updating AUR packages...");
    let upgrade = runner
        .execute("yay -Syu --noconfirm", Some("Updating AUR packages"))
        .await?;
    if !upgrade.succeeded() {
        runner
            .log()
            .record("AUR Update: Failed to update packages", false)?;
        return Ok(false);
    }

    step("Step 3: Checking for orphaned AUR packages...");
    let orphans = runner.probe_lines("yay -Qtdq").await?;
    if orphans.is_empty() {
        println!("    No orphaned packages");
    } else {
        println!("    Found {} orphaned packages:", orphans.len());
        list_preview(&orphans, 10);
        // 프롬프트 에러는 거부로 취급
        if runner
            .confirm("Do you want to remove orphaned packages?")
            .unwrap_or(false)
        {
            runner
                .execute(
                    "yay -Rns --noconfirm $(yay -Qtdq)",
                    Some("Removing orphaned AUR packages"),
                )
                .await?;
        }
    }

    step("Step 4: Checking yay itself...");
    if !runner.probe_lines("yay -Qu yay").await?.is_empty() {
        println!("    A new version of yay is available");
        if runner.confirm("Do you want to update yay?").unwrap_or(false) {
            runner
                .execute("yay -S yay --noconfirm", Some("Updating yay"))
                .await?;
        }
    }

    runner
        .log()
        .record("AUR Update: All packages updated successfully", true)?;
    Ok(true)
}

/// 오래된 journald 로그 정리
pub async fn clean_systemd_logs(
    runner: &CommandRunner,
    settings: &MaintenanceSettings,
) -> Result<bool> {
    if let Some(usage) = runner.probe_lines("journalctl --disk-usage").await?.first() {
        println!("    {}", usage);
    }

    let command = format!(
        "sudo journalctl --vacuum-time={}",
        settings.journal_retention
    );
    let description = format!(
        "Cleaning systemd logs older than {}",
        settings.journal_retention
    );
    let result = runner.execute(&command, Some(&description)).await?;
    Ok(result.succeeded())
}

pub async fn update_locate_database(runner: &CommandRunner) -> Result<bool> {
    let result = runner
        .execute("sudo updatedb", Some("Updating locate database"))
        .await?;
    if result.succeeded() {
        hint("Use 'locate <filename>' to search for files");
    }
    Ok(result.succeeded())
}
