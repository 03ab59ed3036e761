use crate::history::{ActionLog, LogStatus};
use crate::orchestrator::{Grade, Summary};
use colored::*;
use sysinfo::System;

const RATE_BAR_WIDTH: usize = 50;

pub fn rule(width: usize) -> String {
    "=".repeat(width)
}

pub fn print_section(title: &str) {
    println!("\n{}", title.bold());
    println!("{}", rule(60));
}

/// 성공률 막대 (`█` 채움, `░` 빈칸)
pub fn rate_bar(rate: f64, width: usize) -> String {
    let filled = ((width as f64) * rate.clamp(0.0, 100.0) / 100.0) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn print_banner(title: &str, subtitle: &str) {
    println!("{}", rule(80).cyan());
    println!("  {}", title.cyan().bold());
    println!("  {}", subtitle.dimmed());
    println!("{}", rule(80).cyan());
}

/// 시스템 기본 정보 출력
pub fn print_system_info() {
    print_section("SYSTEM INFORMATION");
    let os = System::long_os_version().unwrap_or_else(|| "Arch Linux".to_string());
    println!("  OS:           {}", os);
    if let Some(kernel) = System::kernel_version() {
        println!("  Kernel:       {}", kernel);
    }
    println!("  Architecture: {}", std::env::consts::ARCH);
    println!(
        "  User:         {}",
        std::env::var("USER").unwrap_or_else(|_| "Unknown".to_string())
    );
    println!("  Home:         {}", crate::config::home_dir().display());
    println!(
        "  Date:         {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!("{}", rule(60));
}

/// 실행 요약 출력
pub fn print_summary(title: &str, summary: &Summary) {
    println!();
    println!("{}", rule(80).cyan());
    println!("  {}", title.cyan().bold());
    println!("{}", rule(80).cyan());

    let rate = summary.success_rate();
    println!(
        "\nOverall Progress: [{}] {:.1}%",
        rate_bar(rate, RATE_BAR_WIDTH),
        rate
    );

    print_section("EXECUTION STATISTICS");
    println!("  Total execution time: {:.1} seconds", summary.elapsed.as_secs_f64());
    println!("  Total tasks:      {}", summary.total);
    println!("  Successful tasks: {}", summary.success_count().to_string().green());
    println!("  Failed tasks:     {}", summary.failure_count().to_string().red());
    println!("  Success rate:     {:.1}%", rate);

    if let Some(task) = &summary.interrupted_during {
        println!(
            "  {} Interrupted during '{}' ({} of {} tasks finished)",
            "[!]".yellow(),
            task,
            summary.executed(),
            summary.total
        );
    }

    let critical_total = summary.critical_total();
    if critical_total > 0 {
        let critical_failed = summary.critical_failures().len();
        print_section("CRITICAL TASKS STATUS");
        println!("  Critical tasks: {}", critical_total);
        println!("  Successful:     {}", critical_total - critical_failed);
        println!("  Failed:         {}", critical_failed);
    }

    let failed = summary.failed();
    if !failed.is_empty() {
        print_section("FAILED TASKS");
        for outcome in summary.outcomes.iter().filter(|o| o.failed()) {
            let mark = if outcome.critical { " (critical)".red().to_string() } else { String::new() };
            match &outcome.error {
                Some(err) => println!("  - {}{}: {}", outcome.name, mark, err.red()),
                None => println!("  - {}{}", outcome.name, mark),
            }
        }
    }

    if !summary.warnings.is_empty() {
        print_section("WARNINGS");
        for warning in &summary.warnings {
            println!("  - {}", warning.yellow());
        }
    }

    print_section("RECOMMENDATIONS");
    for line in recommendations(summary) {
        println!("  {}", line);
    }
    println!("{}", rule(60));
}

fn recommendations(summary: &Summary) -> Vec<&'static str> {
    if summary.is_interrupted() {
        return vec![
            "Run was interrupted before all tasks finished.",
            "Re-run the remaining tasks individually when ready.",
        ];
    }
    match summary.grade() {
        Grade::Excellent => vec![
            "EXCELLENT! All tasks completed successfully.",
            "Continue with your regular maintenance schedule.",
        ],
        Grade::Good => vec![
            "GOOD. Most tasks completed successfully.",
            "Review failed tasks and consider running them individually.",
        ],
        Grade::Fair => vec![
            "FAIR. Some tasks need attention.",
            "Run failed tasks individually and check the log for details.",
        ],
        Grade::Poor => vec![
            "POOR. Multiple tasks failed.",
            "Review system logs; some tasks may need manual intervention.",
        ],
    }
}

/// 로그 파일 정보와 최근 항목 출력
pub fn print_log_status(log: &ActionLog, recent: usize) {
    print_section("LOG FILE INFORMATION");
    println!("  Location: {}", log.path().display());

    if !log.path().exists() {
        println!("  No log file found (first run)");
        println!("{}", rule(60));
        return;
    }

    match log.stats() {
        Ok(stats) => {
            println!("  Size:            {:.1} KB", stats.size_bytes as f64 / 1024.0);
            println!("  Total entries:   {}", stats.total);
            println!("  Success entries: {}", stats.success.to_string().green());
            println!("  Failed entries:  {}", stats.failed.to_string().red());
        }
        Err(e) => println!("  {} Could not read log file: {}", "[!]".yellow(), e),
    }

    if let Ok(entries) = log.tail(recent) {
        if !entries.is_empty() {
            println!("\n  Last {} log entries:", entries.len());
            for entry in entries {
                let line = entry.to_line();
                match entry.status {
                    LogStatus::Success => println!("    {}", line),
                    LogStatus::Failed => println!("    {}", line.red()),
                }
            }
        }
    }
    println!("{}", rule(60));
}
