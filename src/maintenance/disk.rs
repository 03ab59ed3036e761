use super::health::{classify_disk_usage, HostMetrics, UsageLevel};
use super::{list_preview, step, MaintenanceSettings};
use crate::error::Result;
use crate::executor::CommandRunner;
use colored::*;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

const GIB: u64 = 1024 * 1024 * 1024;

/// 캐시 정리를 권하는 크기
const CACHE_RECOMMEND_BYTES: u64 = 2 * GIB;
/// journald 정리를 권하는 크기
const JOURNAL_RECOMMEND_BYTES: u64 = GIB;

static HUMAN_SIZE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^([0-9]+(?:\.[0-9]+)?)\s*([KMGTP]?)(?:i?B)?$").unwrap()
});

/// 디렉터리 안 파일 수와 총 크기
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirSize {
    pub files: u64,
    pub bytes: u64,
}

/// 디렉터리 크기 계산 (하위 디렉터리 포함, 읽을 수 없으면 None)
pub fn directory_size(path: &Path) -> Option<DirSize> {
    fs::read_dir(path).ok()?;

    let mut total = DirSize::default();
    for entry in WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        total.files += 1;
        total.bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
    }
    Some(total)
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// `1.2G`, `512M`, `4.0K` 같은 크기 표기를 바이트로 변환
pub fn parse_human_size(text: &str) -> Option<u64> {
    let caps = HUMAN_SIZE.captures(text.trim())?;
    let value: f64 = caps[1].parse().ok()?;
    let exponent = match caps[2].to_ascii_uppercase().as_str() {
        "" => 0,
        "K" => 1,
        "M" => 2,
        "G" => 3,
        "T" => 4,
        "P" => 5,
        _ => return None,
    };
    Some((value * 1024f64.powi(exponent)) as u64)
}

/// `journalctl --disk-usage` 출력에서 크기 추출
///
/// 예: "Archived and active journals take up 1.2G in the file system."
pub fn parse_journal_usage(output: &str) -> Option<u64> {
    let rest = output.split("take up").nth(1)?;
    parse_human_size(rest.split_whitespace().next()?)
}

/// 사용량이 경고 수준 이상인 파일시스템
#[derive(Debug, Clone)]
pub struct FlaggedPartition {
    pub mount_point: String,
    pub percent: f64,
    pub level: UsageLevel,
}

/// 디스크 보고서에 들어가는 권장 사항
pub fn disk_recommendations(
    flagged: &[FlaggedPartition],
    cache_bytes: Option<u64>,
    journal_bytes: Option<u64>,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    for partition in flagged
        .iter()
        .filter(|p| p.level == UsageLevel::Critical)
    {
        recommendations.push(format!(
            "{} is {:.0}% full: free space immediately",
            partition.mount_point, partition.percent
        ));
    }
    if cache_bytes.is_some_and(|bytes| bytes > CACHE_RECOMMEND_BYTES) {
        recommendations
            .push("Package cache exceeds 2 GiB: run 'Clean Packages Cache'".to_string());
    }
    if journal_bytes.is_some_and(|bytes| bytes > JOURNAL_RECOMMEND_BYTES) {
        recommendations
            .push("Systemd journal exceeds 1 GiB: run 'Clean Systemd Logs'".to_string());
    }
    recommendations
}

/// 디스크 사용량 분석 (표시 전용, 항상 성공)
pub async fn check_disk_usage(
    runner: &CommandRunner,
    settings: &MaintenanceSettings,
    metrics: &HostMetrics,
) -> Result<bool> {
    step("1. Filesystem usage");
    let mut flagged = Vec::new();
    for disk in &metrics.disks {
        let percent = disk.used_percent();
        let mount_point = disk.mount_point.display().to_string();
        let level = classify_disk_usage(percent);
        let line = format!(
            "{:<24} {:>10} / {:>10}  {:>5.1}%",
            mount_point,
            format_bytes(disk.used()),
            format_bytes(disk.total),
            percent
        );
        match level {
            UsageLevel::Critical => println!("    {} {}", "[X]".red(), line),
            UsageLevel::Warning => println!("    {} {}", "[!]".yellow(), line),
            _ => println!("        {}", line),
        }
        if level.is_issue() {
            flagged.push(FlaggedPartition {
                mount_point,
                percent,
                level,
            });
        }
    }
    if flagged.is_empty() {
        println!("    {} No filesystem above 80%", "[OK]".green());
    }

    step("2. Home directory");
    let home = crate::config::home_dir();
    let home = home.display();
    if let Some(line) = runner
        .probe_lines(&format!("du -sh '{}' 2>/dev/null", home))
        .await?
        .first()
    {
        println!("    Total: {}", line.split_whitespace().next().unwrap_or("?"));
    }
    let largest = runner
        .probe_lines(&format!(
            "du -sh '{}'/* '{}'/.[!.]* 2>/dev/null | sort -hr | head -10",
            home, home
        ))
        .await?;
    if !largest.is_empty() {
        println!("    Largest entries:");
        list_preview(&largest, 10);
    }

    step("3. Package cache");
    let cache = directory_size(&settings.pacman_cache_dir);
    match cache {
        Some(size) => println!(
            "    {}: {} files, {}",
            settings.pacman_cache_dir.display(),
            size.files,
            format_bytes(size.bytes)
        ),
        None => println!("    {} Could not read package cache", "[?]".yellow()),
    }

    step("4. Systemd journal");
    let journal_output = runner.probe_lines("journalctl --disk-usage").await?.join(" ");
    let journal = parse_journal_usage(&journal_output);
    match journal {
        Some(bytes) => println!("    Journal size: {}", format_bytes(bytes)),
        None => println!("    {} Journal size unavailable", "[?]".yellow()),
    }

    step("5. Temporary directories");
    for dir in ["/tmp", "/var/tmp"] {
        let size = runner
            .probe_lines(&format!("du -sh {} 2>/dev/null", dir))
            .await?
            .first()
            .and_then(|line| line.split_whitespace().next().map(str::to_string));
        println!("    {:<10} {}", dir, size.as_deref().unwrap_or("?"));
    }

    let recommendations =
        disk_recommendations(&flagged, cache.map(|size| size.bytes), journal);
    if !recommendations.is_empty() {
        println!("\n{}", "Recommendations:".bold());
        for recommendation in &recommendations {
            println!("    - {}", recommendation);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maintenance::health::DiskUsage;
    use crate::testing::{mock_runner, MockLauncher, MockResponse, ScriptedPrompter};
    use std::path::PathBuf;
    use std::sync::Arc;

    #[test]
    fn test_parse_human_size() {
        assert_eq!(parse_human_size("512"), Some(512));
        assert_eq!(parse_human_size("4.0K"), Some(4096));
        assert_eq!(parse_human_size("1.5M"), Some(1572864));
        assert_eq!(parse_human_size("2G"), Some(2 * GIB));
        assert_eq!(parse_human_size("1.0GiB"), Some(GIB));
        assert_eq!(parse_human_size("12KB"), Some(12 * 1024));
        assert_eq!(parse_human_size("lots"), None);
        assert_eq!(parse_human_size(""), None);
    }

    #[test]
    fn test_parse_journal_usage() {
        let output = "Archived and active journals take up 1.2G in the file system.";
        let bytes = parse_journal_usage(output).unwrap();
        assert!(bytes > GIB && bytes < 2 * GIB);

        assert_eq!(parse_journal_usage("No journal files were found."), None);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(3 * GIB), "3.0 GiB");
    }

    #[test]
    fn test_directory_size_recurses() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.pkg.tar.zst"), vec![0u8; 100]).unwrap();
        fs::create_dir(dir.path().join("download-x")).unwrap();
        fs::write(dir.path().join("download-x").join("b"), vec![0u8; 50]).unwrap();

        let size = directory_size(dir.path()).unwrap();
        assert_eq!(size, DirSize { files: 2, bytes: 150 });

        assert!(directory_size(&dir.path().join("missing")).is_none());
    }

    #[test]
    fn test_recommendations() {
        let flagged = vec![
            FlaggedPartition {
                mount_point: "/".to_string(),
                percent: 95.0,
                level: UsageLevel::Critical,
            },
            FlaggedPartition {
                mount_point: "/home".to_string(),
                percent: 85.0,
                level: UsageLevel::Warning,
            },
        ];

        let recommendations = disk_recommendations(&flagged, Some(3 * GIB), Some(GIB / 2));
        assert_eq!(recommendations.len(), 2);
        assert!(recommendations[0].starts_with("/ is 95% full"));
        assert!(recommendations[1].contains("Package cache"));

        assert!(disk_recommendations(&[], None, None).is_empty());
        assert_eq!(disk_recommendations(&[], None, Some(2 * GIB)).len(), 1);
    }

    #[tokio::test]
    async fn test_disk_report_always_succeeds_and_never_logs() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = Arc::new(MockLauncher::new().rule("du", MockResponse::Exit(1, "", "")));
        let runner = mock_runner(dir.path(), launcher, Arc::new(ScriptedPrompter::new(&[])));
        let settings = MaintenanceSettings {
            journal_retention: "2w".to_string(),
            ping_target: "8.8.8.8".to_string(),
            pacman_cache_dir: PathBuf::from("/nonexistent"),
            aur_helper: None,
        };
        let metrics = HostMetrics {
            disks: vec![DiskUsage {
                mount_point: PathBuf::from("/"),
                total: 100,
                available: 1,
            }],
            ..Default::default()
        };

        assert!(check_disk_usage(&runner, &settings, &metrics).await.unwrap());
        assert!(runner.log().entries().unwrap().is_empty());
    }
}
