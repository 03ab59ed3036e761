use crate::error::Result;
use chrono::{Local, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `<timestamp> - <action> - <STATUS>[ - <details>]`
static LOG_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}) - (.*?) - (SUCCESS|FAILED)(?: - (.*))?$")
        .unwrap()
});

/// 로그 항목 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStatus {
    Success,
    Failed,
}

impl LogStatus {
    pub fn from_success(success: bool) -> Self {
        if success {
            LogStatus::Success
        } else {
            LogStatus::Failed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Success => "SUCCESS",
            LogStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 로그 파일의 한 줄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub action: String,
    pub status: LogStatus,
    /// 설치 로그에서만 사용하는 추가 정보
    pub details: Option<String>,
}

impl LogEntry {
    pub fn new(action: impl Into<String>, status: LogStatus) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            action: action.into(),
            status,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        let details = details.into();
        if !details.trim().is_empty() {
            self.details = Some(details);
        }
        self
    }

    /// 로그 파일 한 줄 파싱 (형식이 다르면 None)
    pub fn parse(line: &str) -> Option<Self> {
        let caps = LOG_LINE_REGEX.captures(line.trim_end())?;
        let timestamp = NaiveDateTime::parse_from_str(&caps[1], TIMESTAMP_FORMAT).ok()?;
        let status = match &caps[3] {
            "SUCCESS" => LogStatus::Success,
            _ => LogStatus::Failed,
        };

        Some(Self {
            timestamp,
            action: caps[2].to_string(),
            status,
            details: caps.get(4).map(|m| m.as_str().to_string()),
        })
    }

    /// 로그 한 줄로 직렬화 (줄바꿈은 공백으로 치환)
    pub fn to_line(&self) -> String {
        let mut line = format!(
            "{} - {} - {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            single_line(&self.action),
            self.status
        );
        if let Some(details) = &self.details {
            line.push_str(" - ");
            line.push_str(&single_line(details));
        }
        line
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 로그 파일 통계
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogStats {
    pub size_bytes: u64,
    pub total: usize,
    pub success: usize,
    pub failed: usize,
}

/// Append-only 작업 로그
///
/// 매 기록마다 파일을 열고, 한 줄 추가하고, 닫습니다.
/// 파일이 `max_bytes` 이상이면 기록 전에 `log.1`, `log.2`, ... 로 회전합니다.
#[derive(Debug, Clone)]
pub struct ActionLog {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
}

impl ActionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_bytes: 0,
            backups: 0,
        }
    }

    /// 회전 정책 설정 (`max_bytes == 0`이면 회전 안 함)
    pub fn with_rotation(mut self, max_bytes: u64, backups: usize) -> Self {
        self.max_bytes = max_bytes;
        self.backups = backups;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 작업 결과 기록
    pub fn record(&self, action: &str, success: bool) -> Result<()> {
        self.append(&LogEntry::new(action, LogStatus::from_success(success)))
    }

    /// 추가 정보와 함께 기록
    pub fn record_with_details(&self, action: &str, success: bool, details: &str) -> Result<()> {
        self.append(&LogEntry::new(action, LogStatus::from_success(success)).with_details(details))
    }

    pub fn append(&self, entry: &LogEntry) -> Result<()> {
        self.rotate_if_needed()?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", entry.to_line())?;

        tracing::trace!(path = %self.path.display(), action = %entry.action, status = %entry.status, "log entry written");
        Ok(())
    }

    fn rotated_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    fn rotate_if_needed(&self) -> Result<()> {
        if self.max_bytes == 0 {
            return Ok(());
        }
        let size = match fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(_) => return Ok(()),
        };
        if size < self.max_bytes {
            return Ok(());
        }

        if self.backups == 0 {
            fs::remove_file(&self.path)?;
            return Ok(());
        }

        let oldest = self.rotated_path(self.backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.backups).rev() {
            let from = self.rotated_path(index);
            if from.exists() {
                fs::rename(&from, self.rotated_path(index + 1))?;
            }
        }
        fs::rename(&self.path, self.rotated_path(1))?;

        tracing::debug!(path = %self.path.display(), size, "log file rotated");
        Ok(())
    }

    /// 현재 로그 파일의 모든 항목 (형식이 다른 줄은 건너뜀)
    pub fn entries(&self) -> Result<Vec<LogEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(content.lines().filter_map(LogEntry::parse).collect())
    }

    /// 마지막 `n`개 항목
    pub fn tail(&self, n: usize) -> Result<Vec<LogEntry>> {
        let entries = self.entries()?;
        let skip = entries.len().saturating_sub(n);
        Ok(entries.into_iter().skip(skip).collect())
    }

    pub fn stats(&self) -> Result<LogStats> {
        if !self.path.exists() {
            return Ok(LogStats::default());
        }
        let size_bytes = fs::metadata(&self.path)?.len();
        let entries = self.entries()?;
        let success = entries
            .iter()
            .filter(|e| e.status == LogStatus::Success)
            .count();

        Ok(LogStats {
            size_bytes,
            total: entries.len(),
            success,
            failed: entries.len() - success,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActionLog::new(dir.path().join("maint.log"));

        log.record("Synchronizing package database", true).unwrap();
        log.record("CANCELLED: dd if=/dev/zero (dangerous command)", false)
            .unwrap();

        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "Synchronizing package database");
        assert_eq!(entries[0].status, LogStatus::Success);
        assert_eq!(entries[1].status, LogStatus::Failed);
        assert!(entries[1].action.starts_with("CANCELLED:"));
    }

    #[test]
    fn test_line_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maint.log");
        let log = ActionLog::new(&path);

        log.record("Updating locate database", true).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let line = content.lines().next().unwrap();
        assert!(line.ends_with(" - Updating locate database - SUCCESS"));
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_details_roundtrip() {
        let entry = LogEntry::new("Install Docker", LogStatus::Failed)
            .with_details("error: target not found:\n docker");
        let parsed = LogEntry::parse(&entry.to_line()).unwrap();

        assert_eq!(parsed.action, "Install Docker");
        assert_eq!(parsed.status, LogStatus::Failed);
        assert_eq!(parsed.details.as_deref(), Some("error: target not found: docker"));
    }

    #[test]
    fn test_action_containing_separator() {
        let line = "2024-05-01 10:00:00 - FULL_MAINTENANCE: Update - ERROR: boom - FAILED";
        let parsed = LogEntry::parse(line).unwrap();
        assert_eq!(parsed.action, "FULL_MAINTENANCE: Update - ERROR: boom");
        assert_eq!(parsed.status, LogStatus::Failed);
        assert!(parsed.details.is_none());
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maint.log");
        fs::write(
            &path,
            "garbage\n2024-05-01 10:00:00 - Clean systemd logs (2w) - SUCCESS\n\n",
        )
        .unwrap();

        let log = ActionLog::new(&path);
        assert_eq!(log.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_tail_and_stats() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActionLog::new(dir.path().join("maint.log"));
        for i in 0..7 {
            log.record(&format!("step {}", i), i % 3 != 0).unwrap();
        }

        let tail = log.tail(5).unwrap();
        assert_eq!(tail.len(), 5);
        assert_eq!(tail[0].action, "step 2");
        assert_eq!(tail[4].action, "step 6");

        let stats = log.stats().unwrap();
        assert_eq!(stats.total, 7);
        assert_eq!(stats.failed, 3);
        assert_eq!(stats.success, 4);
        assert!(stats.size_bytes > 0);
    }

    #[test]
    fn test_stats_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActionLog::new(dir.path().join("missing.log"));
        assert_eq!(log.stats().unwrap(), LogStats::default());
        assert!(log.tail(5).unwrap().is_empty());
    }

    #[test]
    fn test_rotation_keeps_bounded_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maint.log");
        let log = ActionLog::new(&path).with_rotation(1, 2);

        // max_bytes가 1이므로 매 기록 전에 회전
        for i in 0..5 {
            log.record(&format!("entry {}", i), true).unwrap();
        }

        assert_eq!(log.entries().unwrap()[0].action, "entry 4");
        let first = ActionLog::new(dir.path().join("maint.log.1"));
        assert_eq!(first.entries().unwrap()[0].action, "entry 3");
        let second = ActionLog::new(dir.path().join("maint.log.2"));
        assert_eq!(second.entries().unwrap()[0].action, "entry 2");
        assert!(!dir.path().join("maint.log.3").exists());
    }

    #[test]
    fn test_no_rotation_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maint.log");
        let log = ActionLog::new(&path);
        for i in 0..3 {
            log.record(&format!("entry {}", i), true).unwrap();
        }
        assert_eq!(log.entries().unwrap().len(), 3);
        assert!(!dir.path().join("maint.log.1").exists());
    }
}
