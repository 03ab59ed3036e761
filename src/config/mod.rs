use crate::error::{MaintError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// archmaint 사용자 설정
///
/// 설정 파일은 ~/.archmaint/config.toml에 저장됩니다.
/// 모든 필드는 기본값이 있으므로 일부만 적어도 됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 유지보수 로그 파일 경로 (`~` 사용 가능)
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// 개발 환경 설치 로그 파일 경로
    #[serde(default = "default_devenv_log_file")]
    pub devenv_log_file: String,

    /// 로그 파일 회전 기준 크기 (바이트, 0이면 회전 안 함)
    #[serde(default = "default_log_max_bytes")]
    pub log_max_bytes: u64,

    /// 보관할 회전 로그 개수
    #[serde(default = "default_log_backups")]
    pub log_backups: usize,

    /// 명령어 타임아웃 (초, 0이면 제한 없음)
    #[serde(default)]
    pub command_timeout_secs: u64,

    /// journalctl --vacuum-time 값
    #[serde(default = "default_journal_retention")]
    pub journal_retention: String,

    /// 네트워크 확인용 ping 대상
    #[serde(default = "default_ping_target")]
    pub ping_target: String,

    /// 스피너 표시 여부
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

fn default_log_file() -> String {
    "~/.arch_maintenance.log".to_string()
}

fn default_devenv_log_file() -> String {
    "~/.dev_env_setup.log".to_string()
}

fn default_log_max_bytes() -> u64 {
    1024 * 1024
}

fn default_log_backups() -> usize {
    3
}

fn default_journal_retention() -> String {
    "2w".to_string()
}

fn default_ping_target() -> String {
    "8.8.8.8".to_string()
}

fn default_show_progress() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            devenv_log_file: default_devenv_log_file(),
            log_max_bytes: default_log_max_bytes(),
            log_backups: default_log_backups(),
            command_timeout_secs: 0,
            journal_retention: default_journal_retention(),
            ping_target: default_ping_target(),
            show_progress: default_show_progress(),
        }
    }
}

impl Config {
    /// 설정 디렉토리 경로
    fn config_dir() -> PathBuf {
        home_dir().join(".archmaint")
    }

    /// 기본 설정 파일 경로
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// 기본 위치에서 로드 (없으면 기본값 사용)
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// 지정한 경로에서 로드 (없으면 기본값 사용)
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| MaintError::ConfigError(format!("{}: {}", path.display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.journal_retention.trim().is_empty() {
            return Err(MaintError::ConfigError(
                "journal_retention must not be empty".to_string(),
            ));
        }
        if self.ping_target.trim().is_empty() {
            return Err(MaintError::ConfigError(
                "ping_target must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn log_path(&self) -> PathBuf {
        expand_home(&self.log_file)
    }

    pub fn devenv_log_path(&self) -> PathBuf {
        expand_home(&self.devenv_log_file)
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        match self.command_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// 홈 디렉토리 (찾지 못하면 현재 디렉토리)
pub fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// 선행 `~`를 홈 디렉토리로 확장
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return home_dir();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(path),
    }
}
