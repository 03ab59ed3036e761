//! `tracing` 진단 로그 설정.
//!
//! 레벨 결정 우선순위:
//! 1. `--log-level` 플래그
//! 2. `-v/--verbose` (debug)
//! 3. `ARCHMAINT_LOG` 환경 변수
//! 4. 기본값 `warn` (스피너 출력과 섞이지 않도록)

use clap::ValueEnum;
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// 전역 subscriber 초기화 (main에서 한 번만 호출)
pub fn init_logging(cli_level: Option<LogLevel>, verbose: bool) {
    let level = resolve_level(
        cli_level,
        verbose,
        std::env::var("ARCHMAINT_LOG").ok().as_deref(),
    );

    // 이미 설정된 경우(테스트 등)는 무시
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_level(cli_level: Option<LogLevel>, verbose: bool, env: Option<&str>) -> Level {
    if let Some(lvl) = cli_level {
        return lvl.into();
    }
    if verbose {
        return Level::DEBUG;
    }
    env.and_then(parse_level_str).unwrap_or(Level::WARN)
}

fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
